//! Renders a frequency response together with its damping estimate as an SVG chart.
//! The response is drawn as a line on the primary axis and the critical damping ratio of each
//! resolved peak as a marker on a secondary axis.

use half_power::XyData;
use plot::DampingPlot;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

mod colors;
pub mod plot;

/// Default image width in pixels
pub const DEFAULT_WIDTH: u32 = 1000;
/// Default image height in pixels
pub const DEFAULT_HEIGHT: u32 = 500;

/// Render the chart into an SVG document.
/// # Arguments
/// * `source` - the frequency response the estimate was taken from
/// * `damping` - the estimate, as produced by [`half_power::plot_damping`] or [`XyData::damping_data`]
/// * `width` - image width (can use [`crate::DEFAULT_WIDTH`])
/// * `height` - image height (can use [`crate::DEFAULT_HEIGHT`])
pub fn render_damping_svg(source: &XyData, damping: &XyData, width: u32, height: u32) -> Result<String, Box<dyn Error>> {
    if width == 0 || height == 0 {
        return Err(format!("cannot render a {}x{} image", width, height).into());
    }
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (width, height)).into_drawing_area();
        DampingPlot::new(source, damping).draw(&root)?;
        root.present()?;
    }
    Ok(buf)
}

/// Render the chart and write it to `path`.
pub fn create_damping_plot<P: AsRef<Path>>(
    path: P,
    source: &XyData,
    damping: &XyData,
    width: u32,
    height: u32,
) -> Result<(), Box<dyn Error>> {
    let svg = render_damping_svg(source, damping, width, height)?;
    std::fs::write(path, svg)?;
    Ok(())
}
