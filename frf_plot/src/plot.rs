use half_power::XyData;
use plotters::prelude::*;
use statrs::statistics::Statistics;
use std::error::Error;
use std::ops::Range;

use crate::colors::*;

/// Value range of one chart axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub start: f64,
    pub end: f64,
}

impl AxisRange {
    /// Smallest range holding every finite value. Empty input gives `0..1` and a single value
    /// is widened to a unit span around it so that the chart still has a scale.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let values = values.into_iter().filter(|v| v.is_finite()).collect::<Vec<f64>>();
        if values.is_empty() {
            return Self { start: 0.0, end: 1.0 };
        }
        let start = Statistics::min(&values);
        let end = Statistics::max(&values);
        if end - start > 0.0 {
            Self { start, end }
        } else {
            Self { start: start - 0.5, end: end + 0.5 }
        }
    }

    /// Grow both ends by `fraction` of the span.
    #[inline]
    pub fn padded(self, fraction: f64) -> Self {
        let margin = (self.end - self.start) * fraction;
        Self { start: self.start - margin, end: self.end + margin }
    }

    #[inline]
    pub fn range(self) -> Range<f64> {
        self.start..self.end
    }
}

/// A frequency response drawn as a line with the damping estimate as markers on a secondary axis.
pub(crate) struct DampingPlot<'a> {
    source: &'a XyData,
    damping: &'a XyData,
    marker_size: u32,
}

impl<'a> DampingPlot<'a> {
    pub fn new(source: &'a XyData, damping: &'a XyData) -> Self {
        Self { source, damping, marker_size: 3 }
    }

    pub fn draw(&self, root: &DrawingArea<SVGBackend, plotters::coord::Shift>) -> Result<(), Box<dyn Error>> {
        root.fill(&BLACK)?;

        let x = AxisRange::from_values(self.source.data.iter().map(|p| p.0));
        let y = AxisRange::from_values(self.source.data.iter().map(|p| p.1)).padded(0.05);
        let z = AxisRange::from_values(self.damping.data.iter().map(|p| p.1)).padded(0.1);

        let mut chart = ChartBuilder::on(root)
            .caption(&self.damping.legend_label, ("sans-serif", 20).into_font().color(&LIGHT_BLUE))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .right_y_label_area_size(60)
            .build_cartesian_2d(x.range(), y.range())?
            .set_secondary_coord(x.range(), z.range());

        chart
            .configure_mesh()
            .x_desc(self.source.axis1.label.as_str())
            .y_desc(self.source.y_values_label.as_str())
            .light_line_style(&GRID_GREY)
            .label_style(("sans-serif", 15).into_font().color(&LIGHT_BLUE))
            .axis_style(&LIGHT_BLUE)
            .draw()?;
        chart
            .configure_secondary_axes()
            .y_desc(self.damping.y_values_label.as_str())
            .label_style(("sans-serif", 15).into_font().color(&MARKER_ORANGE))
            .axis_style(&MARKER_ORANGE)
            .draw()?;

        chart.draw_series(LineSeries::new(self.source.data.iter().copied(), &LIGHT_BLUE))?;
        chart.draw_secondary_series(
            self.damping
                .data
                .iter()
                .map(|&p| Circle::new(p, self.marker_size, MARKER_ORANGE.filled())),
        )?;
        Ok(())
    }
}
