//! The boundary to a plotting host.
//!
//! A host owns the displayed plot and the named datasets; this module only describes what it
//! must provide ([`PlotSession`]) and runs the damping estimate over every frequency response
//! curve the host currently shows ([`plot_damping`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::damping::DampingResult;
use crate::error::{HalfPowerError, HalfPowerResult};
use crate::estimator::HalfPowerEstimator;

pub const DAMPING_QUANTITY_LABEL: &str = "Critical damping ratio";
pub const DAMPING_VALUES_LABEL: &str = "Critical Damping";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityKind {
    Frequency,
    /// Dimensionless or unspecified
    None,
    Other,
}

/// Physical quantity shown on a plot axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityType {
    pub kind: QuantityKind,
    pub label: String,
}

impl QuantityType {
    pub fn frequency() -> Self {
        Self { kind: QuantityKind::Frequency, label: "Frequency".into() }
    }

    pub fn none(label: &str) -> Self {
        Self { kind: QuantityKind::None, label: label.into() }
    }

    pub fn other(label: &str) -> Self {
        Self { kind: QuantityKind::Other, label: label.into() }
    }
}

/// A named dataset as the host stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XyData {
    pub name: String,
    pub legend_label: String,
    pub description: String,
    pub axis1: QuantityType,
    pub axis2: QuantityType,
    pub y_values_label: String,
    pub data: Vec<(f64, f64)>,
}

impl XyData {
    /// A frequency response curve with every label derived from `name`.
    pub fn frequency_response(name: &str, quantity: QuantityType, data: Vec<(f64, f64)>) -> Self {
        Self {
            name: name.into(),
            legend_label: name.into(),
            description: name.into(),
            y_values_label: quantity.label.clone(),
            axis1: QuantityType::frequency(),
            axis2: quantity,
            data,
        }
    }

    /// Whether the damping estimate applies: x must be frequency and y a real quantity.
    pub fn is_frequency_response(&self) -> bool {
        self.axis1.kind == QuantityKind::Frequency && self.axis2.kind != QuantityKind::None
    }

    /// The dataset that carries `damping` estimated from this curve.
    pub fn damping_data(&self, name: String, damping: &DampingResult) -> XyData {
        XyData {
            name,
            legend_label: format!("{} DAMPING", self.legend_label),
            description: format!("Damping estimated from {}", self.description),
            axis1: self.axis1.clone(),
            axis2: QuantityType::none(DAMPING_QUANTITY_LABEL),
            y_values_label: DAMPING_VALUES_LABEL.into(),
            data: damping.to_points(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveStyle {
    pub show_symbols: bool,
    pub symbol_size: u32,
    pub show_line: bool,
}

impl CurveStyle {
    /// Markers only, no connecting line.
    pub fn markers(size: u32) -> Self {
        Self { show_symbols: true, symbol_size: size, show_line: false }
    }

    pub fn line() -> Self {
        Self { show_symbols: false, symbol_size: 0, show_line: true }
    }
}

/// What a host has to offer for [`plot_damping`].
pub trait PlotSession {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Curves of the displayed XY plot, `None` if the active display is not an XY plot.
    fn displayed_curves(&self) -> Option<Vec<XyData>>;

    /// Whether a dataset with this name already exists.
    fn contains_data(&self, name: &str) -> bool;

    /// Store `data` under its name and overlay it on the displayed plot.
    fn add_curve(&mut self, data: XyData, style: CurveStyle) -> Result<(), Self::Error>;
}

/// First of `"<base> DAMPING-1"`, `"<base> DAMPING-2"`, ... not yet taken in the session.
pub fn unique_damping_name<S: PlotSession + ?Sized>(session: &S, base: &str) -> String {
    let mut n = 0_i64;
    loop {
        n -= 1;
        let name = format!("{} DAMPING{}", base, n);
        if !session.contains_data(&name) {
            return name;
        }
    }
}

/// Estimate damping for every frequency response curve on the displayed plot and add each
/// non-empty result to the plot as a marker curve. Returns the names of the new datasets.
pub fn plot_damping<S: PlotSession>(session: &mut S, estimator: &HalfPowerEstimator) -> HalfPowerResult<Vec<String>> {
    let curves = match session.displayed_curves() {
        Some(c) => c,
        None => {
            tracing::warn!("no XY plot displayed");
            return Err(HalfPowerError::NoFrequencyPlot);
        }
    };

    let mut created = Vec::new();
    for curve in curves {
        if !curve.is_frequency_response() {
            tracing::debug!(name = %curve.name, "not a frequency response, skipping");
            continue;
        }
        let damping = estimator.estimate(&curve.data);
        if damping.is_empty() {
            tracing::debug!(name = %curve.name, "no damping found");
            continue;
        }

        let name = unique_damping_name(session, &curve.name);
        let data = curve.damping_data(name.clone(), &damping);
        session
            .add_curve(data, CurveStyle::markers(2))
            .map_err(|e| HalfPowerError::Session(Box::new(e)))?;
        tracing::info!(source = %curve.name, name = %name, peaks = damping.len(), "added damping curve");
        created.push(name);
    }
    Ok(created)
}

/// A [`PlotSession`] held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    plot: Option<Vec<XyData>>,
    datasets: BTreeMap<String, XyData>,
    styles: BTreeMap<String, CurveStyle>,
}

impl MemorySession {
    /// A session with no plot on display.
    pub fn new() -> Self {
        Default::default()
    }

    /// A session displaying `curves` on one XY plot. The curves are also stored as datasets.
    pub fn with_plot(curves: Vec<XyData>) -> HalfPowerResult<Self> {
        let mut session = Self::new();
        for curve in &curves {
            session.insert_data(curve.clone())?;
            session.styles.insert(curve.name.clone(), CurveStyle::line());
        }
        session.plot = Some(curves);
        Ok(session)
    }

    /// Store a dataset without displaying it.
    pub fn insert_data(&mut self, data: XyData) -> HalfPowerResult<()> {
        if self.datasets.contains_key(&data.name) {
            return Err(HalfPowerError::DuplicateDataName(data.name));
        }
        self.datasets.insert(data.name.clone(), data);
        Ok(())
    }

    pub fn data(&self, name: &str) -> Option<&XyData> {
        self.datasets.get(name)
    }

    pub fn style(&self, name: &str) -> Option<CurveStyle> {
        self.styles.get(name).copied()
    }

    pub fn plotted(&self) -> &[XyData] {
        self.plot.as_deref().unwrap_or(&[])
    }
}

impl PlotSession for MemorySession {
    type Error = HalfPowerError;

    fn displayed_curves(&self) -> Option<Vec<XyData>> {
        self.plot.clone()
    }

    fn contains_data(&self, name: &str) -> bool {
        self.datasets.contains_key(name)
    }

    fn add_curve(&mut self, data: XyData, style: CurveStyle) -> Result<(), Self::Error> {
        self.insert_data(data.clone())?;
        self.styles.insert(data.name.clone(), style);
        self.plot.get_or_insert_with(Vec::new).push(data);
        Ok(())
    }
}
