//! Core data types for the MDMA viewer
//!
//! This module contains the value types that flow between the range form,
//! the frame reconciler and the plot panes.
//!
//! # Main Types
//!
//! - [`AxisRange`] - A `(start, stop)` pair for one axis, never normalised
//! - [`TextRange`] - The raw text held by a pair of range boxes
//! - [`RawRangeUpdate`] / [`PartialRangeUpdate`] - "what changed" in one edit or zoom capture
//! - [`Frame`] - The authoritative view range, four independently optional bounds
//! - [`PaneKind`] / [`DisplayMode`] / [`GridCell`] - Which panes exist and where they sit
//! - [`SweepData`] - A rectangular grid of instrument samples

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, ViewerError};

/// Plot axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
        }
    }
}

/// One end of an axis range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bound {
    Start,
    Stop,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Start => write!(f, "start"),
            Bound::Stop => write!(f, "stop"),
        }
    }
}

/// A `(start, stop)` pair for one axis.
///
/// `start > stop` is allowed and preserved as given; so is `start == stop`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub start: f64,
    pub stop: f64,
}

impl AxisRange {
    pub fn new(start: f64, stop: f64) -> Self {
        Self { start, stop }
    }

    /// Signed width, `stop - start`
    pub fn width(&self) -> f64 {
        self.stop - self.start
    }
}

impl From<(f64, f64)> for AxisRange {
    fn from((start, stop): (f64, f64)) -> Self {
        Self { start, stop }
    }
}

/// Raw text held by a start/stop pair of range boxes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRange {
    pub start: String,
    pub stop: String,
}

impl TextRange {
    pub fn new(start: impl Into<String>, stop: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            stop: stop.into(),
        }
    }

    /// Parse both bounds, reporting the first bound that is not a number.
    pub fn parse(&self, axis: Axis) -> Result<AxisRange> {
        let start = parse_bound(&self.start, axis, Bound::Start)?;
        let stop = parse_bound(&self.stop, axis, Bound::Stop)?;
        Ok(AxisRange { start, stop })
    }
}

/// Finite numbers only; "nan" and "inf" parse as `f64` but are not bounds.
fn parse_bound(text: &str, axis: Axis, bound: Bound) -> Result<f64> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ViewerError::InputFormat {
            axis,
            bound,
            text: text.to_string(),
        }),
    }
}

/// Textual partial update produced by the range form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRangeUpdate {
    pub x: Option<TextRange>,
    pub y: Option<TextRange>,
}

impl RawRangeUpdate {
    pub fn x_only(range: TextRange) -> Self {
        Self {
            x: Some(range),
            y: None,
        }
    }

    pub fn y_only(range: TextRange) -> Self {
        Self {
            x: None,
            y: Some(range),
        }
    }

    /// Convert to numbers. Any bad field rejects the whole update.
    pub fn parse(&self) -> Result<PartialRangeUpdate> {
        let x = self.x.as_ref().map(|r| r.parse(Axis::X)).transpose()?;
        let y = self.y.as_ref().map(|r| r.parse(Axis::Y)).transpose()?;
        Ok(PartialRangeUpdate { x, y })
    }
}

/// Numeric partial update; `None` on an axis means "leave current value"
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartialRangeUpdate {
    pub x: Option<AxisRange>,
    pub y: Option<AxisRange>,
}

impl PartialRangeUpdate {
    pub fn new(x: Option<AxisRange>, y: Option<AxisRange>) -> Self {
        Self { x, y }
    }

    pub fn axis(&self, axis: Axis) -> Option<AxisRange> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// The authoritative view range.
///
/// Each bound is written independently; the last write wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x_start: Option<f64>,
    pub x_end: Option<f64>,
    pub y_start: Option<f64>,
    pub y_end: Option<f64>,
}

impl Frame {
    /// X range, when both X bounds are set
    pub fn x_range(&self) -> Option<AxisRange> {
        Some(AxisRange::new(self.x_start?, self.x_end?))
    }

    /// Y range, when both Y bounds are set
    pub fn y_range(&self) -> Option<AxisRange> {
        Some(AxisRange::new(self.y_start?, self.y_end?))
    }

    pub fn is_unset(&self) -> bool {
        *self == Frame::default()
    }

    pub(crate) fn write_axis(&mut self, axis: Axis, range: AxisRange) {
        match axis {
            Axis::X => {
                self.x_start = Some(range.start);
                self.x_end = Some(range.stop);
            }
            Axis::Y => {
                self.y_start = Some(range.start);
                self.y_end = Some(range.stop);
            }
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn bound(v: Option<f64>) -> String {
            v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
        }
        write!(
            f,
            "X [{}, {}]  Y [{}, {}]",
            bound(self.x_start),
            bound(self.x_end),
            bound(self.y_start),
            bound(self.y_end)
        )
    }
}

/// What a pane shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaneKind {
    Amplitude,
    RealPart,
    ImaginaryPart,
}

impl PaneKind {
    pub const fn default_title(&self) -> &'static str {
        match self {
            PaneKind::Amplitude => "Signal Amplitude [dB]",
            PaneKind::RealPart => "Real part",
            PaneKind::ImaginaryPart => "Imaginary part",
        }
    }
}

/// Position and span of a pane in the window grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

impl GridCell {
    /// A 1x1 cell
    pub const fn at(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            row_span: 1,
            col_span: 1,
        }
    }

    /// Every `(row, col)` slot this cell covers
    pub fn slots(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.row..self.row + self.row_span)
            .flat_map(move |r| (self.col..self.col + self.col_span).map(move |c| (r, c)))
    }
}

/// Static description of one pane in a display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneSpec {
    pub kind: PaneKind,
    pub title: &'static str,
    pub cell: GridCell,
}

const SINGLE_AMPLITUDE_PANES: &[PaneSpec] = &[PaneSpec {
    kind: PaneKind::Amplitude,
    title: PaneKind::Amplitude.default_title(),
    cell: GridCell::at(0, 1),
}];

const DUAL_COMPLEX_PANES: &[PaneSpec] = &[
    PaneSpec {
        kind: PaneKind::RealPart,
        title: PaneKind::RealPart.default_title(),
        cell: GridCell::at(0, 1),
    },
    PaneSpec {
        kind: PaneKind::ImaginaryPart,
        title: PaneKind::ImaginaryPart.default_title(),
        cell: GridCell::at(0, 2),
    },
];

/// Instrument display mode: which set of panes is materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    /// One amplitude heatmap (Hameg spectrum analyzer)
    SingleAmplitude,
    /// Real and imaginary heatmaps side by side (PocketVNA)
    #[default]
    DualComplex,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 2] = [DisplayMode::SingleAmplitude, DisplayMode::DualComplex];

    /// Panes materialized for this mode, in display order
    pub fn panes(&self) -> &'static [PaneSpec] {
        match self {
            DisplayMode::SingleAmplitude => SINGLE_AMPLITUDE_PANES,
            DisplayMode::DualComplex => DUAL_COMPLEX_PANES,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DisplayMode::SingleAmplitude => "Signal amplitude (Hameg)",
            DisplayMode::DualComplex => "Complex S-parameter (PocketVNA)",
        }
    }
}

/// A rectangular grid of instrument samples; `values[row]` lines up with `y[row]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub values: Vec<Vec<f64>>,
}

impl SweepData {
    pub fn new(x: Vec<f64>, y: Vec<f64>, values: Vec<Vec<f64>>) -> Result<Self> {
        if values.len() != y.len() {
            return Err(ViewerError::Data(format!(
                "expected {} rows, got {}",
                y.len(),
                values.len()
            )));
        }
        if let Some((row, bad)) = values.iter().enumerate().find(|(_, r)| r.len() != x.len()) {
            return Err(ViewerError::Data(format!(
                "row {} has {} columns, expected {}",
                row,
                bad.len(),
                x.len()
            )));
        }
        Ok(Self { x, y, values })
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty()
    }

    /// X and Y ranges covered by the sample coordinates
    pub fn extent(&self) -> Option<(AxisRange, AxisRange)> {
        Some((span_of(&self.x)?, span_of(&self.y)?))
    }

    /// Smallest and largest finite sample value
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

fn span_of(coords: &[f64]) -> Option<AxisRange> {
    let first = *coords.first()?;
    let (lo, hi) = coords
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    Some(AxisRange::new(lo, hi))
}
