//! PlotSurface trait: the interface every pane's plotting widget exposes.
//!
//! The view-range logic only ever reads limits through this trait, so the
//! egui-backed heatmap and test doubles are interchangeable.

use std::path::Path;

use egui::Ui;

use crate::error::Result;
use crate::types::{AxisRange, PaneKind, SweepData};

/// A plotting widget hosted by one pane.
#[cfg_attr(test, mockall::automock)]
pub trait PlotSurface {
    /// Title shown above the plot.
    fn title(&self) -> String;

    /// Current visible X extent, `(start, end)`.
    fn x_lim(&self) -> (f64, f64);

    /// Current visible Y extent, `(start, end)`.
    fn y_lim(&self) -> (f64, f64);

    /// Request the view to show the given ranges on the next draw.
    fn set_limits(&mut self, x: AxisRange, y: AxisRange);

    /// Replace the data shown by this surface.
    fn set_data(&mut self, data: &SweepData);

    /// Render into the given UI region.
    fn draw(&mut self, ui: &mut Ui);

    /// Export the current figure to `path`.
    fn save_figure(&self, path: &Path) -> Result<()>;
}

/// Builds the plotting widget for a pane.
pub trait PlotFactory {
    fn create(&mut self, kind: PaneKind, title: &str) -> Result<Box<dyn PlotSurface>>;
}

impl<F> PlotFactory for F
where
    F: FnMut(PaneKind, &str) -> Result<Box<dyn PlotSurface>>,
{
    fn create(&mut self, kind: PaneKind, title: &str) -> Result<Box<dyn PlotSurface>> {
        self(kind, title)
    }
}
