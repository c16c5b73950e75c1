//! Zoom sampling across the displayed panes
//!
//! Reduces the live extents of every displayed pane to one range per axis.
//! Each axis is reduced independently: the pane with the smallest width
//! (the tightest zoom) wins, and the first such pane in display order wins
//! a tie. X and Y may therefore come from different panes; [`ZoomSample`]
//! records which pane supplied each axis.

use crate::error::{Result, ViewerError};
use crate::types::{Axis, AxisRange};
use crate::view::surface::PlotSurface;

/// One representative range per axis, with the index of the pane it came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomSample {
    pub x: AxisRange,
    pub y: AxisRange,
    pub x_source: usize,
    pub y_source: usize,
}

impl ZoomSample {
    /// Whether both axes were taken from the same pane
    pub fn single_source(&self) -> bool {
        self.x_source == self.y_source
    }
}

/// Stateless reducer over pane extents
pub struct ZoomSampler;

impl ZoomSampler {
    /// Sample both axes. Fails with `EmptyPaneSet` when `panes` is empty.
    pub fn sample(panes: &[&dyn PlotSurface]) -> Result<ZoomSample> {
        let (x_source, x) = Self::tightest(panes, Axis::X)?;
        let (y_source, y) = Self::tightest(panes, Axis::Y)?;
        Ok(ZoomSample {
            x,
            y,
            x_source,
            y_source,
        })
    }

    /// Index and range of the narrowest pane on `axis`.
    pub fn tightest(panes: &[&dyn PlotSurface], axis: Axis) -> Result<(usize, AxisRange)> {
        let mut best: Option<(usize, AxisRange)> = None;
        for (index, pane) in panes.iter().enumerate() {
            let range = AxisRange::from(match axis {
                Axis::X => pane.x_lim(),
                Axis::Y => pane.y_lim(),
            });
            // strict `<` keeps the first minimum
            let narrower = match best {
                None => true,
                Some((_, current)) => range.width() < current.width(),
            };
            if narrower {
                best = Some((index, range));
            }
        }
        best.ok_or(ViewerError::EmptyPaneSet {
            operation: "sample zoom extents",
        })
    }
}
