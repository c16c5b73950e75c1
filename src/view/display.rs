//! Display mode and pane lifecycle
//!
//! [`DisplayModeController`] owns the panes of the current display mode.
//! A mode switch releases every existing pane (detach from the layout, then
//! drop the plot) before any pane of the new mode is built, so panes of two
//! modes never hold layout slots at the same time.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Result, ResultExt, ViewerError};
use crate::types::{DisplayMode, GridCell, PaneKind, SweepData};
use crate::view::surface::{PlotFactory, PlotSurface};

/// Unique identifier for a pane instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaneId(pub u64);

static NEXT_PANE_ID: AtomicU64 = AtomicU64::new(1);

impl PaneId {
    pub fn next() -> Self {
        Self(NEXT_PANE_ID.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for PaneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pane#{}", self.0)
    }
}

/// A materialized pane and its plotting widget
pub struct PaneDescriptor {
    pub id: PaneId,
    pub title: String,
    pub kind: PaneKind,
    pub cell: GridCell,
    pub plot: Box<dyn PlotSurface>,
}

impl std::fmt::Debug for PaneDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaneDescriptor")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("cell", &self.cell)
            .finish_non_exhaustive()
    }
}

/// Grid container that hosts pane widgets
#[cfg_attr(test, mockall::automock)]
pub trait GridLayout {
    /// Place a pane in `cell`.
    fn attach(&mut self, id: PaneId, cell: GridCell) -> Result<()>;

    /// Take a pane out of the grid.
    fn detach(&mut self, id: PaneId) -> Result<()>;
}

/// In-memory grid bookkeeping.
///
/// Slot `(0, 0)` belongs to the range form and never hosts a pane.
#[derive(Debug, Default)]
pub struct PaneGrid {
    slots: HashMap<(usize, usize), PaneId>,
    cells: HashMap<PaneId, GridCell>,
}

impl PaneGrid {
    pub const FORM_SLOT: (usize, usize) = (0, 0);

    pub fn new() -> Self {
        Self::default()
    }

    pub fn occupant(&self, row: usize, col: usize) -> Option<PaneId> {
        self.slots.get(&(row, col)).copied()
    }

    pub fn cell_of(&self, id: PaneId) -> Option<GridCell> {
        self.cells.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl GridLayout for PaneGrid {
    fn attach(&mut self, id: PaneId, cell: GridCell) -> Result<()> {
        if self.cells.contains_key(&id) {
            return Err(ViewerError::PaneLifecycle(format!("{} is already attached", id)));
        }
        for slot in cell.slots() {
            if slot == Self::FORM_SLOT {
                return Err(ViewerError::PaneLifecycle(format!(
                    "slot {:?} is reserved for the range form",
                    slot
                )));
            }
            if let Some(other) = self.slots.get(&slot) {
                return Err(ViewerError::PaneLifecycle(format!(
                    "slot {:?} is held by {}",
                    slot, other
                )));
            }
        }
        for slot in cell.slots() {
            self.slots.insert(slot, id);
        }
        self.cells.insert(id, cell);
        Ok(())
    }

    fn detach(&mut self, id: PaneId) -> Result<()> {
        let cell = self
            .cells
            .remove(&id)
            .ok_or_else(|| ViewerError::PaneLifecycle(format!("{} is not attached", id)))?;
        for slot in cell.slots() {
            self.slots.remove(&slot);
        }
        Ok(())
    }
}

/// Owner of the panes for the current display mode
pub struct DisplayModeController {
    mode: Option<DisplayMode>,
    panes: Vec<PaneDescriptor>,
    factory: Box<dyn PlotFactory>,
}

impl DisplayModeController {
    pub fn new(factory: impl PlotFactory + 'static) -> Self {
        Self {
            mode: None,
            panes: Vec::new(),
            factory: Box::new(factory),
        }
    }

    /// The mode whose panes are fully materialized, if any
    pub fn mode(&self) -> Option<DisplayMode> {
        self.mode
    }

    /// Panes in display order
    pub fn panes(&self) -> &[PaneDescriptor] {
        &self.panes
    }

    pub fn panes_mut(&mut self) -> &mut [PaneDescriptor] {
        &mut self.panes
    }

    /// Plotting widgets in display order, for sampling
    pub fn surfaces(&self) -> Vec<&dyn PlotSurface> {
        self.panes.iter().map(|p| p.plot.as_ref()).collect()
    }

    /// Replace the current panes with those of `mode`.
    pub fn switch_mode(&mut self, mode: DisplayMode, layout: &mut dyn GridLayout) -> Result<()> {
        tracing::info!("Switching display mode to {:?}", mode);
        self.release_all(layout)
            .context("Failed to release panes before mode switch")?;

        let mut built = Vec::with_capacity(mode.panes().len());
        for spec in mode.panes() {
            let plot = self
                .factory
                .create(spec.kind, spec.title)
                .with_context(|| format!("Failed to build pane {:?}", spec.title))?;
            built.push(PaneDescriptor {
                id: PaneId::next(),
                title: spec.title.to_string(),
                kind: spec.kind,
                cell: spec.cell,
                plot,
            });
        }

        for pane in built {
            if let Err(e) = layout.attach(pane.id, pane.cell) {
                // roll back what was attached so no half mode stays on screen
                if let Err(rollback) = self.release_all(layout) {
                    tracing::warn!(
                        "Rollback after failed attach left {} panes: {}",
                        self.panes.len(),
                        rollback
                    );
                }
                return Err(e.with_context(format!("Failed to attach {}", pane.title)));
            }
            tracing::debug!("Attached {} ({}) at {:?}", pane.title, pane.id, pane.cell);
            self.panes.push(pane);
        }

        self.mode = Some(mode);
        Ok(())
    }

    /// Detach and drop every pane, in display order.
    ///
    /// On a detach failure the remaining panes stay owned and the mode is
    /// cleared.
    pub fn release_all(&mut self, layout: &mut dyn GridLayout) -> Result<()> {
        self.mode = None;
        while !self.panes.is_empty() {
            let id = self.panes[0].id;
            layout
                .detach(id)
                .with_context(|| format!("Failed to detach {}", id))?;
            let pane = self.panes.remove(0);
            tracing::debug!("Released {} ({})", pane.title, pane.id);
        }
        Ok(())
    }

    /// Hand `data` to every displayed pane.
    pub fn load_data(&mut self, data: &SweepData) {
        for pane in &mut self.panes {
            pane.plot.set_data(data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::surface::MockPlotSurface;
    use mockall::predicate::eq;

    fn mock_factory() -> impl PlotFactory {
        |_kind: PaneKind, _title: &str| -> Result<Box<dyn PlotSurface>> {
            Ok(Box::new(MockPlotSurface::new()))
        }
    }

    fn titles(controller: &DisplayModeController) -> Vec<String> {
        controller.panes().iter().map(|p| p.title.clone()).collect()
    }

    #[test]
    fn test_pane_grid_rejects_form_slot_and_overlap() {
        let mut grid = PaneGrid::new();
        let a = PaneId::next();
        let b = PaneId::next();

        assert!(grid.attach(a, GridCell::at(0, 0)).is_err());
        grid.attach(a, GridCell::at(0, 1)).unwrap();
        assert!(grid.attach(b, GridCell::at(0, 1)).is_err());
        assert!(grid.attach(a, GridCell::at(0, 2)).is_err());

        grid.detach(a).unwrap();
        assert!(grid.detach(a).is_err());
        assert!(grid.is_empty());
    }

    #[test]
    fn test_switch_materializes_mode_panes() {
        let mut grid = PaneGrid::new();
        let mut controller = DisplayModeController::new(mock_factory());

        controller
            .switch_mode(DisplayMode::DualComplex, &mut grid)
            .unwrap();

        assert_eq!(controller.mode(), Some(DisplayMode::DualComplex));
        assert_eq!(titles(&controller), vec!["Real part", "Imaginary part"]);
        let real = controller.panes()[0].id;
        let imag = controller.panes()[1].id;
        assert_eq!(grid.occupant(0, 1), Some(real));
        assert_eq!(grid.occupant(0, 2), Some(imag));
    }

    #[test]
    fn test_round_trip_leaves_no_stale_panes() {
        let mut grid = PaneGrid::new();
        let mut controller = DisplayModeController::new(mock_factory());

        controller.switch_mode(DisplayMode::DualComplex, &mut grid).unwrap();
        controller.switch_mode(DisplayMode::SingleAmplitude, &mut grid).unwrap();
        let single = controller.panes()[0].id;
        assert_eq!(titles(&controller), vec!["Signal Amplitude [dB]"]);

        controller.switch_mode(DisplayMode::DualComplex, &mut grid).unwrap();

        assert_eq!(titles(&controller), vec!["Real part", "Imaginary part"]);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.cell_of(single), None);
        assert!(controller.panes().iter().all(|p| p.id != single));
    }

    #[test]
    fn test_factory_failure_leaves_no_panes() {
        let mut grid = PaneGrid::new();
        let mut calls = 0;
        let factory = move |_kind: PaneKind, title: &str| -> Result<Box<dyn PlotSurface>> {
            calls += 1;
            if calls == 2 {
                return Err(ViewerError::PaneLifecycle(format!("no canvas for {}", title)));
            }
            Ok(Box::new(MockPlotSurface::new()))
        };
        let mut controller = DisplayModeController::new(factory);

        let err = controller
            .switch_mode(DisplayMode::DualComplex, &mut grid)
            .unwrap_err();

        assert!(matches!(err.root(), ViewerError::PaneLifecycle(_)));
        assert!(controller.panes().is_empty());
        assert_eq!(controller.mode(), None);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_detach_failure_blocks_new_panes() {
        let mut grid = PaneGrid::new();
        let mut controller = DisplayModeController::new(mock_factory());
        controller.switch_mode(DisplayMode::DualComplex, &mut grid).unwrap();
        let first = controller.panes()[0].id;

        let mut layout = MockGridLayout::new();
        layout
            .expect_detach()
            .with(eq(first))
            .times(1)
            .returning(|id| Err(ViewerError::PaneLifecycle(format!("{} is busy", id))));
        layout.expect_attach().never();

        let err = controller
            .switch_mode(DisplayMode::SingleAmplitude, &mut layout)
            .unwrap_err();

        assert!(matches!(err.root(), ViewerError::PaneLifecycle(_)));
        assert_eq!(controller.mode(), None);
        assert_eq!(controller.panes().len(), 2);
    }

    #[test]
    fn test_failed_rollback_reports_attach_error() {
        let mut controller = DisplayModeController::new(mock_factory());
        let mut layout = MockGridLayout::new();
        let mut attached = 0;
        layout.expect_attach().times(2).returning(move |id, _cell| {
            attached += 1;
            if attached == 2 {
                Err(ViewerError::PaneLifecycle(format!("no room for {}", id)))
            } else {
                Ok(())
            }
        });
        layout
            .expect_detach()
            .times(1)
            .returning(|id| Err(ViewerError::PaneLifecycle(format!("{} is busy", id))));

        let err = controller
            .switch_mode(DisplayMode::DualComplex, &mut layout)
            .unwrap_err();

        assert!(err.to_string().contains("Failed to attach"));
        assert_eq!(controller.mode(), None);
        assert_eq!(controller.panes().len(), 1);
    }

    #[test]
    fn test_load_data_reaches_every_pane() {
        let factory = |_kind: PaneKind, _title: &str| -> Result<Box<dyn PlotSurface>> {
            let mut mock = MockPlotSurface::new();
            mock.expect_set_data().times(1).return_const(());
            Ok(Box::new(mock))
        };
        let mut grid = PaneGrid::new();
        let mut controller = DisplayModeController::new(factory);
        controller.switch_mode(DisplayMode::DualComplex, &mut grid).unwrap();

        let data = SweepData::new(vec![0.0], vec![0.0], vec![vec![1.0]]).unwrap();
        controller.load_data(&data);
    }
}
