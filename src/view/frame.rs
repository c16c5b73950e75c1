//! Frame reconciliation
//!
//! [`FrameReconciler`] owns the authoritative [`Frame`] and is the only
//! thing that writes it. Two paths lead in:
//!
//! - **Manual**: a partial update from the range form. Axes present in the
//!   update overwrite the frame. Axes absent from it are refreshed from the
//!   live extent of the *first pane in display order*, so an X-only edit
//!   also pulls Y from that pane's current zoom. With no panes displayed
//!   the absent axes are left as they are.
//! - **Zoom**: the "From Zoom" action. Both axes come from
//!   [`ZoomSampler`] and are written unconditionally.
//!
//! Every operation validates before it mutates, so a failed call leaves the
//! frame exactly as it was.

use crate::error::Result;
use crate::types::{Axis, Frame, PartialRangeUpdate, RawRangeUpdate};
use crate::view::sampler::{ZoomSample, ZoomSampler};
use crate::view::surface::PlotSurface;

/// Owner of the current view frame
#[derive(Debug, Default)]
pub struct FrameReconciler {
    frame: Frame,
}

impl FrameReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously saved frame
    pub fn with_frame(frame: Frame) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Merge a numeric partial update, falling back to the first pane for
    /// absent axes.
    pub fn apply_manual_range(&mut self, update: &PartialRangeUpdate, panes: &[&dyn PlotSurface]) {
        let mut next = self.frame;
        for axis in [Axis::X, Axis::Y] {
            let range = update.axis(axis).or_else(|| {
                panes.first().map(|first| match axis {
                    Axis::X => first.x_lim().into(),
                    Axis::Y => first.y_lim().into(),
                })
            });
            match range {
                Some(range) => next.write_axis(axis, range),
                None => tracing::debug!("No pane to refresh {} from; keeping current bounds", axis),
            }
        }
        self.commit(next, "manual");
    }

    /// Parse a textual update and merge it. A parse failure leaves the
    /// frame untouched.
    pub fn apply_manual_text(&mut self, raw: &RawRangeUpdate, panes: &[&dyn PlotSurface]) -> Result<()> {
        let update = raw.parse()?;
        self.apply_manual_range(&update, panes);
        Ok(())
    }

    /// Write the tightest zoom across `panes` into both axes.
    pub fn apply_zoom_range(&mut self, panes: &[&dyn PlotSurface]) -> Result<ZoomSample> {
        let sample = ZoomSampler::sample(panes)?;
        if !sample.single_source() {
            tracing::info!(
                "Zoom capture took X from pane {} and Y from pane {}",
                sample.x_source,
                sample.y_source
            );
        }

        let mut next = self.frame;
        next.write_axis(Axis::X, sample.x);
        next.write_axis(Axis::Y, sample.y);
        self.commit(next, "zoom");
        Ok(sample)
    }

    fn commit(&mut self, next: Frame, source: &str) {
        self.frame = next;
        tracing::debug!(
            source,
            x_start = ?self.frame.x_start,
            x_end = ?self.frame.x_end,
            y_start = ?self.frame.y_start,
            y_end = ?self.frame.y_end,
            "Frame updated"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewerError;
    use crate::types::{AxisRange, TextRange};
    use crate::view::surface::MockPlotSurface;
    use proptest::prelude::*;

    fn pane(x: (f64, f64), y: (f64, f64)) -> MockPlotSurface {
        let mut mock = MockPlotSurface::new();
        mock.expect_x_lim().return_const(x);
        mock.expect_y_lim().return_const(y);
        mock
    }

    fn refs(panes: &[MockPlotSurface]) -> Vec<&dyn PlotSurface> {
        panes.iter().map(|p| p as &dyn PlotSurface).collect()
    }

    #[test]
    fn test_starts_unset() {
        assert!(FrameReconciler::new().frame().is_unset());
    }

    #[test]
    fn test_x_only_edit_refreshes_y_from_first_pane() {
        let panes = [pane((0.0, 10.0), (-5.0, 5.0))];
        let mut reconciler = FrameReconciler::new();

        reconciler
            .apply_manual_text(&RawRangeUpdate::x_only(TextRange::new("2", "8")), &refs(&panes))
            .unwrap();

        assert_eq!(
            *reconciler.frame(),
            Frame {
                x_start: Some(2.0),
                x_end: Some(8.0),
                y_start: Some(-5.0),
                y_end: Some(5.0),
            }
        );
    }

    #[test]
    fn test_fallback_uses_first_pane_only() {
        let panes = [pane((0.0, 10.0), (-5.0, 5.0)), pane((3.0, 4.0), (0.0, 0.5))];
        let mut reconciler = FrameReconciler::new();

        let update = PartialRangeUpdate::new(None, Some(AxisRange::new(1.0, 2.0)));
        reconciler.apply_manual_range(&update, &refs(&panes));

        let frame = reconciler.frame();
        assert_eq!(frame.x_range(), Some(AxisRange::new(0.0, 10.0)));
        assert_eq!(frame.y_range(), Some(AxisRange::new(1.0, 2.0)));
    }

    #[test]
    fn test_no_panes_leaves_absent_axes_alone() {
        let mut reconciler = FrameReconciler::new();
        let update = PartialRangeUpdate::new(Some(AxisRange::new(1.0, 2.0)), None);
        reconciler.apply_manual_range(&update, &[]);

        let frame = reconciler.frame();
        assert_eq!(frame.x_range(), Some(AxisRange::new(1.0, 2.0)));
        assert_eq!(frame.y_start, None);
        assert_eq!(frame.y_end, None);
    }

    #[test]
    fn test_bad_text_leaves_frame_untouched() {
        let panes = [pane((0.0, 10.0), (-5.0, 5.0))];
        let mut reconciler = FrameReconciler::new();
        reconciler
            .apply_manual_text(&RawRangeUpdate::x_only(TextRange::new("1", "3")), &refs(&panes))
            .unwrap();
        let before = *reconciler.frame();

        let err = reconciler
            .apply_manual_text(&RawRangeUpdate::y_only(TextRange::new("x", "3")), &refs(&panes))
            .unwrap_err();

        assert!(matches!(err, ViewerError::InputFormat { .. }));
        assert_eq!(*reconciler.frame(), before);
    }

    #[test]
    fn test_zero_width_range_is_accepted() {
        let mut reconciler = FrameReconciler::new();
        let update = PartialRangeUpdate::new(Some(AxisRange::new(3.0, 3.0)), None);
        reconciler.apply_manual_range(&update, &[]);
        assert_eq!(reconciler.frame().x_range(), Some(AxisRange::new(3.0, 3.0)));
    }

    #[test]
    fn test_zoom_writes_tightest_extents() {
        let panes = [pane((0.0, 10.0), (0.0, 1.0)), pane((4.0, 7.0), (-2.0, 2.0))];
        let mut reconciler = FrameReconciler::new();

        let sample = reconciler.apply_zoom_range(&refs(&panes)).unwrap();

        assert_eq!(sample.x_source, 1);
        assert_eq!(reconciler.frame().x_range(), Some(AxisRange::new(4.0, 7.0)));
        assert_eq!(reconciler.frame().y_range(), Some(AxisRange::new(0.0, 1.0)));
    }

    #[test]
    fn test_zoom_without_panes_is_an_error() {
        let mut reconciler = FrameReconciler::with_frame(Frame {
            x_start: Some(1.0),
            ..Frame::default()
        });
        let err = reconciler.apply_zoom_range(&[]).unwrap_err();
        assert!(matches!(err, ViewerError::EmptyPaneSet { .. }));
        assert_eq!(reconciler.frame().x_start, Some(1.0));
    }

    proptest! {
        #[test]
        fn test_full_update_is_idempotent(
            xs in -1e6f64..1e6, xe in -1e6f64..1e6,
            ys in -1e6f64..1e6, ye in -1e6f64..1e6,
        ) {
            let update = PartialRangeUpdate::new(
                Some(AxisRange::new(xs, xe)),
                Some(AxisRange::new(ys, ye)),
            );
            let panes = [pane((0.0, 1.0), (0.0, 1.0))];

            let mut once = FrameReconciler::new();
            once.apply_manual_range(&update, &refs(&panes));
            let mut twice = FrameReconciler::new();
            twice.apply_manual_range(&update, &refs(&panes));
            twice.apply_manual_range(&update, &refs(&panes));

            prop_assert_eq!(once.frame(), twice.frame());
        }
    }
}
