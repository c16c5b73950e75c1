//! Heatmap plot surface using egui_plot
//!
//! [`HeatmapPlot`] is the plotting widget behind every pane. It paints a
//! [`SweepData`] grid as a texture and tracks the bounds the operator has
//! panned/zoomed to, which is what the frame logic samples.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use egui::{Color32, ColorImage, TextureHandle, TextureOptions, Ui};
use egui_plot::{Plot, PlotBounds, PlotImage, PlotPoint};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};
use crate::types::{AxisRange, PaneKind, SweepData};
use crate::view::surface::PlotSurface;

/// Limits reported before anything has been drawn or loaded
pub const DEFAULT_LIMITS: (f64, f64) = (0.0, 1.0);

static NEXT_PLOT_SERIAL: AtomicU64 = AtomicU64::new(1);

/// egui_plot-backed heatmap
pub struct HeatmapPlot {
    serial: u64,
    title: String,
    kind: PaneKind,
    data: Option<SweepData>,
    texture: Option<TextureHandle>,
    texture_stale: bool,
    /// Bounds observed on the last draw
    view: Option<(AxisRange, AxisRange)>,
    /// Limits to apply on the next draw
    pending: Option<(AxisRange, AxisRange)>,
}

impl HeatmapPlot {
    pub fn new(kind: PaneKind, title: impl Into<String>) -> Self {
        Self {
            serial: NEXT_PLOT_SERIAL.fetch_add(1, Ordering::SeqCst),
            title: title.into(),
            kind,
            data: None,
            texture: None,
            texture_stale: false,
            view: None,
            pending: None,
        }
    }

    /// Factory for the display mode controller
    pub fn factory() -> impl FnMut(PaneKind, &str) -> Result<Box<dyn PlotSurface>> {
        |kind: PaneKind, title: &str| -> Result<Box<dyn PlotSurface>> {
            Ok(Box::new(HeatmapPlot::new(kind, title)))
        }
    }

    fn limits(&self) -> (AxisRange, AxisRange) {
        if let Some(view) = self.view {
            return view;
        }
        if let Some((x, y)) = self.data.as_ref().and_then(|d| d.extent()) {
            return (x, y);
        }
        (DEFAULT_LIMITS.into(), DEFAULT_LIMITS.into())
    }

    fn refresh_texture(&mut self, ui: &Ui) {
        if !self.texture_stale {
            return;
        }
        self.texture_stale = false;
        self.texture = self.data.as_ref().and_then(render_grayscale).map(|image| {
            ui.ctx()
                .load_texture(format!("heatmap-{}", self.serial), image, TextureOptions::NEAREST)
        });
    }
}

/// Map the grid onto a grayscale ramp between its finite min and max.
/// Non-finite samples are transparent. The first data row is the bottom
/// image row.
fn render_grayscale(data: &SweepData) -> Option<ColorImage> {
    if data.is_empty() {
        return None;
    }
    let (lo, hi) = data.value_bounds().unwrap_or((0.0, 0.0));
    let span = if hi > lo { hi - lo } else { 1.0 };

    let mut rgba = Vec::with_capacity(data.x.len() * data.y.len() * 4);
    for row in data.values.iter().rev() {
        for &v in row {
            let pixel = if v.is_finite() {
                let level = (((v - lo) / span).clamp(0.0, 1.0) * 255.0) as u8;
                Color32::from_gray(level)
            } else {
                Color32::TRANSPARENT
            };
            rgba.extend_from_slice(&pixel.to_array());
        }
    }
    Some(ColorImage::from_rgba_unmultiplied(
        [data.x.len(), data.y.len()],
        &rgba,
    ))
}

/// Plot bounds for a frame. Reversed ranges are shown low-to-high and
/// zero-width ranges are widened so the transform stays invertible.
fn plot_bounds(x: AxisRange, y: AxisRange) -> PlotBounds {
    fn span(r: AxisRange) -> (f64, f64) {
        let (lo, hi) = (r.start.min(r.stop), r.start.max(r.stop));
        if hi > lo {
            (lo, hi)
        } else {
            (lo - 0.5, hi + 0.5)
        }
    }
    let (x_min, x_max) = span(x);
    let (y_min, y_max) = span(y);
    PlotBounds::from_min_max([x_min, y_min], [x_max, y_max])
}

impl PlotSurface for HeatmapPlot {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn x_lim(&self) -> (f64, f64) {
        let (x, _) = self.limits();
        (x.start, x.stop)
    }

    fn y_lim(&self) -> (f64, f64) {
        let (_, y) = self.limits();
        (y.start, y.stop)
    }

    fn set_limits(&mut self, x: AxisRange, y: AxisRange) {
        self.pending = Some((x, y));
    }

    fn set_data(&mut self, data: &SweepData) {
        self.data = Some(data.clone());
        self.texture_stale = true;
    }

    fn draw(&mut self, ui: &mut Ui) {
        self.refresh_texture(ui);

        ui.vertical_centered(|ui| ui.strong(&self.title));

        let pending = self.pending.take();
        let image = match (&self.texture, self.data.as_ref().and_then(|d| d.extent())) {
            (Some(texture), Some((x, y))) => {
                let width = if x.width() > 0.0 { x.width() } else { 1.0 };
                let height = if y.width() > 0.0 { y.width() } else { 1.0 };
                Some(PlotImage::new(
                    format!("{} data", self.title),
                    texture.id(),
                    PlotPoint::new(x.start + x.width() / 2.0, y.start + y.width() / 2.0),
                    [width as f32, height as f32],
                ))
            }
            _ => None,
        };

        let response = Plot::new(("heatmap", self.serial))
            .show_axes(true)
            .show_grid(true)
            .allow_zoom(true)
            .allow_drag(true)
            .allow_boxed_zoom(true)
            .show(ui, |plot_ui| {
                if let Some((x, y)) = pending {
                    plot_ui.set_plot_bounds(plot_bounds(x, y));
                }
                if let Some(image) = image {
                    plot_ui.image(image);
                }
            });

        let bounds = response.transform.bounds();
        self.view = Some((
            AxisRange::new(bounds.min()[0], bounds.max()[0]),
            AxisRange::new(bounds.min()[1], bounds.max()[1]),
        ));
    }

    fn save_figure(&self, path: &Path) -> Result<()> {
        let (x, y) = self.limits();
        let snapshot = FigureSnapshot {
            title: self.title.clone(),
            kind: self.kind,
            x_lim: x,
            y_lim: y,
            rows: self.data.as_ref().map_or(0, |d| d.y.len()),
            cols: self.data.as_ref().map_or(0, |d| d.x.len()),
            saved_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, content).map_err(|e| {
            ViewerError::Io(e).with_context(format!("Failed to save figure {:?}", path))
        })
    }
}

/// What `save_figure` writes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureSnapshot {
    pub title: String,
    pub kind: PaneKind,
    pub x_lim: AxisRange,
    pub y_lim: AxisRange,
    pub rows: usize,
    pub cols: usize,
    pub saved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> SweepData {
        SweepData::new(
            vec![100.0, 200.0, 300.0],
            vec![-10.0, 10.0],
            vec![vec![0.0, 1.0, 2.0], vec![3.0, f64::NAN, 5.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_limits_before_draw() {
        let mut plot = HeatmapPlot::new(PaneKind::RealPart, "Real part");
        assert_eq!(plot.x_lim(), DEFAULT_LIMITS);
        assert_eq!(plot.y_lim(), DEFAULT_LIMITS);

        plot.set_data(&sample_data());
        assert_eq!(plot.x_lim(), (100.0, 300.0));
        assert_eq!(plot.y_lim(), (-10.0, 10.0));
    }

    #[test]
    fn test_grayscale_image_is_flipped_and_masks_nan() {
        let image = render_grayscale(&sample_data()).unwrap();
        assert_eq!(image.size, [3, 2]);
        // top-left pixel is the last data row's first sample (3.0 of 0..5)
        assert_eq!(image.pixels[0], Color32::from_gray(153));
        assert_eq!(image.pixels[1], Color32::TRANSPARENT);
        assert_eq!(image.pixels[3], Color32::from_gray(0));
    }

    #[test]
    fn test_plot_bounds_normalizes_for_rendering() {
        let bounds = plot_bounds(AxisRange::new(8.0, 2.0), AxisRange::new(1.0, 1.0));
        assert_eq!(bounds.min(), [2.0, 0.5]);
        assert_eq!(bounds.max(), [8.0, 1.5]);
    }

    #[test]
    fn test_save_figure_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("real.json");
        let mut plot = HeatmapPlot::new(PaneKind::RealPart, "Real part");
        plot.set_data(&sample_data());

        plot.save_figure(&path).unwrap();

        let snapshot: FigureSnapshot =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(snapshot.title, "Real part");
        assert_eq!(snapshot.rows, 2);
        assert_eq!(snapshot.cols, 3);
        assert_eq!(snapshot.x_lim, AxisRange::new(100.0, 300.0));
    }

    #[test]
    fn test_save_figure_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let plot = HeatmapPlot::new(PaneKind::Amplitude, "Signal Amplitude [dB]");
        let err = plot
            .save_figure(&dir.path().join("missing").join("fig.json"))
            .unwrap_err();
        assert!(matches!(err.root(), ViewerError::Io(_)));
    }
}
