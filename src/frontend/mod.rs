//! Frontend module for egui UI
//!
//! This module hosts the main window. The left side panel carries the
//! range form (X/Y range boxes, Load/Save/From Zoom) and the display mode
//! selector; the central area shows the panes of the current display mode
//! in grid-column order.
//!
//! # Main Types
//!
//! - [`ViewerApp`] - Main application state implementing [`eframe::App`]
//! - [`HeatmapPlot`] - egui_plot-backed pane surface
//! - [`AppAction`] - Queued UI actions
//!
//! Form callbacks and button hooks push [`AppAction`]s into a crossbeam
//! channel; [`ViewerApp::process_actions`] drains it once per frame.

mod heatmap;
mod panels;
pub mod state;

pub use heatmap::{FigureSnapshot, HeatmapPlot, DEFAULT_LIMITS};
pub use panels::*;
pub use state::AppAction;

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::path::Path;

use crate::config::{UiSessionState, ViewerConfig};
use crate::error::{Result, ResultExt, ViewerError};
use crate::types::{DisplayMode, Frame, SweepData};
use crate::view::{
    DisplayModeController, FormButton, FrameReconciler, PaneGrid, PlotFactory, RangeForm,
};

/// Main application state for the viewer
pub struct ViewerApp {
    config: ViewerConfig,
    form: RangeForm,
    reconciler: FrameReconciler,
    display: DisplayModeController,
    grid: PaneGrid,
    actions_tx: Sender<AppAction>,
    actions_rx: Receiver<AppAction>,
    last_error: Option<String>,
}

impl ViewerApp {
    /// Build the window with egui heatmap panes.
    pub fn new(config: ViewerConfig, session: UiSessionState) -> Result<Self> {
        Self::with_factory(config, session, HeatmapPlot::factory())
    }

    /// Build the window with a custom pane factory.
    ///
    /// Restores the session's frame and mode, falling back to the config's
    /// default mode. A pane that cannot be built fails construction.
    pub fn with_factory(
        config: ViewerConfig,
        session: UiSessionState,
        factory: impl PlotFactory + 'static,
    ) -> Result<Self> {
        let (actions_tx, actions_rx) = unbounded();

        let mut form = RangeForm::new();
        let tx = actions_tx.clone();
        form.connect_on_edit_finish(move |update| {
            let _ = tx.send(AppAction::ManualRange(update));
        });
        for (button, action) in [
            (FormButton::Load, AppAction::Load),
            (FormButton::Save, AppAction::Save),
            (FormButton::FromZoom, AppAction::FromZoom),
        ] {
            let tx = actions_tx.clone();
            form.connect_on_button(button, move || {
                let _ = tx.send(action.clone());
            });
        }
        form.sync_from_frame(&session.frame);

        let mut app = Self {
            form,
            reconciler: FrameReconciler::with_frame(session.frame),
            display: DisplayModeController::new(factory),
            grid: PaneGrid::new(),
            actions_tx,
            actions_rx,
            last_error: None,
            config,
        };

        let mode = session.mode.unwrap_or(app.config.default_mode);
        app.display_mode(mode, None)
            .context("Failed to build the initial display")?;
        app.push_frame_to_panes();
        Ok(app)
    }

    pub fn frame(&self) -> &Frame {
        self.reconciler.frame()
    }

    pub fn form(&self) -> &RangeForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut RangeForm {
        &mut self.form
    }

    pub fn display(&self) -> &DisplayModeController {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut DisplayModeController {
        &mut self.display
    }

    pub fn grid(&self) -> &PaneGrid {
        &self.grid
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Queue an action for the next [`ViewerApp::process_actions`]
    pub fn queue(&self, action: AppAction) {
        let _ = self.actions_tx.send(action);
    }

    /// Switch panes to `mode` and feed them `data`.
    pub fn display_mode(&mut self, mode: DisplayMode, data: Option<&SweepData>) -> Result<()> {
        self.display.switch_mode(mode, &mut self.grid)?;
        if let Some(data) = data {
            self.display.load_data(data);
        }
        Ok(())
    }

    /// Apply every queued action. Returns how many were handled.
    pub fn process_actions(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(action) = self.actions_rx.try_recv() {
            self.handle_action(action);
            handled += 1;
        }
        handled
    }

    /// Apply one action; failures land in the status line.
    pub fn handle_action(&mut self, action: AppAction) {
        tracing::trace!("Handling {:?}", action);
        let manual_edit = matches!(action, AppAction::ManualRange(_));
        let result = match action {
            AppAction::ManualRange(raw) => {
                let panes = self.display.surfaces();
                self.reconciler.apply_manual_text(&raw, &panes)
            }
            AppAction::FromZoom => {
                let panes = self.display.surfaces();
                self.reconciler
                    .apply_zoom_range(&panes)
                    .map(|_| ())
                    .context("From Zoom")
            }
            AppAction::Load => {
                self.pick_data_file();
                Ok(())
            }
            AppAction::LoadPath(path) => self.load_path(&path),
            AppAction::Save => {
                self.pick_save_dir();
                Ok(())
            }
            AppAction::SaveTo(dir) => self.save_figures_to(&dir).map(|count| {
                tracing::info!("Saved {} figures to {:?}", count, dir);
            }),
            AppAction::SelectMode(mode) => self.display_mode(mode, None),
        };

        match result {
            Ok(()) => {
                self.last_error = None;
                self.after_frame_change();
            }
            Err(e) => {
                tracing::warn!("{}", e);
                self.last_error = Some(e.to_string());
                // put committed values back over rejected text
                if manual_edit {
                    self.form.revert();
                }
                self.form.sync_from_frame(self.reconciler.frame());
            }
        }
    }

    fn after_frame_change(&mut self) {
        self.form.sync_from_frame(self.reconciler.frame());
        self.push_frame_to_panes();
    }

    /// Show the frame on every pane once both axes are known.
    fn push_frame_to_panes(&mut self) {
        let frame = *self.reconciler.frame();
        if let (Some(x), Some(y)) = (frame.x_range(), frame.y_range()) {
            for pane in self.display.panes_mut() {
                pane.plot.set_limits(x, y);
            }
        }
    }

    /// Switch to the display mode configured for `path`'s extension.
    ///
    /// Instrument files are not decoded here, so the panes start empty.
    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        let mode = self.config.mode_for_path(path).ok_or_else(|| {
            ViewerError::Config(format!("No instrument configured for {:?}", path))
        })?;
        tracing::info!("Loading {:?} as {:?}", path, mode);
        self.display_mode(mode, None)
    }

    /// Export every pane's figure into `dir`. Returns the number written.
    pub fn save_figures_to(&self, dir: &Path) -> Result<usize> {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        for pane in self.display.panes() {
            let path = dir.join(format!("{}_{}.json", slug(&pane.title), stamp));
            pane.plot
                .save_figure(&path)
                .with_context(|| format!("Failed to save {}", pane.title))?;
        }
        Ok(self.display.panes().len())
    }

    fn pick_data_file(&self) {
        let extensions = self.config.known_extensions();
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Instrument data", &extensions)
            .pick_file()
        {
            self.queue(AppAction::LoadPath(path));
        }
    }

    fn pick_save_dir(&self) {
        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
            self.queue(AppAction::SaveTo(dir));
        }
    }

    /// Session to persist on exit
    pub fn session(&self) -> UiSessionState {
        UiSessionState {
            mode: self.display.mode(),
            frame: *self.reconciler.frame(),
            ..UiSessionState::default()
        }
    }

    fn render_panes(&mut self, ui: &mut egui::Ui) {
        let count = self.display.panes().len();
        if count == 0 {
            ui.centered_and_justified(|ui| ui.label("No panes"));
            return;
        }
        let mut order: Vec<usize> = (0..count).collect();
        order.sort_by_key(|&i| {
            let cell = self.display.panes()[i].cell;
            (cell.row, cell.col)
        });

        let panes = self.display.panes_mut();
        ui.columns(count, |columns| {
            for (column, &index) in columns.iter_mut().zip(&order) {
                panes[index].plot.draw(column);
            }
        });
    }
}

/// File-name-safe form of a pane title: "Signal Amplitude [dB]" -> "signal_amplitude_db"
fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
    }
    out.trim_end_matches('_').to_string()
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.process_actions() > 0 {
            ctx.request_repaint();
        }

        egui::SidePanel::left("range_form")
            .resizable(false)
            .show(ctx, |ui| {
                RangeBoxPanel::render(ui, &mut self.form.x);
                ui.separator();
                RangeBoxPanel::render(ui, &mut self.form.y);
                ui.separator();
                let has_panes = !self.display.panes().is_empty();
                FormButtonsPanel::render(ui, &mut self.form, has_panes);
                ui.separator();
                if let Some(mode) = ModeSelectorPanel::render(ui, self.display.mode()) {
                    self.queue(AppAction::SelectMode(mode));
                }
                ui.separator();
                FramePanel::render(ui, self.reconciler.frame());
                StatusPanel::render(ui, &mut self.last_error);
            });

        egui::CentralPanel::default().show(ctx, |ui| self.render_panes(ui));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.session().save() {
            tracing::warn!("Failed to save UI session: {}", e);
        }
        if let Err(e) = self.display.release_all(&mut self.grid) {
            tracing::warn!("Failed to release panes: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Signal Amplitude [dB]"), "signal_amplitude_db");
        assert_eq!(slug("Real part"), "real_part");
        assert_eq!(slug("  Imaginary part "), "imaginary_part");
    }
}
