//! Panel components for the settings side of the window
//!
//! # Panels
//!
//! - [`RangeBoxPanel`] - "X Range" / "Y Range" start and stop boxes
//! - [`FormButtonsPanel`] - Load, Save and From Zoom
//! - [`ModeSelectorPanel`] - Explicit display mode choice
//! - [`FramePanel`] - Read-out of the current frame
//! - [`StatusPanel`] - Last error, if any

use crate::types::{DisplayMode, Frame};
use crate::view::form::{FormButton, RangeField, RangeForm};
use egui::{Color32, RichText, Ui};

const BOX_WIDTH: f32 = 80.0;

/// Renders one axis of the range form
pub struct RangeBoxPanel;

impl RangeBoxPanel {
    /// Render the start/stop boxes. Committing the stop box (focus lost
    /// after an edit) fires the field's listeners.
    pub fn render(ui: &mut Ui, field: &mut RangeField) {
        ui.vertical_centered(|ui| ui.label(format!("{} Range", field.axis())));

        egui::Grid::new(("range_box", field.axis()))
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Start:");
                ui.add(egui::TextEdit::singleline(field.start_text_mut()).desired_width(BOX_WIDTH));
                ui.end_row();

                ui.label("Stop:");
                let response = ui
                    .add(egui::TextEdit::singleline(field.stop_text_mut()).desired_width(BOX_WIDTH));
                if response.changed() {
                    field.mark_stop_edited();
                }
                if response.lost_focus() {
                    field.commit_stop();
                }
                ui.end_row();
            });
    }
}

/// Renders the form buttons
pub struct FormButtonsPanel;

impl FormButtonsPanel {
    /// Render the buttons; `from_zoom_enabled` gates From Zoom on panes existing.
    pub fn render(ui: &mut Ui, form: &mut RangeForm, from_zoom_enabled: bool) {
        for button in FormButton::ALL {
            let enabled = button != FormButton::FromZoom || from_zoom_enabled;
            let clicked = ui
                .add_enabled(
                    enabled,
                    egui::Button::new(button.label()).min_size(egui::vec2(BOX_WIDTH * 2.0, 0.0)),
                )
                .clicked();
            if clicked {
                form.press(button);
            }
        }
    }
}

/// Renders the display mode selector
pub struct ModeSelectorPanel;

impl ModeSelectorPanel {
    /// Returns the newly picked mode, if the selection changed
    pub fn render(ui: &mut Ui, current: Option<DisplayMode>) -> Option<DisplayMode> {
        let mut picked = None;
        egui::ComboBox::from_id_salt("display_mode_selector")
            .selected_text(current.map_or("None", |m| m.display_name()))
            .show_ui(ui, |ui| {
                for mode in DisplayMode::ALL {
                    if ui
                        .selectable_label(current == Some(mode), mode.display_name())
                        .clicked()
                        && current != Some(mode)
                    {
                        picked = Some(mode);
                    }
                }
            });
        picked
    }
}

/// Renders the current frame
pub struct FramePanel;

impl FramePanel {
    pub fn render(ui: &mut Ui, frame: &Frame) {
        ui.label(RichText::new("Frame").strong());
        ui.label(RichText::new(frame.to_string()).monospace());
    }
}

/// Renders the status line
pub struct StatusPanel;

impl StatusPanel {
    pub fn render(ui: &mut Ui, last_error: &mut Option<String>) {
        let mut dismiss = false;
        if let Some(message) = last_error.as_deref() {
            ui.horizontal_wrapped(|ui| {
                ui.colored_label(Color32::LIGHT_RED, message);
                dismiss = ui.small_button("✖").clicked();
            });
        }
        if dismiss {
            *last_error = None;
        }
    }
}
