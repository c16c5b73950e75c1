//! Range form: the X/Y range boxes and the form buttons
//!
//! The form holds text only. It never parses numbers; it reports what the
//! operator typed and leaves conversion to the frame reconciler.
//!
//! Events are delivered through plain listener callbacks so the form does
//! not depend on how the host wires them (the app forwards them into its
//! action queue).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::types::{Axis, AxisRange, Frame, RawRangeUpdate, TextRange};

/// Default text of a fresh range box
pub const DEFAULT_RANGE_TEXT: &str = "0";

type RangeListener = Box<dyn FnMut(Option<TextRange>)>;
type UpdateListener = Rc<RefCell<dyn FnMut(RawRangeUpdate)>>;
type ButtonListener = Box<dyn FnMut()>;

/// A start/stop pair of text boxes for one axis
pub struct RangeField {
    axis: Axis,
    raw_start: String,
    raw_stop: String,
    /// Text last written by `set_values`
    committed: TextRange,
    modified: bool,
    listeners: Vec<RangeListener>,
}

impl RangeField {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            raw_start: DEFAULT_RANGE_TEXT.to_string(),
            raw_stop: DEFAULT_RANGE_TEXT.to_string(),
            committed: TextRange::new(DEFAULT_RANGE_TEXT, DEFAULT_RANGE_TEXT),
            modified: false,
            listeners: Vec::new(),
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The typed range, or `None` when both boxes hold identical text.
    ///
    /// Untouched boxes share the same default text, so they never read as
    /// an explicit range.
    pub fn get_range(&self) -> Option<TextRange> {
        if self.raw_start == self.raw_stop {
            None
        } else {
            Some(TextRange::new(self.raw_start.clone(), self.raw_stop.clone()))
        }
    }

    /// Overwrite both boxes without firing listeners.
    pub fn set_values(&mut self, start: impl Into<String>, stop: impl Into<String>) {
        self.raw_start = start.into();
        self.raw_stop = stop.into();
        self.committed = TextRange::new(self.raw_start.clone(), self.raw_stop.clone());
        self.modified = false;
    }

    /// Put back the text last written by [`RangeField::set_values`].
    pub fn revert(&mut self) {
        self.raw_start = self.committed.start.clone();
        self.raw_stop = self.committed.stop.clone();
        self.modified = false;
    }

    pub fn start_text(&self) -> &str {
        &self.raw_start
    }

    pub fn stop_text(&self) -> &str {
        &self.raw_stop
    }

    pub fn start_text_mut(&mut self) -> &mut String {
        &mut self.raw_start
    }

    /// Mutable access to the stop box. Callers that change the text through
    /// this must follow up with [`RangeField::mark_stop_edited`].
    pub fn stop_text_mut(&mut self) -> &mut String {
        &mut self.raw_stop
    }

    pub fn set_start_text(&mut self, text: impl Into<String>) {
        self.raw_start = text.into();
    }

    pub fn set_stop_text(&mut self, text: impl Into<String>) {
        self.raw_stop = text.into();
        self.modified = true;
    }

    pub fn mark_stop_edited(&mut self) {
        self.modified = true;
    }

    pub fn on_edit_finished(&mut self, listener: impl FnMut(Option<TextRange>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// The stop box lost focus. Fires listeners if it was edited since the
    /// last commit; returns whether it fired.
    pub fn commit_stop(&mut self) -> bool {
        if !self.modified {
            return false;
        }
        self.modified = false;
        let range = self.get_range();
        for listener in &mut self.listeners {
            listener(range.clone());
        }
        true
    }
}

/// Buttons exposed by the range form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormButton {
    Load,
    Save,
    FromZoom,
}

impl FormButton {
    pub const ALL: [FormButton; 3] = [FormButton::Load, FormButton::Save, FormButton::FromZoom];

    pub fn label(&self) -> &'static str {
        match self {
            FormButton::Load => "Load",
            FormButton::Save => "Save",
            FormButton::FromZoom => "From Zoom",
        }
    }
}

/// The X and Y range fields plus the form buttons
pub struct RangeForm {
    pub x: RangeField,
    pub y: RangeField,
    buttons: HashMap<FormButton, Vec<ButtonListener>>,
}

impl Default for RangeForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeForm {
    pub fn new() -> Self {
        Self {
            x: RangeField::new(Axis::X),
            y: RangeField::new(Axis::Y),
            buttons: HashMap::new(),
        }
    }

    /// Drop uncommitted text in both fields.
    pub fn revert(&mut self) {
        self.x.revert();
        self.y.revert();
    }

    /// Route edit completion on either field to `callback`.
    ///
    /// The edited axis carries its range and the other axis is `None`. A
    /// field whose boxes hold identical text reports nothing.
    pub fn connect_on_edit_finish(&mut self, callback: impl FnMut(RawRangeUpdate) + 'static) {
        let shared: UpdateListener = Rc::new(RefCell::new(callback));

        let on_x = Rc::clone(&shared);
        self.x.on_edit_finished(move |range| {
            if let Some(range) = range {
                (&mut *on_x.borrow_mut())(RawRangeUpdate::x_only(range));
            }
        });

        let on_y = shared;
        self.y.on_edit_finished(move |range| {
            if let Some(range) = range {
                (&mut *on_y.borrow_mut())(RawRangeUpdate::y_only(range));
            }
        });
    }

    pub fn set_x_range(&mut self, start: impl Into<String>, stop: impl Into<String>) {
        self.x.set_values(start, stop);
    }

    pub fn set_y_range(&mut self, start: impl Into<String>, stop: impl Into<String>) {
        self.y.set_values(start, stop);
    }

    /// Show every fully set axis of `frame` in its field.
    pub fn sync_from_frame(&mut self, frame: &Frame) {
        if let Some(AxisRange { start, stop }) = frame.x_range() {
            self.set_x_range(start.to_string(), stop.to_string());
        }
        if let Some(AxisRange { start, stop }) = frame.y_range() {
            self.set_y_range(start.to_string(), stop.to_string());
        }
    }

    pub fn connect_on_button(&mut self, button: FormButton, callback: impl FnMut() + 'static) {
        self.buttons
            .entry(button)
            .or_default()
            .push(Box::new(callback));
    }

    pub fn press(&mut self, button: FormButton) {
        if let Some(listeners) = self.buttons.get_mut(&button) {
            for listener in listeners {
                listener();
            }
        }
    }
}
