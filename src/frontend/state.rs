//! Action types for the frontend
//!
//! Widgets and form callbacks never touch the frame or the panes directly.
//! They send an [`AppAction`] into the app's queue and the app applies it
//! once per UI frame, so each update is handled in one piece.

use std::path::PathBuf;

use crate::types::{DisplayMode, RawRangeUpdate};

/// Actions the app handles
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// A range box finished editing
    ManualRange(RawRangeUpdate),
    /// Capture the frame from the panes' zoom
    FromZoom,
    /// Pick a data file and switch to its instrument's mode
    Load,
    /// Load a specific data file
    LoadPath(PathBuf),
    /// Pick a directory and export every pane's figure
    Save,
    /// Export every pane's figure into a directory
    SaveTo(PathBuf),
    /// Switch display mode explicitly
    SelectMode(DisplayMode),
}
