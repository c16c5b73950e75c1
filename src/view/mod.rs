//! View-range synchronization
//!
//! Everything that decides what the current viewing frame is lives here,
//! independent of the egui shell:
//!
//! - [`form`] - range boxes and buttons, reporting raw text edits
//! - [`frame`] - the [`FrameReconciler`] that owns the authoritative [`Frame`](crate::types::Frame)
//! - [`sampler`] - reduces live pane zoom to one range per axis
//! - [`display`] - display modes and pane lifecycle
//! - [`surface`] - the plotting widget interface panes are built on

pub mod display;
pub mod form;
pub mod frame;
pub mod sampler;
pub mod surface;

pub use display::{DisplayModeController, GridLayout, PaneDescriptor, PaneGrid, PaneId};
pub use form::{FormButton, RangeField, RangeForm};
pub use frame::FrameReconciler;
pub use sampler::{ZoomSample, ZoomSampler};
pub use surface::{PlotFactory, PlotSurface};
