//! # MDMA viewer: 2D instrument data viewer
//!
//! A desktop viewer for network-analyzer style sweeps: amplitude heatmaps
//! from a spectrum analyzer, or real/imaginary heatmaps from a vector
//! network analyzer. The operator can switch instrument display modes,
//! type an X/Y viewing frame by hand, or capture the frame from the
//! current zoom of the displayed plots.
//!
//! ## Architecture
//!
//! - **View** (`view`): the view-range synchronization core. The range form
//!   reports text edits, the frame reconciler merges them (and zoom
//!   captures) into one authoritative frame, the zoom sampler reduces live
//!   pane extents, and the display mode controller owns pane lifecycle.
//!   Nothing here depends on how the window is drawn beyond the
//!   `PlotSurface` trait.
//! - **Frontend** (`frontend`): the eframe/egui window and the
//!   egui_plot-backed heatmap panes. UI events become queued actions.
//! - **Config** (`config`): TOML viewer configuration and the JSON UI
//!   session restored on launch.
//!
//! ## Example
//!
//! ```ignore
//! use mdma_viewer::{config::{UiSessionState, ViewerConfig}, ViewerApp};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ViewerConfig::load_or_default();
//!     let app = ViewerApp::new(config, UiSessionState::load())?;
//!
//!     eframe::run_native(
//!         "MDMA data editor",
//!         eframe::NativeOptions::default(),
//!         Box::new(|_cc| Ok(Box::new(app))),
//!     )?;
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod frontend;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use app::ViewerApp;
pub use config::{UiSessionState, ViewerConfig};
pub use error::{Result, ViewerError};
pub use types::{AxisRange, DisplayMode, Frame, PaneKind, PartialRangeUpdate, RawRangeUpdate};
pub use view::{DisplayModeController, FrameReconciler, PlotSurface, RangeForm, ZoomSampler};
