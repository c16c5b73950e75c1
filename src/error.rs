//! Error handling for the MDMA viewer
//!
//! This module defines the error taxonomy used by the view-range logic and
//! the application shell, plus a Result alias for use throughout the crate.

use thiserror::Error;

use crate::types::{Axis, Bound};

/// Main error type for viewer operations
#[derive(Error, Debug)]
pub enum ViewerError {
    /// A range box holds text that is not a number
    #[error("Invalid {axis} {bound} value: {text:?}")]
    InputFormat {
        axis: Axis,
        bound: Bound,
        text: String,
    },

    /// An operation that samples pane extents ran with no panes displayed
    #[error("No panes are displayed; cannot {operation}")]
    EmptyPaneSet { operation: &'static str },

    /// A pane could not be constructed, attached or released
    #[error("Pane lifecycle error: {0}")]
    PaneLifecycle(String),

    /// Malformed instrument data handed to a pane
    #[error("Data error: {0}")]
    Data(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ViewerError>,
    },
}

impl ViewerError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ViewerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all context layers stripped
    pub fn root(&self) -> &ViewerError {
        match self {
            ViewerError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for ViewerError {
    fn from(err: serde_json::Error) -> Self {
        ViewerError::Serialization(err.to_string())
    }
}

/// Result type alias for viewer operations
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
