//! UI session state persistence
//!
//! Saved automatically on close and restored on the next launch: which
//! display mode was showing and the last view frame.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{app_data_dir, ensure_app_data_dir};
use crate::error::{Result, ViewerError};
use crate::types::{DisplayMode, Frame};

/// UI session state filename
pub const UI_SESSION_FILE: &str = "ui_session.json";

/// UI session state persisted between app launches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSessionState {
    /// Version for migration
    #[serde(default = "default_version")]
    pub version: u32,

    /// Display mode at close
    #[serde(default)]
    pub mode: Option<DisplayMode>,

    /// View frame at close
    #[serde(default)]
    pub frame: Frame,
}

fn default_version() -> u32 {
    1
}

impl Default for UiSessionState {
    fn default() -> Self {
        Self {
            version: 1,
            mode: None,
            frame: Frame::default(),
        }
    }
}

impl UiSessionState {
    /// Read a session file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load UI session state from default location
    pub fn load() -> Self {
        let path = app_data_dir().map(|p| p.join(UI_SESSION_FILE));

        if let Some(path) = path {
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(state) => {
                        tracing::info!("Loaded UI session state from {:?}", path);
                        return state;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to read UI session state: {}, using defaults", e);
                    }
                }
            }
        }
        Self::default()
    }

    /// Write a session file
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)
            .map_err(|e| ViewerError::Config(format!("Failed to write UI session: {}", e)))
    }

    /// Save UI session state to default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        let path = dir.join(UI_SESSION_FILE);
        self.save_to(&path)?;
        tracing::debug!("Saved UI session state to {:?}", path);
        Ok(())
    }
}
