//! Configuration module for the MDMA viewer
//!
//! This module handles:
//! - Viewer configuration (`config.toml`): window, default display mode,
//!   log filter and the instrument table that maps data files to modes
//! - UI session persistence (`ui_session.json`): last mode and frame
//!
//! # Locations
//!
//! - **Linux**: `~/.config/dev.mdma.viewer/config.toml`, `~/.local/share/dev.mdma.viewer/`
//! - **macOS**: `~/Library/Application Support/dev.mdma.viewer/`
//! - **Windows**: `%APPDATA%\dev.mdma.viewer\`
//!
//! # Example
//!
//! ```toml
//! window_title = "MDMA data editor"
//! window_size = [1460.0, 600.0]
//! default_mode = "DualComplex"
//!
//! [instruments]
//! csv = "SingleAmplitude"
//! s2p = "DualComplex"
//! ```

pub mod ui_session;

pub use ui_session::UiSessionState;

use crate::error::{Result, ViewerError};
use crate::types::DisplayMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Application identifier for config and data directories
pub const APP_ID: &str = "dev.mdma.viewer";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// Directory name for rolling log files
pub const LOG_DIR: &str = "logs";

// ==================== Directories ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Get the application config directory path
pub fn app_config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        ViewerError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            ViewerError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the config file
pub fn config_path() -> Option<PathBuf> {
    app_config_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== Viewer Config ====================

/// User-editable viewer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Main window title
    #[serde(default = "default_window_title")]
    pub window_title: String,

    /// Initial window size in points
    #[serde(default = "default_window_size")]
    pub window_size: [f32; 2],

    /// Display mode used when no session is restored
    #[serde(default)]
    pub default_mode: DisplayMode,

    /// Tracing filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Data file extension (lowercase, no dot) to display mode
    #[serde(default = "default_instruments")]
    pub instruments: BTreeMap<String, DisplayMode>,
}

fn default_window_title() -> String {
    "MDMA data editor".to_string()
}

fn default_window_size() -> [f32; 2] {
    [1460.0, 600.0]
}

fn default_log_filter() -> String {
    "info,mdma_viewer=debug".to_string()
}

fn default_instruments() -> BTreeMap<String, DisplayMode> {
    BTreeMap::from([
        ("csv".to_string(), DisplayMode::SingleAmplitude),
        ("s1p".to_string(), DisplayMode::DualComplex),
        ("s2p".to_string(), DisplayMode::DualComplex),
    ])
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            window_size: default_window_size(),
            default_mode: DisplayMode::default(),
            log_filter: default_log_filter(),
            instruments: default_instruments(),
        }
    }
}

impl ViewerConfig {
    /// Load config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ViewerError::Config(format!("Failed to read {:?}: {}", path, e)))?;

        toml::from_str(&content)
            .map_err(|e| ViewerError::Config(format!("Failed to parse {:?}: {}", path, e)))
    }

    /// Load config from the default location, returning defaults on any error
    pub fn load_or_default() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Save config as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ViewerError::Serialization(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| ViewerError::Config(format!("Failed to write config: {}", e)))
    }

    /// Display mode for a data file, by extension (case-insensitive)
    pub fn mode_for_path(&self, path: impl AsRef<Path>) -> Option<DisplayMode> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        self.instruments.get(&ext).copied()
    }

    /// Extensions offered in the Load dialog
    pub fn known_extensions(&self) -> Vec<&str> {
        self.instruments.keys().map(|k| k.as_str()).collect()
    }
}
