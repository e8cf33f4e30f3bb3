//! Configuration for the input bridge

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::CellMetrics;
use crate::input::KeyEncoder;

const DEFAULT_CELL_WIDTH: f32 = 9.0;
const DEFAULT_CELL_HEIGHT: f32 = 18.0;

/// Input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Hardware Backspace sends ^H (0x08) instead of DEL (0x7F)
    pub backspace_sends_control_h: bool,
    /// Alt/option prefixes characters with ESC
    pub option_as_meta: bool,
    /// Renderer cell width in surface units
    pub cell_width: f32,
    /// Renderer cell height in surface units
    pub cell_height: f32,
    /// Periodic refresh tick interval in milliseconds
    pub tick_interval_ms: u64,
    /// Wrap pastes in bracketed-paste markers when the session asks for it
    pub bracketed_paste: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            backspace_sends_control_h: false,
            option_as_meta: true,
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            tick_interval_ms: 16,
            bracketed_paste: true,
        }
    }
}

impl InputConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: InputConfig = serde_json::from_str(&content)?;
        config.validate();
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from default location or return default config
    pub fn load_or_default() -> Self {
        // ~/.config/mochi/input.json
        if let Some(config_dir) = dirs_config_path() {
            let config_path = config_dir.join("input.json");
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!(path = %config_path.display(), "ignoring input config: {}", e),
                }
            }
        }
        Self::default()
    }

    /// Replace unusable values with defaults
    pub fn validate(&mut self) {
        if !(self.cell_width.is_finite() && self.cell_width > 0.0) {
            self.cell_width = DEFAULT_CELL_WIDTH;
        }
        if !(self.cell_height.is_finite() && self.cell_height > 0.0) {
            self.cell_height = DEFAULT_CELL_HEIGHT;
        }
        if self.tick_interval_ms == 0 {
            self.tick_interval_ms = 1;
        }
    }

    pub fn encoder(&self) -> KeyEncoder {
        KeyEncoder {
            backspace_sends_control_h: self.backspace_sends_control_h,
            option_as_meta: self.option_as_meta,
        }
    }

    pub fn cell_metrics(&self) -> CellMetrics {
        CellMetrics::new(self.cell_width, self.cell_height)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Get the configuration directory path
fn dirs_config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join("mochi"))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
