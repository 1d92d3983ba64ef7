//! Board configuration.
//!
//! [`BoardConfig`] is plain data, loadable from JSON with every field
//! optional. [`BoardConfig::validate`] turns it into [`BoardSettings`] with
//! parsed colors; that is where a bad color spec in the config surfaces.
//!
//! ```
//! use spark_board::config::BoardConfig;
//!
//! let config = BoardConfig::from_json_str(r#"{ "width": 8, "height": 4 }"#).unwrap();
//! let settings = config.validate().unwrap();
//! assert_eq!((settings.width, settings.height), (8, 4));
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{BoardError, Result};
use crate::state::pointer::{ModifierKey, Modifiers};
use crate::types::Rgba;

/// Raw, unvalidated board configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    pub width: u16,
    pub height: u16,
    /// Pixel size of one cell, reported in paint instructions.
    pub cell_size_px: u16,
    pub default_color: String,
    pub highlight_color: String,
    pub paint_color: String,
    pub rotate_x_modifier: ModifierKey,
    pub rotate_y_modifier: ModifierKey,
    /// Lifetime of the overlay the built-in paint function emits.
    pub paint_flash_ms: u64,
    /// Tick period used by the demo driver.
    pub tick_interval_ms: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 16,
            cell_size_px: 24,
            default_color: "#F0F0F0".to_string(),
            highlight_color: "#FFD54F".to_string(),
            paint_color: "#E53935".to_string(),
            rotate_x_modifier: ModifierKey::Alt,
            rotate_y_modifier: ModifierKey::Shift,
            paint_flash_ms: 400,
            tick_interval_ms: 250,
        }
    }
}

impl BoardConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check dimensions and bindings, parse colors.
    pub fn validate(&self) -> Result<BoardSettings> {
        if self.width == 0 || self.height == 0 {
            return Err(BoardError::Config(format!(
                "board must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self.rotate_x_modifier == self.rotate_y_modifier {
            return Err(BoardError::Config(format!(
                "rotate_x_modifier and rotate_y_modifier are both {:?}",
                self.rotate_x_modifier
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(BoardError::Config("tick_interval_ms must be > 0".to_string()));
        }

        Ok(BoardSettings {
            width: self.width,
            height: self.height,
            cell_size_px: self.cell_size_px,
            default_color: Rgba::parse(&self.default_color)?,
            highlight_color: Rgba::parse(&self.highlight_color)?,
            paint_color: Rgba::parse(&self.paint_color)?,
            rotate_x: self.rotate_x_modifier.flag(),
            rotate_y: self.rotate_y_modifier.flag(),
            paint_flash: Duration::from_millis(self.paint_flash_ms),
            tick_interval: Duration::from_millis(self.tick_interval_ms),
        })
    }
}

/// Validated configuration with parsed colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSettings {
    pub width: u16,
    pub height: u16,
    pub cell_size_px: u16,
    pub default_color: Rgba,
    pub highlight_color: Rgba,
    pub paint_color: Rgba,
    pub rotate_x: Modifiers,
    pub rotate_y: Modifiers,
    pub paint_flash: Duration,
    pub tick_interval: Duration,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            width: 16,
            height: 16,
            cell_size_px: 24,
            default_color: Rgba::from_rgb_int(0xF0F0F0),
            highlight_color: Rgba::from_rgb_int(0xFFD54F),
            paint_color: Rgba::from_rgb_int(0xE53935),
            rotate_x: Modifiers::ALT,
            rotate_y: Modifiers::SHIFT,
            paint_flash: Duration::from_millis(400),
            tick_interval: Duration::from_millis(250),
        }
    }
}
