//! Configuration for the foundation layer.
//!
//! Every field has a default, so a configuration file only needs to list
//! what it changes:
//!
//! ```toml
//! naming = "camel"
//!
//! [placement]
//! cascade_step = { x = 40, y = 25 }
//!
//! [screen]
//! display = { x = 0, y = 0, width = 2560, height = 1440 }
//! monitors = [
//!     { bounds = { x = 0, y = 0, width = 2560, height = 1440 }, primary = true },
//! ]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::{Point, Rect};

/// How accessor names are derived from a property's base name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingConvention {
    /// `name` / `get_name` / `set_name`.
    #[default]
    Snake,
    /// `name` / `getName` / `setName`.
    Camel,
}

impl NamingConvention {
    /// The conventional getter name for `base` (tried after `base` itself).
    pub fn getter_name(self, base: &str) -> String {
        match self {
            Self::Snake => format!("get_{base}"),
            Self::Camel => format!("get{}", capitalize(base)),
        }
    }

    /// The conventional setter name for `base`.
    pub fn setter_name(self, base: &str) -> String {
        match self {
            Self::Snake => format!("set_{base}"),
            Self::Camel => format!("set{}", capitalize(base)),
        }
    }
}

fn capitalize(base: &str) -> String {
    let mut chars = base.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Automatic window placement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Offset between successive cascaded windows.
    pub cascade_step: Point,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            cascade_step: Point::new(30, 20),
        }
    }
}

/// Layout helper settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Margin used by the fill helper.
    pub fill_margin: i32,
    /// Margin around a frame's status line.
    pub status_margin: i32,
    /// Horizontal gap between a label and its control in a layout group.
    pub group_x_increment: i32,
    /// Vertical distance between layout group rows.
    pub group_y_increment: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            fill_margin: 5,
            status_margin: 2,
            group_x_increment: 5,
            group_y_increment: 20,
        }
    }
}

/// Table view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Initial column width.
    pub column_width: i32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { column_width: 100 }
    }
}

/// Text metrics used to measure controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontMetrics {
    /// Average character advance.
    pub char_width: i32,
    /// Line height.
    pub line_height: i32,
    /// Padding added on every side of a text-bearing control.
    pub padding: i32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            char_width: 7,
            line_height: 15,
            padding: 3,
        }
    }
}

/// One monitor of the screen layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Monitor bounds in display coordinates.
    pub bounds: Rect,
    /// Whether this is the primary monitor.
    #[serde(default)]
    pub primary: bool,
}

/// Display and monitor geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Bounds of the whole display.
    pub display: Rect,
    /// Monitors. When none is primary, placement uses the display bounds.
    pub monitors: Vec<MonitorConfig>,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        let display = Rect::new(0, 0, 1920, 1080);
        Self {
            display,
            monitors: vec![MonitorConfig {
                bounds: display,
                primary: true,
            }],
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoundationConfig {
    /// Accessor naming convention for binding and column extraction.
    pub naming: NamingConvention,
    /// Window placement.
    pub placement: PlacementConfig,
    /// Layout helpers.
    pub layout: LayoutConfig,
    /// Table views.
    pub table: TableConfig,
    /// Text measurement.
    pub metrics: FontMetrics,
    /// Screen geometry.
    pub screen: ScreenConfig,
}

impl FoundationConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(ConfigError::Parse)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(target: "horizon_foundation::config", path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }
}
