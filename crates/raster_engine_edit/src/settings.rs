//! Persistable tool settings
//!
//! Applications keep these in their settings file and build a fill session or
//! filter pass from them. Missing fields fall back to the tool defaults.

use serde::{Deserialize, Serialize};

use crate::fill::FillMode;

/// Settings of the fill tool
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillSettings {
    /// How the fill region is determined
    #[serde(default)]
    pub mode: FillMode,

    /// Color tolerance in percent (0 = exact match)
    #[serde(default)]
    pub color_diff: u8,

    /// Opacity of the painted color in percent
    #[serde(default = "default_density")]
    pub density: u8,
}

fn default_density() -> u8 {
    100
}

impl Default for FillSettings {
    fn default() -> Self {
        Self {
            mode: FillMode::default(),
            color_diff: 0,
            density: 100,
        }
    }
}

/// Settings of the anti-aliasing filter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntialiasSettings {
    /// Smoothing strength in percent
    #[serde(default = "default_strength")]
    pub strength: u8,
}

fn default_strength() -> u8 {
    50
}

impl Default for AntialiasSettings {
    fn default() -> Self {
        Self { strength: 50 }
    }
}
