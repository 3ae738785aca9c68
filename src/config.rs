use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::codec::DEFAULT_QUALITY;
use crate::colour::Colour;

/// Rendering and output settings read by the command-line tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub jpeg_quality: u8,
    /// Render the demo card on a supersampled surface
    pub high_dpi: bool,
    /// Demo card background; a dark grey when unset
    pub background: Option<Colour>,
    pub log_level: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_QUALITY,
            high_dpi: false,
            background: None,
            log_level: "info".to_string(),
        }
    }
}

impl RenderConfig {
    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&json).map_err(|e| e.to_string())
    }

    /// Like [`RenderConfig::load`], but a missing file gives the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn background_or_default(&self) -> Colour {
        self.background.unwrap_or(Colour::rgb(0x20, 0x20, 0x28))
    }
}
