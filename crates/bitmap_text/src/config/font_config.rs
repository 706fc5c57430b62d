//! Font configuration
//!
//! Where the glyph bitmap and the allowed character list live, plus the
//! defaults the demo tooling draws with.

use serde::{Serialize, Deserialize};
use std::path::Path;

use super::{Config, ConfigError};

/// # Font Configuration
///
/// Paths to the font assets used when building a
/// [`TextRenderer`](crate::render::text::TextRenderer) from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Path to the 128x128 RGBA glyph bitmap (16x16 cells of 8x8 pixels)
    pub bitmap_path: String,
    /// Optional `font.txt`-style allowed character list; the built-in set is
    /// used when absent
    pub allowed_characters_path: Option<String>,
    /// Default text colour as `0xAARRGGBB` (zero alpha means opaque)
    pub default_color: u32,
    /// Whether UI text is drawn with a drop shadow by default
    pub shadow: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            bitmap_path: "font/default.png".to_string(),
            allowed_characters_path: None,
            default_color: 0x00FF_FFFF,
            shadow: true,
        }
    }
}

impl Config for FontConfig {}

impl FontConfig {
    /// Create a config for the given bitmap with default settings
    pub fn new(bitmap_path: impl Into<String>) -> Self {
        Self {
            bitmap_path: bitmap_path.into(),
            ..Self::default()
        }
    }
    
    /// Set the allowed character list path
    #[must_use]
    pub fn with_allowed_characters(mut self, path: impl Into<String>) -> Self {
        self.allowed_characters_path = Some(path.into());
        self
    }
    
    /// Validate that the referenced files exist
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !Path::new(&self.bitmap_path).exists() {
            return Err(ConfigError::Invalid(format!("Font bitmap not found: {}", self.bitmap_path)));
        }
        if let Some(chars) = &self.allowed_characters_path {
            if !Path::new(chars).exists() {
                return Err(ConfigError::Invalid(format!("Allowed character list not found: {}", chars)));
            }
        }
        Ok(())
    }
}
