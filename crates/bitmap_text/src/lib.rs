//! # Bitmap Text
//!
//! Bitmap-font text rendering for a real-time game client.
//!
//! ## Features
//!
//! - **Glyph Atlas**: Glyph widths derived from a 16x16 grid of 8x8 glyph cells
//! - **Colour Codes**: Inline `§` + hex digit colour changes with drop shadows
//! - **Batched Drawing**: Precompiled per-glyph commands sent in bounded batches
//! - **Layout**: Exact width measurement and greedy word wrapping
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bitmap_text::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FontConfig::load_from_file("font.toml")?;
//!     let mut text = TextRenderer::from_config(&config, RecordingBackend::new())?;
//!
//!     text.draw_string_with_shadow("§aReady", 4, 4, config.default_color)?;
//!     let height = text.wrap_height("A long tooltip that needs wrapping", 80);
//!     println!("tooltip is {} px tall", height);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod foundation;
pub mod config;
pub mod assets;
pub mod render;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, ImageData},
        config::{Config, ConfigError, ConfigFormat, FontConfig},
        render::{
            backend::{RecordingBackend, TextRenderBackend, TextureHandle},
            text::{CharacterMap, FontError, FontResult, TextLayout, TextRenderer, WrapResult},
        },
    };
}
