//! Font atlas system for bitmap text rendering
//!
//! The font is a fixed 128x128 RGBA bitmap laid out as a 16x16 grid of 8x8
//! glyph cells. Glyph widths are not stored anywhere; they are derived once
//! from the bitmap's alpha channel and then used for every layout query.

use crate::assets::{AssetError, ImageData};
use crate::config::ConfigError;
use crate::foundation::math::Vec2;
use crate::render::backend::{TextRenderBackend, TextureHandle};

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur while building or drawing with a bitmap font
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Failed to load the font bitmap
    #[error("Failed to load font: {0}")]
    Asset(#[from] AssetError),

    /// Font bitmap is smaller than the glyph grid
    #[error("Font bitmap is {width}x{height}, expected at least {}x{}", ATLAS_SIZE, ATLAS_SIZE)]
    InvalidBitmap {
        /// Bitmap width in pixels
        width: u32,
        /// Bitmap height in pixels
        height: u32,
    },

    /// Pixel buffer does not match the declared dimensions
    #[error("Corrupt font bitmap: {0}")]
    CorruptBitmap(String),

    /// Failed to create or upload the atlas texture
    #[error("Failed to upload font texture: {0}")]
    TextureUpload(String),

    /// Graphics backend rejected a command
    #[error("Backend error: {0}")]
    Backend(String),

    /// Font configuration could not be read
    #[error("Font config error: {0}")]
    Config(#[from] ConfigError),
}

/// Number of glyphs in the atlas
pub const GLYPH_COUNT: usize = 256;

/// Glyph cells per atlas row and column
pub const GRID_SIZE: u32 = 16;

/// Glyph cell size in pixels
pub const CELL_SIZE: u32 = 8;

/// Expected atlas texture size in pixels
pub const ATLAS_SIZE: u32 = GRID_SIZE * CELL_SIZE;

/// Rendered quad size; just under a cell so sampling never bleeds into the
/// neighbouring glyph
pub const QUAD_SIZE: f32 = 7.99;

/// Glyph index of the space character
pub const SPACE_GLYPH: u8 = 32;

/// Pixels added to every glyph's visible width
pub const GLYPH_PADDING: i32 = 2;

/// Visible width forced for the space glyph
const SPACE_VISIBLE_WIDTH: i32 = 2;

/// Per-glyph advance widths, indexed by atlas grid position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphMetrics {
    advances: [i32; GLYPH_COUNT],
}

impl GlyphMetrics {
    /// Derive advance widths from a font bitmap
    ///
    /// Each glyph's width comes from [`visible_width`] plus
    /// [`GLYPH_PADDING`]; the space glyph is always 4 pixels wide.
    pub fn from_bitmap(image: &ImageData) -> FontResult<Self> {
        validate_bitmap(image)?;

        let mut advances = [0; GLYPH_COUNT];
        for (index, advance) in advances.iter_mut().enumerate() {
            let glyph = index as u8;
            let visible = if glyph == SPACE_GLYPH {
                SPACE_VISIBLE_WIDTH
            } else {
                visible_width(image, glyph)
            };
            *advance = visible + GLYPH_PADDING;
        }

        Ok(Self { advances })
    }

    /// Build metrics from precomputed advance widths
    pub const fn from_advances(advances: [i32; GLYPH_COUNT]) -> Self {
        Self { advances }
    }

    /// Advance width of a glyph in pixels
    pub const fn advance(&self, glyph: u8) -> i32 {
        self.advances[glyph as usize]
    }

    /// All advance widths in glyph order
    pub const fn advances(&self) -> &[i32; GLYPH_COUNT] {
        &self.advances
    }
}

/// Visible width of a glyph cell, scanning columns from bit 7 down to bit 0
///
/// The first column holding any pixel with non-zero alpha wins, so the result
/// is the index of the rightmost occupied column (0 for an empty cell).
pub fn visible_width(image: &ImageData, glyph: u8) -> i32 {
    let (cell_x, cell_y) = cell_origin(glyph);

    for bit in (0..CELL_SIZE).rev() {
        let occupied = (0..CELL_SIZE).any(|row| image.alpha(cell_x + bit, cell_y + row) > 0);
        if occupied {
            return bit as i32;
        }
    }
    0
}

/// Top-left pixel of a glyph's cell in the atlas
pub const fn cell_origin(glyph: u8) -> (u32, u32) {
    let index = glyph as u32;
    ((index % GRID_SIZE) * CELL_SIZE, (index / GRID_SIZE) * CELL_SIZE)
}

fn validate_bitmap(image: &ImageData) -> FontResult<()> {
    if image.width < ATLAS_SIZE || image.height < ATLAS_SIZE {
        return Err(FontError::InvalidBitmap {
            width: image.width,
            height: image.height,
        });
    }
    let expected = image.width as usize * image.height as usize * 4;
    if image.data.len() != expected {
        return Err(FontError::CorruptBitmap(format!(
            "{} bytes for a {}x{} RGBA image (expected {})",
            image.data.len(), image.width, image.height, expected
        )));
    }
    if image.width != ATLAS_SIZE || image.height != ATLAS_SIZE {
        log::warn!(
            "Font bitmap is {}x{}; only the top-left {}x{} glyph grid is used",
            image.width, image.height, ATLAS_SIZE, ATLAS_SIZE
        );
    }
    Ok(())
}

/// Vertex data for a glyph quad
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphVertex {
    /// Position relative to the pen, in pixels
    pub position: [f32; 2],
    /// Texture coordinates in the atlas
    pub uv: [f32; 2],
}

/// Textured quad for one glyph, drawn at the current pen position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    /// Quad edge length in pixels
    pub size: f32,
    /// UV coordinates in atlas texture (normalized 0.0-1.0) - top-left corner
    pub uv_min: Vec2,
    /// UV coordinates in atlas texture (normalized 0.0-1.0) - bottom-right corner
    pub uv_max: Vec2,
}

impl GlyphQuad {
    /// Quad for the given atlas cell
    pub fn for_glyph(glyph: u8) -> Self {
        let (u, v) = cell_origin(glyph);
        let (u, v) = (u as f32, v as f32);
        let atlas = ATLAS_SIZE as f32;

        Self {
            size: QUAD_SIZE,
            uv_min: Vec2::new(u / atlas, v / atlas),
            uv_max: Vec2::new((u + QUAD_SIZE) / atlas, (v + QUAD_SIZE) / atlas),
        }
    }

    /// Corner vertices: bottom-left, bottom-right, top-right, top-left
    /// (y grows downward in screen space)
    pub fn vertices(&self) -> [GlyphVertex; 4] {
        let s = self.size;
        let (min, max) = (self.uv_min, self.uv_max);
        [
            GlyphVertex { position: [0.0, s], uv: [min.x, max.y] },
            GlyphVertex { position: [s, s], uv: [max.x, max.y] },
            GlyphVertex { position: [s, 0.0], uv: [max.x, min.y] },
            GlyphVertex { position: [0.0, 0.0], uv: [min.x, min.y] },
        ]
    }
}

/// Font atlas: glyph metrics plus the uploaded bitmap texture
#[derive(Debug, Clone)]
pub struct FontAtlas {
    metrics: GlyphMetrics,
    texture: TextureHandle,
}

impl FontAtlas {
    /// Scan the bitmap for glyph widths and upload it as a texture
    pub fn build<B: TextRenderBackend + ?Sized>(image: &ImageData, backend: &mut B) -> FontResult<Self> {
        let metrics = GlyphMetrics::from_bitmap(image)?;

        let texture = backend
            .upload_texture(image)
            .map_err(|e| FontError::TextureUpload(e.to_string()))?;

        log::info!(
            "Font atlas built from {}x{} bitmap: {} glyphs, texture {:?}",
            image.width, image.height, GLYPH_COUNT, texture
        );

        Ok(Self { metrics, texture })
    }

    /// Glyph advance widths
    pub const fn metrics(&self) -> &GlyphMetrics {
        &self.metrics
    }

    /// Get the GPU texture handle for this atlas
    pub const fn texture(&self) -> TextureHandle {
        self.texture
    }
}
