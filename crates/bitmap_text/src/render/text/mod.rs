//! Bitmap text rendering system
//!
//! Glyph atlas, colour palette, precompiled commands, layout and the
//! renderer that ties them together.
//!
//! # Architecture
//!
//! - [`FontAtlas`]: derives glyph widths from the font bitmap and uploads it
//! - [`ColorPalette`]: the 16 colour codes and their shadow variants
//! - [`CommandTable`] / [`CommandBatch`]: commands built once, sent by id
//! - [`TextLayout`]: width measurement and word wrapping
//! - [`TextRenderer`]: parses colour codes and issues batched draws

mod character_map;
mod commands;
mod font_atlas;
mod formatting;
mod palette;
mod text_layout;
mod text_renderer;

pub use character_map::{CharacterMap, DEFAULT_CHARACTERS, FIRST_GLYPH};
pub use commands::{CommandBatch, CommandId, CommandTable, PrecompiledCommand, BATCH_CAPACITY, COMMAND_COUNT};
pub use font_atlas::{
    cell_origin, visible_width, FontAtlas, FontError, FontResult, GlyphMetrics, GlyphQuad, GlyphVertex,
    ATLAS_SIZE, CELL_SIZE, GLYPH_COUNT, GLYPH_PADDING, GRID_SIZE, QUAD_SIZE, SPACE_GLYPH,
};
pub use formatting::{color_code, tokens, Spanned, Token, Tokens, CODE_CHARACTERS, DEFAULT_CODE, FORMAT_MARKER};
pub use palette::{generic_rgb, ColorPalette, COLOR_CODES, PALETTE_SIZE, SHADOW_OFFSET};
pub use text_layout::{LineSpan, TextLayout, WrapResult, LINE_HEIGHT};
pub use text_renderer::TextRenderer;
