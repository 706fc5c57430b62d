//! Bitmap text renderer
//!
//! Owns the font atlas, palette and precompiled commands, and turns strings
//! into batched command lists for a [`TextRenderBackend`].
//!
//! # Example
//!
//! ```no_run
//! use bitmap_text::assets::ImageData;
//! use bitmap_text::render::backend::RecordingBackend;
//! use bitmap_text::render::text::{CharacterMap, TextRenderer};
//!
//! let bitmap = ImageData::from_file("font/default.png")?;
//! let mut text = TextRenderer::new(RecordingBackend::new(), &bitmap, CharacterMap::default())?;
//!
//! text.draw_string_with_shadow("§eHello §fworld", 2, 2, 0xFFFFFF)?;
//! let width = text.measure_width("§eHello §fworld");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::Path;

use super::character_map::CharacterMap;
use super::commands::{CommandBatch, CommandId, CommandTable};
use super::font_atlas::{FontAtlas, FontError, FontResult, GlyphMetrics};
use super::formatting::{tokens, Token};
use super::palette::{ColorPalette, SHADOW_OFFSET};
use super::text_layout::{TextLayout, WrapResult, LINE_HEIGHT};
use crate::assets::ImageData;
use crate::config::{Config, FontConfig};
use crate::foundation::math::argb;
use crate::render::backend::{TextRenderBackend, TextureHandle};

/// Pixel offset of the drop shadow
const SHADOW_SHIFT: i32 = 1;

/// Text renderer bound to one backend
///
/// Built once; drawing reuses a single command batch, so draw calls take
/// `&mut self`. Measurement is pure and takes `&self`.
pub struct TextRenderer<B: TextRenderBackend> {
    backend: B,
    atlas: FontAtlas,
    characters: CharacterMap,
    palette: ColorPalette,
    commands: CommandTable,
    batch: CommandBatch,
}

impl<B: TextRenderBackend> TextRenderer<B> {
    /// Build the atlas, palette and commands and register them with `backend`
    pub fn new(mut backend: B, bitmap: &ImageData, characters: CharacterMap) -> FontResult<Self> {
        let atlas = FontAtlas::build(bitmap, &mut backend)?;
        let palette = ColorPalette::build();
        let commands = CommandTable::build(atlas.metrics(), &palette);
        commands.register(&mut backend)?;

        log::info!(
            "Text renderer ready: {} allowed characters, {} commands",
            characters.len(),
            commands.len()
        );

        Ok(Self {
            backend,
            atlas,
            characters,
            palette,
            commands,
            batch: CommandBatch::new(),
        })
    }

    /// Load the font assets named in `config` and build a renderer
    pub fn from_config(config: &FontConfig, backend: B) -> FontResult<Self> {
        log::info!("Loading font from {}", config.bitmap_path);
        let bitmap = ImageData::from_file(&config.bitmap_path)?;
        let characters = match &config.allowed_characters_path {
            Some(path) => CharacterMap::from_file(path)?,
            None => CharacterMap::default(),
        };
        Self::new(backend, &bitmap, characters)
    }

    /// Read a TOML or RON font config from disk and build a renderer from it
    pub fn from_config_file<P: AsRef<Path>>(path: P, backend: B) -> FontResult<Self> {
        let config = FontConfig::load_from_file(path)?;
        Self::from_config(&config, backend)
    }

    /// Draw a string with its top-left corner at `(x, y)`
    ///
    /// `color` is `0xAARRGGBB`; an alpha of zero is drawn opaque. If the
    /// backend fails mid-string the transform is still restored.
    pub fn draw_string(&mut self, text: &str, x: i32, y: i32, color: u32) -> FontResult<()> {
        self.render_pass(text, x, y, color, false)
    }

    /// Draw a darkened copy one pixel down and right, then the string on top
    pub fn draw_string_with_shadow(&mut self, text: &str, x: i32, y: i32, color: u32) -> FontResult<()> {
        self.render_pass(
            text,
            x.saturating_add(SHADOW_SHIFT),
            y.saturating_add(SHADOW_SHIFT),
            color,
            true,
        )?;
        self.render_pass(text, x, y, color, false)
    }

    /// Word-wrap a string to `max_width` and draw each line
    pub fn draw_wrapped(&mut self, text: &str, x: i32, y: i32, max_width: i32, color: u32) -> FontResult<()> {
        let wrap = self.wrap_text(text, max_width);

        let mut line_y = y;
        for span in &wrap.lines {
            if !span.is_empty() {
                self.draw_string(span.text(text), x, line_y, color)?;
            }
            line_y = line_y.saturating_add(LINE_HEIGHT);
        }
        Ok(())
    }

    /// Rendered width of a string in pixels
    pub fn measure_width(&self, text: &str) -> i32 {
        self.layout().measure_width(text)
    }

    /// Height in pixels of the string wrapped to `max_width`
    pub fn wrap_height(&self, text: &str, max_width: i32) -> i32 {
        self.layout().wrap_height(text, max_width)
    }

    /// Wrapped lines of a string
    pub fn wrap_text(&self, text: &str, max_width: i32) -> WrapResult {
        self.layout().wrap_text(text, max_width)
    }

    /// Layout engine for this font
    pub const fn layout(&self) -> TextLayout<'_> {
        TextLayout::new(self.atlas.metrics(), &self.characters)
    }

    /// Glyph advance widths
    pub const fn metrics(&self) -> &GlyphMetrics {
        self.atlas.metrics()
    }

    /// Font texture handle
    pub const fn texture(&self) -> TextureHandle {
        self.atlas.texture()
    }

    /// Allowed character set
    pub const fn characters(&self) -> &CharacterMap {
        &self.characters
    }

    /// Colour palette
    pub const fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// Precompiled commands
    pub const fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// The backend
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Tear down the renderer, returning the backend
    pub fn into_backend(self) -> B {
        self.backend
    }

    fn render_pass(&mut self, text: &str, x: i32, y: i32, color: u32, shadow: bool) -> FontResult<()> {
        if text.is_empty() {
            return Ok(());
        }

        let color = if shadow { argb::shadow(color) } else { color };
        let palette_offset = if shadow { SHADOW_OFFSET } else { 0 };

        let Self { backend, atlas, characters, batch, .. } = self;
        batch.clear();

        backend.bind_texture(atlas.texture()).map_err(backend_error)?;
        backend.set_color(argb::to_rgba(color)).map_err(backend_error)?;
        backend.push_transform(x as f32, y as f32).map_err(backend_error)?;

        let mut sink = |ids: &[CommandId]| backend.call_commands(ids).map_err(backend_error);
        let scanned = tokens(text)
            .filter_map(|spanned| match spanned.token {
                Token::Color(code) => Some(CommandId::color(usize::from(code) + palette_offset)),
                Token::Char(ch) => characters.glyph(ch).map(CommandId::glyph),
            })
            .try_for_each(|id| batch.push(id, &mut sink))
            .and_then(|()| batch.flush(&mut sink));

        // The transform is popped even when a batch failed
        batch.clear();
        let popped = backend.pop_transform().map_err(backend_error);
        scanned.and(popped)
    }
}

fn backend_error(e: Box<dyn std::error::Error>) -> FontError {
    FontError::Backend(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::{BackendCall, RecordingBackend};
    use crate::render::text::font_atlas::tests::{blank_bitmap, ink};
    use crate::assets::AssetError;
    use crate::config::ConfigError;
    use crate::foundation::math::Vec4;
    use approx::assert_relative_eq;

    /// Bitmap where every printable glyph has its rightmost ink in column 5
    /// (advance 7), except 'i' which is 1 pixel wide (advance 3)
    fn test_bitmap() -> ImageData {
        let mut image = blank_bitmap();
        for glyph in 33..=126u8 {
            ink(&mut image, glyph, 5, 0);
        }
        let (x, y) = crate::render::text::font_atlas::cell_origin(b'i');
        for col in 1..8 {
            image.set_pixel(x + col, y, [0, 0, 0, 0]);
        }
        ink(&mut image, b'i', 1, 2);
        image
    }

    fn renderer() -> TextRenderer<RecordingBackend> {
        TextRenderer::new(RecordingBackend::new(), &test_bitmap(), CharacterMap::default()).unwrap()
    }

    #[test]
    fn test_construction_registers_everything() {
        let text = renderer();
        assert_eq!(text.backend().textures().len(), 1);
        assert_eq!(text.backend().defined_commands(), 288);
        assert_eq!(text.metrics().advance(b'a'), 7);
        assert_eq!(text.metrics().advance(b'i'), 3);
        assert_eq!(text.metrics().advance(b' '), 4);
        assert!(text.backend().calls().is_empty());
    }

    #[test]
    fn test_bad_bitmap_fails_construction() {
        let small = ImageData::solid_color(16, 16, [0, 0, 0, 255]);
        let result = TextRenderer::new(RecordingBackend::new(), &small, CharacterMap::default());
        assert!(matches!(result, Err(FontError::InvalidBitmap { .. })));
    }

    #[test]
    fn test_missing_config_bitmap_fails() {
        let config = FontConfig::new("no/such/dir/default.png");
        let result = TextRenderer::from_config(&config, RecordingBackend::new());
        assert!(matches!(result, Err(FontError::Asset(_))));
    }

    #[test]
    fn test_draw_string_call_sequence() {
        let mut text = renderer();
        text.draw_string("Hi", 10, 20, 0xFF00_FF00).unwrap();

        let calls = text.backend().calls();
        assert_eq!(calls.len(), 5);
        assert_eq!(calls[0], BackendCall::BindTexture(text.texture()));
        assert_eq!(calls[1], BackendCall::SetColor(Vec4::new(0.0, 1.0, 0.0, 1.0)));
        assert_eq!(calls[2], BackendCall::PushTransform(10.0, 20.0));
        assert_eq!(
            calls[3],
            BackendCall::CallCommands(vec![CommandId::glyph(b'H'), CommandId::glyph(b'i')])
        );
        assert_eq!(calls[4], BackendCall::PopTransform);
    }

    #[test]
    fn test_glyph_positions_follow_advances() {
        let mut text = renderer();
        text.draw_string("aia", 0, 0, 0).unwrap();

        let xs: Vec<f32> = text.backend().drawn().iter().map(|g| g.x).collect();
        assert_eq!(xs, vec![0.0, 7.0, 10.0]);
        assert_eq!(text.measure_width("aia"), 17);
    }

    #[test]
    fn test_zero_alpha_is_opaque() {
        let mut text = renderer();
        text.draw_string("a", 0, 0, 0x0080_8080).unwrap();

        let color = text.backend().drawn()[0].color;
        assert_relative_eq!(color.x, 128.0 / 255.0);
        assert_relative_eq!(color.w, 1.0);
    }

    #[test]
    fn test_colour_code_switches_palette() {
        let mut text = renderer();
        text.draw_string("§cR§9b", 0, 0, 0xFFFFFF).unwrap();

        assert_eq!(
            text.backend().batches(),
            vec![&[
                CommandId::color(12),
                CommandId::glyph(b'R'),
                CommandId::color(9),
                CommandId::glyph(b'b'),
            ][..]]
        );
        let red = text.backend().drawn()[0].color;
        assert_relative_eq!(red.x, 1.0);
        assert_relative_eq!(red.y, 85.0 / 255.0);
    }

    #[test]
    fn test_invalid_code_draws_nothing() {
        let mut text = renderer();
        text.draw_string("§z", 0, 0, 0).unwrap();

        assert_eq!(text.backend().batches(), vec![&[CommandId::color(15)][..]]);
        assert!(text.backend().drawn().is_empty());
    }

    #[test]
    fn test_unmapped_characters_are_skipped() {
        let mut text = renderer();
        text.draw_string("a\u{20ac}`b§", 0, 0, 0).unwrap();

        assert_eq!(
            text.backend().batches(),
            vec![&[CommandId::glyph(b'a'), CommandId::glyph(b'b')][..]]
        );
    }

    #[test]
    fn test_empty_string_is_noop() {
        let mut text = renderer();
        text.draw_string("", 5, 5, 0).unwrap();
        text.draw_string_with_shadow("", 5, 5, 0).unwrap();

        assert!(text.backend().calls().is_empty());
        assert_eq!(text.measure_width(""), 0);
        assert_eq!(text.wrap_height("", 100), 8);
    }

    #[test]
    fn test_only_unmapped_sends_no_batch() {
        let mut text = renderer();
        text.draw_string("\u{20ac}", 0, 0, 0).unwrap();

        assert!(text.backend().batches().is_empty());
        assert_eq!(text.backend().calls().last(), Some(&BackendCall::PopTransform));
    }

    #[test]
    fn test_long_string_flushes_at_capacity() {
        let mut text = renderer();
        let long = "a".repeat(1025);
        text.draw_string(&long, 0, 0, 0).unwrap();

        let sizes: Vec<usize> = text.backend().batches().iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![1024, 1]);
        assert_eq!(text.backend().drawn().len(), 1025);
        assert_relative_eq!(text.backend().drawn()[1024].x, 1024.0 * 7.0);
    }

    #[test]
    fn test_colour_codes_count_toward_capacity() {
        let mut text = renderer();
        let mixed = "§a".repeat(600) + &"b".repeat(424);
        text.draw_string(&mixed, 0, 0, 0).unwrap();

        let sizes: Vec<usize> = text.backend().batches().iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![1024]);
    }

    #[test]
    fn test_shadow_pass_comes_first() {
        let mut text = renderer();
        text.draw_string_with_shadow("§eA", 3, 4, 0xFFFF_FFFF).unwrap();

        let batches = text.backend().batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0], &[CommandId::color(14 + 16), CommandId::glyph(b'A')]);
        assert_eq!(batches[1], &[CommandId::color(14), CommandId::glyph(b'A')]);

        let drawn = text.backend().drawn();
        assert_eq!((drawn[0].x, drawn[0].y), (4.0, 5.0));
        assert_eq!((drawn[1].x, drawn[1].y), (3.0, 4.0));
    }

    #[test]
    fn test_shadow_base_colour_is_darkened() {
        let mut text = renderer();
        text.draw_string_with_shadow("A", 0, 0, 0x80FF_FFFF).unwrap();

        let colors: Vec<Vec4> = text
            .backend()
            .calls()
            .iter()
            .filter_map(|call| match call {
                BackendCall::SetColor(c) => Some(*c),
                _ => None,
            })
            .collect();
        assert_eq!(colors.len(), 2);
        assert_relative_eq!(colors[0].x, 63.0 / 255.0);
        assert_relative_eq!(colors[0].w, 128.0 / 255.0);
        assert_relative_eq!(colors[1].x, 1.0);
    }

    #[test]
    fn test_draw_wrapped_lines() {
        let mut text = renderer();
        // a=7, space=4: "aa aa" is 32 px
        text.draw_wrapped("aa aa aa", 0, 10, 30, 0).unwrap();

        let rows: Vec<f32> = text.backend().drawn().iter().map(|g| g.y).collect();
        assert_eq!(rows, vec![10.0, 10.0, 18.0, 18.0, 26.0, 26.0]);
        assert_eq!(text.wrap_height("aa aa aa", 30), 24);
    }

    #[test]
    fn test_draw_wrapped_skips_blank_segments() {
        let mut text = renderer();
        text.draw_wrapped("   \naa", 0, 0, 20, 0).unwrap();

        // The blank first line still takes up a row
        let drawn = text.backend().drawn();
        assert_eq!(drawn.len(), 2);
        assert_relative_eq!(drawn[0].y, 8.0);
        assert_eq!(text.backend().batches().len(), 1);
    }

    #[test]
    fn test_escape_pair_does_not_change_width() {
        let text = renderer();
        assert_eq!(text.measure_width("§aHello"), text.measure_width("Hello"));
    }

    #[test]
    fn test_shadow_at_coordinate_limit() {
        let mut text = renderer();
        text.draw_string_with_shadow("a", i32::MAX, i32::MAX, 0).unwrap();

        let drawn = text.backend().drawn();
        assert_eq!(drawn.len(), 2);
        assert_eq!(drawn[0].x, drawn[1].x);
    }

    #[test]
    fn test_draw_wrapped_near_coordinate_limit() {
        let mut text = renderer();
        text.draw_wrapped("aa aa", 0, i32::MAX - 4, 10, 0).unwrap();

        assert_eq!(text.backend().drawn().len(), 4);
    }

    /// Backend whose first `call_commands` fails
    struct FailingOnce {
        inner: RecordingBackend,
        failed: bool,
    }

    impl TextRenderBackend for FailingOnce {
        fn upload_texture(&mut self, image: &ImageData) -> Result<TextureHandle, Box<dyn std::error::Error>> {
            self.inner.upload_texture(image)
        }

        fn define_command(
            &mut self,
            id: CommandId,
            command: &crate::render::text::PrecompiledCommand,
        ) -> Result<(), Box<dyn std::error::Error>> {
            self.inner.define_command(id, command)
        }

        fn bind_texture(&mut self, texture: TextureHandle) -> Result<(), Box<dyn std::error::Error>> {
            self.inner.bind_texture(texture)
        }

        fn set_color(&mut self, color: Vec4) -> Result<(), Box<dyn std::error::Error>> {
            self.inner.set_color(color)
        }

        fn push_transform(&mut self, x: f32, y: f32) -> Result<(), Box<dyn std::error::Error>> {
            self.inner.push_transform(x, y)
        }

        fn pop_transform(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            self.inner.pop_transform()
        }

        fn call_commands(&mut self, commands: &[CommandId]) -> Result<(), Box<dyn std::error::Error>> {
            if !self.failed {
                self.failed = true;
                return Err("device lost".into());
            }
            self.inner.call_commands(commands)
        }
    }

    #[test]
    fn test_failed_batch_restores_transform() {
        let backend = FailingOnce { inner: RecordingBackend::new(), failed: false };
        let mut text = TextRenderer::new(backend, &test_bitmap(), CharacterMap::default()).unwrap();

        let result = text.draw_string("ab", 100, 100, 0);
        assert!(matches!(result, Err(FontError::Backend(_))));
        assert_eq!(text.backend().inner.transform_depth(), 0);
        assert_eq!(text.backend().inner.calls().last(), Some(&BackendCall::PopTransform));

        text.draw_string("ab", 0, 0, 0).unwrap();
        let drawn = text.backend().inner.drawn();
        assert_eq!(drawn.len(), 2);
        assert_eq!((drawn[0].x, drawn[0].y), (0.0, 0.0));
        assert_eq!(text.backend().inner.transform_depth(), 0);
    }

    #[test]
    fn test_from_config_file() {
        let dir = std::env::temp_dir().join(format!("bitmap_text_renderer_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let chars = dir.join("font.txt");
        std::fs::write(&chars, "# digits only\n0123456789\n").unwrap();
        let config_path = dir.join("font.toml");
        FontConfig::new(dir.join("missing.png").to_string_lossy())
            .with_allowed_characters(chars.to_string_lossy())
            .save_to_file(&config_path)
            .unwrap();

        let result = TextRenderer::from_config_file(&config_path, RecordingBackend::new());
        assert!(matches!(result, Err(FontError::Asset(AssetError::NotFound(_)))));

        let result = TextRenderer::from_config_file(dir.join("absent.toml"), RecordingBackend::new());
        assert!(matches!(result, Err(FontError::Config(ConfigError::Io(_)))));

        let result = TextRenderer::from_config_file(dir.join("font.json"), RecordingBackend::new());
        assert!(matches!(result, Err(FontError::Config(ConfigError::UnsupportedFormat(_)))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_borrowed_backend() {
        let mut backend = RecordingBackend::new();
        {
            let mut text = TextRenderer::new(&mut backend, &test_bitmap(), CharacterMap::default()).unwrap();
            text.draw_string("ok", 0, 0, 0).unwrap();
        }
        assert_eq!(backend.drawn().len(), 2);
    }
}
