//! Text layout engine
//!
//! Width measurement and greedy word wrapping for bitmap text. UI code
//! positions itself from these numbers, so the rules here are exact:
//! colour codes have no width, characters the font cannot draw have no
//! width, and a line only breaks at a space unless a single word is wider
//! than the whole line.

use super::character_map::CharacterMap;
use super::font_atlas::GlyphMetrics;
use super::formatting::{tokens, Spanned, Token, FORMAT_MARKER};

/// Height of one line of text in pixels
pub const LINE_HEIGHT: i32 = 8;

/// Byte range of one wrapped line in the source string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive), trailing spaces removed
    pub end: usize,
}

impl LineSpan {
    /// The line's text
    ///
    /// # Panics
    ///
    /// Panics if `source` is not the string the span was produced from.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Whether the line has no characters left after trimming
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Outcome of wrapping a string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrapResult {
    /// Lines in display order; a line may be empty if it held only spaces
    pub lines: Vec<LineSpan>,
    /// Total height in pixels, never less than [`LINE_HEIGHT`]
    pub height: i32,
}

/// Layout queries over a font's metrics and character set
#[derive(Debug, Clone, Copy)]
pub struct TextLayout<'a> {
    metrics: &'a GlyphMetrics,
    characters: &'a CharacterMap,
}

impl<'a> TextLayout<'a> {
    /// Create a layout engine for a font
    pub const fn new(metrics: &'a GlyphMetrics, characters: &'a CharacterMap) -> Self {
        Self { metrics, characters }
    }

    /// Advance of one character; zero if the font cannot draw it
    pub fn char_width(&self, ch: char) -> i32 {
        self.characters
            .glyph(ch)
            .map_or(0, |glyph| self.metrics.advance(glyph))
    }

    /// Rendered width of a string in pixels
    pub fn measure_width(&self, text: &str) -> i32 {
        tokens(text)
            .filter_map(|spanned| match spanned.token {
                Token::Char(ch) if ch != FORMAT_MARKER => Some(self.char_width(ch)),
                _ => None,
            })
            .sum()
    }

    /// Byte length of the longest prefix that fits in `max_width`
    ///
    /// When the text overflows, the cut is made at the last space seen (if
    /// it is not the first character), otherwise right before the character
    /// that overflowed. At least one character is always returned so callers
    /// make progress on a word wider than the line.
    pub fn fit_length(&self, text: &str, max_width: i32) -> usize {
        let mut width = 0;
        let mut last_space = 0;

        for Spanned { offset, token } in tokens(text) {
            let Token::Char(ch) = token else { continue };
            if ch == FORMAT_MARKER {
                continue;
            }
            if ch == ' ' {
                last_space = offset;
            }

            width += self.char_width(ch);
            if width > max_width {
                return if last_space > 0 {
                    last_space
                } else if offset > 0 {
                    offset
                } else {
                    ch.len_utf8()
                };
            }
        }
        text.len()
    }

    /// Split text into lines no wider than `max_width`
    ///
    /// Explicit newlines always break. Within a line, segments are cut with
    /// [`fit_length`](Self::fit_length), trailing spaces are dropped from each
    /// segment and leading spaces are skipped before the next one.
    pub fn wrap_text(&self, text: &str, max_width: i32) -> WrapResult {
        let mut result = WrapResult::default();

        let mut line_start = 0;
        for line in text.split('\n') {
            let mut pos = 0;
            while pos < line.len() {
                let rest = &line[pos..];
                let fit = self.fit_length(rest, max_width).min(rest.len());
                let segment = rest[..fit].trim_end_matches(' ');

                if !segment.is_empty() || fit > 0 {
                    let start = line_start + pos;
                    result.lines.push(LineSpan { start, end: start + segment.len() });
                    result.height += LINE_HEIGHT;
                }

                pos += fit;
                pos += line[pos..].len() - line[pos..].trim_start_matches(' ').len();
            }
            line_start += line.len() + 1;
        }

        result.height = result.height.max(LINE_HEIGHT);
        result
    }

    /// Height in pixels of the wrapped text
    pub fn wrap_height(&self, text: &str, max_width: i32) -> i32 {
        self.wrap_text(text, max_width).height
    }
}
