//! Inline colour codes
//!
//! A section sign followed by one character switches the draw colour:
//! `§0`-`§9` and `§a`-`§f` (either case) select palette entries 0-15, any
//! other follower selects 15 (white). The pair itself is never drawn.

/// Character that introduces a colour code
pub const FORMAT_MARKER: char = '\u{a7}';

/// Colour code characters in palette order
pub const CODE_CHARACTERS: &str = "0123456789abcdef";

/// Colour used for unrecognized codes
pub const DEFAULT_CODE: u8 = 15;

/// Palette index for the character following a [`FORMAT_MARKER`]
pub fn color_code(ch: char) -> u8 {
    ch.to_digit(16).map_or(DEFAULT_CODE, |digit| digit as u8)
}

/// One unit of formatted text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Colour change to a palette index in `0..16`
    Color(u8),
    /// Character to draw (if the font has it)
    Char(char),
}

/// Token plus the byte offset where it starts in the source string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spanned {
    /// Byte offset of the token's first character
    pub offset: usize,
    /// The token
    pub token: Token,
}

/// Iterator splitting a string into colour codes and characters
///
/// A marker with nothing after it is yielded as a plain character.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    chars: std::str::CharIndices<'a>,
}

/// Tokenize formatted text
pub fn tokens(text: &str) -> Tokens<'_> {
    Tokens {
        chars: text.char_indices(),
    }
}

impl Iterator for Tokens<'_> {
    type Item = Spanned;

    fn next(&mut self) -> Option<Spanned> {
        let (offset, ch) = self.chars.next()?;

        if ch == FORMAT_MARKER {
            if let Some((_, code)) = self.chars.next() {
                return Some(Spanned { offset, token: Token::Color(color_code(code)) });
            }
        }
        Some(Spanned { offset, token: Token::Char(ch) })
    }
}
