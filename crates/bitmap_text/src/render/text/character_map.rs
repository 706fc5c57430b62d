//! Allowed character set
//!
//! Maps renderable characters to atlas glyphs by their position in an
//! ordered list. The first 32 atlas cells hold control glyphs, so the
//! character at position `p` is drawn with glyph `p + 32`.

use std::collections::HashMap;
use std::path::Path;

use crate::assets::AssetError;

/// Atlas index of the first allowed character
pub const FIRST_GLYPH: usize = 32;

/// Built-in character list: printable ASCII (with `'` repeated where the
/// backtick would be) followed by the code page 437 accented letters
pub const DEFAULT_CHARACTERS: &str = concat!(
    " !\"#$%&'()*+,-./0123456789:;<=>?",
    "@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_",
    "'abcdefghijklmnopqrstuvwxyz{|}~\u{2302}",
    "ÇüéâäàåçêëèïîìÄÅÉæÆôöòûùÿÖÜø£Ø×ƒ",
    "áíóúñÑªº¿®¬½¼¡«»",
);

/// Ordered set of characters the font can draw
#[derive(Debug, Clone)]
pub struct CharacterMap {
    characters: Vec<char>,
    glyphs: HashMap<char, u8>,
}

impl CharacterMap {
    /// Build a map from an ordered character list
    ///
    /// When a character appears twice the first position wins. Characters
    /// that would land past the last atlas glyph are dropped.
    pub fn new(characters: &str) -> Self {
        let characters: Vec<char> = characters.chars().collect();
        let mut glyphs = HashMap::with_capacity(characters.len());

        for (position, &ch) in characters.iter().enumerate() {
            let Ok(glyph) = u8::try_from(position + FIRST_GLYPH) else {
                log::warn!(
                    "Character list has {} entries; only the first {} fit the atlas",
                    characters.len(),
                    256 - FIRST_GLYPH
                );
                break;
            };
            glyphs.entry(ch).or_insert(glyph);
        }

        Self { characters, glyphs }
    }

    /// Parse a `font.txt` style list: lines starting with `#` are comments,
    /// every other line is appended in order
    pub fn parse(contents: &str) -> Self {
        let list: String = contents
            .lines()
            .filter(|line| !line.starts_with('#'))
            .collect();
        Self::new(&list)
    }

    /// Load a character list file; a file with no characters is rejected
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path_ref = path.as_ref();
        let contents = std::fs::read_to_string(path_ref).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AssetError::NotFound(path_ref.display().to_string()),
            _ => AssetError::LoadFailed(format!("Failed to read {:?}: {}", path_ref, e)),
        })?;

        let map = Self::parse(&contents);
        if map.is_empty() {
            return Err(AssetError::InvalidData(format!("{:?} lists no characters", path_ref)));
        }
        log::info!("Loaded {} allowed characters from {:?}", map.len(), path_ref);
        Ok(map)
    }

    /// Atlas glyph for a character, if it can be drawn
    pub fn glyph(&self, ch: char) -> Option<u8> {
        self.glyphs.get(&ch).copied()
    }

    /// Whether the character can be drawn
    pub fn contains(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    /// Number of characters in the list, duplicates included
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// The ordered character list
    pub fn characters(&self) -> &[char] {
        &self.characters
    }
}

impl Default for CharacterMap {
    fn default() -> Self {
        Self::new(DEFAULT_CHARACTERS)
    }
}
