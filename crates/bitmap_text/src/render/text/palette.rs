//! Text colour palette
//!
//! Sixteen colour-code colours plus a darkened copy of each for drop
//! shadows. The values come from a fixed bit expansion of the code, so the
//! table is computed rather than stored.

use crate::foundation::math::Vec3;

/// Number of colour codes (`0`-`f`)
pub const COLOR_CODES: usize = 16;

/// Palette entries: normal colours followed by their shadow variants
pub const PALETTE_SIZE: usize = COLOR_CODES * 2;

/// Offset from a colour entry to its shadow entry
pub const SHADOW_OFFSET: usize = COLOR_CODES;

/// Code whose red channel is boosted (gold)
const GOLD_CODE: usize = 6;

/// RGB values for colour codes and their shadows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPalette {
    entries: [[u8; 3]; PALETTE_SIZE],
}

impl ColorPalette {
    /// Compute all 32 palette entries
    pub fn build() -> Self {
        let mut entries = [[0; 3]; PALETTE_SIZE];
        for (index, entry) in entries.iter_mut().enumerate() {
            *entry = if index < COLOR_CODES {
                let [mut r, g, b] = generic_rgb(index);
                if index == GOLD_CODE {
                    r += 85;
                }
                [r, g, b]
            } else {
                generic_rgb(index - SHADOW_OFFSET).map(|channel| channel / 4)
            };
        }

        log::debug!("Built {} entry text palette", PALETTE_SIZE);
        Self { entries }
    }

    /// 8-bit RGB of a palette entry
    ///
    /// # Panics
    ///
    /// Panics if `index >= PALETTE_SIZE`.
    pub const fn rgb(&self, index: usize) -> [u8; 3] {
        self.entries[index]
    }

    /// Palette entry normalized to 0.0-1.0
    pub fn normalized(&self, index: usize) -> Vec3 {
        let [r, g, b] = self.rgb(index);
        Vec3::new(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
    }

    /// Iterate over all entries in palette order
    pub fn iter(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.entries.iter().copied()
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::build()
    }
}

/// Bit-expanded colour for a code in `0..16`, before the gold adjustment
///
/// Bit 3 adds 85 to every channel; bits 2, 1 and 0 add 170 to red, green and
/// blue respectively.
pub const fn generic_rgb(code: usize) -> [u8; 3] {
    let base = ((code >> 3) & 1) * 85;
    let r = ((code >> 2) & 1) * 170 + base;
    let g = ((code >> 1) & 1) * 170 + base;
    let b = (code & 1) * 170 + base;
    [r as u8, g as u8, b as u8]
}
