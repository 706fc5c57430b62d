//! Math utilities and types
//!
//! Vector aliases shared by the atlas (UV coordinates) and the palette
//! (normalized colours), plus packed ARGB colour helpers.

pub use nalgebra::{Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type (RGB colours)
pub type Vec3 = Vector3<f32>;

/// 4D vector type (RGBA colours)
pub type Vec4 = Vector4<f32>;

/// Packed colour helpers for `0xAARRGGBB` values
pub mod argb {
    use super::Vec4;

    /// Convert a packed `0xAARRGGBB` colour to normalized RGBA
    ///
    /// An alpha byte of zero is read as fully opaque, so callers may pass
    /// plain `0xRRGGBB` values.
    pub fn to_rgba(color: u32) -> Vec4 {
        let channel = |shift: u32| ((color >> shift) & 0xFF) as f32 / 255.0;
        let mut alpha = channel(24);
        if alpha == 0.0 {
            alpha = 1.0;
        }
        Vec4::new(channel(16), channel(8), channel(0), alpha)
    }

    /// Darken a packed colour for drop shadows
    ///
    /// Each RGB channel loses its two low bits and is divided by four.
    /// Alpha is kept as-is.
    pub const fn shadow(color: u32) -> u32 {
        ((color & 0x00FC_FCFC) >> 2) | (color & 0xFF00_0000)
    }
}
