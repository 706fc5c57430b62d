//! Rendering
//!
//! The text system and the backend interface it draws through.

pub mod backend;
pub mod text;

pub use backend::{RecordingBackend, TextRenderBackend, TextureHandle};
pub use text::{FontError, FontResult, TextRenderer};
