//! Asset loading
//!
//! Only images are loaded here; the font bitmap is the single asset the text
//! renderer needs.

pub mod image_loader;

pub use image_loader::ImageData;

use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),
    
    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),
    
    /// Invalid asset data
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
