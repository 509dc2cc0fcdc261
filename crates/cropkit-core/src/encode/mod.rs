//! Output serialization for extracted crops.
//!
//! The extraction pipeline ends with RGBA pixels; this module turns them
//! into a portable byte stream. JPEG is the default (what the original
//! avatar/background flow stored), PNG is the alpha-preserving option
//! for circular crops.

mod jpeg;
mod png;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default JPEG quality for crop output.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Errors that can occur during output encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("Image encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output serialization format for the extracted crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// JPEG with the given quality (1-100). Alpha is flattened onto
    /// black, matching a 2D canvas exporting `image/jpeg`.
    Jpeg { quality: u8 },
    /// PNG, preserving the alpha channel (transparent corners of a
    /// circular crop stay transparent).
    Png,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Encode RGBA pixels in the requested format.
pub fn encode_output(
    pixels: &[u8],
    width: u32,
    height: u32,
    format: OutputFormat,
) -> Result<Vec<u8>, EncodeError> {
    match format {
        OutputFormat::Jpeg { quality } => encode_jpeg(pixels, width, height, quality),
        OutputFormat::Png => encode_png(pixels, width, height),
    }
}

pub(crate) fn validate(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    let expected = (width as usize) * (height as usize) * 4;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}
