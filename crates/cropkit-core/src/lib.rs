//! Cropkit Core - Interactive image-cropping engine
//!
//! This crate implements the cropping engine behind avatar and
//! background pickers: load a raster image, pan and zoom it inside a
//! fixed viewport, show a centered crop guide (circle or rectangle),
//! and deterministically rasterize the framed region into a fixed-size
//! output image.
//!
//! Three coordinate spaces are kept consistent: source-image pixels,
//! cover-fit display space, and the output canvas. The same
//! `(DisplaySize, TransformState)` pair drives both the live preview
//! and the authoritative extraction, so the output always matches what
//! was shown.

pub mod decode;
pub mod encode;
pub mod extract;
pub mod geometry;
pub mod preview;
pub mod session;
pub mod transform;

pub use decode::{decode_image, DecodeError, SourceImage};
pub use encode::{EncodeError, OutputFormat, DEFAULT_JPEG_QUALITY};
pub use extract::{extract, rasterize, CropError, RasterTarget, RenderTarget, SamplingRect};
pub use geometry::{CropFrame, DisplaySize, Rect, Viewport, FRAME_FRACTION};
pub use preview::PreviewTransform;
pub use session::{CropSession, ImageStore, MemoryStore};
pub use transform::{Input, InputState, TransformState, ZOOM_MAX, ZOOM_MIN};

/// Side length of the fixed square output for circular crops, in pixels.
pub const CIRCLE_OUTPUT_SIZE: u32 = 200;

/// The crop guide's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CropShape {
    /// Circular guide and circularly clipped square output (avatars).
    Circle,
    /// Rectangular guide with a caller-chosen aspect ratio (backgrounds).
    Rect,
}

/// Caller-supplied crop configuration, immutable for the session.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropSpec {
    /// Guide shape.
    pub shape: CropShape,
    /// Width/height ratio of the guide. Only meaningful for `Rect`;
    /// circles are always 1:1.
    pub aspect_ratio: f64,
    /// Output raster width in pixels (rect only).
    pub output_width: u32,
    /// Output raster height in pixels (rect only).
    pub output_height: u32,
}

impl CropSpec {
    /// Circular crop with the fixed 200x200 output.
    pub fn circle() -> Self {
        Self {
            shape: CropShape::Circle,
            aspect_ratio: 1.0,
            output_width: CIRCLE_OUTPUT_SIZE,
            output_height: CIRCLE_OUTPUT_SIZE,
        }
    }

    /// Rectangular crop with the given aspect ratio and output size.
    pub fn rect(aspect_ratio: f64, output_width: u32, output_height: u32) -> Self {
        Self {
            shape: CropShape::Rect,
            aspect_ratio,
            output_width,
            output_height,
        }
    }

    /// Check the spec for misconfiguration.
    ///
    /// Rect specs need a positive, finite aspect ratio and non-zero
    /// output dimensions. Circle specs are always valid by
    /// construction but are checked the same way in case a caller built
    /// one by hand.
    pub fn validate(&self) -> Result<(), CropError> {
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(CropError::InvalidCropSpec(format!(
                "aspect ratio must be positive and finite, got {}",
                self.aspect_ratio
            )));
        }
        if self.output_width == 0 || self.output_height == 0 {
            return Err(CropError::InvalidCropSpec(format!(
                "output dimensions must be non-zero, got {}x{}",
                self.output_width, self.output_height
            )));
        }
        Ok(())
    }

    /// The output raster's dimensions.
    pub fn output_size(&self) -> (u32, u32) {
        match self.shape {
            CropShape::Circle => (CIRCLE_OUTPUT_SIZE, CIRCLE_OUTPUT_SIZE),
            CropShape::Rect => (self.output_width, self.output_height),
        }
    }
}
