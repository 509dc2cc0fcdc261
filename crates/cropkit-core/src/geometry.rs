//! Viewport geometry: cover-fit sizing and the crop guide frame.
//!
//! Three coordinate spaces meet here. Source space is the image's
//! intrinsic pixels. Display space is the image as rendered inside the
//! viewport under cover-fit. Output space is the fixed-size canvas the
//! extraction pipeline draws into. This module owns the first hop:
//! source dimensions plus a viewport snapshot give a display size, and a
//! viewport plus a [`CropSpec`] give the centered guide frame.

use serde::{Deserialize, Serialize};

use crate::{CropShape, CropSpec};

/// Fraction of the limiting viewport dimension occupied by the guide frame.
pub const FRAME_FRACTION: f64 = 0.8;

/// The container's rendered size at crop time, in viewport pixels.
///
/// A read-only snapshot, taken when the image finishes decoding and on
/// container resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Container width in pixels.
    pub width: f64,
    /// Container height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport snapshot.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width-to-height ratio.
    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// The rendered size of the image within the viewport under cover-fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaySize {
    /// Rendered width in viewport pixels.
    pub width: f64,
    /// Rendered height in viewport pixels.
    pub height: f64,
}

impl DisplaySize {
    /// Compute the cover-fit display size for an image inside a viewport.
    ///
    /// Cover-fit (not contain-fit): the image is scaled so it fully
    /// covers the viewport, centered, overflowing on at most one axis.
    /// A relatively-wider image is height-bound and overflows
    /// horizontally; otherwise the image is width-bound and overflows
    /// vertically (or matches exactly).
    ///
    /// Guarantees `width >= vw && height >= vh`, so panning at zoom 1
    /// can still reveal different parts of the overflowing axis.
    pub fn cover_fit(image_width: u32, image_height: u32, viewport: Viewport) -> Self {
        let img_aspect = image_width as f64 / image_height as f64;

        if img_aspect > viewport.aspect() {
            let height = viewport.height;
            Self {
                width: height * img_aspect,
                height,
            }
        } else {
            let width = viewport.width;
            Self {
                width,
                height: width / img_aspect,
            }
        }
    }
}

/// The on-screen crop guide's size, always centered in the viewport.
///
/// The frame never moves; the user moves the image underneath it via
/// pan and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropFrame {
    /// Guide width in viewport pixels.
    pub width: f64,
    /// Guide height in viewport pixels.
    pub height: f64,
}

impl CropFrame {
    /// Compute the guide frame for a viewport and crop spec.
    ///
    /// Circle: a square sized to 80% of the limiting viewport dimension.
    /// Rect: the largest box within 80% x 80% of the viewport that
    /// matches the spec's aspect ratio.
    pub fn compute(viewport: Viewport, spec: &CropSpec) -> Self {
        match spec.shape {
            CropShape::Circle => {
                let side = viewport.width.min(viewport.height) * FRAME_FRACTION;
                Self {
                    width: side,
                    height: side,
                }
            }
            CropShape::Rect => {
                let max_w = viewport.width * FRAME_FRACTION;
                let max_h = viewport.height * FRAME_FRACTION;
                if max_w / max_h > spec.aspect_ratio {
                    // Box is relatively wider than the target: height-bound
                    let height = max_h;
                    Self {
                        width: height * spec.aspect_ratio,
                        height,
                    }
                } else {
                    let width = max_w;
                    Self {
                        width,
                        height: width / spec.aspect_ratio,
                    }
                }
            }
        }
    }

    /// Top-left of the centered frame in viewport coordinates.
    pub fn origin(&self, viewport: Viewport) -> (f64, f64) {
        (
            (viewport.width - self.width) / 2.0,
            (viewport.height - self.height) / 2.0,
        )
    }
}

/// An axis-aligned rectangle in f64 coordinates.
///
/// Used for the sampling region handed from the coordinate inversion to
/// the rasterizer; may extend outside the source image when the user has
/// panned aggressively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Scale position and size componentwise.
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self {
            x: self.x * sx,
            y: self.y * sy,
            width: self.width * sx,
            height: self.height * sy,
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
