//! The authoritative extraction pipeline.
//!
//! Maps the centered crop frame back into source-image pixels using the
//! same `(DisplaySize, TransformState)` pair the preview showed, then
//! rasterizes that region into a fixed-size output canvas. The preview
//! is presentational; this module is what actually determines the
//! output, so its coordinate inversion must mirror the preview placement
//! step for step.
//!
//! Pipeline order (fixed, to guarantee preview/output parity):
//! scale the display footprint by zoom, derive the image's viewport
//! offset, convert viewport pixels to source pixels, locate the frame,
//! build the sampling rect, then draw from the *original* source pixels
//! into the output canvas so display zoom never costs fidelity.

use thiserror::Error;

use crate::decode::SourceImage;
use crate::encode::{encode_output, EncodeError, OutputFormat};
use crate::geometry::{CropFrame, DisplaySize, Rect, Viewport};
use crate::transform::TransformState;
use crate::{CropShape, CropSpec};

/// Errors surfaced by the extraction pipeline.
#[derive(Debug, Error)]
pub enum CropError {
    /// Extraction was invoked before the source image finished decoding.
    /// A programmer error: UI state should prevent this.
    #[error("Source image has not been loaded")]
    ImageNotLoaded,

    /// The crop spec is misconfigured; fatal to the session.
    #[error("Invalid crop spec: {0}")]
    InvalidCropSpec(String),

    /// Output serialization failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// The sampling rectangle in source-image pixel coordinates.
///
/// May extend outside the source image when the user has panned or
/// zoomed the frame past an edge; [`RasterTarget`] resolves those
/// samples to transparent black.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingRect(pub Rect);

impl SamplingRect {
    /// Invert the preview placement to find where the frame lands on
    /// the source image.
    ///
    /// Steps 1-6 of the pipeline, in order: zoomed footprint, image
    /// offset in the viewport, viewport-to-source scale factors, frame
    /// origin, frame relative to the image, scale into source pixels.
    pub fn compute(
        source: &SourceImage,
        viewport: Viewport,
        display: DisplaySize,
        transform: TransformState,
        frame: CropFrame,
    ) -> Self {
        let scaled_w = display.width * transform.zoom;
        let scaled_h = display.height * transform.zoom;

        let offset_x = viewport.width / 2.0 - scaled_w / 2.0 + transform.pan_x;
        let offset_y = viewport.height / 2.0 - scaled_h / 2.0 + transform.pan_y;

        let scale_x = source.width as f64 / scaled_w;
        let scale_y = source.height as f64 / scaled_h;

        let (frame_x, frame_y) = frame.origin(viewport);

        let in_viewport = Rect::new(
            frame_x - offset_x,
            frame_y - offset_y,
            frame.width,
            frame.height,
        );

        Self(in_viewport.scaled(scale_x, scale_y))
    }
}

/// A drawable surface the engine renders into.
///
/// Extraction draws through this seam into [`RasterTarget`]; a host's
/// preview layer can implement the same trait over its own canvas and
/// drive it from [`crate::PreviewTransform::matrix`].
pub trait RenderTarget {
    /// Output dimensions in pixels.
    fn size(&self) -> (u32, u32);

    /// Clip all subsequent drawing to the inscribed circle of the
    /// target's bounds.
    fn clip_circle(&mut self);

    /// Draw `src` (in source-image pixel coordinates, possibly
    /// out of bounds) from `source` into the full target bounds,
    /// scaling as needed.
    fn draw_image_region(&mut self, source: &SourceImage, src: Rect);
}

/// Pixel-backed render target used by extraction.
///
/// Starts fully transparent. Drawing resamples the source bilinearly;
/// any tap outside the source image contributes transparent black, so
/// an aggressive pan fills the uncovered area with transparency (JPEG
/// encoding later flattens that to black, the same observable result as
/// a 2D canvas exporting `image/jpeg`).
#[derive(Debug, Clone)]
pub struct RasterTarget {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    circle_clip: bool,
}

impl RasterTarget {
    /// Allocate a transparent target of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; (width as usize) * (height as usize) * 4],
            circle_clip: false,
        }
    }

    /// The RGBA pixel buffer, row-major, 4 bytes per pixel.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the target, returning its pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Whether an output pixel survives the circular clip.
    #[inline]
    fn in_clip(&self, x: u32, y: u32) -> bool {
        if !self.circle_clip {
            return true;
        }
        let cx = self.width as f64 / 2.0;
        let cy = self.height as f64 / 2.0;
        let radius = self.width.min(self.height) as f64 / 2.0;
        let dx = (x as f64 + 0.5) - cx;
        let dy = (y as f64 + 0.5) - cy;
        dx * dx + dy * dy <= radius * radius
    }

    /// Bilinear tap at source coordinates; out-of-bounds taps are
    /// transparent black.
    fn sample(source: &SourceImage, sx: f64, sy: f64) -> [f64; 4] {
        let x0 = sx.floor();
        let y0 = sy.floor();
        let fx = sx - x0;
        let fy = sy - y0;

        let mut acc = [0.0f64; 4];
        for (dy, wy) in [(0.0, 1.0 - fy), (1.0, fy)] {
            for (dx, wx) in [(0.0, 1.0 - fx), (1.0, fx)] {
                let weight = wx * wy;
                if weight == 0.0 {
                    continue;
                }
                let px = x0 + dx;
                let py = y0 + dy;
                if px < 0.0
                    || py < 0.0
                    || px >= source.width as f64
                    || py >= source.height as f64
                {
                    continue; // transparent black tap
                }
                let rgba = source.pixel(px as u32, py as u32);
                for c in 0..4 {
                    acc[c] += rgba[c] as f64 * weight;
                }
            }
        }
        acc
    }
}

impl RenderTarget for RasterTarget {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clip_circle(&mut self) {
        self.circle_clip = true;
    }

    fn draw_image_region(&mut self, source: &SourceImage, src: Rect) {
        let out_w = self.width as f64;
        let out_h = self.height as f64;

        for oy in 0..self.height {
            for ox in 0..self.width {
                if !self.in_clip(ox, oy) {
                    continue;
                }

                // Map the output pixel center back into the sampling rect
                let sx = src.x + (ox as f64 + 0.5) * src.width / out_w - 0.5;
                let sy = src.y + (oy as f64 + 0.5) * src.height / out_h - 0.5;

                let rgba = Self::sample(source, sx, sy);
                let idx = ((oy as usize) * (self.width as usize) + ox as usize) * 4;
                for c in 0..4 {
                    self.pixels[idx + c] = rgba[c].round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }
}

/// Rasterize the current crop into an output target, without encoding.
///
/// Steps 7-9 of the pipeline: allocate the output raster, apply the
/// circular clip for circle specs, draw the sampling rect from the
/// original source pixels. Exposed separately from [`extract`] so tests
/// can assert on geometry and pixels before encoder nondeterminism.
pub fn rasterize(
    source: &SourceImage,
    viewport: Viewport,
    display: DisplaySize,
    transform: TransformState,
    frame: CropFrame,
    spec: &CropSpec,
) -> Result<RasterTarget, CropError> {
    spec.validate()?;

    let sampling = SamplingRect::compute(source, viewport, display, transform, frame);

    let (out_w, out_h) = spec.output_size();
    let mut target = RasterTarget::new(out_w, out_h);

    if spec.shape == CropShape::Circle {
        target.clip_circle();
    }

    target.draw_image_region(source, sampling.0);

    Ok(target)
}

/// Run the full extraction pipeline and serialize the result.
///
/// Pure, synchronous and idempotent: the same inputs produce identical
/// sampling geometry and pixels (encoded bytes can differ only through
/// encoder nondeterminism). No partial output is returned on failure.
pub fn extract(
    source: &SourceImage,
    viewport: Viewport,
    display: DisplaySize,
    transform: TransformState,
    frame: CropFrame,
    spec: &CropSpec,
    format: OutputFormat,
) -> Result<Vec<u8>, CropError> {
    let target = rasterize(source, viewport, display, transform, frame, spec)?;
    let (width, height) = target.size();
    let bytes = encode_output(target.pixels(), width, height, format)?;
    Ok(bytes)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
