//! Live preview transform for on-screen feedback.
//!
//! Purely presentational: this never touches pixel data, has no error
//! conditions, and is not authoritative for extraction. It exists so a
//! host can place the display-sized image with a single affine instead
//! of re-deriving the arithmetic, and so tests can assert that preview
//! and extraction agree on where the image sits.

use serde::{Deserialize, Serialize};

use crate::geometry::{DisplaySize, Viewport};
use crate::transform::TransformState;

/// The affine placing the display-sized image inside the viewport.
///
/// Composition order, matching what the user sees: center the image in
/// the viewport, then `translate(pan) scale(zoom)` about that center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewTransform {
    /// Total horizontal translation of the image center, in viewport
    /// pixels from the viewport's own center.
    pub translate_x: f64,
    /// Total vertical translation of the image center.
    pub translate_y: f64,
    /// Uniform scale about the image center.
    pub scale: f64,
}

impl PreviewTransform {
    /// Compose display size and transform state into the preview affine.
    pub fn compute(transform: TransformState) -> Self {
        Self {
            translate_x: transform.pan_x,
            translate_y: transform.pan_y,
            scale: transform.zoom,
        }
    }

    /// Top-left corner of the scaled, panned image in viewport
    /// coordinates.
    ///
    /// This is the same `offset` the extraction pipeline computes in its
    /// step 2; exposing it here lets tests pin preview/extraction parity.
    pub fn image_origin(&self, viewport: Viewport, display: DisplaySize) -> (f64, f64) {
        let scaled_w = display.width * self.scale;
        let scaled_h = display.height * self.scale;
        (
            viewport.width / 2.0 - scaled_w / 2.0 + self.translate_x,
            viewport.height / 2.0 - scaled_h / 2.0 + self.translate_y,
        )
    }

    /// Row-major 2x3 affine `[a, b, c, d, e, f]` mapping display-space
    /// points to viewport space, for canvas-style consumers:
    /// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
    pub fn matrix(&self, viewport: Viewport, display: DisplaySize) -> [f64; 6] {
        let (origin_x, origin_y) = self.image_origin(viewport, display);
        [self.scale, 0.0, 0.0, self.scale, origin_x, origin_y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transform_centers_image() {
        let preview = PreviewTransform::compute(TransformState::new());
        let (x, y) = preview.image_origin(
            Viewport::new(600.0, 600.0),
            DisplaySize {
                width: 800.0,
                height: 600.0,
            },
        );

        // 800x600 image centered in a 600x600 viewport
        assert!((x - -100.0).abs() < 1e-9);
        assert!((y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_pan_shifts_origin() {
        let transform = TransformState {
            pan_x: 25.0,
            pan_y: -40.0,
            zoom: 1.0,
        };
        let preview = PreviewTransform::compute(transform);
        let (x, y) = preview.image_origin(
            Viewport::new(400.0, 400.0),
            DisplaySize {
                width: 400.0,
                height: 400.0,
            },
        );

        assert!((x - 25.0).abs() < 1e-9);
        assert!((y - -40.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_scales_about_center() {
        let transform = TransformState {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 2.0,
        };
        let preview = PreviewTransform::compute(transform);
        let viewport = Viewport::new(400.0, 400.0);
        let display = DisplaySize {
            width: 400.0,
            height: 400.0,
        };

        let (x, y) = preview.image_origin(viewport, display);
        assert!((x - -200.0).abs() < 1e-9);
        assert!((y - -200.0).abs() < 1e-9);

        // The viewport center maps to the display center under the affine
        let [a, _, _, d, e, f] = preview.matrix(viewport, display);
        let cx = a * 200.0 + e;
        let cy = d * 200.0 + f;
        assert!((cx - 200.0).abs() < 1e-9);
        assert!((cy - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_matrix_has_no_shear() {
        let preview = PreviewTransform::compute(TransformState {
            pan_x: 5.0,
            pan_y: 6.0,
            zoom: 1.5,
        });
        let m = preview.matrix(
            Viewport::new(100.0, 100.0),
            DisplaySize {
                width: 120.0,
                height: 100.0,
            },
        );

        assert_eq!(m[1], 0.0);
        assert_eq!(m[2], 0.0);
        assert_eq!(m[0], m[3]);
    }
}
