//! JPEG encoding of extracted crops.
//!
//! Uses the `image` crate's JPEG encoder with a configurable quality
//! knob. JPEG has no alpha channel, so RGBA input is flattened onto a
//! black background first; together with the extraction pipeline's
//! transparent out-of-bounds fill this reproduces what a 2D canvas
//! produces when exporting `image/jpeg`.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::{validate, EncodeError};

/// Encode RGBA pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// Quality outside 1-100 is clamped. Alpha is composited onto black
/// before encoding.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate(pixels, width, height)?;

    let quality = quality.clamp(1, 100);

    // Flatten onto black: out = channel * alpha
    let mut rgb = Vec::with_capacity((width as usize) * (height as usize) * 3);
    for px in pixels.chunks_exact(4) {
        let alpha = px[3] as u16;
        rgb.push(((px[0] as u16 * alpha) / 255) as u8);
        rgb.push(((px[1] as u16 * alpha) / 255) as u8);
        rgb.push(((px[2] as u16 * alpha) / 255) as u8);
    }

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_jpeg_basic() {
        let width = 32u32;
        let height = 32u32;
        let pixels = vec![200u8; (width * height * 4) as usize];

        let jpeg = encode_jpeg(&pixels, width, height, 90).unwrap();

        // SOI marker at the start, EOI at the end
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_out_of_range_clamps() {
        let pixels = vec![100u8; 8 * 8 * 4];
        assert!(encode_jpeg(&pixels, 8, 8, 0).is_ok());
        assert!(encode_jpeg(&pixels, 8, 8, 255).is_ok());
    }

    #[test]
    fn test_encode_jpeg_quality_affects_size() {
        // Noisy image so quality actually matters
        let mut pixels = Vec::with_capacity(64 * 64 * 4);
        for i in 0..64 * 64 {
            let v = ((i * 7919) % 256) as u8;
            pixels.extend_from_slice(&[v, v.wrapping_mul(3), v.wrapping_add(89), 255]);
        }

        let low = encode_jpeg(&pixels, 64, 64, 10).unwrap();
        let high = encode_jpeg(&pixels, 64, 64, 95).unwrap();
        assert!(high.len() > low.len());
    }

    #[test]
    fn test_encode_jpeg_rejects_bad_buffer() {
        let result = encode_jpeg(&[1, 2, 3], 4, 4, 85);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_encode_jpeg_rejects_zero_dimensions() {
        let result = encode_jpeg(&[], 0, 0, 85);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_transparent_pixels_flatten_to_black() {
        // Fully transparent white should encode as (near) black
        let pixels: Vec<u8> = std::iter::repeat([255u8, 255, 255, 0])
            .take(16 * 16)
            .flatten()
            .collect();
        let jpeg = encode_jpeg(&pixels, 16, 16, 90).unwrap();

        let decoded = image::load_from_memory(&jpeg).unwrap().into_rgb8();
        let px = decoded.get_pixel(8, 8).0;
        assert!(px[0] < 8 && px[1] < 8 && px[2] < 8);
    }
}
