//! PNG encoding of extracted crops.
//!
//! Lossless and alpha-preserving: the transparent corners a circular
//! clip leaves behind survive the round trip, unlike JPEG.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;

use super::{validate, EncodeError};

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    validate(pixels, width, height)?;

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_png_basic() {
        let pixels = vec![64u8; 10 * 10 * 4];
        let png = encode_png(&pixels, 10, 10).unwrap();
        assert_eq!(&png[0..8], &PNG_MAGIC);
    }

    #[test]
    fn test_encode_png_preserves_alpha() {
        let pixels: Vec<u8> = std::iter::repeat([10u8, 20, 30, 77])
            .take(4 * 4)
            .flatten()
            .collect();
        let png = encode_png(&pixels, 4, 4).unwrap();

        let decoded = image::load_from_memory(&png).unwrap().into_rgba8();
        assert_eq!(decoded.get_pixel(2, 2).0, [10, 20, 30, 77]);
    }

    #[test]
    fn test_encode_png_rejects_bad_buffer() {
        let result = encode_png(&[0u8; 5], 2, 2);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }
}
