//! Source-image decoding with EXIF orientation handling.
//!
//! Accepts any raster the upstream validator lets through (JPEG, PNG,
//! GIF, WebP) and produces an RGBA [`SourceImage`]. For animated inputs
//! (GIF/WebP) only the first frame is decoded.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use super::{DecodeError, Orientation, SourceImage};

/// Decode an image from bytes, applying EXIF orientation correction.
///
/// The format is sniffed from the bytes, not from any file name or MIME
/// hint. Orientation is read from EXIF metadata when present (JPEG and
/// WebP can carry it) and baked into the returned pixels, so intrinsic
/// dimensions are always the upright ones.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a
/// recognized raster format, `DecodeError::CorruptedFile` if decoding
/// fails partway.
pub fn decode_image(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    // Extract EXIF orientation before decoding; decoding consumes nothing
    // from the metadata segments.
    let orientation = extract_orientation(bytes);

    let cursor = Cursor::new(bytes);
    let reader = ImageReader::new(cursor)
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let oriented = apply_orientation(img, orientation);
    let rgba = oriented.into_rgba8();

    let source = SourceImage::from_rgba_image(rgba);
    if source.is_empty() {
        return Err(DecodeError::EmptyImage);
    }
    Ok(source)
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let exif_reader = Reader::new();
    let mut cursor = Cursor::new(bytes);

    match exif_reader.read_from_container(&mut cursor) {
        Ok(exif) => {
            if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
                if let Some(value) = field.value.get_uint(0) {
                    return Orientation::from(value);
                }
            }
            Orientation::Normal
        }
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
