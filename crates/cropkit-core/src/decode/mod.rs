//! Source-image loading for the cropping engine.
//!
//! This module decodes the caller-supplied raster bytes (JPEG, PNG, GIF
//! or WebP) into an RGBA [`SourceImage`] and exposes its intrinsic
//! dimensions. Decoding is the engine's only asynchronous boundary in a
//! host application: everything downstream (fit, frame, transform,
//! extraction) refuses to run until a decode has completed.
//!
//! EXIF orientation is baked into the decoded pixels, so the rest of the
//! engine never has to reason about rotated sources.

mod loader;
mod types;

pub use loader::decode_image;
pub use types::{DecodeError, Orientation, SourceImage};
