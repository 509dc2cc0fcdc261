//! Cropping session orchestration.
//!
//! [`CropSession`] ties the engine together for a host application: it
//! owns the validated [`CropSpec`], the decoded image, the viewport
//! snapshot and the transform/input state, and exposes the small
//! surface a UI needs (feed events, read the preview transform, confirm
//! or cancel). Collaborators such as image storage are explicit,
//! injected trait objects rather than ambient singletons.
//!
//! The session is the single owner of the `(DisplaySize,
//! TransformState)` pair, which is what guarantees the preview and the
//! extraction agree.

use crate::decode::{decode_image, DecodeError, SourceImage};
use crate::encode::OutputFormat;
use crate::extract::{extract, CropError};
use crate::geometry::{CropFrame, DisplaySize, Viewport};
use crate::preview::PreviewTransform;
use crate::transform::{Input, InputState, TransformState};
use crate::CropSpec;

/// Storage collaborator for finished crops.
///
/// The engine never persists anything itself; on confirm the caller
/// decides where the bytes go. `get` returns the stored bytes for a
/// key, or the implementation's documented placeholder when the key is
/// absent (the original system served a default avatar in that case).
pub trait ImageStore {
    /// Store encoded image bytes under a key, replacing any previous value.
    fn put(&mut self, key: &str, bytes: Vec<u8>);

    /// Fetch stored bytes, or the placeholder if the key is absent.
    fn get(&self, key: &str) -> &[u8];
}

/// In-memory [`ImageStore`], used in tests and as a reference
/// implementation.
///
/// The placeholder defaults to empty bytes; hosts that want a default
/// avatar supply one via [`MemoryStore::with_placeholder`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: std::collections::HashMap<String, Vec<u8>>,
    placeholder: Vec<u8>,
}

impl MemoryStore {
    /// Empty store with an empty placeholder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store that serves `placeholder` for missing keys.
    pub fn with_placeholder(placeholder: Vec<u8>) -> Self {
        Self {
            entries: std::collections::HashMap::new(),
            placeholder,
        }
    }
}

impl ImageStore for MemoryStore {
    fn put(&mut self, key: &str, bytes: Vec<u8>) {
        self.entries.insert(key.to_string(), bytes);
    }

    fn get(&self, key: &str) -> &[u8] {
        self.entries
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&self.placeholder)
    }
}

/// An interactive cropping session.
///
/// Lifecycle: construct with a validated spec, supply the viewport and
/// image (either order), feed pointer/zoom events, then `confirm` to
/// extract or `cancel` to discard. Nothing is persisted until the
/// caller stores the confirmed bytes.
#[derive(Debug, Clone)]
pub struct CropSession {
    spec: CropSpec,
    format: OutputFormat,
    image: Option<SourceImage>,
    viewport: Option<Viewport>,
    display: Option<DisplaySize>,
    transform: TransformState,
    input: InputState,
}

impl CropSession {
    /// Create a session for the given spec.
    ///
    /// # Errors
    ///
    /// Returns `CropError::InvalidCropSpec` immediately for a
    /// misconfigured spec; the error is fatal, no session is created.
    pub fn new(spec: CropSpec) -> Result<Self, CropError> {
        spec.validate()?;
        Ok(Self {
            spec,
            format: OutputFormat::default(),
            image: None,
            viewport: None,
            display: None,
            transform: TransformState::new(),
            input: InputState::Idle,
        })
    }

    /// Choose the output serialization format (default: JPEG).
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Decode and install a new source image.
    ///
    /// Replaces any previous image and resets pan/zoom to defaults,
    /// since the old transform is meaningless against new content. The
    /// display size is recomputed if a viewport snapshot is present.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        let image = decode_image(bytes)?;
        self.image = Some(image);
        self.transform = TransformState::new();
        self.input = InputState::Idle;
        self.refit();
        Ok(())
    }

    /// Take a viewport snapshot (on load or container resize).
    ///
    /// Recomputes the display size but keeps the current transform: a
    /// pure resize must not throw away the user's adjustments.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        self.refit();
    }

    fn refit(&mut self) {
        self.display = match (&self.image, self.viewport) {
            (Some(image), Some(viewport)) => {
                Some(DisplaySize::cover_fit(image.width, image.height, viewport))
            }
            _ => None,
        };
    }

    /// Apply one input event through the pan/zoom reducer.
    pub fn handle_input(&mut self, event: Input) {
        let (input, transform) = self.input.apply(self.transform, event);
        self.input = input;
        self.transform = transform;
    }

    /// The current pan/zoom state.
    pub fn transform(&self) -> TransformState {
        self.transform
    }

    /// The loaded image's intrinsic dimensions, if decoded.
    pub fn image_dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(SourceImage::dimensions)
    }

    /// The centered guide frame, once a viewport snapshot exists.
    pub fn crop_frame(&self) -> Option<CropFrame> {
        self.viewport
            .map(|viewport| CropFrame::compute(viewport, &self.spec))
    }

    /// The live preview affine, or `None` until an image is loaded and
    /// fitted.
    pub fn preview_transform(&self) -> Option<PreviewTransform> {
        // Preview renders nothing before the image is ready
        self.display?;
        Some(PreviewTransform::compute(self.transform))
    }

    /// Extract and serialize the framed region.
    ///
    /// One-shot and synchronous; the session stays usable afterwards,
    /// so the user can adjust and confirm again.
    ///
    /// # Errors
    ///
    /// `CropError::ImageNotLoaded` if no image has been decoded or no
    /// viewport snapshot exists yet.
    pub fn confirm(&self) -> Result<Vec<u8>, CropError> {
        let image = self.image.as_ref().ok_or(CropError::ImageNotLoaded)?;
        let viewport = self.viewport.ok_or(CropError::ImageNotLoaded)?;
        let display = self.display.ok_or(CropError::ImageNotLoaded)?;
        let frame = CropFrame::compute(viewport, &self.spec);

        extract(
            image,
            viewport,
            display,
            self.transform,
            frame,
            &self.spec,
            self.format,
        )
    }

    /// Extract and hand the bytes straight to a storage collaborator.
    pub fn confirm_into(&self, store: &mut dyn ImageStore, key: &str) -> Result<(), CropError> {
        let bytes = self.confirm()?;
        store.put(key, bytes);
        Ok(())
    }

    /// Discard the session without side effects.
    ///
    /// Nothing was persisted, so dropping the state is the whole
    /// operation.
    pub fn cancel(self) {}
}
