//! Image decoding.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces an RGBA
//! [`PixelBuffer`]. Every failure surfaces as one of the "image
//! unavailable" errors; a zero-sized buffer is never returned.

use crate::buffer::PixelBuffer;
use crate::types::StitchError;

/// Decode raw image bytes into an RGBA buffer.
///
/// # Errors
///
/// Returns [`StitchError::EmptyInput`] if `bytes` is empty.
/// Returns [`StitchError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
/// Returns [`StitchError::ZeroSized`] if the decoded image has no pixels.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, StitchError> {
    if bytes.is_empty() {
        return Err(StitchError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    PixelBuffer::new(img.to_rgba8())
}

/// Decode every image of a sequence, stopping at the first failure.
///
/// # Errors
///
/// Returns the first error reported by [`decode`].
pub fn decode_all<B: AsRef<[u8]>>(sources: &[B]) -> Result<Vec<PixelBuffer>, StitchError> {
    sources.iter().map(|bytes| decode(bytes.as_ref())).collect()
}
