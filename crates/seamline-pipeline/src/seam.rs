//! Manual seam editing.
//!
//! Seam handles, sliders and confirm/cancel state live in the UI. The
//! core only ever sees complete overlap lists: these helpers turn a
//! single edited seam into a full corrected list that can be handed
//! straight back to [`crate::stitch::assemble`]. Resetting is simply a
//! fresh [`crate::search::detect_overlaps`].

use log::warn;

use crate::buffer::PixelBuffer;
use crate::stitch::overlap_limit;
use crate::types::StitchError;

/// Replace the overlap of seam `index` with `depth`.
///
/// `depth` is clamped to the seam's [`overlap_limit`]. Every other entry
/// is copied unchanged.
///
/// # Errors
///
/// Returns [`StitchError::InvalidArgument`] if `overlaps` does not match
/// `images` or `index` names no seam.
pub fn override_seam(
    images: &[PixelBuffer],
    overlaps: &[u32],
    index: usize,
    depth: u32,
) -> Result<Vec<u32>, StitchError> {
    check_length(images, overlaps)?;
    if index >= overlaps.len() {
        return Err(StitchError::InvalidArgument(format!(
            "seam {index} does not exist ({} seams)",
            overlaps.len(),
        )));
    }
    let limit = overlap_limit(images, index).unwrap_or(0);
    if depth > limit {
        warn!("seam {index}: overlap {depth} clamped to {limit}");
    }
    let mut updated = overlaps.to_vec();
    updated[index] = depth.min(limit);
    Ok(updated)
}

/// Clamp every entry of `overlaps` to its seam's [`overlap_limit`].
///
/// # Errors
///
/// Returns [`StitchError::InvalidArgument`] if `overlaps` does not match
/// `images`.
pub fn clamp_overlaps(images: &[PixelBuffer], overlaps: &[u32]) -> Result<Vec<u32>, StitchError> {
    check_length(images, overlaps)?;
    Ok(overlaps
        .iter()
        .enumerate()
        .map(|(i, &depth)| depth.min(overlap_limit(images, i).unwrap_or(0)))
        .collect())
}

fn check_length(images: &[PixelBuffer], overlaps: &[u32]) -> Result<(), StitchError> {
    if images.is_empty() || overlaps.len() != images.len() - 1 {
        return Err(StitchError::InvalidArgument(format!(
            "{} overlaps do not fit {} images",
            overlaps.len(),
            images.len(),
        )));
    }
    Ok(())
}
