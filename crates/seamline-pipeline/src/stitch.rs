//! Stitch assembly: compose N images into one canvas.
//!
//! Each image after the first is painted at a running offset that
//! advances by the previous image's height minus the overlap between the
//! two. Later images fully overwrite the overlap band; there is no
//! blending, so content that moved between captures can ghost at a seam.
//!
//! The canvas is always rebuilt from scratch. After a manual seam edit
//! the caller passes the complete corrected overlap list again.

use image::imageops;
use log::debug;

use crate::buffer::PixelBuffer;
use crate::types::{RgbaImage, StitchError, StitchPlan};

/// A finished stitch: the geometry plus the composite raster.
#[derive(Debug, Clone)]
pub struct Stitched {
    /// Dimensions, seam positions and source heights.
    pub plan: StitchPlan,
    /// The composed canvas.
    pub composite: PixelBuffer,
}

/// Largest overlap allowed at seam `index`, or `None` if there is no
/// such seam.
///
/// Bounded by both images of the pair. Past the first seam the upper
/// image must also keep one row of its own, otherwise two seams would
/// land on the same row.
#[must_use]
pub fn overlap_limit(images: &[PixelBuffer], index: usize) -> Option<u32> {
    let top = images.get(index)?;
    let bottom = images.get(index + 1)?;
    let shared = top.height().min(bottom.height());
    Some(if index == 0 {
        shared
    } else {
        shared.min(top.height() - 1)
    })
}

/// Check the preconditions of [`plan`] and [`assemble`].
///
/// # Errors
///
/// Returns [`StitchError::InvalidArgument`] if `images` is empty, if
/// `overlaps` does not hold exactly one entry per adjacent pair, or if an
/// overlap exceeds its [`overlap_limit`].
pub fn validate(images: &[PixelBuffer], overlaps: &[u32]) -> Result<(), StitchError> {
    if images.is_empty() {
        return Err(StitchError::InvalidArgument(
            "cannot stitch an empty image list".to_string(),
        ));
    }
    if overlaps.len() != images.len() - 1 {
        return Err(StitchError::InvalidArgument(format!(
            "expected {} overlaps for {} images, got {}",
            images.len() - 1,
            images.len(),
            overlaps.len(),
        )));
    }
    for (i, &overlap) in overlaps.iter().enumerate() {
        let limit = overlap_limit(images, i).unwrap_or(0);
        if overlap > limit {
            return Err(StitchError::InvalidArgument(format!(
                "overlap {i} is {overlap} rows but at most {limit} are allowed",
            )));
        }
    }
    Ok(())
}

/// Compute the geometry of a stitch without painting anything.
///
/// # Errors
///
/// Same as [`validate`].
pub fn plan(images: &[PixelBuffer], overlaps: &[u32]) -> Result<StitchPlan, StitchError> {
    validate(images, overlaps)?;

    let source_heights: Vec<u32> = images.iter().map(PixelBuffer::height).collect();
    let composite_width = images.iter().map(PixelBuffer::width).max().unwrap_or(0);

    let mut seam_positions = Vec::with_capacity(overlaps.len());
    let mut offset = 0u32;
    for (&height, &overlap) in source_heights.iter().zip(overlaps) {
        offset += height - overlap;
        seam_positions.push(offset);
    }
    let composite_height = offset + source_heights.last().copied().unwrap_or(0);

    Ok(StitchPlan {
        composite_width,
        composite_height,
        seam_positions,
        source_heights,
        overlaps: overlaps.to_vec(),
    })
}

/// Compose `images` into one canvas using `overlaps`.
///
/// A single image is returned unchanged. Narrower images are painted at
/// the left edge; uncovered canvas pixels stay transparent.
///
/// # Errors
///
/// Same as [`validate`].
pub fn assemble(images: &[PixelBuffer], overlaps: &[u32]) -> Result<Stitched, StitchError> {
    let plan = plan(images, overlaps)?;

    if let [single] = images {
        return Ok(Stitched {
            plan,
            composite: single.clone(),
        });
    }

    let mut canvas = RgbaImage::new(plan.composite_width, plan.composite_height);
    for (i, image) in images.iter().enumerate() {
        let y = plan.image_offset(i).unwrap_or(0);
        imageops::replace(&mut canvas, image.as_rgba(), 0, i64::from(y));
    }
    debug!(
        "assembled {} images into {}x{} (seams at {:?})",
        images.len(),
        plan.composite_width,
        plan.composite_height,
        plan.seam_positions,
    );

    Ok(Stitched {
        plan,
        composite: PixelBuffer::new(canvas)?,
    })
}
