//! Slicing a composite at the cuts of a [`CutPlan`].
//!
//! Boundaries are `0`, every cut, and the image height. Each boundary is
//! truncated to a whole row and clamped into the image; segments that
//! end up empty are skipped but keep their position for naming, so the
//! indices of the remaining segments do not shift.

use log::warn;
use seamline_pipeline::{CutPlan, PixelBuffer, StitchError};

/// One horizontal piece of the composite.
#[derive(Debug, Clone)]
pub struct Segment {
    /// 1-based position of the segment in the plan.
    pub index: usize,
    /// First composite row of the segment.
    pub y: u32,
    /// The copied pixels.
    pub buffer: PixelBuffer,
}

/// Copy the non-empty segments of `composite` delimited by `plan`.
///
/// # Errors
///
/// Returns [`StitchError::InvalidArgument`] if a band cannot be copied,
/// which cannot happen for clamped boundaries.
pub fn slice(composite: &PixelBuffer, plan: &CutPlan) -> Result<Vec<Segment>, StitchError> {
    let height = composite.height();
    if plan.total_height() != height {
        warn!(
            "cut plan was made for {} rows but the image has {height}; clamping",
            plan.total_height(),
        );
    }

    let bounds = plan.boundaries();
    let mut segments = Vec::with_capacity(bounds.len().saturating_sub(1));
    for (i, pair) in bounds.windows(2).enumerate() {
        let start = to_row(pair[0], height);
        let end = to_row(pair[1], height);
        if end <= start {
            continue;
        }
        segments.push(Segment {
            index: i + 1,
            y: start,
            buffer: composite.crop_rows(start, end - start)?,
        });
    }
    Ok(segments)
}

/// Truncate a boundary toward zero and clamp it into `[0, height]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_row(boundary: f64, height: u32) -> u32 {
    if boundary.is_nan() || boundary <= 0.0 {
        return 0;
    }
    let row = boundary.trunc().min(f64::from(height));
    row as u32
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use seamline_pipeline::{RgbaImage, plan_by_count, plan_by_height};

    use super::*;

    /// Each row is filled with its own index, so segments can be checked.
    fn rows(width: u32, height: u32) -> PixelBuffer {
        #[allow(clippy::cast_possible_truncation)]
        let image = RgbaImage::from_fn(width, height, |_, y| image::Rgba([y as u8, 0, 0, 255]));
        PixelBuffer::new(image).unwrap()
    }

    #[test]
    fn no_cuts_yields_whole_image() {
        let img = rows(3, 10);
        let segments = slice(&img, &CutPlan::whole(10)).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].index, 1);
        assert_eq!(segments[0].buffer.height(), 10);
    }

    #[test]
    fn slices_by_height() {
        let img = rows(3, 100);
        let segments = slice(&img, &plan_by_height(100, 30)).unwrap();
        let heights: Vec<u32> = segments.iter().map(|s| s.buffer.height()).collect();
        assert_eq!(heights, vec![30, 30, 30, 10]);
        assert_eq!(segments[2].y, 60);
        assert_eq!(segments[2].buffer.pixel(0, 0)[0], 60);
        assert_eq!(segments[3].index, 4);
    }

    #[test]
    fn fractional_cuts_truncate() {
        let img = rows(2, 100);
        let segments = slice(&img, &plan_by_count(100, 3)).unwrap();
        let starts: Vec<u32> = segments.iter().map(|s| s.y).collect();
        assert_eq!(starts, vec![0, 33, 66]);
        let total: u32 = segments.iter().map(|s| s.buffer.height()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn plan_taller_than_image_is_clamped() {
        let img = rows(2, 50);
        let segments = slice(&img, &plan_by_height(120, 40)).unwrap();
        let heights: Vec<u32> = segments.iter().map(|s| s.buffer.height()).collect();
        assert_eq!(heights, vec![40, 10]);
        assert_eq!(segments.iter().map(|s| s.index).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn empty_segments_are_skipped_but_keep_indices() {
        let img = rows(2, 50);
        let plan = CutPlan::new(80, vec![10.0, 10.5, 60.0]).unwrap();
        let segments = slice(&img, &plan).unwrap();
        let indices: Vec<usize> = segments.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(segments[1].buffer.height(), 40);
    }

    #[test]
    fn to_row_clamps() {
        assert_eq!(to_row(-4.0, 10), 0);
        assert_eq!(to_row(3.9, 10), 3);
        assert_eq!(to_row(25.0, 10), 10);
        assert_eq!(to_row(f64::NAN, 10), 0);
    }
}
