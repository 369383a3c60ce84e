//! Automatic overlap detection between adjacent images.
//!
//! [`search`] scans every candidate depth with the composite score and
//! returns the lowest-scoring one. [`detect_overlap`] follows it with a
//! refinement pass, and [`detect_overlaps`] runs both over every adjacent
//! pair of a sequence to produce the overlap list consumed by
//! [`crate::stitch::assemble`].
//!
//! Cost per pair is bounded by `max_search` candidate depths, each
//! comparing a depth-proportional subset of rows at no more than
//! `column_samples` columns.

use log::debug;

use crate::buffer::PixelBuffer;
use crate::refine::{best_depth, refine};
use crate::score::OverlapScorer;
use crate::signature::ColumnSampling;
use crate::stitch::overlap_limit;
use crate::types::{OverlapEstimate, SearchConfig, StitchError};

/// Number of candidate depths considered for a pair.
#[must_use]
pub fn search_height(top: &PixelBuffer, bottom: &PixelBuffer, max_search: u32) -> u32 {
    max_search.min(top.height()).min(bottom.height())
}

/// Coarse search: the depth in `[0, search_height]` with the lowest score.
///
/// Candidates are scanned in increasing depth and the first strict
/// minimum wins, which biases ties toward the smaller seam. Returns `0`
/// ("no overlap, abut the images") when there is no shared width, no
/// candidate depth, or no measurable candidate.
#[must_use]
pub fn search(top: &PixelBuffer, bottom: &PixelBuffer, config: &SearchConfig) -> u32 {
    let sampling = ColumnSampling::between(top, bottom, config.column_samples);
    let height = search_height(top, bottom, config.max_search);
    if sampling.is_empty() || height == 0 {
        return 0;
    }

    let scorer = OverlapScorer::new(top, bottom, sampling, height, config.weights);
    match best_depth(1..=height, |depth| scorer.score(depth)) {
        Some((depth, score)) => {
            debug!("coarse search picked depth {depth} of {height} (score {score:.6})");
            depth
        }
        None => {
            debug!("coarse search found no measurable depth in {height} candidates");
            0
        }
    }
}

/// Detect the overlap of one pair: coarse search, then refinement.
///
/// Refinement is skipped when the coarse search finds no overlap.
#[must_use]
pub fn detect_overlap(
    top: &PixelBuffer,
    bottom: &PixelBuffer,
    config: &SearchConfig,
) -> OverlapEstimate {
    let height = search_height(top, bottom, config.max_search);
    let coarse_depth = search(top, bottom, config);
    let depth = if coarse_depth == 0 {
        0
    } else {
        let sampling = ColumnSampling::between(top, bottom, config.column_samples);
        refine(top, bottom, coarse_depth, sampling, height, config)
    };
    debug!("overlap detected: coarse {coarse_depth}, refined {depth}");
    OverlapEstimate {
        depth,
        coarse_depth,
        search_height: height,
    }
}

/// Detect the overlap of every adjacent pair of `images`.
///
/// Returns a list of `images.len() - 1` depths, each within its
/// [`overlap_limit`] so the list can go straight to
/// [`crate::stitch::assemble`].
///
/// # Errors
///
/// Returns [`StitchError::InvalidArgument`] if `images` is empty.
pub fn detect_overlaps(
    images: &[PixelBuffer],
    config: &SearchConfig,
) -> Result<Vec<u32>, StitchError> {
    if images.is_empty() {
        return Err(StitchError::InvalidArgument(
            "cannot detect overlaps of an empty image list".to_string(),
        ));
    }
    Ok(images
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let depth = detect_overlap(&pair[0], &pair[1], config).depth;
            let limit = overlap_limit(images, i).unwrap_or(0);
            if depth > limit {
                debug!("seam {i}: detected overlap {depth} capped to {limit}");
            }
            depth.min(limit)
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{noise, overlapping_pair, solid};

    #[test]
    fn search_recovers_exact_overlap() {
        let (top, bottom) = overlapping_pair(64, 120, 110, 45, 21);
        assert_eq!(search(&top, &bottom, &SearchConfig::default()), 45);
    }

    #[test]
    fn detect_overlap_reports_coarse_and_refined() {
        let (top, bottom) = overlapping_pair(64, 120, 110, 45, 22);
        let estimate = detect_overlap(&top, &bottom, &SearchConfig::default());
        assert_eq!(estimate.depth, 45);
        assert_eq!(estimate.coarse_depth, 45);
        assert_eq!(estimate.search_height, 110);
        assert!(!estimate.is_abutting());
    }

    #[test]
    fn search_height_is_bounded_by_both_images_and_cap() {
        let top = noise(8, 50, 23);
        let bottom = noise(8, 30, 24);
        assert_eq!(search_height(&top, &bottom, 1600), 30);
        assert_eq!(search_height(&top, &bottom, 10), 10);
    }

    #[test]
    fn zero_max_search_means_abutting() {
        let (top, bottom) = overlapping_pair(32, 40, 40, 10, 25);
        let config = SearchConfig {
            max_search: 0,
            ..SearchConfig::default()
        };
        assert_eq!(search(&top, &bottom, &config), 0);
        assert!(detect_overlap(&top, &bottom, &config).is_abutting());
    }

    #[test]
    fn uniform_images_tie_to_smallest_depth() {
        let top = solid(16, 20, [200, 200, 200]);
        let bottom = solid(16, 20, [200, 200, 200]);
        assert_eq!(search(&top, &bottom, &SearchConfig::default()), 1);
    }

    #[test]
    fn single_column_images_abut() {
        let top = noise(1, 20, 26);
        let bottom = noise(1, 20, 27);
        assert_eq!(search(&top, &bottom, &SearchConfig::default()), 0);
    }

    #[test]
    fn chosen_overlap_stays_in_bounds() {
        for seed in 0..4 {
            let top = noise(24, 15 + seed as u32 * 7, seed);
            let bottom = noise(30, 12 + seed as u32 * 5, seed + 100);
            let estimate = detect_overlap(&top, &bottom, &SearchConfig::default());
            assert!(estimate.depth <= top.height().min(bottom.height()));
        }
    }

    #[test]
    fn detect_overlaps_covers_every_pair() {
        let (a, b) = overlapping_pair(40, 60, 60, 20, 28);
        let (_, c) = overlapping_pair(40, 60, 60, 15, 29);
        let images = vec![a, b, c];
        let overlaps = detect_overlaps(&images, &SearchConfig::default()).unwrap();
        assert_eq!(overlaps.len(), 2);
        assert_eq!(overlaps[0], 20);
    }

    #[test]
    fn detected_overlaps_always_assemble() {
        // The middle image repeats the bottom of the first in full, so the
        // raw detection for seam 1 could swallow it entirely.
        let first = noise(24, 30, 31);
        let middle = first.crop_rows(20, 10).unwrap();
        let last = middle.clone();
        let images = vec![first, middle, last];
        let overlaps = detect_overlaps(&images, &SearchConfig::default()).unwrap();
        assert!(overlaps[1] <= 9);
        let stitched = crate::stitch::assemble(&images, &overlaps).unwrap();
        assert!(stitched.plan.seam_positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn detect_overlaps_rejects_empty_list() {
        let result = detect_overlaps(&[], &SearchConfig::default());
        assert!(matches!(result, Err(StitchError::InvalidArgument(_))));
    }

    #[test]
    fn detect_overlaps_single_image_is_empty() {
        let images = vec![noise(4, 4, 30)];
        assert!(detect_overlaps(&images, &SearchConfig::default())
            .unwrap()
            .is_empty());
    }
}
