//! Refinement: a narrow, dense re-scan around the coarse winner.
//!
//! The coarse search subsamples rows more aggressively as the candidate
//! depth grows, which can bias it by a few rows. The refiner re-scores
//! every depth within `refine_radius` of the coarse winner using every
//! row of the band and keeps whichever depth scores lowest, even when
//! that differs from the coarse result.

use std::ops::RangeInclusive;

use crate::buffer::{PixelBuffer, channel_distance};
use crate::score::{NO_SAMPLES_SCORE, OverlapScorer};
use crate::signature::ColumnSampling;
use crate::types::{RefineMetric, SearchConfig};

/// Depths the refiner considers around `coarse_depth`.
///
/// The window is `[coarse - radius, coarse + radius]` intersected with
/// `[1, search_height]`. Empty when `search_height` is 0.
#[must_use]
pub fn refine_window(coarse_depth: u32, radius: u32, search_height: u32) -> RangeInclusive<u32> {
    let lo = coarse_depth.saturating_sub(radius).max(1);
    let hi = coarse_depth.saturating_add(radius).min(search_height);
    lo..=hi
}

/// Re-scan the window around `coarse_depth` and return the best depth.
///
/// Falls back to `coarse_depth` (clamped to `search_height`) when the
/// window is empty or nothing in it can be measured.
#[must_use]
pub fn refine(
    top: &PixelBuffer,
    bottom: &PixelBuffer,
    coarse_depth: u32,
    sampling: ColumnSampling,
    search_height: u32,
    config: &SearchConfig,
) -> u32 {
    let window = refine_window(coarse_depth, config.refine_radius, search_height);
    let fallback = coarse_depth.min(search_height);
    if window.is_empty() || sampling.is_empty() {
        return fallback;
    }

    let best = match config.refine_metric {
        RefineMetric::RowDistance => {
            best_depth(window, |depth| row_distance(top, bottom, depth, sampling))
        }
        RefineMetric::Composite => {
            let scorer = OverlapScorer::new(top, bottom, sampling, search_height, config.weights);
            best_depth(window, |depth| scorer.score(depth))
        }
    };

    best.map_or(fallback, |(depth, _)| depth)
}

/// Mean per-row RGB distance between the last `depth` rows of `top` and
/// the first `depth` rows of `bottom`, over every row.
///
/// Returns [`NO_SAMPLES_SCORE`] when there is nothing to compare.
#[must_use]
pub fn row_distance(
    top: &PixelBuffer,
    bottom: &PixelBuffer,
    depth: u32,
    sampling: ColumnSampling,
) -> f64 {
    let count = sampling.sample_count();
    if depth == 0 || count == 0 || depth > top.height() || depth > bottom.height() {
        return NO_SAMPLES_SCORE;
    }
    let offset = top.height() - depth;
    let total: f64 = (0..depth)
        .map(|j| {
            let row_sum: f64 = sampling
                .columns()
                .map(|x| channel_distance(top.pixel(x, offset + j), bottom.pixel(x, j)))
                .sum();
            row_sum / f64::from(count)
        })
        .sum();
    total / f64::from(depth)
}

/// First depth achieving the strict minimum of `score`, scanning in
/// increasing order.
///
/// Candidates scoring [`NO_SAMPLES_SCORE`] or more never win. Returns
/// `None` if no candidate was measurable.
pub(crate) fn best_depth(
    candidates: impl IntoIterator<Item = u32>,
    score: impl Fn(u32) -> f64,
) -> Option<(u32, f64)> {
    let mut best: Option<(u32, f64)> = None;
    for depth in candidates {
        let s = score(depth);
        if s >= NO_SAMPLES_SCORE {
            continue;
        }
        if best.is_none_or(|(_, current)| s < current) {
            best = Some((depth, s));
        }
    }
    best
}
