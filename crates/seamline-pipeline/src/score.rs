//! Composite dissimilarity score for one candidate overlap depth.
//!
//! For a candidate depth `d`, the last `d` rows of the top image are
//! compared with the first `d` rows of the bottom image. Four signals are
//! combined, each sampled with a depth-proportional row step so the cost
//! of one candidate stays roughly constant:
//!
//! - **signature**: mean luma per row (precomputed, see [`crate::signature`])
//! - **color**: per-channel RGB difference at the sampled columns
//! - **edge**: difference of horizontal luma gradients
//! - **texture**: mismatch of row-to-row signature deltas, added as a
//!   capped penalty for candidates deeper than a few rows
//!
//! Lower is better. A term with no eligible samples makes the whole
//! candidate fail closed to [`NO_SAMPLES_SCORE`].

use crate::buffer::{PixelBuffer, channel_distance};
use crate::signature::{ColumnSampling, Edge, RowSignature, extract_signature};
use crate::types::ScoreWeights;

/// Score assigned to a candidate that could not be measured.
pub const NO_SAMPLES_SCORE: f64 = 1.0e9;

/// Row step divisor of the signature and texture terms.
const SIGNATURE_ROW_DIVISOR: u32 = 24;
/// Row step divisor of the color term.
const COLOR_ROW_DIVISOR: u32 = 16;
/// Row step divisor of the edge term.
const EDGE_ROW_DIVISOR: u32 = 14;
/// Candidates at or below this depth get no texture penalty.
const TEXTURE_MIN_DEPTH: u32 = 4;

/// The individual terms of one candidate's score, before weighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreTerms {
    /// Mean absolute signature difference.
    pub signature: f64,
    /// Mean absolute per-channel color difference.
    pub color: f64,
    /// Mean absolute horizontal gradient difference.
    pub edge: f64,
    /// Mean absolute row-delta mismatch; `0.0` for shallow candidates.
    pub texture: f64,
}

impl ScoreTerms {
    /// Weighted sum of the terms.
    #[must_use]
    pub fn total(&self, weights: &ScoreWeights) -> f64 {
        let penalty = (self.texture * weights.texture).min(weights.texture_cap);
        weights.edge.mul_add(
            self.edge,
            weights
                .signature
                .mul_add(self.signature, weights.color * self.color),
        ) + penalty
    }
}

/// Scores candidate depths for one adjacent image pair.
///
/// Holds the two edge signatures so they are extracted once and shared
/// by every candidate in `1..=search_height`.
#[derive(Debug)]
pub struct OverlapScorer<'a> {
    top: &'a PixelBuffer,
    bottom: &'a PixelBuffer,
    top_signature: RowSignature,
    bottom_signature: RowSignature,
    sampling: ColumnSampling,
    search_height: u32,
    weights: ScoreWeights,
}

impl<'a> OverlapScorer<'a> {
    /// Prepare scoring of depths up to `search_height`.
    ///
    /// `search_height` must not exceed either image height.
    #[must_use]
    pub fn new(
        top: &'a PixelBuffer,
        bottom: &'a PixelBuffer,
        sampling: ColumnSampling,
        search_height: u32,
        weights: ScoreWeights,
    ) -> Self {
        Self {
            top,
            bottom,
            top_signature: extract_signature(top, search_height, Edge::Bottom, sampling),
            bottom_signature: extract_signature(bottom, search_height, Edge::Top, sampling),
            sampling,
            search_height,
            weights,
        }
    }

    /// Largest depth this scorer can evaluate.
    #[must_use]
    pub const fn search_height(&self) -> u32 {
        self.search_height
    }

    /// Weighted score of `depth`; [`NO_SAMPLES_SCORE`] if unmeasurable.
    #[must_use]
    pub fn score(&self, depth: u32) -> f64 {
        self.terms(depth)
            .map_or(NO_SAMPLES_SCORE, |terms| terms.total(&self.weights))
    }

    /// Unweighted terms of `depth`, or `None` if any term has no samples.
    #[must_use]
    pub fn terms(&self, depth: u32) -> Option<ScoreTerms> {
        if depth == 0 || depth > self.search_height || self.sampling.is_empty() {
            return None;
        }
        Some(ScoreTerms {
            signature: self.signature_diff(depth)?,
            color: self.color_diff(depth)?,
            edge: self.edge_diff(depth)?,
            texture: if depth > TEXTURE_MIN_DEPTH {
                self.texture_diff(depth)?
            } else {
                0.0
            },
        })
    }

    /// Top image row aligned with bottom row `j` at `depth`.
    fn top_row(&self, depth: u32, j: u32) -> u32 {
        self.top.height() - depth + j
    }

    /// Signature of the top row aligned with bottom row `j`.
    ///
    /// The top signature counts rows upward from the bottom edge.
    fn top_signature(&self, depth: u32, j: u32) -> Option<f64> {
        self.top_signature.at((depth - 1 - j) as usize)
    }

    fn bottom_signature(&self, j: u32) -> Option<f64> {
        self.bottom_signature.at(j as usize)
    }

    fn signature_diff(&self, depth: u32) -> Option<f64> {
        let mut acc = Mean::default();
        for j in rows(depth, 0, SIGNATURE_ROW_DIVISOR) {
            acc.push((self.top_signature(depth, j)? - self.bottom_signature(j)?).abs());
        }
        acc.mean()
    }

    fn color_diff(&self, depth: u32) -> Option<f64> {
        let mut acc = Mean::default();
        for j in rows(depth, 0, COLOR_ROW_DIVISOR) {
            let ty = self.top_row(depth, j);
            for x in self.sampling.columns() {
                acc.push(channel_distance(
                    self.top.pixel(x, ty),
                    self.bottom.pixel(x, j),
                ));
            }
        }
        acc.mean()
    }

    fn edge_diff(&self, depth: u32) -> Option<f64> {
        let width = self.sampling.usable_width();
        let mut acc = Mean::default();
        for j in rows(depth, 0, EDGE_ROW_DIVISOR) {
            let ty = self.top_row(depth, j);
            for x in self.sampling.columns().filter(|x| x + 1 < width) {
                let top_gradient = self.top.luma(x + 1, ty) - self.top.luma(x, ty);
                let bottom_gradient = self.bottom.luma(x + 1, j) - self.bottom.luma(x, j);
                acc.push((top_gradient - bottom_gradient).abs());
            }
        }
        acc.mean()
    }

    fn texture_diff(&self, depth: u32) -> Option<f64> {
        let mut acc = Mean::default();
        for j in rows(depth, 1, SIGNATURE_ROW_DIVISOR) {
            let top_delta = self.top_signature(depth, j)? - self.top_signature(depth, j - 1)?;
            let bottom_delta = self.bottom_signature(j)? - self.bottom_signature(j - 1)?;
            acc.push((top_delta - bottom_delta).abs());
        }
        acc.mean()
    }
}

/// Band rows `start..depth`, stepping `max(1, depth / divisor)`.
fn rows(depth: u32, start: u32, divisor: u32) -> impl Iterator<Item = u32> {
    let step = (depth / divisor).max(1);
    (start..depth).step_by(step as usize)
}

/// Running mean that reports `None` when nothing was pushed.
#[derive(Debug, Default)]
struct Mean {
    sum: f64,
    count: u32,
}

impl Mean {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}
