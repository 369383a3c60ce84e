//! seamline-pipeline: Pure overlap detection, stitching and split
//! planning (sans-IO).
//!
//! Turns a sequence of vertically overlapping images (scrolling
//! screenshots) into one composite through:
//! pairwise overlap search -> refinement -> stitch assembly ->
//! optional manual re-seam -> split planning.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! pixel buffers and returns structured data. Encoding and writing the
//! split segments lives in `seamline-export` and the `seamline` CLI.
//!
//! Every function is synchronous and deterministic. Callers that need a
//! responsive UI should run the whole pipeline on a background worker.

pub mod buffer;
pub mod decode;
pub mod refine;
pub mod score;
pub mod seam;
pub mod search;
pub mod signature;
pub mod split;
pub mod stitch;
pub mod types;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod testing;

pub use buffer::PixelBuffer;
pub use search::{detect_overlap, detect_overlaps, search};
pub use seam::{clamp_overlaps, override_seam};
pub use split::{CutPlan, SplitMode, plan_by_count, plan_by_height};
pub use stitch::{Stitched, assemble, overlap_limit};
pub use types::{
    OverlapEstimate, RefineMetric, RgbaImage, ScoreWeights, SearchConfig, StitchError, StitchPlan,
};

/// Detect every overlap automatically and assemble the composite.
///
/// Equivalent to [`detect_overlaps`] followed by [`assemble`]. The
/// returned plan carries the detected overlap list, which is the
/// starting point for manual re-seaming with [`override_seam`].
///
/// # Errors
///
/// Returns [`StitchError::InvalidArgument`] if `images` is empty.
pub fn stitch(images: &[PixelBuffer], config: &SearchConfig) -> Result<Stitched, StitchError> {
    let overlaps = detect_overlaps(images, config)?;
    assemble(images, &overlaps)
}
