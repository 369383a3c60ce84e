//! Shared types for the seamline stitching pipeline.

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can build and inspect
/// pixel buffers without depending on `image` directly.
pub use image::RgbaImage;

/// Selects the metric used by the refinement pass.
///
/// The coarse search always uses the four-term composite score. The
/// refiner re-checks a narrow window around the coarse winner and may
/// use a different, denser metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RefineMetric {
    /// Plain averaged per-row RGB distance over every row of the band.
    ///
    /// Dense enough to correct the row subsampling of the coarse pass.
    #[default]
    RowDistance,

    /// Re-use the coarse four-term composite score so both passes agree
    /// on what "better" means.
    Composite,
}

/// Weights of the composite overlap score.
///
/// These are empirically tuned. Change them only together with the
/// overlap recovery tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight of the row signature (mean luma) difference.
    pub signature: f64,
    /// Weight of the sampled per-channel color difference.
    pub color: f64,
    /// Weight of the horizontal gradient difference.
    pub edge: f64,
    /// Multiplier of the row-to-row texture mismatch penalty.
    pub texture: f64,
    /// Upper bound of the texture penalty after weighting.
    pub texture_cap: f64,
}

impl ScoreWeights {
    /// Default signature weight.
    pub const DEFAULT_SIGNATURE: f64 = 0.45;
    /// Default color weight.
    pub const DEFAULT_COLOR: f64 = 0.30;
    /// Default edge weight.
    pub const DEFAULT_EDGE: f64 = 0.20;
    /// Default texture multiplier.
    pub const DEFAULT_TEXTURE: f64 = 0.35;
    /// Default texture penalty cap.
    pub const DEFAULT_TEXTURE_CAP: f64 = 0.35;
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            signature: Self::DEFAULT_SIGNATURE,
            color: Self::DEFAULT_COLOR,
            edge: Self::DEFAULT_EDGE,
            texture: Self::DEFAULT_TEXTURE,
            texture_cap: Self::DEFAULT_TEXTURE_CAP,
        }
    }
}

/// Configuration of the automatic overlap detection.
///
/// Fields are public with no construction-time validation. Zero values
/// are tolerated: `max_search == 0` disables detection (every pair
/// abuts) and `column_samples == 0` is treated as 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Largest overlap depth considered, in rows. The effective search
    /// height is also bounded by both image heights.
    pub max_search: u32,

    /// Upper bound on the number of columns sampled per row.
    pub column_samples: u32,

    /// Half-width of the refinement window around the coarse winner.
    pub refine_radius: u32,

    /// Metric used by the refinement pass.
    pub refine_metric: RefineMetric,

    /// Composite score weights used by the coarse pass.
    pub weights: ScoreWeights,
}

impl SearchConfig {
    /// Default maximum search depth in rows.
    pub const DEFAULT_MAX_SEARCH: u32 = 1600;
    /// Default number of sampled columns.
    pub const DEFAULT_COLUMN_SAMPLES: u32 = 120;
    /// Default refinement half-width in rows.
    pub const DEFAULT_REFINE_RADIUS: u32 = 8;
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_search: Self::DEFAULT_MAX_SEARCH,
            column_samples: Self::DEFAULT_COLUMN_SAMPLES,
            refine_radius: Self::DEFAULT_REFINE_RADIUS,
            refine_metric: RefineMetric::default(),
            weights: ScoreWeights::default(),
        }
    }
}

/// Result of detecting the overlap between one adjacent pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapEstimate {
    /// Final overlap depth after refinement. `0` means no overlap was
    /// found and the images should simply abut.
    pub depth: u32,
    /// Depth chosen by the coarse search before refinement.
    pub coarse_depth: u32,
    /// Number of candidate depths the coarse search considered.
    pub search_height: u32,
}

impl OverlapEstimate {
    /// Returns `true` when no overlap was found.
    #[must_use]
    pub const fn is_abutting(&self) -> bool {
        self.depth == 0
    }
}

/// Geometry of a stitched composite.
///
/// Everything a caller needs to re-open a finished stitch for manual
/// seam editing, without the raster itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StitchPlan {
    /// Widest source width in pixels.
    pub composite_width: u32,
    /// Sum of source heights minus sum of overlaps.
    pub composite_height: u32,
    /// Y offset where each source image after the first starts drawing.
    pub seam_positions: Vec<u32>,
    /// Heights of the source images, in order.
    pub source_heights: Vec<u32>,
    /// The overlap list the plan was computed from.
    pub overlaps: Vec<u32>,
}

impl StitchPlan {
    /// Number of source images in the stitch.
    #[must_use]
    pub const fn image_count(&self) -> usize {
        self.source_heights.len()
    }

    /// Y offset where source image `index` starts in the composite.
    ///
    /// Image 0 always starts at 0. Returns `None` for an out-of-range
    /// index.
    #[must_use]
    pub fn image_offset(&self, index: usize) -> Option<u32> {
        match index {
            0 if !self.source_heights.is_empty() => Some(0),
            0 => None,
            i => self.seam_positions.get(i - 1).copied(),
        }
    }
}

/// Errors that can occur while stitching or planning.
#[derive(Debug, thiserror::Error)]
pub enum StitchError {
    /// The input image bytes were empty.
    #[error("image unavailable: input image data is empty")]
    EmptyInput,

    /// Failed to decode the input image.
    #[error("image unavailable: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// A buffer with no pixels was handed in.
    #[error("image unavailable: image has zero size ({width}x{height})")]
    ZeroSized {
        /// Width of the rejected buffer.
        width: u32,
        /// Height of the rejected buffer.
        height: u32,
    },

    /// An argument violated a precondition. Nothing was computed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl StitchError {
    /// Returns `true` for the errors the decode boundary reports as
    /// "image unavailable".
    #[must_use]
    pub const fn is_image_unavailable(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput | Self::ImageDecode(_) | Self::ZeroSized { .. }
        )
    }
}
