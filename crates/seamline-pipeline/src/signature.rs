//! Row signatures: one mean-luma scalar per row of a horizontal band.
//!
//! Comparing two bands row by row at full width is far too expensive to
//! repeat for every candidate overlap depth. A signature reduces each row
//! to the mean luma of a bounded set of sampled columns, so it can be
//! computed once per image and reused across all candidates.

use crate::buffer::PixelBuffer;

/// Which edge of an image a band is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Band starts at row 0 and grows downward.
    Top,
    /// Band starts at the last row and grows upward.
    Bottom,
}

/// Columns read from each row when comparing two images.
///
/// Only the leftmost `usable_width` columns are shared by both images.
/// Within that width every `step`-th column is sampled, which keeps the
/// per-row cost bounded no matter how wide the images are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSampling {
    usable_width: u32,
    step: u32,
}

impl ColumnSampling {
    /// Sample at most `column_samples` columns out of `usable_width`.
    #[must_use]
    pub const fn new(usable_width: u32, column_samples: u32) -> Self {
        let samples = if column_samples == 0 { 1 } else { column_samples };
        let step = usable_width.div_ceil(samples);
        Self {
            usable_width,
            step: if step == 0 { 1 } else { step },
        }
    }

    /// Sampling over the width shared by `top` and `bottom`.
    #[must_use]
    pub fn between(top: &PixelBuffer, bottom: &PixelBuffer, column_samples: u32) -> Self {
        Self::new(top.width().min(bottom.width()), column_samples)
    }

    /// Width shared by both images.
    #[must_use]
    pub const fn usable_width(&self) -> u32 {
        self.usable_width
    }

    /// Distance between sampled columns.
    #[must_use]
    pub const fn step(&self) -> u32 {
        self.step
    }

    /// Number of sampled columns.
    #[must_use]
    pub const fn sample_count(&self) -> u32 {
        self.usable_width.div_ceil(self.step)
    }

    /// Returns `true` when there is nothing to sample.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.usable_width == 0
    }

    /// The sampled column indices, left to right.
    pub fn columns(&self) -> impl Iterator<Item = u32> + use<> {
        (0..self.usable_width).step_by(self.step as usize)
    }
}

/// Mean luma per row of a band, ordered from the anchoring edge inward.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSignature {
    edge: Edge,
    values: Vec<f64>,
}

impl RowSignature {
    /// The edge this signature is anchored to.
    #[must_use]
    pub const fn edge(&self) -> Edge {
        self.edge
    }

    /// Number of rows in the band.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the band has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean luma of the row `distance` rows away from the edge.
    #[must_use]
    pub fn at(&self, distance: usize) -> Option<f64> {
        self.values.get(distance).copied()
    }

    /// All values, edge row first.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Reduce `band_height` rows at `edge` of `image` to a signature.
///
/// `band_height` must not exceed the image height; callers derive it from
/// the search height, which is bounded by both images.
#[must_use]
pub fn extract_signature(
    image: &PixelBuffer,
    band_height: u32,
    edge: Edge,
    sampling: ColumnSampling,
) -> RowSignature {
    debug_assert!(
        band_height <= image.height(),
        "band of {band_height} rows exceeds image height {}",
        image.height(),
    );
    let height = image.height();
    let band = band_height.min(height);
    let values = (0..band)
        .map(|distance| {
            let y = match edge {
                Edge::Top => distance,
                Edge::Bottom => height - 1 - distance,
            };
            mean_row_luma(image, y, sampling)
        })
        .collect();
    RowSignature { edge, values }
}

/// Luma of each sampled column of row `y`.
#[must_use]
pub fn row_luma(image: &PixelBuffer, y: u32, sampling: ColumnSampling) -> Vec<f64> {
    sampling.columns().map(|x| image.luma(x, y)).collect()
}

/// Mean luma over the sampled columns of row `y`, `0.0` if none.
fn mean_row_luma(image: &PixelBuffer, y: u32, sampling: ColumnSampling) -> f64 {
    let count = sampling.sample_count();
    if count == 0 {
        return 0.0;
    }
    let sum: f64 = sampling.columns().map(|x| image.luma(x, y)).sum();
    sum / f64::from(count)
}
