//! Split planning: where to cut a tall image into pieces.
//!
//! A [`CutPlan`] holds the interior y positions at which the composite
//! is sliced. Positions are kept as `f64` because splitting by count
//! produces fractional boundaries; they are only truncated to pixel rows
//! when the exporter slices the raster.

use serde::{Deserialize, Serialize};

use crate::types::StitchError;

/// Minimum distance, in rows, kept between a moved cut and its
/// neighbors (or the image edges).
pub const MIN_CUT_GAP: f64 = 4.0;

/// Strictly increasing interior cut positions for an image of
/// `total_height` rows.
///
/// Deserialization goes through [`CutPlan::new`], so a plan read from
/// JSON holds the same invariants as one built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCutPlan")]
pub struct CutPlan {
    total_height: u32,
    cuts: Vec<f64>,
}

/// Unchecked wire form of [`CutPlan`].
#[derive(Deserialize)]
struct RawCutPlan {
    total_height: u32,
    cuts: Vec<f64>,
}

impl TryFrom<RawCutPlan> for CutPlan {
    type Error = StitchError;

    fn try_from(raw: RawCutPlan) -> Result<Self, Self::Error> {
        Self::new(raw.total_height, raw.cuts)
    }
}

impl CutPlan {
    /// A plan with no cuts: the whole image is one part.
    #[must_use]
    pub const fn whole(total_height: u32) -> Self {
        Self {
            total_height,
            cuts: Vec::new(),
        }
    }

    /// Build a plan from explicit cut positions, e.g. after manual edits.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::InvalidArgument`] unless every cut lies in
    /// `(0, total_height)` and the cuts are strictly increasing.
    pub fn new(total_height: u32, cuts: Vec<f64>) -> Result<Self, StitchError> {
        let total = f64::from(total_height);
        if let Some(bad) = cuts.iter().find(|c| !(**c > 0.0 && **c < total)) {
            return Err(StitchError::InvalidArgument(format!(
                "cut {bad} is not inside (0, {total_height})",
            )));
        }
        if cuts.windows(2).any(|w| w[0] >= w[1]) {
            return Err(StitchError::InvalidArgument(
                "cuts must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { total_height, cuts })
    }

    /// Height of the image this plan was computed for.
    #[must_use]
    pub const fn total_height(&self) -> u32 {
        self.total_height
    }

    /// Interior cut positions, ascending.
    #[must_use]
    pub fn cuts(&self) -> &[f64] {
        &self.cuts
    }

    /// Returns `true` if the plan has no cuts.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    /// Number of parts the image is split into.
    #[must_use]
    pub const fn parts_count(&self) -> usize {
        self.cuts.len() + 1
    }

    /// Segment boundaries: `0`, every cut, then the total height.
    #[must_use]
    pub fn boundaries(&self) -> Vec<f64> {
        let mut bounds = Vec::with_capacity(self.cuts.len() + 2);
        bounds.push(0.0);
        bounds.extend_from_slice(&self.cuts);
        bounds.push(f64::from(self.total_height));
        bounds
    }

    /// Move cut `index` toward `position`, keeping [`MIN_CUT_GAP`] rows
    /// from its neighbors and from both image edges.
    ///
    /// Returns the position the cut actually ended up at. When the
    /// neighbors leave no room the cut stays where it was.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::InvalidArgument`] if `index` names no cut.
    pub fn move_cut(&mut self, index: usize, position: f64) -> Result<f64, StitchError> {
        let Some(&current) = self.cuts.get(index) else {
            return Err(StitchError::InvalidArgument(format!(
                "cut {index} does not exist ({} cuts)",
                self.cuts.len(),
            )));
        };
        let lower = index
            .checked_sub(1)
            .and_then(|i| self.cuts.get(i))
            .map_or(MIN_CUT_GAP, |prev| prev + MIN_CUT_GAP);
        let upper = self
            .cuts
            .get(index + 1)
            .map_or(f64::from(self.total_height) - MIN_CUT_GAP, |next| {
                next - MIN_CUT_GAP
            });
        if lower > upper || position.is_nan() {
            return Ok(current);
        }
        let moved = position.clamp(lower, upper);
        self.cuts[index] = moved;
        Ok(moved)
    }
}

/// Cut every `slice_height` rows: `slice_height`, `2 * slice_height`, ...
/// while below `total_height`.
///
/// A non-positive `slice_height` yields no cuts.
#[must_use]
pub fn plan_by_height(total_height: u32, slice_height: i64) -> CutPlan {
    let Ok(step) = u32::try_from(slice_height) else {
        return CutPlan::whole(total_height);
    };
    if step == 0 {
        return CutPlan::whole(total_height);
    }
    let cuts = (1..)
        .map(|k| u64::from(step) * k)
        .take_while(|&y| y < u64::from(total_height))
        .map(|y| f64::from(u32::try_from(y).unwrap_or(u32::MAX)))
        .collect();
    CutPlan { total_height, cuts }
}

/// Cut into `slices` parts of equal (possibly fractional) height.
///
/// Each cut `k * total_height / slices` is computed directly from
/// integers so errors do not accumulate. `slices <= 1` yields no cuts.
/// Counts above `total_height` are capped to it, so every part keeps at
/// least one row.
#[must_use]
pub fn plan_by_count(total_height: u32, slices: i64) -> CutPlan {
    let slices = slices.min(i64::from(total_height));
    if slices <= 1 {
        return CutPlan::whole(total_height);
    }
    #[allow(clippy::cast_precision_loss)]
    let cuts = (1..slices)
        .map(|k| (k as f64 * f64::from(total_height)) / slices as f64)
        .collect();
    CutPlan { total_height, cuts }
}

/// How the composite should be split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitMode {
    /// Fixed slice height in rows; the last slice may be shorter.
    ByHeight(i64),
    /// Fixed number of equal slices.
    ByCount(i64),
}

impl SplitMode {
    /// Plan the cuts for an image of `total_height` rows.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::InvalidArgument`] if the slice height or
    /// count is not positive, or if the count exceeds `total_height`.
    pub fn plan(self, total_height: u32) -> Result<CutPlan, StitchError> {
        match self {
            Self::ByHeight(h) if h <= 0 => Err(StitchError::InvalidArgument(format!(
                "slice height must be positive, got {h}",
            ))),
            Self::ByCount(n) if n <= 0 => Err(StitchError::InvalidArgument(format!(
                "slice count must be positive, got {n}",
            ))),
            Self::ByCount(n) if n > i64::from(total_height) => {
                Err(StitchError::InvalidArgument(format!(
                    "cannot split {total_height} rows into {n} slices",
                )))
            }
            Self::ByHeight(h) => Ok(plan_by_height(total_height, h)),
            Self::ByCount(n) => Ok(plan_by_count(total_height, n)),
        }
    }
}
