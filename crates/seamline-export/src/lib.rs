//! seamline-export: Pure segment slicing and encoding (sans-IO)
//!
//! Slices a composite at the cuts of a [`CutPlan`] and encodes every
//! non-empty segment as PNG or JPEG. Returns named byte buffers; writing
//! them anywhere is up to the caller.

pub mod format;
pub mod naming;
pub mod slice;

use log::debug;
use seamline_pipeline::{CutPlan, PixelBuffer, StitchError};

pub use format::{OutputFormat, encode};
pub use naming::NamingPolicy;
pub use slice::{Segment, slice};

/// Errors that can occur while exporting segments.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Lossy quality outside `1..=100`.
    #[error("lossy quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    /// The encoder rejected the image.
    #[error("failed to encode segment: {0}")]
    Encode(#[from] image::ImageError),

    /// A segment could not be cut from the composite.
    #[error(transparent)]
    Slice(#[from] StitchError),
}

/// One encoded segment, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedSegment {
    /// 1-based position of the segment in the cut plan.
    pub index: usize,
    /// File name chosen by the naming policy.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub mime_type: &'static str,
    /// Segment height in rows.
    pub height: u32,
    /// Encoded image data.
    pub bytes: Vec<u8>,
}

/// Slice `composite` at `plan` and encode every non-empty segment.
///
/// Segments are produced in order. If encoding fails part-way, the error
/// is returned and the already-encoded segments are discarded; the caller
/// decides whether to retry.
///
/// # Errors
///
/// Returns [`ExportError::InvalidQuality`] for an out-of-range lossy
/// quality, [`ExportError::Encode`] if encoding fails.
pub fn export_segments(
    composite: &PixelBuffer,
    plan: &CutPlan,
    format: OutputFormat,
    naming: &NamingPolicy,
) -> Result<Vec<ExportedSegment>, ExportError> {
    if let OutputFormat::Lossy { quality } = format {
        OutputFormat::lossy(quality)?;
    }

    let segments = slice(composite, plan)?;
    debug!(
        "exporting {} of {} planned segments as {}",
        segments.len(),
        plan.parts_count(),
        format.extension(),
    );

    segments
        .iter()
        .map(|segment| -> Result<ExportedSegment, ExportError> {
            Ok(ExportedSegment {
                index: segment.index,
                file_name: naming.file_name(segment.index, format),
                mime_type: format.mime_type(),
                height: segment.buffer.height(),
                bytes: encode(&segment.buffer, format)?,
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use seamline_pipeline::{RgbaImage, plan_by_height};

    use super::*;

    fn gray(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::new(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([90, 90, 90, 255]),
        ))
        .unwrap()
    }

    #[test]
    fn exports_one_file_per_segment() {
        let composite = gray(4, 100);
        let naming = NamingPolicy::new("page", Some("stamp".to_string()));
        let exported = export_segments(
            &composite,
            &plan_by_height(100, 40),
            OutputFormat::Lossless,
            &naming,
        )
        .unwrap();
        let names: Vec<&str> = exported.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["page_stamp_1.png", "page_stamp_2.png", "page_stamp_3.png"]
        );
        let heights: Vec<u32> = exported.iter().map(|e| e.height).collect();
        assert_eq!(heights, vec![40, 40, 20]);
        assert!(exported.iter().all(|e| e.mime_type == "image/png"));
    }

    #[test]
    fn invalid_quality_fails_before_slicing() {
        let composite = gray(4, 10);
        let result = export_segments(
            &composite,
            &CutPlan::whole(10),
            OutputFormat::Lossy { quality: 150 },
            &NamingPolicy::default(),
        );
        assert!(matches!(result, Err(ExportError::InvalidQuality(150))));
    }

    #[test]
    fn error_display() {
        assert_eq!(
            ExportError::InvalidQuality(0).to_string(),
            "lossy quality must be between 1 and 100, got 0",
        );
    }
}
