//! Output formats and raster encoding.
//!
//! Two formats are supported: lossless PNG and lossy JPEG with a single
//! quality parameter. JPEG has no alpha channel, so transparent pixels
//! are flattened to their RGB values.

use image::ImageEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use seamline_pipeline::PixelBuffer;

use crate::ExportError;

/// Encoding used for exported segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// PNG.
    #[default]
    Lossless,
    /// JPEG at the given quality (1-100).
    Lossy {
        /// Encoder quality, 1 (smallest) to 100 (best).
        quality: u8,
    },
}

impl OutputFormat {
    /// Quality used when none is specified.
    pub const DEFAULT_QUALITY: u8 = 95;

    /// A lossy format with a validated quality.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidQuality`] unless `quality` is in
    /// `1..=100`.
    pub fn lossy(quality: u8) -> Result<Self, ExportError> {
        if quality == 0 || quality > 100 {
            return Err(ExportError::InvalidQuality(quality));
        }
        Ok(Self::Lossy { quality })
    }

    /// File extension without the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Lossless => "png",
            Self::Lossy { .. } => "jpg",
        }
    }

    /// MIME type of the encoded bytes.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Lossless => "image/png",
            Self::Lossy { .. } => "image/jpeg",
        }
    }
}

/// Encode a buffer in the given format.
///
/// # Errors
///
/// Returns [`ExportError::InvalidQuality`] for an out-of-range lossy
/// quality and [`ExportError::Encode`] if the encoder fails.
pub fn encode(buffer: &PixelBuffer, format: OutputFormat) -> Result<Vec<u8>, ExportError> {
    let image = buffer.as_rgba();
    let mut bytes = Vec::new();
    match format {
        OutputFormat::Lossless => {
            let encoder = PngEncoder::new(&mut bytes);
            encoder.write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgba8,
            )?;
        }
        OutputFormat::Lossy { quality } => {
            OutputFormat::lossy(quality)?;
            let rgb: Vec<u8> = image
                .as_raw()
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
            encoder.write_image(
                &rgb,
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgb8,
            )?;
        }
    }
    Ok(bytes)
}
