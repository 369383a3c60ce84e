//! Owned, immutable RGBA pixel buffer.
//!
//! Every stage reads source images through [`PixelBuffer`]. A buffer is
//! never mutated after construction: stitching and slicing always
//! allocate new buffers. Zero-sized buffers cannot be constructed, so
//! any buffer a stage receives has at least one row and one column.

use image::imageops;

use crate::types::{RgbaImage, StitchError};

/// Number of bytes per RGBA pixel.
const CHANNELS: usize = 4;

/// A decoded image with contiguous row-major RGBA8 storage.
#[derive(Debug, Clone)]
pub struct PixelBuffer(RgbaImage);

impl PixelBuffer {
    /// Wrap a decoded image.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::ZeroSized`] if the image has no pixels.
    pub fn new(image: RgbaImage) -> Result<Self, StitchError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(StitchError::ZeroSized { width, height });
        }
        Ok(Self(image))
    }

    /// Build a buffer from raw row-major RGBA8 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::InvalidArgument`] if `data` does not hold
    /// exactly `width * height * 4` bytes, or [`StitchError::ZeroSized`]
    /// if either dimension is zero.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, StitchError> {
        let len = data.len();
        let image = RgbaImage::from_raw(width, height, data).ok_or_else(|| {
            StitchError::InvalidArgument(format!(
                "{len} bytes cannot hold a {width}x{height} RGBA image",
            ))
        })?;
        Self::new(image)
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Raw RGBA bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= self.height()`.
    #[must_use]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.0.width() as usize * CHANNELS;
        let start = y as usize * stride;
        &self.0.as_raw()[start..start + stride]
    }

    /// RGBA value of one pixel.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.0.get_pixel(x, y).0
    }

    /// Normalized luma of one pixel, in `[0, 1]`.
    #[must_use]
    pub fn luma(&self, x: u32, y: u32) -> f64 {
        luma(self.pixel(x, y))
    }

    /// Copy a sub-rectangle into a new buffer.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::InvalidArgument`] if the rectangle is empty
    /// or extends past the buffer.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Self, StitchError> {
        let fits = u64::from(x) + u64::from(width) <= u64::from(self.width())
            && u64::from(y) + u64::from(height) <= u64::from(self.height());
        if width == 0 || height == 0 || !fits {
            return Err(StitchError::InvalidArgument(format!(
                "crop {width}x{height}+{x}+{y} is outside a {}x{} image",
                self.width(),
                self.height(),
            )));
        }
        Self::new(imageops::crop_imm(&self.0, x, y, width, height).to_image())
    }

    /// Copy a full-width horizontal band of `height` rows starting at `y`.
    ///
    /// # Errors
    ///
    /// Same as [`crop`](Self::crop).
    pub fn crop_rows(&self, y: u32, height: u32) -> Result<Self, StitchError> {
        self.crop(0, y, self.width(), height)
    }

    /// Borrow the underlying image.
    #[must_use]
    pub const fn as_rgba(&self) -> &RgbaImage {
        &self.0
    }

    /// Consume the buffer and return the underlying image.
    #[must_use]
    pub fn into_rgba(self) -> RgbaImage {
        self.0
    }
}

/// Rec. 601 luma of an RGBA pixel with channels normalized to `[0, 1]`.
///
/// Alpha is ignored.
#[must_use]
pub fn luma(pixel: [u8; 4]) -> f64 {
    let [r, g, b, _] = pixel;
    0.114f64.mul_add(
        f64::from(b),
        0.299f64.mul_add(f64::from(r), 0.587 * f64::from(g)),
    ) / 255.0
}

/// Mean absolute per-channel RGB difference, normalized to `[0, 1]`.
#[must_use]
pub fn channel_distance(a: [u8; 4], b: [u8; 4]) -> f64 {
    let sum: u32 = (0..3).map(|c| u32::from(a[c].abs_diff(b[c]))).sum();
    f64::from(sum) / (3.0 * 255.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::Rgba;

    use super::*;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        #[allow(clippy::cast_possible_truncation)]
        let image = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 10) as u8, (y * 10) as u8, 0, 255])
        });
        PixelBuffer::new(image).unwrap()
    }

    #[test]
    fn zero_sized_is_rejected() {
        let result = PixelBuffer::new(RgbaImage::new(0, 5));
        assert!(matches!(
            result,
            Err(StitchError::ZeroSized {
                width: 0,
                height: 5
            })
        ));
    }

    #[test]
    fn from_raw_rejects_wrong_length() {
        let result = PixelBuffer::from_raw(2, 2, vec![0; 15]);
        assert!(matches!(result, Err(StitchError::InvalidArgument(_))));
    }

    #[test]
    fn row_returns_one_row_of_rgba() {
        let buf = gradient(3, 4);
        let row = buf.row(2);
        assert_eq!(row.len(), 12);
        assert_eq!(&row[0..4], &[0, 20, 0, 255]);
        assert_eq!(&row[8..12], &[20, 20, 0, 255]);
    }

    #[test]
    fn crop_rows_copies_band() {
        let buf = gradient(3, 6);
        let band = buf.crop_rows(2, 3).unwrap();
        assert_eq!(band.width(), 3);
        assert_eq!(band.height(), 3);
        assert_eq!(band.row(0), buf.row(2));
        assert_eq!(band.row(2), buf.row(4));
    }

    #[test]
    fn crop_out_of_bounds_is_rejected() {
        let buf = gradient(3, 6);
        assert!(buf.crop_rows(4, 3).is_err());
        assert!(buf.crop(1, 0, 3, 1).is_err());
        assert!(buf.crop_rows(0, 0).is_err());
    }

    #[test]
    fn luma_weights_green_highest() {
        let r = luma([255, 0, 0, 255]);
        let g = luma([0, 255, 0, 255]);
        let b = luma([0, 0, 255, 255]);
        assert!(g > r && r > b);
        assert!((luma([255, 255, 255, 0]) - 1.0).abs() < 1e-9);
        assert!(luma([0, 0, 0, 255]).abs() < 1e-12);
    }

    #[test]
    fn channel_distance_range() {
        assert!(channel_distance([1, 2, 3, 4], [1, 2, 3, 0]).abs() < f64::EPSILON);
        assert!((channel_distance([0, 0, 0, 255], [255, 255, 255, 255]) - 1.0).abs() < 1e-12);
    }
}
