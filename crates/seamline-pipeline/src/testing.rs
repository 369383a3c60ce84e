//! Synthetic images shared by unit tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::buffer::PixelBuffer;
use crate::types::RgbaImage;

/// Opaque uniform RGB noise.
pub fn noise(width: u32, height: u32, seed: u64) -> PixelBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; width as usize * height as usize * 4];
    rng.fill(data.as_mut_slice());
    for alpha in data.iter_mut().skip(3).step_by(4) {
        *alpha = 255;
    }
    PixelBuffer::from_raw(width, height, data).unwrap()
}

/// A single opaque color.
pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> PixelBuffer {
    let [r, g, b] = rgb;
    PixelBuffer::new(RgbaImage::from_pixel(width, height, image::Rgba([r, g, b, 255]))).unwrap()
}

/// Horizontally uniform gray rows, one value per row.
pub fn gray_rows(width: u32, values: &[u8]) -> PixelBuffer {
    let height = u32::try_from(values.len()).unwrap();
    let image = RgbaImage::from_fn(width, height, |_, y| {
        let v = values[y as usize];
        image::Rgba([v, v, v, 255])
    });
    PixelBuffer::new(image).unwrap()
}

/// Two noise images where the first `overlap` rows of the second are
/// verbatim copies of the last `overlap` rows of the first.
pub fn overlapping_pair(
    width: u32,
    top_height: u32,
    bottom_height: u32,
    overlap: u32,
    seed: u64,
) -> (PixelBuffer, PixelBuffer) {
    let top = noise(width, top_height, seed);
    let fresh = noise(width, bottom_height, seed.wrapping_add(1));
    let shared = (overlap * width * 4) as usize;
    let start = top.as_rgba().as_raw().len() - shared;
    let mut data = fresh.into_rgba().into_raw();
    data[..shared].copy_from_slice(&top.as_rgba().as_raw()[start..]);
    let bottom = PixelBuffer::from_raw(width, bottom_height, data).unwrap();
    (top, bottom)
}
