//! Synthetic scrolling-screenshot generators for integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use seamline_pipeline::PixelBuffer;

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

/// Cut a tall noise "page" into windows that scroll by `advance` rows.
///
/// Every window is `window` rows tall, so adjacent windows overlap by
/// `window - advance` rows.
pub fn scroll_capture(
    width: u32,
    window: u32,
    advance: u32,
    count: u32,
    seed: u64,
) -> Vec<PixelBuffer> {
    let page_height = window + advance * (count - 1);
    let page = noise(width, page_height, seed);
    (0..count)
        .map(|i| page.crop_rows(i * advance, window).unwrap())
        .collect()
}
