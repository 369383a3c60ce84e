//! Integration test: recover known overlaps from synthetic scrolling
//! captures and rebuild the original page.

#![allow(clippy::unwrap_used)]

mod common;

use common::{noise, scroll_capture};
use seamline_pipeline::refine::{refine, refine_window};
use seamline_pipeline::signature::ColumnSampling;
use seamline_pipeline::{SearchConfig, assemble, detect_overlap, detect_overlaps, search};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn search_recovers_overlap_within_two_rows() {
    init_logging();
    for (k, seed) in [(5u32, 1u64), (37, 2), (120, 3), (199, 4)] {
        let pair = scroll_capture(96, 200, 200 - k, 2, seed);
        let depth = search(&pair[0], &pair[1], &SearchConfig::default());
        assert!(
            depth.abs_diff(k) <= 2,
            "expected overlap near {k}, search returned {depth}",
        );
    }
}

#[test]
fn detect_overlap_is_exact_on_verbatim_copies() {
    init_logging();
    let pair = scroll_capture(140, 160, 100, 2, 5);
    let estimate = detect_overlap(&pair[0], &pair[1], &SearchConfig::default());
    assert_eq!(estimate.depth, 60);
}

#[test]
fn wide_images_are_sampled_not_scanned() {
    init_logging();
    // 1000 columns with a 120-column cap: the overlap must still be found.
    let pair = scroll_capture(1000, 120, 70, 2, 6);
    let estimate = detect_overlap(&pair[0], &pair[1], &SearchConfig::default());
    assert_eq!(estimate.depth, 50);
}

#[test]
fn disjoint_noise_prefers_shallow_depth() {
    init_logging();
    for seed in [10u64, 11, 12] {
        let top = noise(120, 120, seed);
        let bottom = noise(120, 120, seed + 1000);
        let depth = search(&top, &bottom, &SearchConfig::default());
        assert!(depth < 30, "seed {seed}: disjoint noise picked depth {depth}");
    }
}

#[test]
fn refine_stays_in_window_on_noise() {
    init_logging();
    let top = noise(64, 80, 20);
    let bottom = noise(64, 80, 21);
    let config = SearchConfig::default();
    let sampling = ColumnSampling::between(&top, &bottom, config.column_samples);
    for coarse in 1..=80 {
        let depth = refine(&top, &bottom, coarse, sampling, 80, &config);
        assert!(refine_window(coarse, 8, 80).contains(&depth));
        assert!((1..=80).contains(&depth));
    }
}

#[test]
fn page_is_rebuilt_from_captures() {
    init_logging();
    let width = 80;
    let captures = scroll_capture(width, 150, 90, 4, 30);
    let page = noise(width, 150 + 90 * 3, 30);

    let overlaps = detect_overlaps(&captures, &SearchConfig::default()).unwrap();
    assert_eq!(overlaps, vec![60, 60, 60]);

    let stitched = assemble(&captures, &overlaps).unwrap();
    assert_eq!(stitched.plan.composite_height, page.height());
    assert_eq!(stitched.plan.seam_positions, vec![90, 180, 270]);
    assert_eq!(
        stitched.composite.as_rgba().as_raw(),
        page.as_rgba().as_raw()
    );
}
