//! Tests for the anti-aliasing filter

mod common;

use common::TestSurface;
use pretty_assertions::assert_eq;
use raster_engine_edit::filter::{AntialiasingFilter, FilterStats, similar};
use raster_engine_edit::{AntialiasSettings, BitDepth, EngineError, Pixel, PixelSurface, ProgressFn, Rectangle, TileImage};

const WHITE: Pixel = Pixel::rgba8(255, 255, 255, 255);
const BLACK: Pixel = Pixel::rgba8(0, 0, 0, 255);

/// Black above the main diagonal, white on and below it
fn staircase(size: i32, depth: BitDepth) -> TestSurface {
    let max = depth.max_value();
    TestSurface::from_fn(size, size, depth, |x, y| {
        if x > y { Pixel::new(0, 0, 0, max) } else { Pixel::new(max, max, max, max) }
    })
}

#[test]
fn test_similar_buckets() {
    let d = BitDepth::Eight;
    assert!(similar(d, Pixel::rgba8(255, 0, 0, 255), Pixel::rgba8(252, 3, 1, 255)));
    assert!(!similar(d, Pixel::rgba8(255, 0, 0, 255), Pixel::rgba8(251, 0, 0, 255)));
    assert!(similar(d, Pixel::rgba8(255, 0, 0, 255), Pixel::rgba8(255, 0, 0, 1)));
    assert!(similar(d, Pixel::rgba8(1, 2, 3, 0), Pixel::rgba8(200, 100, 0, 0)));
    assert!(!similar(d, Pixel::rgba8(0, 0, 0, 0), Pixel::rgba8(0, 0, 0, 255)));

    let d = BitDepth::Sixteen;
    assert!(similar(d, Pixel::new(0xFFFF, 0, 0, 0xFFFF), Pixel::new(0xFE00, 0x01FF, 0, 0xFFFF)));
    assert!(!similar(d, Pixel::new(0xFFFF, 0, 0, 0xFFFF), Pixel::new(0xFDFF, 0, 0, 0xFFFF)));
}

#[test]
fn test_uniform_region_writes_nothing() {
    let src = TestSurface::from_fn(16, 16, BitDepth::Eight, |_, _| Pixel::rgba8(100, 150, 200, 255));
    let mut dst = src.clone();

    let stats = AntialiasingFilter::new(100).apply(&src, &mut dst, src.bounds(), None).unwrap();

    assert_eq!(stats, FilterStats::default());
    assert_eq!(dst.total_writes(), 0);
}

#[test]
fn test_staircase_is_smoothed() {
    let src = staircase(16, BitDepth::Eight);
    let mut dst = src.clone();

    let stats = AntialiasingFilter::default().apply(&src, &mut dst, src.bounds(), None).unwrap();

    assert!(stats.pixels_written > 0);
    assert_eq!(stats.pixels_written as u32, dst.total_writes());
    for (x, y) in dst.written() {
        assert!((x - y).abs() <= 2, "write far from the edge at ({x}, {y})");
        let px = dst.get_pixel(x, y);
        assert!(px.r > 0 && px.r < 255, "({x}, {y}) is not a blend: {px}");
        assert_eq!(px.a, 255);
    }

    // the source stays untouched
    assert_eq!(src.get_pixel(1, 0), BLACK);
    assert_eq!(src.get_pixel(0, 0), WHITE);
}

#[test]
fn test_staircase_sixteen_bit() {
    let src = staircase(16, BitDepth::Sixteen);
    let mut dst = src.clone();

    let stats = AntialiasingFilter::new(80).apply(&src, &mut dst, src.bounds(), None).unwrap();

    assert!(stats.pixels_written > 0);
    for (x, y) in dst.written() {
        let px = dst.get_pixel(x, y);
        assert!(px.r > 0 && px.r < 0xFFFF);
    }
}

#[test]
fn test_sixteen_bit_single_step_blend() {
    let white = Pixel::new(0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF);
    let black = Pixel::new(0, 0, 0, 0xFFFF);
    let src = TestSurface::from_fn(2, 2, BitDepth::Sixteen, |x, y| if (x, y) == (1, 0) { black } else { white });
    let mut dst = src.clone();

    let stats = AntialiasingFilter::new(100).apply(&src, &mut dst, src.bounds(), None).unwrap();

    assert_eq!(stats.pixels_written, 1);
    assert_eq!(dst.written(), vec![(1, 0)]);
    assert_eq!(dst.get_pixel(1, 0), Pixel::new(0x4000, 0x4000, 0x4000, 0xFFFF));
}

#[test]
fn test_zero_strength_writes_nothing() {
    let src = staircase(16, BitDepth::Eight);
    let mut dst = src.clone();

    let stats = AntialiasingFilter::new(0).apply(&src, &mut dst, src.bounds(), None).unwrap();
    assert_eq!(stats.pixels_written, 0);
}

#[test]
fn test_rect_outside_image() {
    let src = staircase(8, BitDepth::Eight);
    let mut dst = src.clone();

    let stats = AntialiasingFilter::new(100)
        .apply(&src, &mut dst, Rectangle::from(20, 20, 5, 5), None)
        .unwrap();
    assert_eq!(stats.pixels_written, 0);
}

#[test]
fn test_oversized_rect_is_clipped() {
    let src = staircase(8, BitDepth::Eight);
    let mut clipped = src.clone();
    let mut oversized = src.clone();

    let expected = AntialiasingFilter::new(100).apply(&src, &mut clipped, Rectangle::from(1, 1, 7, 7), None).unwrap();
    let stats = AntialiasingFilter::new(100)
        .apply(&src, &mut oversized, Rectangle::from(1, 1, i32::MAX, i32::MAX), None)
        .unwrap();

    assert!(stats.pixels_written > 0);
    assert_eq!(stats, expected);
    assert_eq!(oversized.written(), clipped.written());
}

#[test]
fn test_depth_mismatch() {
    let src = staircase(8, BitDepth::Eight);
    let mut dst = TileImage::new(8, 8, BitDepth::Sixteen).unwrap();

    let err = AntialiasingFilter::default().apply(&src, &mut dst, src.bounds(), None).unwrap_err();
    assert!(matches!(err, EngineError::DepthMismatch { .. }));
}

#[test]
fn test_apply_in_place() {
    let mut img = TileImage::new(32, 32, BitDepth::Eight).unwrap();
    for y in 0..32 {
        for x in 0..32 {
            img.set_pixel(x, y, if x > y { BLACK } else { WHITE }).unwrap();
        }
    }
    let before = img.clone();

    let stats = AntialiasingFilter::default().apply_in_place(&mut img, Rectangle::from(0, 0, 32, 32), None).unwrap();

    assert!(stats.pixels_written > 0);
    let changed = (0..32).flat_map(|y| (0..32).map(move |x| (x, y))).filter(|&(x, y)| img.get_pixel(x, y) != before.get_pixel(x, y)).count();
    assert!(changed > 0);
    assert_eq!(img.get_pixel(31, 0), BLACK);
    assert_eq!(img.get_pixel(0, 31), WHITE);
}

#[test]
fn test_progress_per_row() {
    let src = staircase(11, BitDepth::Eight);
    let mut dst = src.clone();
    let mut values = Vec::new();

    {
        let progress: ProgressFn = &mut |p| values.push(p);
        AntialiasingFilter::default().apply(&src, &mut dst, src.bounds(), Some(progress)).unwrap();
    }

    // 10 block rows
    assert_eq!(values, (0..=10).map(|i| i * 10).collect::<Vec<u8>>());
}

#[test]
fn test_settings() {
    let settings: AntialiasSettings = toml::from_str("").unwrap();
    assert_eq!(settings.strength, 50);

    let settings: AntialiasSettings = toml::from_str("strength = 75").unwrap();
    assert_eq!(AntialiasingFilter::from_settings(&settings).strength(), 75);

    assert_eq!(AntialiasingFilter::new(150).strength(), 100);
    assert_eq!(AntialiasingFilter::default(), AntialiasingFilter::new(50));
}
