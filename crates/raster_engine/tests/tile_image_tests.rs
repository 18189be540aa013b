//! Tests for TileImage storage

use pretty_assertions::assert_eq;
use raster_engine::{BitDepth, EngineError, Pixel, PixelSurface, TILE_SIZE, TileImage, TileLimits};

#[test]
fn test_fresh_image_has_no_tiles() {
    let img = TileImage::new(300, 200, BitDepth::Eight).unwrap();
    assert_eq!(img.tiles_x(), 5);
    assert_eq!(img.tiles_y(), 4);
    assert_eq!(img.allocated_tile_count(), 0);
    assert_eq!(img.get_pixel(150, 100), Pixel::TRANSPARENT);
    assert_eq!(img.get_pixel(299, 199), Pixel::TRANSPARENT);
}

#[test]
fn test_invalid_dimensions() {
    assert_eq!(
        TileImage::new(0, 10, BitDepth::Eight).unwrap_err(),
        EngineError::InvalidDimensions { width: 0, height: 10 }
    );
    assert!(TileImage::new(10, -1, BitDepth::Sixteen).is_err());
}

#[test]
fn test_set_get_across_tile_boundaries() {
    for depth in [BitDepth::Eight, BitDepth::Sixteen] {
        let mut img = TileImage::new(130, 130, depth).unwrap();
        let positions = [(0, 0), (63, 63), (64, 63), (63, 64), (64, 64), (127, 0), (128, 129), (129, 129)];

        for (i, &(x, y)) in positions.iter().enumerate() {
            let v = (i as u16 + 1) * 20;
            img.set_pixel(x, y, Pixel::new(v, v + 1, v + 2, depth.max_value())).unwrap();
        }
        for (i, &(x, y)) in positions.iter().enumerate() {
            let v = (i as u16 + 1) * 20;
            assert_eq!(img.get_pixel(x, y), Pixel::new(v, v + 1, v + 2, depth.max_value()), "{depth} at ({x}, {y})");
        }

        // (0,0) (1,0) (0,1) (1,1) (2,2)
        assert_eq!(img.allocated_tile_count(), 5);
        assert!(img.is_tile_allocated(2, 2));
        assert!(!img.is_tile_allocated(0, 2));
    }
}

#[test]
fn test_sixteen_bit_keeps_full_precision() {
    let mut img = TileImage::new(10, 10, BitDepth::Sixteen).unwrap();
    let px = Pixel::new(0x1234, 0xFFFE, 0x0001, 0x8001);
    img.set_pixel(3, 4, px).unwrap();
    assert_eq!(img.get_pixel(3, 4), px);
}

#[test]
fn test_wide_values_saturate_in_eight_bit_image() {
    let mut img = TileImage::new(4, 4, BitDepth::Eight).unwrap();
    img.set_pixel(1, 1, Pixel::new(0x1234, 0x00FF, 0x0100, 0xFFFF)).unwrap();
    assert_eq!(img.get_pixel(1, 1), Pixel::rgba8(255, 255, 255, 255));
}

#[test]
fn test_out_of_range_access() {
    let mut img = TileImage::new(10, 10, BitDepth::Eight).unwrap();
    img.set_pixel(-1, 0, Pixel::rgba8(1, 2, 3, 4)).unwrap();
    img.set_pixel(10, 0, Pixel::rgba8(1, 2, 3, 4)).unwrap();
    img.set_pixel(0, 10, Pixel::rgba8(1, 2, 3, 4)).unwrap();
    assert_eq!(img.allocated_tile_count(), 0);
    assert_eq!(img.get_pixel(-5, -5), Pixel::TRANSPARENT);
    assert_eq!(img.get_pixel(100, 3), Pixel::TRANSPARENT);
}

#[test]
fn test_tile_budget_failure_leaves_tile_absent() {
    let _ = env_logger::builder().is_test(true).try_init();
    let limits = TileLimits::none().with_max_tiles(1);
    let mut img = TileImage::with_limits(200, 64, BitDepth::Eight, limits).unwrap();

    img.set_pixel(0, 0, Pixel::rgba8(255, 0, 0, 255)).unwrap();
    let err = img.set_pixel(100, 0, Pixel::rgba8(0, 255, 0, 255)).unwrap_err();

    assert!(err.is_allocation_failure());
    assert!(matches!(err, EngineError::TileAllocation { tile_x: 1, tile_y: 0, .. }));
    assert!(!img.is_tile_allocated(1, 0));
    assert_eq!(img.allocated_tile_count(), 1);
    assert_eq!(img.get_pixel(100, 0), Pixel::TRANSPARENT);
    assert_eq!(img.get_pixel(0, 0), Pixel::rgba8(255, 0, 0, 255));

    // writes into an existing tile still work
    img.set_pixel(5, 5, Pixel::rgba8(1, 1, 1, 1)).unwrap();
}

#[test]
fn test_free_transparent_tiles() {
    let mut img = TileImage::new(TILE_SIZE * 2, TILE_SIZE, BitDepth::Eight).unwrap();
    img.set_pixel(1, 1, Pixel::rgba8(10, 10, 10, 0)).unwrap();
    img.set_pixel(TILE_SIZE + 1, 1, Pixel::rgba8(10, 10, 10, 1)).unwrap();
    assert_eq!(img.allocated_tile_count(), 2);

    assert_eq!(img.free_transparent_tiles(), 1);
    assert!(!img.is_tile_allocated(0, 0));
    assert!(img.is_tile_allocated(1, 0));

    img.free_tile(1, 0);
    assert_eq!(img.allocated_tile_count(), 0);
    assert_eq!(img.get_pixel(TILE_SIZE + 1, 1), Pixel::TRANSPARENT);
}

#[test]
fn test_clear_and_snapshot() {
    let mut img = TileImage::new(100, 100, BitDepth::Eight).unwrap();
    img.set_pixel(70, 70, Pixel::rgba8(9, 8, 7, 255)).unwrap();

    let snapshot = img.clone();
    img.clear();

    assert_eq!(img.allocated_tile_count(), 0);
    assert_eq!(img.get_pixel(70, 70), Pixel::TRANSPARENT);
    assert_eq!(snapshot.get_pixel(70, 70), Pixel::rgba8(9, 8, 7, 255));
}

#[test]
fn test_rows_round_trip() {
    let mut img = TileImage::new(3, 2, BitDepth::Eight).unwrap();
    let row = [1, 2, 3, 255, 4, 5, 6, 128, 7, 8, 9, 0];
    img.write_row(1, &row).unwrap();

    assert_eq!(img.get_pixel(1, 1), Pixel::rgba8(4, 5, 6, 128));

    let mut back = [0xEE; 12];
    img.read_row(1, &mut back);
    assert_eq!(back, row);

    img.read_row(0, &mut back);
    assert_eq!(back, [0; 12]);
}

#[test]
fn test_surface_trait_object() {
    let mut img = TileImage::new(8, 8, BitDepth::Eight).unwrap();
    let surface: &mut dyn PixelSurface = &mut img;

    assert_eq!(surface.bounds().width(), 8);
    assert!(surface.is_valid(7, 7));
    assert!(!surface.is_valid(8, 0));
    surface.set_pixel(2, 2, Pixel::rgba8(1, 2, 3, 4)).unwrap();
    assert_eq!(surface.get_pixel(2, 2), Pixel::rgba8(1, 2, 3, 4));
}

#[test]
fn test_limits_from_toml() {
    let limits: TileLimits = toml::from_str("max_tiles = 12").unwrap();
    assert_eq!(limits, TileLimits::none().with_max_tiles(12));

    let limits: TileLimits = toml::from_str("").unwrap();
    assert_eq!(limits.max_tiles, None);
}
