//! Benchmarks for seed fill and anti-aliasing
//!
//! Tests:
//! - Region collection on an open canvas and on a maze-like reference
//! - Full fill (collect + paint) into a fresh tile image
//! - Anti-aliasing a diagonal edge

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use raster_engine_edit::fill::{DrawFill, FillMode};
use raster_engine_edit::filter::AntialiasingFilter;
use raster_engine_edit::{BitDepth, Pixel, PixelSurface, TileImage};
use std::hint::black_box;

const SIZE: i32 = 512;

fn open_canvas() -> TileImage {
    TileImage::new(SIZE, SIZE, BitDepth::Eight).unwrap()
}

/// Horizontal walls with one gap each, alternating sides
fn maze() -> TileImage {
    let mut img = open_canvas();
    for y in (4..SIZE).step_by(4) {
        let gap = if (y / 4) % 2 == 0 { 0 } else { SIZE - 1 };
        for x in 0..SIZE {
            if x != gap {
                img.set_pixel(x, y, Pixel::rgba8(0, 0, 0, 255)).unwrap();
            }
        }
    }
    img
}

fn diagonal() -> TileImage {
    let mut img = open_canvas();
    for y in 0..SIZE {
        for x in 0..SIZE {
            let px = if x > y / 2 { Pixel::rgba8(0, 0, 0, 255) } else { Pixel::rgba8(255, 255, 255, 255) };
            img.set_pixel(x, y, px).unwrap();
        }
    }
    img
}

fn bench_collect_region(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect_region");
    group.throughput(Throughput::Elements((SIZE * SIZE) as u64));

    let canvas = open_canvas();
    group.bench_function("open_canvas", |b| {
        b.iter(|| black_box(DrawFill::new(&canvas, (SIZE / 2, SIZE / 2), FillMode::Rgb, 0, 100).collect_region()))
    });

    let maze = maze();
    group.bench_function("maze", |b| {
        b.iter(|| black_box(DrawFill::new(&maze, (1, 1), FillMode::Rgb, 0, 100).collect_region()))
    });

    group.finish();
}

fn bench_fill(c: &mut Criterion) {
    let reference = open_canvas();

    c.bench_function("fill_open_canvas", |b| {
        b.iter(|| {
            let mut dst = open_canvas();
            let stats = DrawFill::new(&reference, (0, 0), FillMode::Canvas, 0, 80)
                .run(&mut dst, Pixel::rgba8(255, 0, 0, 255))
                .unwrap();
            black_box(stats)
        })
    });
}

fn bench_antialias(c: &mut Criterion) {
    let src = diagonal();
    let filter = AntialiasingFilter::default();

    c.bench_function("antialias_diagonal", |b| {
        b.iter(|| {
            let mut dst = src.clone();
            black_box(filter.apply(&src, &mut dst, src.bounds(), None).unwrap())
        })
    });
}

criterion_group!(benches, bench_collect_region, bench_fill, bench_antialias);
criterion_main!(benches);
