//! Common test surface for tool tests
#![allow(dead_code)]

use raster_engine_edit::{BitDepth, Pixel, PixelSurface, Result};

/// A dense surface that counts every write per pixel
pub struct TestSurface {
    width: i32,
    height: i32,
    depth: BitDepth,
    pixels: Vec<Pixel>,
    writes: Vec<u32>,
}

impl TestSurface {
    pub fn new(width: i32, height: i32, depth: BitDepth) -> Self {
        Self::from_fn(width, height, depth, |_, _| Pixel::TRANSPARENT)
    }

    pub fn from_fn(width: i32, height: i32, depth: BitDepth, f: impl Fn(i32, i32) -> Pixel) -> Self {
        let mut pixels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            depth,
            pixels,
            writes: vec![0; (width * height) as usize],
        }
    }

    pub fn writes_at(&self, x: i32, y: i32) -> u32 {
        self.writes[(y * self.width + x) as usize]
    }

    pub fn total_writes(&self) -> u32 {
        self.writes.iter().sum()
    }

    /// Positions written at least once, row-major
    pub fn written(&self) -> Vec<(i32, i32)> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.writes_at(x, y) > 0)
            .collect()
    }

    pub fn reset_writes(&mut self) {
        self.writes.fill(0);
    }
}

impl Clone for TestSurface {
    fn clone(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            depth: self.depth,
            pixels: self.pixels.clone(),
            writes: vec![0; self.writes.len()],
        }
    }
}

impl PixelSurface for TestSurface {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn bit_depth(&self) -> BitDepth {
        self.depth
    }

    fn get_pixel(&self, x: i32, y: i32) -> Pixel {
        if self.is_valid(x, y) {
            self.pixels[(y * self.width + x) as usize]
        } else {
            Pixel::TRANSPARENT
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, pixel: Pixel) -> Result<()> {
        if self.is_valid(x, y) {
            let index = (y * self.width + x) as usize;
            self.pixels[index] = pixel;
            self.writes[index] += 1;
        }
        Ok(())
    }
}
