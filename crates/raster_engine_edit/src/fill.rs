//! Seed fill
//!
//! A fill runs in two phases. [`DrawFill::collect_region`] samples the reference
//! surface and records every member pixel in a per-run mask; [`FillRegion::paint`]
//! then composites the draw color onto the destination at each member. Because
//! the region owns its mask, reference and destination may be the same image.
//!
//! ```
//! use raster_engine::{BitDepth, Pixel, TileImage};
//! use raster_engine_edit::fill::{DrawFill, FillMode};
//!
//! let mut img = TileImage::new(16, 16, BitDepth::Eight).unwrap();
//! let region = DrawFill::new(&img, (3, 3), FillMode::Canvas, 0, 100).collect_region().unwrap();
//! let stats = region.paint(&mut img, Pixel::rgba8(255, 0, 0, 255), None).unwrap();
//!
//! assert_eq!(stats.pixels, 256);
//! assert_eq!(img.get_pixel(15, 15), Pixel::rgba8(255, 0, 0, 255));
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use raster_engine::{BitDepth, EngineError, Pixel, PixelSurface, Position, ProgressFn, ProgressReporter, Rectangle, Result, composite_alpha, composite_over};

use crate::FillSettings;

/// How a fill decides which pixels belong to the region and what it writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FillMode {
    /// Pixels whose color is within tolerance of the seed color.
    #[default]
    Rgb = 0,
    /// Pixels whose alpha is within tolerance of the seed alpha.
    TransparentAuto = 1,
    /// Pixels that are transparent exactly when the seed is.
    Transparent = 2,
    /// Like [`FillMode::TransparentAuto`], but only the destination alpha is written.
    Alpha = 3,
    /// Everything reachable from the seed; only the image edges bound the fill.
    Canvas = 4,
    /// Every pixel of the image, seed and reference ignored.
    Opaque = 100,
}

impl FillMode {
    /// Whether the fill writes only the alpha channel.
    pub fn is_alpha_only(self) -> bool {
        matches!(self, FillMode::Alpha)
    }

    /// Whether region membership depends on sampled reference pixels.
    pub fn samples_reference(self) -> bool {
        !matches!(self, FillMode::Canvas | FillMode::Opaque)
    }
}

/// Outcome of a fill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FillStats {
    /// Number of pixels painted.
    pub pixels: usize,
    /// Bounding box of the painted pixels; empty when nothing was painted.
    pub bounds: Rectangle,
}

/// One fill operation against a reference surface.
pub struct DrawFill<'a, R: PixelSurface + ?Sized> {
    reference: &'a R,
    start: Position,
    mode: FillMode,
    color_diff: u8,
    density: u8,
}

impl<'a, R: PixelSurface + ?Sized> DrawFill<'a, R> {
    /// `color_diff` and `density` are percentages and are clamped to `0..=100`.
    pub fn new(reference: &'a R, start: impl Into<Position>, mode: FillMode, color_diff: u8, density: u8) -> Self {
        Self {
            reference,
            start: start.into(),
            mode,
            color_diff: color_diff.min(100),
            density: density.min(100),
        }
    }

    pub fn from_settings(reference: &'a R, start: impl Into<Position>, settings: &FillSettings) -> Self {
        Self::new(reference, start, settings.mode, settings.color_diff, settings.density)
    }

    pub fn mode(&self) -> FillMode {
        self.mode
    }

    pub fn start(&self) -> Position {
        self.start
    }

    /// Largest per-channel distance that still counts as a match, in the reference's scale.
    pub fn tolerance(&self) -> u32 {
        u32::from(self.color_diff) * u32::from(self.reference.bit_depth().max_value()) / 100
    }

    /// Determines the fill region without touching any destination.
    ///
    /// # Errors
    /// Fails with [`EngineError::RegionAllocation`] when the region mask for the
    /// reference extent cannot be allocated.
    pub fn collect_region(&self) -> Result<FillRegion> {
        let width = self.reference.width();
        let height = self.reference.height();
        let mut region = FillRegion::empty(width, height, self.reference.bit_depth(), self.mode, self.density)?;

        if self.mode == FillMode::Opaque {
            region.select_all();
            return Ok(region);
        }

        if !self.reference.is_valid(self.start.x, self.start.y) {
            log::debug!("fill seed {} lies outside the {}x{} reference", self.start, width, height);
            return Ok(region);
        }

        let seed = self.reference.get_pixel(self.start.x, self.start.y);
        let tolerance = self.tolerance();
        let is_member = |x: i32, y: i32| !self.mode.samples_reference() || self.matches(seed, self.reference.get_pixel(x, y), tolerance);

        let extent = self.reference.bounds();
        let mut queue = VecDeque::new();
        region.insert(self.start.x, self.start.y);
        queue.push_back((self.start.x, self.start.y));

        while let Some((x, y)) = queue.pop_front() {
            for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                let nx = x + dx;
                let ny = y + dy;

                if !extent.is_inside((nx, ny)) || region.contains(nx, ny) {
                    continue;
                }

                if is_member(nx, ny) {
                    region.insert(nx, ny);
                    queue.push_back((nx, ny));
                }
            }
        }

        log::debug!(
            "{:?} fill from {} selected {} pixels in {}",
            self.mode,
            self.start,
            region.len(),
            region.bounds()
        );
        Ok(region)
    }

    /// Fills `dst` with `color`.
    ///
    /// # Errors
    /// Fails with [`EngineError::DepthMismatch`] when `dst` and the reference differ in
    /// bit depth, and propagates allocation failures from `dst`.
    pub fn run<D: PixelSurface + ?Sized>(&self, dst: &mut D, color: Pixel) -> Result<FillStats> {
        self.run_with_progress(dst, color, None)
    }

    /// Like [`DrawFill::run`], reporting progress once per painted row.
    ///
    /// # Errors
    /// See [`DrawFill::run`].
    pub fn run_with_progress<D: PixelSurface + ?Sized>(&self, dst: &mut D, color: Pixel, progress: Option<ProgressFn<'_>>) -> Result<FillStats> {
        check_depth(self.reference.bit_depth(), dst.bit_depth())?;
        self.collect_region()?.paint(dst, color, progress)
    }

    fn matches(&self, seed: Pixel, px: Pixel, tolerance: u32) -> bool {
        let within = |a: u16, b: u16| u32::from(a.abs_diff(b)) <= tolerance;

        match self.mode {
            FillMode::Rgb => {
                (seed.a == 0 && px.a == 0) || (seed.a != 0 && px.a != 0 && within(seed.r, px.r) && within(seed.g, px.g) && within(seed.b, px.b))
            }
            FillMode::Transparent => (seed.a == 0) == (px.a == 0),
            FillMode::TransparentAuto | FillMode::Alpha => within(seed.a, px.a),
            FillMode::Canvas | FillMode::Opaque => true,
        }
    }
}

fn check_depth(expected: BitDepth, actual: BitDepth) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(EngineError::DepthMismatch { expected, actual })
    }
}

/// The pixels a fill will paint, as a bit mask over the reference extent.
#[derive(Clone, Debug)]
pub struct FillRegion {
    width: i32,
    height: i32,
    depth: BitDepth,
    mode: FillMode,
    density: u8,
    mask: Vec<u64>,
    count: usize,
    bounds: Rectangle,
}

impl FillRegion {
    fn empty(width: i32, height: i32, depth: BitDepth, mode: FillMode, density: u8) -> Result<Self> {
        let words = (width.max(0) as usize)
            .checked_mul(height.max(0) as usize)
            .map(|bits| bits.div_ceil(64))
            .ok_or(EngineError::RegionAllocation { width, height })?;

        let mut mask = Vec::new();
        if let Err(err) = mask.try_reserve_exact(words) {
            log::warn!("fill region mask of {words} words: {err}");
            return Err(EngineError::RegionAllocation { width, height });
        }
        mask.resize(words, 0);

        Ok(Self {
            width,
            height,
            depth,
            mode,
            density,
            mask,
            count: 0,
            bounds: Rectangle::default(),
        })
    }

    fn select_all(&mut self) {
        let bits = self.width.max(0) as usize * self.height.max(0) as usize;
        self.mask.fill(u64::MAX);
        if bits % 64 != 0 {
            if let Some(last) = self.mask.last_mut() {
                *last = (1u64 << (bits % 64)) - 1;
            }
        }
        self.count = bits;
        self.bounds = Rectangle::from(0, 0, self.width.max(0), self.height.max(0));
    }

    fn bit(&self, x: i32, y: i32) -> (usize, u64) {
        let index = y as usize * self.width as usize + x as usize;
        (index / 64, 1 << (index % 64))
    }

    fn insert(&mut self, x: i32, y: i32) {
        let (word, mask) = self.bit(x, y);
        self.mask[word] |= mask;
        self.count += 1;
        let pixel = Rectangle::from(x, y, 1, 1);
        self.bounds = self.bounds.union(&pixel);
    }

    /// Whether `(x, y)` belongs to the region.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        let (word, mask) = self.bit(x, y);
        self.mask[word] & mask != 0
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Bounding box of the member pixels.
    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn mode(&self) -> FillMode {
        self.mode
    }

    /// Composites `color` at `density` onto every member pixel of `dst`.
    ///
    /// Each member inside `dst` is written exactly once, row by row; members outside
    /// it are skipped and not counted. Progress is reported once per row of the
    /// region's bounding box.
    ///
    /// # Errors
    /// Fails with [`EngineError::DepthMismatch`] when `dst` has another bit depth than the
    /// reference, and stops at the first allocation failure of `dst`; pixels painted
    /// before that stay painted.
    pub fn paint<D: PixelSurface + ?Sized>(&self, dst: &mut D, color: Pixel, progress: Option<ProgressFn<'_>>) -> Result<FillStats> {
        check_depth(self.depth, dst.bit_depth())?;

        let opacity = u32::from(self.depth.max_value()) * u32::from(self.density) / 100;
        let blend: fn(Pixel, Pixel, u32, BitDepth) -> Pixel = if self.mode.is_alpha_only() { composite_alpha } else { composite_over };

        let mut reporter = ProgressReporter::new(progress, self.bounds.height().max(0) as u64);
        reporter.begin();

        let mut painted = 0;
        let mut bounds = Rectangle::default();
        for y in self.bounds.y_range() {
            let mut row: Option<(i32, i32)> = None;
            for x in self.bounds.x_range() {
                if !self.contains(x, y) || !dst.is_valid(x, y) {
                    continue;
                }
                let px = blend(color, dst.get_pixel(x, y), opacity, self.depth);
                if let Err(err) = dst.set_pixel(x, y, px) {
                    log::warn!("fill aborted after {painted} pixels: {err}");
                    return Err(err);
                }
                painted += 1;
                row = Some(row.map_or((x, x), |(first, _)| (first, x)));
            }
            if let Some((first, last)) = row {
                bounds = bounds.union(&Rectangle::from(first, y, last - first + 1, 1));
            }
            reporter.advance(1);
        }
        reporter.finish();

        Ok(FillStats { pixels: painted, bounds })
    }
}
