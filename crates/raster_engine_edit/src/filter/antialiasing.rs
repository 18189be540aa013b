//! Stair-step smoothing
//!
//! Every 2x2 block whose diagonals disagree marks a step of a jagged edge. The
//! flat runs leading into the step are traced along both axes and the colour
//! across the step is blended into them with an opacity that fades out along
//! the run.

use raster_engine::{BitDepth, EngineError, Pixel, PixelSurface, ProgressFn, ProgressReporter, Rectangle, Result, composite_over};

use super::FilterStats;
use crate::AntialiasSettings;

/// Quantized colour equality used by the filter.
///
/// Two transparent pixels are similar, a transparent and a visible pixel never are.
/// Visible pixels are similar when every RGB channel lands in the same bucket: the
/// low 2 bits (8-bit) or low 9 bits (16-bit) are ignored.
pub fn similar(depth: BitDepth, c1: Pixel, c2: Pixel) -> bool {
    let shift = match depth {
        BitDepth::Eight => 2,
        BitDepth::Sixteen => 9,
    };

    (c1.a == 0 && c2.a == 0) || (c1.a != 0 && c2.a != 0 && c1.r >> shift == c2.r >> shift && c1.g >> shift == c2.g >> shift && c1.b >> shift == c2.b >> shift)
}

/// Stair-step anti-aliasing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AntialiasingFilter {
    strength: u8,
}

impl Default for AntialiasingFilter {
    fn default() -> Self {
        Self::from_settings(&AntialiasSettings::default())
    }
}

impl AntialiasingFilter {
    /// `strength` is a percentage, clamped to `0..=100`.
    pub fn new(strength: u8) -> Self {
        Self { strength: strength.min(100) }
    }

    pub fn from_settings(settings: &AntialiasSettings) -> Self {
        Self::new(settings.strength)
    }

    pub fn strength(&self) -> u8 {
        self.strength
    }

    /// Blend opacity at the start of a run; full strength is half the channel range.
    fn base_opacity(&self, depth: BitDepth) -> i32 {
        match depth {
            BitDepth::Eight => (i32::from(self.strength) << 7) / 100,
            BitDepth::Sixteen => (i32::from(self.strength) << 15) / 100,
        }
    }

    /// Smooths `rect` of `src` into `dst`.
    ///
    /// All samples come from `src`; `dst` is only written. Blocks are anchored at every
    /// pixel of `rect` except the last column and row. Runs are traced inside `rect`,
    /// but the blend ramp may touch one pixel past its edge.
    ///
    /// # Errors
    /// Fails with [`EngineError::DepthMismatch`] when the two surfaces differ in bit
    /// depth, and propagates allocation failures from `dst`.
    pub fn apply<S, D>(&self, src: &S, dst: &mut D, rect: Rectangle, progress: Option<ProgressFn<'_>>) -> Result<FilterStats>
    where
        S: PixelSurface + ?Sized,
        D: PixelSurface + ?Sized,
    {
        let depth = src.bit_depth();
        if dst.bit_depth() != depth {
            return Err(EngineError::DepthMismatch {
                expected: depth,
                actual: dst.bit_depth(),
            });
        }

        let rect = rect.intersect(&src.bounds());
        if rect.is_empty() {
            return Ok(FilterStats::default());
        }

        let mut pass = Pass {
            src,
            depth,
            x1: rect.left(),
            y1: rect.top(),
            x2: rect.right() - 1,
            y2: rect.bottom() - 1,
            opacity: self.base_opacity(depth),
            short_run_penalty: match depth {
                BitDepth::Eight => 16,
                BitDepth::Sixteen => 3932,
            },
            written: 0,
        };

        log::debug!("anti-aliasing {rect} at strength {}", self.strength);
        let mut reporter = ProgressReporter::new(progress, (pass.y2 - pass.y1) as u64);
        reporter.begin();

        for y in pass.y1..pass.y2 {
            for x in pass.x1..pass.x2 {
                pass.block(dst, x, y)?;
            }
            reporter.advance(1);
        }
        reporter.finish();

        log::debug!("anti-aliasing wrote {} pixels", pass.written);
        Ok(FilterStats {
            pixels_written: pass.written,
        })
    }

    /// Smooths `rect` of `image` in place, sampling from a snapshot taken first.
    ///
    /// # Errors
    /// Propagates allocation failures from `image`.
    pub fn apply_in_place<S>(&self, image: &mut S, rect: Rectangle, progress: Option<ProgressFn<'_>>) -> Result<FilterStats>
    where
        S: PixelSurface + Clone,
    {
        let snapshot = image.clone();
        self.apply(&snapshot, image, rect, progress)
    }
}

/// Traced run lengths around one step.
#[derive(Clone, Copy, Debug, Default)]
struct Runs {
    up: i32,
    down: i32,
    left: i32,
    right: i32,
}

/// State of one filter pass; the rectangle bounds are inclusive.
struct Pass<'s, S: ?Sized> {
    src: &'s S,
    depth: BitDepth,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    opacity: i32,
    short_run_penalty: i32,
    written: usize,
}

impl<S: PixelSurface + ?Sized> Pass<'_, S> {
    fn px(&self, x: i32, y: i32) -> Pixel {
        self.src.get_pixel(x, y)
    }

    fn similar(&self, c1: Pixel, c2: Pixel) -> bool {
        similar(self.depth, c1, c2)
    }

    fn similar_at(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
        self.similar(self.px(x1, y1), self.px(x2, y2))
    }

    /// Classifies the block at `(x, y)` and smooths each differing diagonal.
    fn block<D: PixelSurface + ?Sized>(&mut self, dst: &mut D, x: i32, y: i32) -> Result<()> {
        let p00 = self.px(x, y);
        let p10 = self.px(x + 1, y);
        let p01 = self.px(x, y + 1);
        let p11 = self.px(x + 1, y + 1);

        let main = self.similar(p00, p11);
        let anti = self.similar(p10, p01);
        if main && anti && self.similar(p00, p01) {
            return Ok(());
        }

        if main {
            self.smooth(dst, x, y, false)?;
        }
        if anti {
            self.smooth(dst, x, y, true)?;
        }
        Ok(())
    }

    fn smooth<D: PixelSurface + ?Sized>(&mut self, dst: &mut D, x: i32, y: i32, right: bool) -> Result<()> {
        let runs = self.trace(x, y, right);
        self.draw(dst, x, y, right, runs)
    }

    /// Counts `(inner, outer)` steps while the inner pixel matches `edge` and the
    /// outer one does not.
    fn run_length(&self, edge: Pixel, steps: impl Iterator<Item = ((i32, i32), (i32, i32))>) -> i32 {
        let mut len = 0;
        for ((ix, iy), (ox, oy)) in steps {
            if self.similar(edge, self.px(ix, iy)) && !self.similar(edge, self.px(ox, oy)) {
                len += 1;
            } else {
                break;
            }
        }
        len
    }

    fn trace(&self, x: i32, y: i32, right: bool) -> Runs {
        let mut runs = Runs::default();

        // up
        let (x1, x2) = if right { (x + 1, x) } else { (x, x + 1) };
        if !self.similar_at(x1, y, x2, y) {
            let edge = self.px(x1, y);
            runs.up = self.run_length(edge, (self.y1..y).rev().map(|i| ((x1, i), (x2, i))));
        }

        // down
        let y1 = y + 1;
        let (x1, x2) = if right { (x, x + 1) } else { (x + 1, x) };
        if !self.similar_at(x1, y1, x2, y1) {
            let edge = self.px(x1, y1);
            runs.down = self.run_length(edge, (y + 2..=self.y2).map(|i| ((x1, i), (x2, i))));
        }

        // left
        let (y1, y2) = if right { (y + 1, y) } else { (y, y + 1) };
        if !self.similar_at(x, y1, x, y2) {
            let edge = self.px(x, y1);
            runs.left = self.run_length(edge, (self.x1..x).rev().map(|i| ((i, y1), (i, y2))));
        }

        // right
        let x1 = x + 1;
        let (y1, y2) = if right { (y, y + 1) } else { (y + 1, y) };
        if !self.similar_at(x1, y1, x1, y2) {
            let edge = self.px(x1, y1);
            runs.right = self.run_length(edge, (x + 2..=self.x2).map(|i| ((i, y1), (i, y2))));
        }

        runs
    }

    /// Start opacity of a ramp over `cnt` pixels.
    fn ramp_start(&self, cnt: i32) -> i32 {
        if cnt < 4 { self.opacity - self.short_run_penalty } else { self.opacity }
    }

    fn draw<D: PixelSurface + ?Sized>(&mut self, dst: &mut D, x: i32, y: i32, right: bool, runs: Runs) -> Result<()> {
        // up
        let (x1, x2) = if right { (x + 1, x) } else { (x, x + 1) };
        if runs.up == 0 {
            self.blend(dst, (x1, y), (x2, y), self.opacity >> 1)?;
        } else {
            let cnt = ((runs.up + 1) >> 1).min(y - self.y1 + 1);
            let a = self.ramp_start(cnt);
            for i in 0..=cnt {
                self.blend(dst, (x1, y), (x2, y - i), a - a * i / cnt)?;
            }
        }

        // down
        let y1 = y + 1;
        let (x1, x2) = if right { (x, x + 1) } else { (x + 1, x) };
        if runs.down == 0 {
            self.blend(dst, (x1, y1), (x2, y1), self.opacity >> 1)?;
        } else {
            let cnt = ((runs.down + 1) >> 1).min(self.y2 - y);
            let a = self.ramp_start(cnt);
            for i in 0..=cnt {
                self.blend(dst, (x1, y1), (x2, y1 + i), a - a * i / cnt)?;
            }
        }

        // left
        let (y1, y2) = if right { (y + 1, y) } else { (y, y + 1) };
        if runs.left != 0 {
            let cnt = ((runs.left + 1) >> 1).min(x - self.x1 + 1);
            let a = self.ramp_start(cnt);
            for i in 0..=cnt {
                self.blend(dst, (x, y1), (x - i, y2), a - a * i / cnt)?;
            }
        }

        // right
        let x1 = x + 1;
        let (y1, y2) = if right { (y, y + 1) } else { (y + 1, y) };
        if runs.right != 0 {
            let cnt = ((runs.right + 1) >> 1).min(self.x2 - x);
            let a = self.ramp_start(cnt);
            for i in 0..=cnt {
                self.blend(dst, (x1, y1), (x1 + i, y2), a - a * i / cnt)?;
            }
        }

        Ok(())
    }

    /// Blends the source colour at `from` over the source colour at `to` and writes
    /// the result to `to` in `dst`.
    fn blend<D: PixelSurface + ?Sized>(&mut self, dst: &mut D, from: (i32, i32), to: (i32, i32), opacity: i32) -> Result<()> {
        if opacity <= 0 {
            return Ok(());
        }

        let src = self.px(from.0, from.1);
        let base = self.px(to.0, to.1);
        if self.similar(src, base) {
            return Ok(());
        }

        dst.set_pixel(to.0, to.1, composite_over(src, base, opacity as u32, self.depth))?;
        self.written += 1;
        Ok(())
    }
}
