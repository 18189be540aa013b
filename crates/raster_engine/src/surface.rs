use crate::{BitDepth, Pixel, Rectangle, Result};

/// A trait for pixel targets that tools read from and draw on
///
/// Fill and filter algorithms only ever talk to this trait, so they work with
/// any raster without depending on how its pixels are stored.
pub trait PixelSurface {
    /// Width of the drawable area in pixels
    fn width(&self) -> i32;

    /// Height of the drawable area in pixels
    fn height(&self) -> i32;

    /// Channel depth; pixel values are in this depth's scale
    fn bit_depth(&self) -> BitDepth;

    /// Pixel at a position; transparent outside the surface
    fn get_pixel(&self, x: i32, y: i32) -> Pixel;

    /// Store a pixel; writes outside the surface are ignored
    ///
    /// # Errors
    /// Fails when backing storage for the pixel cannot be allocated.
    fn set_pixel(&mut self, x: i32, y: i32, pixel: Pixel) -> Result<()>;

    /// Check if a position is within bounds
    fn is_valid(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width() && y < self.height()
    }

    fn bounds(&self) -> Rectangle {
        Rectangle::from(0, 0, self.width(), self.height())
    }
}
