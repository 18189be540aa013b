//! Sparse RGBA raster built from lazily allocated square tiles.
//!
//! Untouched regions cost no memory: a tile slot stays empty until the first
//! write into it, and reading from an empty slot yields [`Pixel::TRANSPARENT`].

use byteorder::{ByteOrder, NativeEndian};
use serde::{Deserialize, Serialize};

use crate::{BitDepth, EngineError, Pixel, PixelSurface, Result};

/// Side length of a tile in pixels.
pub const TILE_SIZE: i32 = 64;

const TILE_PIXELS: usize = (TILE_SIZE * TILE_SIZE) as usize;

/// Allocation budget of a [`TileImage`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLimits {
    /// Maximum number of allocated tiles; `None` means unlimited.
    pub max_tiles: Option<usize>,
}

impl TileLimits {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_max_tiles(mut self, max: usize) -> Self {
        self.max_tiles = Some(max);
        self
    }
}

/// One allocated tile, pixels stored row-major in the image's depth.
#[derive(Clone, PartialEq, Eq)]
pub struct Tile {
    data: Box<[u8]>,
}

impl Tile {
    fn try_new(depth: BitDepth) -> std::result::Result<Self, std::collections::TryReserveError> {
        let len = TILE_PIXELS * depth.bytes_per_pixel();
        let mut data = Vec::new();
        data.try_reserve_exact(len)?;
        data.resize(len, 0);
        Ok(Self {
            data: data.into_boxed_slice(),
        })
    }

    /// Raw pixel bytes (16-bit samples are host-endian).
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Per-depth pixel codec, chosen once when the image is created.
#[derive(Clone, Copy)]
struct PixelAccess {
    read: fn(&[u8]) -> Pixel,
    write: fn(&mut [u8], Pixel),
}

const ACCESS_8: PixelAccess = PixelAccess {
    read: read_rgba8,
    write: write_rgba8,
};

const ACCESS_16: PixelAccess = PixelAccess {
    read: read_rgba16,
    write: write_rgba16,
};

fn read_rgba8(px: &[u8]) -> Pixel {
    Pixel::rgba8(px[0], px[1], px[2], px[3])
}

// 16-bit scale values saturate instead of wrapping
fn write_rgba8(px: &mut [u8], pixel: Pixel) {
    for (dst, v) in px[..4].iter_mut().zip(pixel.to_array()) {
        *dst = v.min(0xFF) as u8;
    }
}

fn read_rgba16(px: &[u8]) -> Pixel {
    let mut channels = [0; 4];
    NativeEndian::read_u16_into(&px[..8], &mut channels);
    Pixel::from_array(channels)
}

fn write_rgba16(px: &mut [u8], pixel: Pixel) {
    NativeEndian::write_u16_into(&pixel.to_array(), &mut px[..8]);
}

#[derive(Clone)]
pub struct TileImage {
    width: i32,
    height: i32,
    depth: BitDepth,
    tiles_x: i32,
    tiles_y: i32,
    tiles: Vec<Option<Tile>>,
    allocated: usize,
    limits: TileLimits,
    access: PixelAccess,
}

impl std::fmt::Debug for TileImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("depth", &self.depth)
            .field("allocated", &self.allocated)
            .finish_non_exhaustive()
    }
}

impl TileImage {
    /// Creates an empty image; no tile is allocated yet.
    ///
    /// # Errors
    /// Fails with [`EngineError::InvalidDimensions`] for non-positive sizes.
    pub fn new(width: i32, height: i32, depth: BitDepth) -> Result<Self> {
        Self::with_limits(width, height, depth, TileLimits::none())
    }

    /// Creates an empty image with an allocation budget.
    ///
    /// # Errors
    /// Fails with [`EngineError::InvalidDimensions`] for non-positive sizes.
    pub fn with_limits(width: i32, height: i32, depth: BitDepth, limits: TileLimits) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        let tiles_x = ((i64::from(width) + i64::from(TILE_SIZE) - 1) / i64::from(TILE_SIZE)) as i32;
        let tiles_y = ((i64::from(height) + i64::from(TILE_SIZE) - 1) / i64::from(TILE_SIZE)) as i32;
        let slot_count = tiles_x as usize * tiles_y as usize;

        let mut tiles = Vec::new();
        tiles
            .try_reserve_exact(slot_count)
            .map_err(|_| EngineError::InvalidDimensions { width, height })?;
        tiles.resize_with(slot_count, || None);

        let access = match depth {
            BitDepth::Eight => ACCESS_8,
            BitDepth::Sixteen => ACCESS_16,
        };

        Ok(Self {
            width,
            height,
            depth,
            tiles_x,
            tiles_y,
            tiles,
            allocated: 0,
            limits,
            access,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.depth
    }

    pub fn limits(&self) -> TileLimits {
        self.limits
    }

    /// Number of tile columns.
    pub fn tiles_x(&self) -> i32 {
        self.tiles_x
    }

    /// Number of tile rows.
    pub fn tiles_y(&self) -> i32 {
        self.tiles_y
    }

    pub fn allocated_tile_count(&self) -> usize {
        self.allocated
    }

    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub fn tile(&self, tile_x: i32, tile_y: i32) -> Option<&Tile> {
        self.slot_index(tile_x, tile_y).and_then(|index| self.tiles[index].as_ref())
    }

    pub fn is_tile_allocated(&self, tile_x: i32, tile_y: i32) -> bool {
        self.tile(tile_x, tile_y).is_some()
    }

    /// Pixel at `(x, y)`; transparent for absent tiles and out-of-range coordinates.
    pub fn get_pixel(&self, x: i32, y: i32) -> Pixel {
        if !self.is_in_bounds(x, y) {
            return Pixel::TRANSPARENT;
        }
        let (index, offset) = self.locate(x, y);
        match &self.tiles[index] {
            Some(tile) => (self.access.read)(&tile.data[offset..offset + self.depth.bytes_per_pixel()]),
            None => Pixel::TRANSPARENT,
        }
    }

    /// Stores a pixel, allocating its tile on first write.
    ///
    /// Out-of-range coordinates are ignored.
    ///
    /// # Errors
    /// Fails with [`EngineError::TileAllocation`] when the tile cannot be allocated;
    /// the image is left unchanged.
    pub fn set_pixel(&mut self, x: i32, y: i32, pixel: Pixel) -> Result<()> {
        if !self.is_in_bounds(x, y) {
            return Ok(());
        }
        let (index, offset) = self.locate(x, y);
        let bpp = self.depth.bytes_per_pixel();
        let write = self.access.write;
        let tile = self.ensure_tile(index)?;
        write(&mut tile.data[offset..offset + bpp], pixel);
        Ok(())
    }

    /// Drops one tile; its area reads as transparent again.
    pub fn free_tile(&mut self, tile_x: i32, tile_y: i32) {
        if let Some(index) = self.slot_index(tile_x, tile_y) {
            if self.tiles[index].take().is_some() {
                self.allocated -= 1;
            }
        }
    }

    /// Drops every allocated tile whose pixels all have zero alpha.
    ///
    /// Returns the number of released tiles.
    pub fn free_transparent_tiles(&mut self) -> usize {
        let bpp = self.depth.bytes_per_pixel();
        let read = self.access.read;
        let mut released = 0;
        for slot in &mut self.tiles {
            let empty = slot.as_ref().is_some_and(|tile| tile.data.chunks_exact(bpp).all(|px| read(px).a == 0));
            if empty {
                *slot = None;
                released += 1;
            }
        }
        self.allocated -= released;
        if released > 0 {
            log::debug!("released {released} transparent tiles, {} remain", self.allocated);
        }
        released
    }

    /// Drops all tiles.
    pub fn clear(&mut self) {
        self.tiles.iter_mut().for_each(|slot| *slot = None);
        self.allocated = 0;
    }

    /// Stores one row of packed RGBA pixels in this image's depth, starting at `x = 0`.
    ///
    /// This is the hand-off point for converter output; 16-bit samples are host-endian.
    /// Pixels beyond the image width are ignored.
    ///
    /// # Errors
    /// Fails when a tile cannot be allocated.
    pub fn write_row(&mut self, y: i32, row: &[u8]) -> Result<()> {
        let bpp = self.depth.bytes_per_pixel();
        let read = self.access.read;
        for (x, px) in row.chunks_exact(bpp).take(self.width as usize).enumerate() {
            self.set_pixel(x as i32, y, read(px))?;
        }
        Ok(())
    }

    /// Reads one row back as packed RGBA pixels in this image's depth.
    pub fn read_row(&self, y: i32, row: &mut [u8]) {
        let bpp = self.depth.bytes_per_pixel();
        let write = self.access.write;
        for (x, px) in row.chunks_exact_mut(bpp).take(self.width as usize).enumerate() {
            write(px, self.get_pixel(x as i32, y));
        }
    }

    fn slot_index(&self, tile_x: i32, tile_y: i32) -> Option<usize> {
        if tile_x < 0 || tile_y < 0 || tile_x >= self.tiles_x || tile_y >= self.tiles_y {
            return None;
        }
        Some((tile_y * self.tiles_x + tile_x) as usize)
    }

    /// Slot index and byte offset inside the tile; coordinates must be in bounds.
    fn locate(&self, x: i32, y: i32) -> (usize, usize) {
        let index = ((y / TILE_SIZE) * self.tiles_x + x / TILE_SIZE) as usize;
        let pixel = ((y % TILE_SIZE) * TILE_SIZE + x % TILE_SIZE) as usize;
        (index, pixel * self.depth.bytes_per_pixel())
    }

    fn ensure_tile(&mut self, index: usize) -> Result<&mut Tile> {
        let tile = match self.tiles[index].take() {
            Some(tile) => tile,
            None => self.allocate_tile(index)?,
        };
        Ok(self.tiles[index].insert(tile))
    }

    fn allocate_tile(&mut self, index: usize) -> Result<Tile> {
        let tile_x = index as i32 % self.tiles_x;
        let tile_y = index as i32 / self.tiles_x;
        let bytes = TILE_PIXELS * self.depth.bytes_per_pixel();

        if self.limits.max_tiles.is_some_and(|max| self.allocated >= max) {
            log::warn!("tile budget of {} tiles exhausted at tile ({tile_x}, {tile_y})", self.allocated);
            return Err(EngineError::TileAllocation { tile_x, tile_y, bytes });
        }

        let tile = Tile::try_new(self.depth).map_err(|err| {
            log::warn!("failed to allocate tile ({tile_x}, {tile_y}): {err}");
            EngineError::TileAllocation { tile_x, tile_y, bytes }
        })?;
        self.allocated += 1;
        log::trace!("allocated tile ({tile_x}, {tile_y}), {} in use", self.allocated);
        Ok(tile)
    }
}

impl PixelSurface for TileImage {
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
        TileImage::get_pixel(self, x, y)
    }

    fn set_pixel(&mut self, x: i32, y: i32, pixel: Pixel) -> Result<()> {
        TileImage::set_pixel(self, x, y, pixel)
    }
}
