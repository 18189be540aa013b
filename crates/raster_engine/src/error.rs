//! Unified error types for raster_engine

use thiserror::Error;

use crate::BitDepth;

/// Main error type for raster_engine operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    // === Storage Errors ===
    #[error("Failed to allocate tile ({tile_x}, {tile_y}): {bytes} bytes")]
    TileAllocation { tile_x: i32, tile_y: i32, bytes: usize },

    #[error("Invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    // === Tool Errors ===
    #[error("Failed to allocate a {width}x{height} fill region")]
    RegionAllocation { width: i32, height: i32 },

    #[error("Bit depth mismatch: expected {expected}, got {actual}")]
    DepthMismatch { expected: BitDepth, actual: BitDepth },
}

/// Result type alias for raster_engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    /// Whether this error reports an out-of-memory condition
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, Self::TileAllocation { .. } | Self::RegionAllocation { .. })
    }
}
