//! Pixel filters
//!
//! Filters read a snapshot of the source and write into a destination surface, so
//! results never feed back into later samples of the same pass.

mod antialiasing;
pub use antialiasing::*;

/// Outcome of a filter pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Number of pixel writes issued to the destination.
    pub pixels_written: usize,
}
