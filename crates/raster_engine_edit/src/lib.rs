#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::return_self_not_must_use,
    clippy::similar_names
)]
//! Editing tools that work on any [`PixelSurface`]: seed fill and pixel filters.

pub mod fill;
pub mod filter;

mod settings;
pub use settings::*;

// Re-export the engine types the tools are driven with
pub use raster_engine::{BitDepth, EngineError, Pixel, PixelSurface, Position, ProgressFn, Rectangle, Result, TileImage};
