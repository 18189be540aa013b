#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::too_many_lines,
    clippy::cast_lossless,
    clippy::cast_precision_loss,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::return_self_not_must_use
)]
//! Tiled raster storage and pixel format conversion for the paint engine.
//!
//! - [`TileImage`] - sparse RGBA raster built from lazily allocated 64x64 tiles
//! - [`PixelSurface`] - the get/set contract every tool works against
//! - [`convert`] - row converters from decoded scanlines into RGB/RGBA rows
//! - [`composite_over`] - the source-over blend shared by fill and filters

mod error;
pub use error::*;

mod position;
pub use position::*;

mod color;
pub use color::*;

mod blend;
pub use blend::*;

mod progress;
pub use progress::*;

mod surface;
pub use surface::*;

mod tile_image;
pub use tile_image::*;

pub mod convert;
