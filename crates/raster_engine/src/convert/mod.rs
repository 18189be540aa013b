//! Scanline conversion from decoded source encodings into RGB/RGBA rows.
//!
//! Decoders hand over one row at a time. A [`RowConverter`] (interleaved sources)
//! or [`PlanarConverter`] (channel-separated sources) is built once per image from
//! the source format and [`ConvertParams`]; the format is resolved into a single
//! strategy function at construction so converting a row never branches on it.
//!
//! Multi-byte source samples are host-endian, as produced by in-memory decoders.
//! 16-bit destination samples are written host-endian as well.
//!
//! Converters never allocate and never fail. Buffers that are too short or a
//! source bit depth the family does not support are caller bugs; they are checked
//! with `debug_assert!` and otherwise end in a slice index panic.
//!
//! # Example
//! ```
//! use raster_engine::convert::{ConvertFlags, ConvertParams, OutputKind, RowConverter, SourceFormat};
//!
//! let params = ConvertParams::new(2).with_output(OutputKind::Rgba).with_flags(ConvertFlags::SRC_BGR_ORDER);
//! let conv = RowConverter::new(SourceFormat::Rgb8, params);
//!
//! let mut row = [0u8; 8];
//! conv.convert(&[1, 2, 3, 4, 5, 6], &mut row);
//! assert_eq!(row, [3, 2, 1, 255, 6, 5, 4, 255]);
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::BitDepth;

mod interleaved;
mod planar;
mod util;

pub use util::{cmyk_to_rgb16, cmyk_to_rgb8, rgb8_to_rgba8_extend, rgbx8_to_gray1, rgbx8_to_gray8, rgbx8_to_rgb8, swap_rb_8};

bitflags! {
    /// Per-stream conversion options.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ConvertFlags: u32 {
        /// Invert sample values (CMYK ink conventions, 1-bit bitmaps).
        const REVERSE = 1 << 0;
        /// The source carries a trailing alpha sample.
        const SRC_ALPHA = 1 << 1;
        /// The source stores blue first (BGR / BGRA).
        const SRC_BGR_ORDER = 1 << 2;
        /// Source alpha is meaningless; output is forced opaque.
        const INVALID_ALPHA = 1 << 3;
    }
}

/// Shape of the destination row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// Keep the source's own channel layout (gray stays gray, CMYK stays CMYK, ...).
    #[default]
    None,
    Rgb,
    Rgba,
}

/// Interleaved source encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Gray with 1, 2, 4 or 8 bits per sample, MSB first.
    Gray { bits: u8 },
    /// 16-bit gray.
    Gray16,
    /// Palette indices with 1, 2, 4 or 8 bits per sample.
    Palette { bits: u8 },
    /// 16-bit `X/A:1 R:5 G:5 B:5`.
    Rgb555,
    /// RGB or BGR, 8 bits per channel.
    Rgb8,
    /// RGBA or BGRA, 8 bits per channel.
    Rgba8,
    /// RGB, or RGBA with [`ConvertFlags::SRC_ALPHA`], 16 bits per channel.
    Rgb16,
    Cmyk8,
    Cmyk16,
}

/// Channel-separated source encodings; one call per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlanarFormat {
    /// Channels: 0 = gray, 1 = alpha.
    GrayAlpha8,
    GrayAlpha16,
    /// Channels: 0 = R, 1 = G, 2 = B, 3 = A (with [`ConvertFlags::SRC_ALPHA`]).
    Rgb8,
    Rgb16,
    /// Channels: 0 = C, 1 = M, 2 = Y, 3 = K. Channel 3 must come last when
    /// converting to RGB/RGBA: it derives the color from the C/M/Y values the
    /// earlier calls left in the destination pixel.
    Cmyk8,
    Cmyk16,
}

impl PlanarFormat {
    pub fn channel_count(self, flags: ConvertFlags) -> usize {
        match self {
            PlanarFormat::GrayAlpha8 | PlanarFormat::GrayAlpha16 => 2,
            PlanarFormat::Rgb8 | PlanarFormat::Rgb16 => {
                if flags.contains(ConvertFlags::SRC_ALPHA) {
                    4
                } else {
                    3
                }
            }
            PlanarFormat::Cmyk8 | PlanarFormat::Cmyk16 => 4,
        }
    }
}

/// Immutable per-stream conversion settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvertParams<'a> {
    /// Pixels per row.
    pub width: usize,
    /// Destination channel depth; only 16-bit sources can produce 16-bit rows.
    pub dst_depth: BitDepth,
    pub output: OutputKind,
    pub flags: ConvertFlags,
    /// `R, G, B, A` byte quadruples, indexed by sample value.
    pub palette: Option<&'a [u8]>,
}

impl<'a> ConvertParams<'a> {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            dst_depth: BitDepth::Eight,
            output: OutputKind::None,
            flags: ConvertFlags::empty(),
            palette: None,
        }
    }

    pub fn with_dst_depth(mut self, depth: BitDepth) -> Self {
        self.dst_depth = depth;
        self
    }

    pub fn with_output(mut self, output: OutputKind) -> Self {
        self.output = output;
        self
    }

    pub fn with_flags(mut self, flags: ConvertFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_palette(mut self, palette: &'a [u8]) -> Self {
        self.palette = Some(palette);
        self
    }

    pub(crate) fn has(&self, flag: ConvertFlags) -> bool {
        self.flags.contains(flag)
    }

    pub(crate) fn to_8bit(&self) -> bool {
        self.dst_depth == BitDepth::Eight
    }
}

type RowFn = fn(&ConvertParams<'_>, u8, &[u8], &mut [u8]);
type ChannelFn = fn(&ConvertParams<'_>, usize, &[u8], &mut [u8]);

/// Converter for interleaved rows, bound to one source format.
#[derive(Clone, Copy)]
pub struct RowConverter<'a> {
    params: ConvertParams<'a>,
    format: SourceFormat,
    bits: u8,
    func: RowFn,
}

impl std::fmt::Debug for RowConverter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowConverter")
            .field("format", &self.format)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl<'a> RowConverter<'a> {
    pub fn new(format: SourceFormat, params: ConvertParams<'a>) -> Self {
        let (bits, func): (u8, RowFn) = match format {
            SourceFormat::Gray { bits } => (bits, interleaved::gray_1_2_4_8),
            SourceFormat::Gray16 => (16, interleaved::gray16),
            SourceFormat::Palette { bits } => (bits, interleaved::palette_1_2_4_8),
            SourceFormat::Rgb555 => (16, interleaved::rgb555),
            SourceFormat::Rgb8 => (8, interleaved::rgb8),
            SourceFormat::Rgba8 => (8, interleaved::rgba8),
            SourceFormat::Rgb16 => (16, interleaved::rgb_rgba16),
            SourceFormat::Cmyk8 => (8, interleaved::cmyk8),
            SourceFormat::Cmyk16 => (16, interleaved::cmyk16),
        };
        debug_assert!(
            matches!(format, SourceFormat::Gray16 | SourceFormat::Rgb16 | SourceFormat::Cmyk16) || params.dst_depth == BitDepth::Eight,
            "{format:?} only converts to 8-bit rows"
        );
        debug_assert!(
            !matches!(format, SourceFormat::Gray { .. } | SourceFormat::Palette { .. }) || matches!(bits, 1 | 2 | 4 | 8),
            "unsupported sample size {bits} for {format:?}"
        );
        Self { params, format, bits, func }
    }

    pub fn params(&self) -> &ConvertParams<'a> {
        &self.params
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    /// Converts one row from `src` into `dst`.
    pub fn convert(&self, src: &[u8], dst: &mut [u8]) {
        (self.func)(&self.params, self.bits, src, dst);
    }
}

/// Converter for channel-separated rows, bound to one source format.
#[derive(Clone, Copy)]
pub struct PlanarConverter<'a> {
    params: ConvertParams<'a>,
    format: PlanarFormat,
    func: ChannelFn,
}

impl std::fmt::Debug for PlanarConverter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanarConverter")
            .field("format", &self.format)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl<'a> PlanarConverter<'a> {
    pub fn new(format: PlanarFormat, params: ConvertParams<'a>) -> Self {
        let func: ChannelFn = match format {
            PlanarFormat::GrayAlpha8 => planar::gray_alpha8,
            PlanarFormat::GrayAlpha16 => planar::gray_alpha16,
            PlanarFormat::Rgb8 => planar::rgb_rgba8,
            PlanarFormat::Rgb16 => planar::rgb_rgba16,
            PlanarFormat::Cmyk8 => planar::cmyk8,
            PlanarFormat::Cmyk16 => planar::cmyk16,
        };
        debug_assert!(
            matches!(format, PlanarFormat::GrayAlpha16 | PlanarFormat::Rgb16 | PlanarFormat::Cmyk16) || params.dst_depth == BitDepth::Eight,
            "{format:?} only converts to 8-bit rows"
        );
        Self { params, format, func }
    }

    pub fn params(&self) -> &ConvertParams<'a> {
        &self.params
    }

    pub fn format(&self) -> PlanarFormat {
        self.format
    }

    pub fn channel_count(&self) -> usize {
        self.format.channel_count(self.params.flags)
    }

    /// Writes one channel's row into the interleaved `dst` row.
    ///
    /// Bytes that belong to other channels are left alone, except that the
    /// channel-0 call of an RGB source without alpha fills in opaque alpha.
    pub fn convert_channel(&self, channel: usize, src: &[u8], dst: &mut [u8]) {
        debug_assert!(channel < 4, "channel index {channel} out of range");
        (self.func)(&self.params, channel, src, dst);
    }

    /// Converts all channels of one row in order.
    pub fn convert_planes(&self, planes: &[&[u8]], dst: &mut [u8]) {
        for (channel, plane) in planes.iter().enumerate() {
            self.convert_channel(channel, plane, dst);
        }
    }
}

/// One-off interleaved conversion.
pub fn convert_row(format: SourceFormat, params: &ConvertParams<'_>, src: &[u8], dst: &mut [u8]) {
    RowConverter::new(format, *params).convert(src, dst);
}

/// One-off planar conversion of a single channel.
pub fn convert_channel(format: PlanarFormat, params: &ConvertParams<'_>, channel: usize, src: &[u8], dst: &mut [u8]) {
    PlanarConverter::new(format, *params).convert_channel(channel, src, dst);
}

/// Bytes per destination row for the given parameters and source layout.
///
/// `native_channels` is the channel count the source keeps under [`OutputKind::None`].
pub fn dst_row_bytes(params: &ConvertParams<'_>, native_channels: usize) -> usize {
    let channels = match params.output {
        OutputKind::None => native_channels,
        OutputKind::Rgb => 3,
        OutputKind::Rgba => 4,
    };
    params.width * channels * params.dst_depth.bytes_per_sample()
}
