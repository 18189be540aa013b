use serde::{Deserialize, Serialize};

/// Bits per channel of an image's internal RGBA representation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitDepth {
    #[default]
    Eight,
    Sixteen,
}

impl std::fmt::Display for BitDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

impl BitDepth {
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(BitDepth::Eight),
            16 => Some(BitDepth::Sixteen),
            _ => None,
        }
    }

    pub const fn bits(self) -> u8 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
        }
    }

    /// Largest channel value (fully opaque alpha).
    pub const fn max_value(self) -> u16 {
        match self {
            BitDepth::Eight => 0xFF,
            BitDepth::Sixteen => 0xFFFF,
        }
    }

    /// Bytes of one channel sample.
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            BitDepth::Eight => 1,
            BitDepth::Sixteen => 2,
        }
    }

    /// Bytes of one RGBA pixel.
    pub const fn bytes_per_pixel(self) -> usize {
        self.bytes_per_sample() * 4
    }
}

/// An RGBA pixel in the scale of the image it belongs to
/// (`0..=255` for 8-bit images, `0..=65535` for 16-bit images).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pixel {
    pub r: u16,
    pub g: u16,
    pub b: u16,
    pub a: u16,
}

impl Pixel {
    /// Background value of every absent tile.
    pub const TRANSPARENT: Pixel = Pixel { r: 0, g: 0, b: 0, a: 0 };

    pub const fn new(r: u16, g: u16, b: u16, a: u16) -> Self {
        Pixel { r, g, b, a }
    }

    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Pixel::new(r as u16, g as u16, b as u16, a as u16)
    }

    pub fn to_array(self) -> [u16; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_array(channels: [u16; 4]) -> Self {
        Pixel::new(channels[0], channels[1], channels[2], channels[3])
    }

    /// Rescales an 8-bit pixel to 16-bit (`v * 257`) or the reverse (`v >> 8`).
    ///
    /// Channels above the source depth's range are clamped first.
    pub fn convert_depth(self, from: BitDepth, to: BitDepth) -> Self {
        match (from, to) {
            (BitDepth::Eight, BitDepth::Sixteen) => Pixel::from_array(self.to_array().map(|v| v.min(0xFF) * 257)),
            (BitDepth::Sixteen, BitDepth::Eight) => Pixel::from_array(self.to_array().map(|v| v >> 8)),
            _ => self,
        }
    }
}

impl std::fmt::Display for Pixel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}
