//! Pixel format classification shared by the container catalogs.
//!
//! Each container maps its own format codes onto a [`PixelFormatInfo`]:
//! the canonical [`ColorMode`] a decoded surface is delivered in, and the
//! [`DecodeMethod`] the codec collaborator has to apply to the stored bytes.

use std::fmt;

/// Canonical color mode of a decoded surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ColorMode {
    /// Single luminance channel.
    L,
    /// Luminance + alpha.
    La,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
}

impl ColorMode {
    /// Number of 8-bit channels per pixel.
    pub const fn channels(self) -> usize {
        match self {
            ColorMode::L => 1,
            ColorMode::La => 2,
            ColorMode::Rgb => 3,
            ColorMode::Rgba => 4,
        }
    }

    /// Short name, e.g. `"RGBA"`.
    pub const fn name(self) -> &'static str {
        match self {
            ColorMode::L => "L",
            ColorMode::La => "LA",
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
        }
    }

    /// Whether the mode carries an alpha channel.
    pub const fn has_alpha(self) -> bool {
        matches!(self, ColorMode::La | ColorMode::Rgba)
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Byte order of one stored texel in a raw (uncompressed) surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RawLayout {
    L,
    /// Alpha only, delivered as luminance.
    A,
    La,
    /// Two-channel (UV) data, delivered as RGB with blue zeroed.
    Rg,
    Rgb,
    Bgr,
    Rgba,
    Bgra,
    Argb,
    Abgr,
    /// BGR with an ignored fourth byte.
    Bgrx,
}

impl RawLayout {
    /// Stored bytes per texel.
    pub const fn bytes_per_texel(self) -> usize {
        self.channel_map().len()
    }

    /// The color mode this layout decodes into.
    pub const fn mode(self) -> ColorMode {
        match self {
            RawLayout::L | RawLayout::A => ColorMode::L,
            RawLayout::La => ColorMode::La,
            RawLayout::Rg | RawLayout::Rgb | RawLayout::Bgr | RawLayout::Bgrx => ColorMode::Rgb,
            RawLayout::Rgba | RawLayout::Bgra | RawLayout::Argb | RawLayout::Abgr => ColorMode::Rgba,
        }
    }

    /// For each stored byte, the channel index it occupies in a buffer of
    /// [`RawLayout::mode`], or `None` when the byte carries nothing.
    pub const fn channel_map(self) -> &'static [Option<usize>] {
        match self {
            RawLayout::L | RawLayout::A => &[Some(0)],
            RawLayout::La | RawLayout::Rg => &[Some(0), Some(1)],
            RawLayout::Rgb => &[Some(0), Some(1), Some(2)],
            RawLayout::Bgr => &[Some(2), Some(1), Some(0)],
            RawLayout::Rgba => &[Some(0), Some(1), Some(2), Some(3)],
            RawLayout::Bgra => &[Some(2), Some(1), Some(0), Some(3)],
            RawLayout::Argb => &[Some(3), Some(0), Some(1), Some(2)],
            RawLayout::Abgr => &[Some(3), Some(2), Some(1), Some(0)],
            RawLayout::Bgrx => &[Some(2), Some(1), Some(0), None],
        }
    }

    /// Short name, e.g. `"BGRA"`.
    pub const fn name(self) -> &'static str {
        match self {
            RawLayout::L => "L",
            RawLayout::A => "A",
            RawLayout::La => "LA",
            RawLayout::Rg => "RG",
            RawLayout::Rgb => "RGB",
            RawLayout::Bgr => "BGR",
            RawLayout::Rgba => "RGBA",
            RawLayout::Bgra => "BGRA",
            RawLayout::Argb => "ARGB",
            RawLayout::Abgr => "ABGR",
            RawLayout::Bgrx => "BGRX",
        }
    }
}

/// Block-compression variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BlockVariant {
    /// DXT1.
    Bc1,
    /// DXT1 with one-bit alpha.
    Bc1a,
    /// DXT2/DXT3.
    Bc2,
    /// DXT4/DXT5.
    Bc3,
    /// ATI1, single channel.
    Bc4,
    /// ATI2, two channels.
    Bc5,
    /// Signed two-channel.
    Bc5s,
    Bc7,
}

impl BlockVariant {
    /// The BCn number of the variant.
    pub const fn number(self) -> u8 {
        match self {
            BlockVariant::Bc1 | BlockVariant::Bc1a => 1,
            BlockVariant::Bc2 => 2,
            BlockVariant::Bc3 => 3,
            BlockVariant::Bc4 => 4,
            BlockVariant::Bc5 | BlockVariant::Bc5s => 5,
            BlockVariant::Bc7 => 7,
        }
    }

    /// Compressed bits per texel: 4 for the half-byte family, 8 otherwise.
    pub const fn bits_per_texel(self) -> usize {
        match self {
            BlockVariant::Bc1 | BlockVariant::Bc1a | BlockVariant::Bc4 => 4,
            _ => 8,
        }
    }

    /// Bytes per 4x4 block.
    pub const fn block_bytes(self) -> usize {
        self.bits_per_texel() * 2
    }

    /// Short name, e.g. `"BC1A"`.
    pub const fn name(self) -> &'static str {
        match self {
            BlockVariant::Bc1 => "BC1",
            BlockVariant::Bc1a => "BC1A",
            BlockVariant::Bc2 => "BC2",
            BlockVariant::Bc3 => "BC3",
            BlockVariant::Bc4 => "BC4",
            BlockVariant::Bc5 => "BC5",
            BlockVariant::Bc5s => "BC5S",
            BlockVariant::Bc7 => "BC7",
        }
    }
}

/// How the stored bytes of a surface are turned into pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DecodeMethod {
    /// Row-major copy with a channel permutation.
    Raw(RawLayout),
    /// Block-compressed.
    Block(BlockVariant),
}

/// Edge length of a compression block in texels.
pub const BLOCK_SIZE: u32 = 4;

impl DecodeMethod {
    /// Whether the method is block-compressed.
    pub const fn is_block_compressed(self) -> bool {
        matches!(self, DecodeMethod::Block(_))
    }

    /// Smallest dimension a surface of this method is stored at.
    pub const fn min_dimension(self) -> u32 {
        match self {
            DecodeMethod::Block(_) => BLOCK_SIZE,
            DecodeMethod::Raw(_) => 1,
        }
    }
}

impl fmt::Display for DecodeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeMethod::Raw(layout) => write!(f, "raw {}", layout.name()),
            DecodeMethod::Block(variant) => f.write_str(variant.name()),
        }
    }
}

/// Classification of a supported pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PixelFormatInfo {
    /// Mode of the decoded surface.
    pub mode: ColorMode,
    /// Decode/encode method for the stored bytes.
    pub method: DecodeMethod,
}

impl PixelFormatInfo {
    /// Raw format decoding into the layout's own mode.
    pub const fn raw(layout: RawLayout) -> Self {
        Self {
            mode: layout.mode(),
            method: DecodeMethod::Raw(layout),
        }
    }

    /// Block-compressed format decoding into `mode`.
    pub const fn block(variant: BlockVariant, mode: ColorMode) -> Self {
        Self {
            mode,
            method: DecodeMethod::Block(variant),
        }
    }

    /// Whether the format is block-compressed.
    pub const fn is_block_compressed(&self) -> bool {
        self.method.is_block_compressed()
    }
}
