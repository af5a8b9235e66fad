//! VTF pixel format catalog.

use std::fmt;

use texmap_common::{BlockVariant, ColorMode, PixelFormatInfo, RawLayout};

use crate::{Error, Result};

/// A VTF `IMAGE_FORMAT` code.
///
/// Every code Valve assigned has a variant, handled or not. Codes outside
/// the table parse as [`VtfPixelFormat::Invalid`]; nothing is rejected until
/// [`VtfPixelFormat::classify`] is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum VtfPixelFormat {
    None,
    Rgba8888,
    Abgr8888,
    Rgb888,
    Bgr888,
    Rgb565,
    I8,
    Ia88,
    P8,
    A8,
    Rgb888Bluescreen,
    Bgr888Bluescreen,
    Argb8888,
    Bgra8888,
    Dxt1,
    Dxt3,
    Dxt5,
    Bgrx8888,
    Bgr565,
    Bgrx5551,
    Bgra4444,
    Dxt1OneBitAlpha,
    Bgra5551,
    Uv88,
    Uvwq8888,
    Rgba16161616F,
    Rgba16161616,
    Uvlx8888,
    /// Code not in the table.
    Invalid(i32),
}

/// Every named code, in code order.
const NAMED: [VtfPixelFormat; 27] = [
    VtfPixelFormat::Rgba8888,
    VtfPixelFormat::Abgr8888,
    VtfPixelFormat::Rgb888,
    VtfPixelFormat::Bgr888,
    VtfPixelFormat::Rgb565,
    VtfPixelFormat::I8,
    VtfPixelFormat::Ia88,
    VtfPixelFormat::P8,
    VtfPixelFormat::A8,
    VtfPixelFormat::Rgb888Bluescreen,
    VtfPixelFormat::Bgr888Bluescreen,
    VtfPixelFormat::Argb8888,
    VtfPixelFormat::Bgra8888,
    VtfPixelFormat::Dxt1,
    VtfPixelFormat::Dxt3,
    VtfPixelFormat::Dxt5,
    VtfPixelFormat::Bgrx8888,
    VtfPixelFormat::Bgr565,
    VtfPixelFormat::Bgrx5551,
    VtfPixelFormat::Bgra4444,
    VtfPixelFormat::Dxt1OneBitAlpha,
    VtfPixelFormat::Bgra5551,
    VtfPixelFormat::Uv88,
    VtfPixelFormat::Uvwq8888,
    VtfPixelFormat::Rgba16161616F,
    VtfPixelFormat::Rgba16161616,
    VtfPixelFormat::Uvlx8888,
];

impl VtfPixelFormat {
    /// Formats that have a decode method.
    pub const SUPPORTED: [VtfPixelFormat; 15] = [
        VtfPixelFormat::Rgba8888,
        VtfPixelFormat::Abgr8888,
        VtfPixelFormat::Rgb888,
        VtfPixelFormat::Bgr888,
        VtfPixelFormat::I8,
        VtfPixelFormat::Ia88,
        VtfPixelFormat::A8,
        VtfPixelFormat::Argb8888,
        VtfPixelFormat::Bgra8888,
        VtfPixelFormat::Dxt1,
        VtfPixelFormat::Dxt3,
        VtfPixelFormat::Dxt5,
        VtfPixelFormat::Bgrx8888,
        VtfPixelFormat::Dxt1OneBitAlpha,
        VtfPixelFormat::Uv88,
    ];

    /// Map a stored code to a format.
    pub fn from_code(code: i32) -> Self {
        match code {
            -1 => VtfPixelFormat::None,
            0..=26 => NAMED[code as usize],
            other => VtfPixelFormat::Invalid(other),
        }
    }

    /// The stored code.
    pub fn code(self) -> i32 {
        match self {
            VtfPixelFormat::None => -1,
            VtfPixelFormat::Invalid(code) => code,
            named => NAMED.iter().position(|f| *f == named).map_or(-1, |i| i as i32),
        }
    }

    /// Classify the format, or fail if it has no decode method.
    pub fn classify(self) -> Result<PixelFormatInfo> {
        self.info().ok_or(Error::UnsupportedPixelFormat(self))
    }

    /// Classification, if the format is handled.
    pub const fn info(self) -> Option<PixelFormatInfo> {
        use VtfPixelFormat as F;
        let info = match self {
            F::Rgba8888 => PixelFormatInfo::raw(RawLayout::Rgba),
            F::Abgr8888 => PixelFormatInfo::raw(RawLayout::Abgr),
            F::Rgb888 => PixelFormatInfo::raw(RawLayout::Rgb),
            F::Bgr888 => PixelFormatInfo::raw(RawLayout::Bgr),
            F::I8 => PixelFormatInfo::raw(RawLayout::L),
            F::Ia88 => PixelFormatInfo::raw(RawLayout::La),
            F::A8 => PixelFormatInfo::raw(RawLayout::A),
            F::Argb8888 => PixelFormatInfo::raw(RawLayout::Argb),
            F::Bgra8888 => PixelFormatInfo::raw(RawLayout::Bgra),
            F::Bgrx8888 => PixelFormatInfo::raw(RawLayout::Bgrx),
            F::Uv88 => PixelFormatInfo::raw(RawLayout::Rg),
            F::Dxt1 => PixelFormatInfo::block(BlockVariant::Bc1, ColorMode::Rgba),
            F::Dxt1OneBitAlpha => PixelFormatInfo::block(BlockVariant::Bc1a, ColorMode::Rgba),
            F::Dxt3 => PixelFormatInfo::block(BlockVariant::Bc2, ColorMode::Rgba),
            F::Dxt5 => PixelFormatInfo::block(BlockVariant::Bc3, ColorMode::Rgba),
            _ => return None,
        };
        Some(info)
    }

    /// Whether a thumbnail of this format exists at all.
    pub fn is_none(self) -> bool {
        self == VtfPixelFormat::None
    }

    /// Name as used by Valve's tools, e.g. `"DXT1_ONEBITALPHA"`.
    pub fn name(self) -> &'static str {
        use VtfPixelFormat as F;
        match self {
            F::None => "NONE",
            F::Rgba8888 => "RGBA8888",
            F::Abgr8888 => "ABGR8888",
            F::Rgb888 => "RGB888",
            F::Bgr888 => "BGR888",
            F::Rgb565 => "RGB565",
            F::I8 => "I8",
            F::Ia88 => "IA88",
            F::P8 => "P8",
            F::A8 => "A8",
            F::Rgb888Bluescreen => "RGB888_BLUESCREEN",
            F::Bgr888Bluescreen => "BGR888_BLUESCREEN",
            F::Argb8888 => "ARGB8888",
            F::Bgra8888 => "BGRA8888",
            F::Dxt1 => "DXT1",
            F::Dxt3 => "DXT3",
            F::Dxt5 => "DXT5",
            F::Bgrx8888 => "BGRX8888",
            F::Bgr565 => "BGR565",
            F::Bgrx5551 => "BGRX5551",
            F::Bgra4444 => "BGRA4444",
            F::Dxt1OneBitAlpha => "DXT1_ONEBITALPHA",
            F::Bgra5551 => "BGRA5551",
            F::Uv88 => "UV88",
            F::Uvwq8888 => "UVWQ8888",
            F::Rgba16161616F => "RGBA16161616F",
            F::Rgba16161616 => "RGBA16161616",
            F::Uvlx8888 => "UVLX8888",
            F::Invalid(_) => "INVALID",
        }
    }

    /// Look a format up by its name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        std::iter::once(VtfPixelFormat::None)
            .chain(NAMED)
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for VtfPixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VtfPixelFormat::Invalid(code) => write!(f, "INVALID({code})"),
            other => f.write_str(other.name()),
        }
    }
}
