//! DDS pixel format catalog.
//!
//! A DDS pixel format is named three ways: a FourCC code, a DXGI format in
//! the DX10 extension, or a set of channel bit masks for raw data. All of
//! them classify onto the shared [`PixelFormatInfo`].

use std::fmt;

use texmap_common::{BlockVariant, ColorMode, PixelFormatInfo, RawLayout};

use crate::header::{ddpf, DdsHeaderDxt10, DdsPixelFormat, FourCC};
use crate::{Error, Result};

/// A `DXGI_FORMAT` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DxgiFormat(pub u32);

impl DxgiFormat {
    pub const R8G8B8A8_TYPELESS: Self = Self(27);
    pub const R8G8B8A8_UNORM: Self = Self(28);
    pub const R8G8B8A8_UNORM_SRGB: Self = Self(29);
    pub const BC1_TYPELESS: Self = Self(70);
    pub const BC1_UNORM: Self = Self(71);
    pub const BC1_UNORM_SRGB: Self = Self(72);
    pub const BC2_TYPELESS: Self = Self(73);
    pub const BC2_UNORM: Self = Self(74);
    pub const BC2_UNORM_SRGB: Self = Self(75);
    pub const BC3_TYPELESS: Self = Self(76);
    pub const BC3_UNORM: Self = Self(77);
    pub const BC3_UNORM_SRGB: Self = Self(78);
    pub const BC4_TYPELESS: Self = Self(79);
    pub const BC4_UNORM: Self = Self(80);
    pub const BC4_SNORM: Self = Self(81);
    pub const BC5_TYPELESS: Self = Self(82);
    pub const BC5_UNORM: Self = Self(83);
    pub const BC5_SNORM: Self = Self(84);
    pub const B8G8R8A8_UNORM: Self = Self(87);
    pub const B8G8R8X8_UNORM: Self = Self(88);
    pub const B8G8R8A8_TYPELESS: Self = Self(90);
    pub const B8G8R8A8_UNORM_SRGB: Self = Self(91);
    pub const B8G8R8X8_TYPELESS: Self = Self(92);
    pub const B8G8R8X8_UNORM_SRGB: Self = Self(93);
    pub const BC7_TYPELESS: Self = Self(97);
    pub const BC7_UNORM: Self = Self(98);
    pub const BC7_UNORM_SRGB: Self = Self(99);

    /// Classification, if the format is handled.
    pub const fn info(self) -> Option<PixelFormatInfo> {
        let info = match self.0 {
            27..=29 => PixelFormatInfo::raw(RawLayout::Rgba),
            87 | 90 | 91 => PixelFormatInfo::raw(RawLayout::Bgra),
            88 | 92 | 93 => PixelFormatInfo::raw(RawLayout::Bgrx),
            70..=72 => PixelFormatInfo::block(BlockVariant::Bc1, ColorMode::Rgba),
            73..=75 => PixelFormatInfo::block(BlockVariant::Bc2, ColorMode::Rgba),
            76..=78 => PixelFormatInfo::block(BlockVariant::Bc3, ColorMode::Rgba),
            79 | 80 => PixelFormatInfo::block(BlockVariant::Bc4, ColorMode::L),
            82 | 83 => PixelFormatInfo::block(BlockVariant::Bc5, ColorMode::Rgb),
            84 => PixelFormatInfo::block(BlockVariant::Bc5s, ColorMode::Rgb),
            97..=99 => PixelFormatInfo::block(BlockVariant::Bc7, ColorMode::Rgba),
            _ => return None,
        };
        Some(info)
    }

    /// Whether the data is stored in sRGB space.
    pub const fn is_srgb(self) -> bool {
        matches!(self.0, 29 | 72 | 75 | 78 | 91 | 93 | 99)
    }
}

impl fmt::Display for DxgiFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DXGI {}", self.0)
    }
}

/// The pixel format of a DDS file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DdsFormat {
    /// Block compression named by a FourCC.
    FourCc(FourCC),
    /// Format named by the DX10 extension.
    Dx10(DxgiFormat),
    /// Raw texels described by channel masks.
    Masked(RawLayout),
    /// Masks or flags that match no known layout.
    Unrecognized { flags: u32, bit_count: u32, masks: [u32; 4] },
}

impl DdsFormat {
    /// Plain BGR, 24 bits.
    pub const BGR24: Self = Self::Masked(RawLayout::Bgr);
    /// Plain BGRA, 32 bits.
    pub const BGRA32: Self = Self::Masked(RawLayout::Bgra);
    /// Luminance, 8 bits.
    pub const L8: Self = Self::Masked(RawLayout::L);
    /// Luminance and alpha, 16 bits.
    pub const LA16: Self = Self::Masked(RawLayout::La);
    /// BC7 through the DX10 extension.
    pub const BC7: Self = Self::Dx10(DxgiFormat::BC7_UNORM);

    /// Work out the format a header describes.
    pub fn detect(pf: &DdsPixelFormat, dxgi: Option<DxgiFormat>) -> Self {
        if pf.flags & ddpf::FOURCC != 0 {
            return match dxgi {
                Some(dxgi) if pf.four_cc == FourCC::DX10 => Self::Dx10(dxgi),
                _ => Self::FourCc(pf.four_cc),
            };
        }
        match layout_from_masks(pf) {
            Some(layout) => Self::Masked(layout),
            None => Self::Unrecognized {
                flags: pf.flags,
                bit_count: pf.rgb_bit_count,
                masks: pf.masks(),
            },
        }
    }

    /// Default format for writing an image of `mode`.
    pub const fn for_mode(mode: ColorMode) -> Self {
        match mode {
            ColorMode::L => Self::L8,
            ColorMode::La => Self::LA16,
            ColorMode::Rgb => Self::BGR24,
            ColorMode::Rgba => Self::BGRA32,
        }
    }

    /// Classification, if the format is handled.
    pub fn info(self) -> Option<PixelFormatInfo> {
        match self {
            Self::FourCc(cc) => four_cc_info(cc),
            Self::Dx10(dxgi) => dxgi.info(),
            Self::Masked(layout) => Some(PixelFormatInfo::raw(layout)),
            Self::Unrecognized { .. } => None,
        }
    }

    /// Classification, or `UnsupportedPixelFormat`.
    pub fn classify(self) -> Result<PixelFormatInfo> {
        self.info().ok_or_else(|| Error::UnsupportedPixelFormat(self.to_string()))
    }

    /// The stored pixel format record and DX10 extension for writing.
    pub fn to_pixel_format(self) -> Result<(DdsPixelFormat, Option<DdsHeaderDxt10>)> {
        let unsupported = || Error::UnsupportedPixelFormat(self.to_string());
        self.info().ok_or_else(unsupported)?;

        let mut pf = DdsPixelFormat {
            size: DdsPixelFormat::SIZE,
            ..Default::default()
        };
        let ext = match self {
            Self::FourCc(cc) => {
                pf.flags = ddpf::FOURCC;
                pf.four_cc = cc;
                None
            }
            Self::Dx10(dxgi) => {
                pf.flags = ddpf::FOURCC;
                pf.four_cc = FourCC::DX10;
                Some(DdsHeaderDxt10::texture_2d(dxgi))
            }
            Self::Masked(layout) => {
                let (flags, masks) = masks_for_layout(layout).ok_or_else(unsupported)?;
                pf.flags = flags;
                pf.rgb_bit_count = layout.bytes_per_texel() as u32 * 8;
                pf.r_bit_mask = masks[0];
                pf.g_bit_mask = masks[1];
                pf.b_bit_mask = masks[2];
                pf.a_bit_mask = masks[3];
                None
            }
            Self::Unrecognized { .. } => return Err(unsupported()),
        };
        Ok((pf, ext))
    }
}

impl fmt::Display for DdsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FourCc(cc) => write!(f, "{cc}"),
            Self::Dx10(dxgi) => write!(f, "{dxgi}"),
            Self::Masked(layout) => f.write_str(layout.name()),
            Self::Unrecognized { flags, bit_count, masks } => write!(
                f,
                "flags 0x{flags:X}, {bit_count} bits, masks {:08X}/{:08X}/{:08X}/{:08X}",
                masks[0], masks[1], masks[2], masks[3]
            ),
        }
    }
}

fn four_cc_info(cc: FourCC) -> Option<PixelFormatInfo> {
    let (variant, mode) = match cc {
        FourCC::DXT1 => (BlockVariant::Bc1, ColorMode::Rgba),
        FourCC::DXT2 | FourCC::DXT3 => (BlockVariant::Bc2, ColorMode::Rgba),
        FourCC::DXT4 | FourCC::DXT5 => (BlockVariant::Bc3, ColorMode::Rgba),
        FourCC::ATI1 | FourCC::BC4U => (BlockVariant::Bc4, ColorMode::L),
        FourCC::ATI2 | FourCC::BC5U => (BlockVariant::Bc5, ColorMode::Rgb),
        FourCC::BC5S => (BlockVariant::Bc5s, ColorMode::Rgb),
        _ => return None,
    };
    Some(PixelFormatInfo::block(variant, mode))
}

/// Channel letter (R, G, B, A as 0..4) stored at each byte of a texel.
fn channels_by_byte(pf: &DdsPixelFormat, bytes: usize) -> Option<Vec<usize>> {
    let masks = pf.masks();
    (0..bytes)
        .map(|i| {
            let byte_mask = 0xFFu32 << (8 * i);
            masks.iter().position(|&m| m == byte_mask)
        })
        .collect()
}

fn layout_from_masks(pf: &DdsPixelFormat) -> Option<RawLayout> {
    const R: usize = 0;
    const G: usize = 1;
    const B: usize = 2;
    const A: usize = 3;

    let flags = pf.flags;
    let bits = pf.rgb_bit_count;

    if flags & ddpf::RGB != 0 {
        return match (bits, flags & ddpf::ALPHAPIXELS != 0) {
            (24, _) => match channels_by_byte(pf, 3)?.as_slice() {
                [R, G, B] => Some(RawLayout::Rgb),
                [B, G, R] => Some(RawLayout::Bgr),
                _ => None,
            },
            (32, true) => match channels_by_byte(pf, 4)?.as_slice() {
                [R, G, B, A] => Some(RawLayout::Rgba),
                [B, G, R, A] => Some(RawLayout::Bgra),
                [A, R, G, B] => Some(RawLayout::Argb),
                [A, B, G, R] => Some(RawLayout::Abgr),
                _ => None,
            },
            (32, false) => match channels_by_byte(pf, 3)?.as_slice() {
                [B, G, R] => Some(RawLayout::Bgrx),
                _ => None,
            },
            _ => None,
        };
    }
    if flags & ddpf::LUMINANCE != 0 {
        return match (bits, flags & ddpf::ALPHAPIXELS != 0) {
            (8, _) => Some(RawLayout::L),
            (16, true) => Some(RawLayout::La),
            _ => None,
        };
    }
    if flags & ddpf::ALPHA != 0 && bits == 8 {
        return Some(RawLayout::A);
    }
    None
}

/// Pixel format flags and R, G, B, A masks written for `layout`.
fn masks_for_layout(layout: RawLayout) -> Option<(u32, [u32; 4])> {
    let rgb = ddpf::RGB;
    let rgba = ddpf::RGB | ddpf::ALPHAPIXELS;
    let entry = match layout {
        RawLayout::L => (ddpf::LUMINANCE, [0xFF, 0xFF, 0xFF, 0]),
        RawLayout::La => (ddpf::LUMINANCE | ddpf::ALPHAPIXELS, [0xFF, 0xFF, 0xFF, 0xFF00]),
        RawLayout::A => (ddpf::ALPHA, [0, 0, 0, 0xFF]),
        RawLayout::Rgb => (rgb, [0xFF, 0xFF00, 0xFF_0000, 0]),
        RawLayout::Bgr => (rgb, [0xFF_0000, 0xFF00, 0xFF, 0]),
        RawLayout::Bgrx => (rgb, [0xFF_0000, 0xFF00, 0xFF, 0]),
        RawLayout::Rgba => (rgba, [0xFF, 0xFF00, 0xFF_0000, 0xFF00_0000]),
        RawLayout::Bgra => (rgba, [0xFF_0000, 0xFF00, 0xFF, 0xFF00_0000]),
        RawLayout::Argb => (rgba, [0xFF00, 0xFF_0000, 0xFF00_0000, 0xFF]),
        RawLayout::Abgr => (rgba, [0xFF00_0000, 0xFF_0000, 0xFF00, 0xFF]),
        RawLayout::Rg => return None,
    };
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use texmap_common::DecodeMethod;

    fn masked(flags: u32, bits: u32, masks: [u32; 4]) -> DdsPixelFormat {
        DdsPixelFormat {
            size: DdsPixelFormat::SIZE,
            flags,
            four_cc: FourCC::default(),
            rgb_bit_count: bits,
            r_bit_mask: masks[0],
            g_bit_mask: masks[1],
            b_bit_mask: masks[2],
            a_bit_mask: masks[3],
        }
    }

    fn four_cc(cc: FourCC) -> DdsPixelFormat {
        DdsPixelFormat {
            size: DdsPixelFormat::SIZE,
            flags: ddpf::FOURCC,
            four_cc: cc,
            ..Default::default()
        }
    }

    #[test]
    fn test_four_cc_table() {
        let cases = [
            (FourCC::DXT1, BlockVariant::Bc1, ColorMode::Rgba),
            (FourCC::DXT2, BlockVariant::Bc2, ColorMode::Rgba),
            (FourCC::DXT3, BlockVariant::Bc2, ColorMode::Rgba),
            (FourCC::DXT4, BlockVariant::Bc3, ColorMode::Rgba),
            (FourCC::DXT5, BlockVariant::Bc3, ColorMode::Rgba),
            (FourCC::ATI1, BlockVariant::Bc4, ColorMode::L),
            (FourCC::BC4U, BlockVariant::Bc4, ColorMode::L),
            (FourCC::ATI2, BlockVariant::Bc5, ColorMode::Rgb),
            (FourCC::BC5U, BlockVariant::Bc5, ColorMode::Rgb),
            (FourCC::BC5S, BlockVariant::Bc5s, ColorMode::Rgb),
        ];
        for (cc, variant, mode) in cases {
            let format = DdsFormat::detect(&four_cc(cc), None);
            assert_eq!(format.classify().unwrap(), PixelFormatInfo::block(variant, mode), "{cc}");
        }

        let err = DdsFormat::detect(&four_cc(FourCC(*b"YUY2")), None).classify().unwrap_err();
        assert!(matches!(err, Error::UnsupportedPixelFormat(ref name) if name == "YUY2"));
    }

    #[test]
    fn test_dxgi_table() {
        let method = |code: u32| DxgiFormat(code).info().map(|i| i.method);
        assert_eq!(method(71), Some(DecodeMethod::Block(BlockVariant::Bc1)));
        assert_eq!(method(80), Some(DecodeMethod::Block(BlockVariant::Bc4)));
        assert_eq!(method(81), None);
        assert_eq!(method(84), Some(DecodeMethod::Block(BlockVariant::Bc5s)));
        assert_eq!(method(99), Some(DecodeMethod::Block(BlockVariant::Bc7)));
        assert_eq!(method(29), Some(DecodeMethod::Raw(RawLayout::Rgba)));
        assert_eq!(method(91), Some(DecodeMethod::Raw(RawLayout::Bgra)));
        assert_eq!(method(93), Some(DecodeMethod::Raw(RawLayout::Bgrx)));
        assert_eq!(method(2), None);
        assert!(DxgiFormat::BC7_UNORM_SRGB.is_srgb());
        assert!(!DxgiFormat::BC7_UNORM.is_srgb());
    }

    #[test]
    fn test_dx10_needs_extension() {
        let pf = four_cc(FourCC::DX10);
        assert_eq!(DdsFormat::detect(&pf, Some(DxgiFormat::BC5_UNORM)), DdsFormat::Dx10(DxgiFormat::BC5_UNORM));
        assert_eq!(DdsFormat::detect(&pf, None), DdsFormat::FourCc(FourCC::DX10));
    }

    #[test]
    fn test_masks() {
        let rgb = ddpf::RGB;
        let rgba = ddpf::RGB | ddpf::ALPHAPIXELS;
        let cases = [
            (masked(rgb, 24, [0xFF_0000, 0xFF00, 0xFF, 0]), RawLayout::Bgr),
            (masked(rgb, 24, [0xFF, 0xFF00, 0xFF_0000, 0]), RawLayout::Rgb),
            (masked(rgba, 32, [0xFF_0000, 0xFF00, 0xFF, 0xFF00_0000]), RawLayout::Bgra),
            (masked(rgba, 32, [0xFF, 0xFF00, 0xFF_0000, 0xFF00_0000]), RawLayout::Rgba),
            (masked(rgba, 32, [0xFF00, 0xFF_0000, 0xFF00_0000, 0xFF]), RawLayout::Argb),
            (masked(rgba, 32, [0xFF00_0000, 0xFF_0000, 0xFF00, 0xFF]), RawLayout::Abgr),
            (masked(rgb, 32, [0xFF_0000, 0xFF00, 0xFF, 0]), RawLayout::Bgrx),
            (masked(ddpf::LUMINANCE, 8, [0xFF, 0, 0, 0]), RawLayout::L),
            (masked(ddpf::LUMINANCE | ddpf::ALPHAPIXELS, 16, [0xFF, 0, 0, 0xFF00]), RawLayout::La),
            (masked(ddpf::ALPHA, 8, [0, 0, 0, 0xFF]), RawLayout::A),
        ];
        for (pf, layout) in cases {
            assert_eq!(DdsFormat::detect(&pf, None), DdsFormat::Masked(layout), "{}", layout.name());
        }
    }

    #[test]
    fn test_unrecognized_masks() {
        // 16-bit RGB565
        let pf = masked(ddpf::RGB, 16, [0xF800, 0x07E0, 0x001F, 0]);
        let format = DdsFormat::detect(&pf, None);
        assert!(matches!(format, DdsFormat::Unrecognized { bit_count: 16, .. }));
        assert!(matches!(format.classify(), Err(Error::UnsupportedPixelFormat(_))));

        let pf = masked(ddpf::LUMINANCE, 16, [0xFFFF, 0, 0, 0]);
        assert!(matches!(DdsFormat::detect(&pf, None), DdsFormat::Unrecognized { .. }));
    }

    #[test]
    fn test_written_masks_detect_back() {
        for layout in [
            RawLayout::L,
            RawLayout::La,
            RawLayout::A,
            RawLayout::Rgb,
            RawLayout::Bgr,
            RawLayout::Bgrx,
            RawLayout::Rgba,
            RawLayout::Bgra,
            RawLayout::Argb,
            RawLayout::Abgr,
        ] {
            let (pf, ext) = DdsFormat::Masked(layout).to_pixel_format().unwrap();
            assert!(ext.is_none());
            assert_eq!(DdsFormat::detect(&pf, None), DdsFormat::Masked(layout), "{}", layout.name());
        }
        assert!(DdsFormat::Masked(RawLayout::Rg).to_pixel_format().is_err());
    }

    #[test]
    fn test_default_format_by_mode() {
        assert_eq!(DdsFormat::for_mode(ColorMode::Rgb), DdsFormat::BGR24);
        assert_eq!(DdsFormat::for_mode(ColorMode::Rgba), DdsFormat::BGRA32);
        assert_eq!(DdsFormat::for_mode(ColorMode::L), DdsFormat::L8);
        assert_eq!(DdsFormat::for_mode(ColorMode::La), DdsFormat::LA16);
    }
}
