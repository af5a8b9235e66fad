//! DDS header structures and the header codec.

use std::fmt;

use texmap_common::BinaryReader;
use tracing::{debug, warn};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::format::{DdsFormat, DxgiFormat};
use crate::{Error, Result, DDS_MAGIC};

/// `DDSD_*` header flags.
pub mod ddsd {
    pub const CAPS: u32 = 0x1;
    pub const HEIGHT: u32 = 0x2;
    pub const WIDTH: u32 = 0x4;
    pub const PITCH: u32 = 0x8;
    pub const PIXELFORMAT: u32 = 0x1000;
    pub const MIPMAPCOUNT: u32 = 0x2_0000;
    pub const LINEARSIZE: u32 = 0x8_0000;
    pub const DEPTH: u32 = 0x80_0000;
}

/// `DDSCAPS_*` and `DDSCAPS2_*` bits.
pub mod ddscaps {
    pub const COMPLEX: u32 = 0x8;
    pub const TEXTURE: u32 = 0x1000;
    pub const MIPMAP: u32 = 0x40_0000;

    pub const CUBEMAP: u32 = 0x200;
    pub const CUBEMAP_POSITIVEX: u32 = 0x400;
    pub const CUBEMAP_NEGATIVEX: u32 = 0x800;
    pub const CUBEMAP_POSITIVEY: u32 = 0x1000;
    pub const CUBEMAP_NEGATIVEY: u32 = 0x2000;
    pub const CUBEMAP_POSITIVEZ: u32 = 0x4000;
    pub const CUBEMAP_NEGATIVEZ: u32 = 0x8000;
    pub const CUBEMAP_ALLFACES: u32 = 0xFC00;
    pub const VOLUME: u32 = 0x20_0000;
}

/// `DDPF_*` pixel format flags.
pub mod ddpf {
    pub const ALPHAPIXELS: u32 = 0x1;
    pub const ALPHA: u32 = 0x2;
    pub const FOURCC: u32 = 0x4;
    pub const RGB: u32 = 0x40;
    pub const LUMINANCE: u32 = 0x2_0000;
}

/// The 124-byte header that follows the `DDS ` magic.
///
/// Stored as read; [`DdsInfo::from_layout`] applies the reading rules.
/// Any `size` other than [`DdsHeader::SIZE`] rejects the file.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsHeader {
    pub size: u32,
    /// [`ddsd`] bits. `CAPS` gates whether `caps`/`caps2` are read at all.
    pub flags: u32,
    pub height: u32,
    pub width: u32,
    /// Written as the row pitch (raw) or base level size (block), never
    /// consulted on read.
    pub pitch_or_linear_size: u32,
    /// Slice count, used only for volume textures.
    pub depth: u32,
    /// Levels per layer; 0 reads as a single level.
    pub mipmap_count: u32,
    pub reserved1: [u32; 11],
    pub pixel_format: DdsPixelFormat,
    pub caps: u32,
    /// Cube face and volume bits.
    pub caps2: u32,
    pub caps3: u32,
    pub caps4: u32,
    pub reserved2: u32,
}

impl DdsHeader {
    pub const SIZE: u32 = 124;

    /// Whether a [`DdsHeaderDxt10`] follows, moving the data to offset 148.
    pub fn is_dx10(&self) -> bool {
        self.pixel_format.flags & ddpf::FOURCC != 0 && self.pixel_format.four_cc == FourCC::DX10
    }
}

/// Pixel format block embedded in [`DdsHeader`].
///
/// With `FOURCC` set the code picks the format; otherwise the bit count and
/// masks are matched against the known byte layouts (see
/// [`DdsFormat::detect`]). A wrong `size` is logged and tolerated.
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsPixelFormat {
    pub size: u32,
    /// [`ddpf`] bits.
    pub flags: u32,
    pub four_cc: FourCC,
    pub rgb_bit_count: u32,
    pub r_bit_mask: u32,
    pub g_bit_mask: u32,
    pub b_bit_mask: u32,
    pub a_bit_mask: u32,
}

impl DdsPixelFormat {
    pub const SIZE: u32 = 32;

    /// Masks in R, G, B, A order.
    pub fn masks(&self) -> [u32; 4] {
        [self.r_bit_mask, self.g_bit_mask, self.b_bit_mask, self.a_bit_mask]
    }
}

/// A four-byte format code, compared byte for byte.
///
/// Codes outside the block table classify as `UnsupportedPixelFormat`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const DXT1: Self = Self(*b"DXT1");
    /// Premultiplied; decoded as DXT3.
    pub const DXT2: Self = Self(*b"DXT2");
    pub const DXT3: Self = Self(*b"DXT3");
    /// Premultiplied; decoded as DXT5.
    pub const DXT4: Self = Self(*b"DXT4");
    pub const DXT5: Self = Self(*b"DXT5");
    /// Single-channel BC4, decoded to `L`.
    pub const ATI1: Self = Self(*b"ATI1");
    /// Two-channel BC5, decoded to `RGB` with blue zeroed.
    pub const ATI2: Self = Self(*b"ATI2");
    /// Marks a [`DdsHeaderDxt10`] extension.
    pub const DX10: Self = Self(*b"DX10");
    pub const BC4U: Self = Self(*b"BC4U");
    /// No decoder; rejected as unsupported.
    pub const BC4S: Self = Self(*b"BC4S");
    pub const BC5U: Self = Self(*b"BC5U");
    pub const BC5S: Self = Self(*b"BC5S");
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            self.0.iter().try_for_each(|&b| write!(f, "{}", b as char))
        } else {
            write!(f, "0x{:08X}", u32::from_le_bytes(self.0))
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FourCC {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Extension present when the FourCC is `DX10`.
///
/// Carries the DXGI format, a cube flag (6 faces per element) and the array
/// size (0 reads as 1). The writer emits it for `DdsFormat::Dx10` formats.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsHeaderDxt10 {
    pub dxgi_format: u32,
    pub resource_dimension: u32,
    pub misc_flag: u32,
    pub array_size: u32,
    pub misc_flags2: u32,
}

impl DdsHeaderDxt10 {
    pub const SIZE: usize = 20;
    pub const TEXTURE2D: u32 = 3;
    pub const TEXTURE3D: u32 = 4;
    pub const MISC_TEXTURECUBE: u32 = 0x4;

    /// Plain 2D texture of `format`.
    pub fn texture_2d(format: DxgiFormat) -> Self {
        Self {
            dxgi_format: format.0,
            resource_dimension: Self::TEXTURE2D,
            misc_flag: 0,
            array_size: 1,
            misc_flags2: 0,
        }
    }
}

/// The stored header, keyed by whether the DX10 extension is present.
#[derive(Debug, Clone, Copy)]
pub enum DdsLayout {
    Legacy(DdsHeader),
    Dx10(DdsHeader, DdsHeaderDxt10),
}

impl DdsLayout {
    pub fn header(&self) -> &DdsHeader {
        match self {
            DdsLayout::Legacy(h) | DdsLayout::Dx10(h, _) => h,
        }
    }

    pub fn dx10(&self) -> Option<&DdsHeaderDxt10> {
        match self {
            DdsLayout::Legacy(_) => None,
            DdsLayout::Dx10(_, ext) => Some(ext),
        }
    }

    /// Offset of the first surface byte.
    pub fn data_offset(&self) -> usize {
        let base = DDS_MAGIC.len() + DdsHeader::SIZE as usize;
        match self {
            DdsLayout::Legacy(_) => base,
            DdsLayout::Dx10(..) => base + DdsHeaderDxt10::SIZE,
        }
    }

    /// Magic, header and extension as stored.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data_offset());
        out.extend_from_slice(DDS_MAGIC);
        out.extend_from_slice(self.header().as_bytes());
        if let Some(ext) = self.dx10() {
            out.extend_from_slice(ext.as_bytes());
        }
        out
    }
}

/// Canonical DDS header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DdsInfo {
    pub width: u32,
    pub height: u32,
    /// Volume depth, 1 for flat textures.
    pub depth: u32,
    /// Mip levels per layer, at least 1.
    pub mip_count: u32,
    /// Array elements, 1 without a DX10 extension.
    pub array_size: u32,
    /// Cube faces per array element, 1 for plain textures.
    pub faces: u32,
    pub flags: u32,
    pub caps: u32,
    pub caps2: u32,
    pub four_cc: FourCC,
    /// DXGI code of the extension, if present.
    pub dxgi_format: Option<u32>,
    /// Stored pixel format.
    pub format: DdsFormat,
    /// Offset of the first surface byte, 128 or 148.
    pub data_offset: usize,
}

impl DdsInfo {
    /// Parse the header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<(Self, DdsLayout)> {
        let mut reader = BinaryReader::new(data);

        let magic = match reader.read_magic() {
            Ok(magic) => magic,
            Err(_) => {
                let mut short = [0u8; 4];
                short[..data.len()].copy_from_slice(data);
                return Err(Error::InvalidMagic(short));
            }
        };
        if &magic != DDS_MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let size = reader.peek_u32()?;
        if size != DdsHeader::SIZE {
            return Err(Error::HeaderSizeMismatch(size));
        }

        let header: DdsHeader = reader.read_struct()?;
        let layout = if header.is_dx10() {
            DdsLayout::Dx10(header, reader.read_struct()?)
        } else {
            DdsLayout::Legacy(header)
        };

        let info = Self::from_layout(&layout);
        debug!(
            width = info.width,
            height = info.height,
            depth = info.depth,
            mips = info.mip_count,
            layers = info.array_size * info.faces,
            four_cc = %info.four_cc,
            dxgi = ?info.dxgi_format,
            "parsed DDS header"
        );
        Ok((info, layout))
    }

    /// Derive the canonical view of a stored header.
    pub fn from_layout(layout: &DdsLayout) -> Self {
        let header = layout.header();
        let pf = header.pixel_format;
        let pf_size = pf.size;
        if pf_size != DdsPixelFormat::SIZE {
            warn!(size = pf_size, "unexpected DDS pixel format size");
        }

        let flags = header.flags;
        let (caps, caps2) = if flags & ddsd::CAPS != 0 {
            (header.caps, header.caps2)
        } else {
            (0, 0)
        };

        let depth = if caps2 & ddscaps::VOLUME != 0 || flags & ddsd::DEPTH != 0 {
            header.depth.max(1)
        } else {
            1
        };

        let ext = layout.dx10();
        let array_size = ext.map_or(1, |e| e.array_size.max(1));

        let cube = caps2 & ddscaps::CUBEMAP != 0
            || ext.is_some_and(|e| e.misc_flag & DdsHeaderDxt10::MISC_TEXTURECUBE != 0);
        let faces = if !cube {
            1
        } else if ext.is_some() {
            6
        } else {
            (caps2 & ddscaps::CUBEMAP_ALLFACES).count_ones().max(1)
        };

        Self {
            width: header.width,
            height: header.height,
            depth,
            // writers that leave the count at 0 mean a single level
            mip_count: header.mipmap_count.max(1),
            array_size,
            faces,
            flags,
            caps,
            caps2,
            four_cc: pf.four_cc,
            dxgi_format: ext.map(|e| e.dxgi_format),
            format: DdsFormat::detect(&pf, ext.map(|e| DxgiFormat(e.dxgi_format))),
            data_offset: layout.data_offset(),
        }
    }

    pub fn is_cubemap(&self) -> bool {
        self.faces > 1
    }

    pub fn is_volume(&self) -> bool {
        self.depth > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use texmap_common::ErrorKind;

    fn legacy(four_cc: FourCC) -> DdsHeader {
        DdsHeader {
            size: DdsHeader::SIZE,
            flags: ddsd::CAPS | ddsd::HEIGHT | ddsd::WIDTH | ddsd::PIXELFORMAT,
            height: 64,
            width: 32,
            pitch_or_linear_size: 0,
            depth: 0,
            mipmap_count: 0,
            reserved1: [0; 11],
            pixel_format: DdsPixelFormat {
                size: DdsPixelFormat::SIZE,
                flags: ddpf::FOURCC,
                four_cc,
                ..Default::default()
            },
            caps: ddscaps::TEXTURE,
            caps2: 0,
            caps3: 0,
            caps4: 0,
            reserved2: 0,
        }
    }

    #[test]
    fn test_struct_sizes() {
        assert_eq!(std::mem::size_of::<DdsHeader>(), 124);
        assert_eq!(std::mem::size_of::<DdsPixelFormat>(), 32);
        assert_eq!(std::mem::size_of::<DdsHeaderDxt10>(), 20);
    }

    #[test]
    fn test_parse_legacy() {
        let bytes = DdsLayout::Legacy(legacy(FourCC::DXT5)).to_bytes();
        assert_eq!(bytes.len(), 128);

        let (info, layout) = DdsInfo::parse(&bytes).unwrap();
        assert!(layout.dx10().is_none());
        assert_eq!((info.width, info.height), (32, 64));
        assert_eq!(info.mip_count, 1);
        assert_eq!(info.depth, 1);
        assert_eq!(info.faces, 1);
        assert_eq!(info.data_offset, 128);
        assert_eq!(info.format, DdsFormat::FourCc(FourCC::DXT5));
    }

    #[test]
    fn test_parse_dx10() {
        let mut ext = DdsHeaderDxt10::texture_2d(DxgiFormat::BC7_UNORM_SRGB);
        ext.array_size = 3;
        let bytes = DdsLayout::Dx10(legacy(FourCC::DX10), ext).to_bytes();
        assert_eq!(bytes.len(), 148);

        let (info, _) = DdsInfo::parse(&bytes).unwrap();
        assert_eq!(info.data_offset, 148);
        assert_eq!(info.array_size, 3);
        assert_eq!(info.dxgi_format, Some(99));
        assert_eq!(info.format, DdsFormat::Dx10(DxgiFormat::BC7_UNORM_SRGB));
    }

    #[test]
    fn test_cubemap_faces() {
        let mut header = legacy(FourCC::DXT1);
        header.caps2 = ddscaps::CUBEMAP | ddscaps::CUBEMAP_ALLFACES;
        let (info, _) = DdsInfo::parse(&DdsLayout::Legacy(header).to_bytes()).unwrap();
        assert_eq!(info.faces, 6);
        assert!(info.is_cubemap());

        header.caps2 = ddscaps::CUBEMAP | ddscaps::CUBEMAP_POSITIVEX | ddscaps::CUBEMAP_NEGATIVEZ;
        let (info, _) = DdsInfo::parse(&DdsLayout::Legacy(header).to_bytes()).unwrap();
        assert_eq!(info.faces, 2);
    }

    #[test]
    fn test_header_size_must_be_124() {
        let mut bytes = DdsLayout::Legacy(legacy(FourCC::DXT1)).to_bytes();
        bytes[4..8].copy_from_slice(&120u32.to_le_bytes());
        let err = DdsInfo::parse(&bytes).unwrap_err();
        assert!(matches!(err, Error::HeaderSizeMismatch(120)));
        assert_eq!(err.kind(), ErrorKind::TruncatedHeader);
    }

    #[test]
    fn test_truncated_header() {
        let bytes = DdsLayout::Dx10(legacy(FourCC::DX10), DdsHeaderDxt10::texture_2d(DxgiFormat::BC7_UNORM)).to_bytes();
        for len in [6, 64, 127, 140] {
            let err = DdsInfo::parse(&bytes[..len]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TruncatedHeader, "len {len}");
        }
    }

    #[test]
    fn test_foreign_magic() {
        assert!(DdsInfo::parse(b"VTF\0\x07\0\0\0").unwrap_err().is_not_this_format());
        assert!(DdsInfo::parse(b"DD").unwrap_err().is_not_this_format());
    }

    #[test]
    fn test_four_cc_display() {
        assert_eq!(FourCC::DXT1.to_string(), "DXT1");
        assert_eq!(FourCC([0, 0, 0, 0]).to_string(), "0x00000000");
    }
}
