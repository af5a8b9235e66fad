//! VTF header structures and the header codec.
//!
//! A VTF file starts with a 12-byte preamble (magic and version) followed by
//! one of three fixed records selected by the version. [`VtfLayout`] holds
//! the record exactly as stored; [`VtfHeader`] is the canonical view every
//! other part of the crate works with.

use std::fmt;
use std::str::FromStr;

use texmap_common::BinaryReader;
use tracing::{debug, warn};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::format::VtfPixelFormat;
use crate::{Error, Result, VTF_MAGIC};

/// Most resource entries accepted in a 7.3+ dictionary.
pub const MAX_RESOURCES: u32 = 32;

/// Alignment of the header on write.
pub const HEADER_ALIGNMENT: usize = 16;

/// Container version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VtfVersion {
    pub major: u32,
    pub minor: u32,
}

impl VtfVersion {
    pub const V7_0: Self = Self::new(7, 0);
    pub const V7_1: Self = Self::new(7, 1);
    pub const V7_2: Self = Self::new(7, 2);
    pub const V7_3: Self = Self::new(7, 3);
    pub const V7_4: Self = Self::new(7, 4);

    /// Oldest readable version.
    pub const MIN: Self = Self::V7_0;
    /// Newest readable version.
    pub const MAX: Self = Self::V7_4;

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Whether the version is in 7.0-7.4.
    pub fn is_supported(self) -> bool {
        (Self::MIN..=Self::MAX).contains(&self)
    }

    /// 7.2 added the depth field.
    pub fn has_depth(self) -> bool {
        self >= Self::V7_2
    }

    /// 7.3 added the resource dictionary.
    pub fn has_resources(self) -> bool {
        self >= Self::V7_3
    }

    /// Bytes from the start of the file to the end of the fixed record.
    pub fn fixed_size(self) -> usize {
        let record = if self.has_resources() {
            std::mem::size_of::<HeaderV73>()
        } else if self.has_depth() {
            std::mem::size_of::<HeaderV72>()
        } else {
            std::mem::size_of::<HeaderV70>()
        };
        std::mem::size_of::<VtfPreamble>() + record
    }
}

impl fmt::Display for VtfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for VtfVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (major, minor) = s
            .split_once('.')
            .ok_or_else(|| format!("expected MAJOR.MINOR, got '{s}'"))?;
        let major = major.parse().map_err(|_| format!("invalid major version '{major}'"))?;
        let minor = minor.parse().map_err(|_| format!("invalid minor version '{minor}'"))?;
        Ok(Self::new(major, minor))
    }
}

/// `TEXTUREFLAGS_*` bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VtfFlags(pub u32);

impl VtfFlags {
    pub const POINTSAMPLE: Self = Self(0x0000_0001);
    pub const TRILINEAR: Self = Self(0x0000_0002);
    pub const CLAMPS: Self = Self(0x0000_0004);
    pub const CLAMPT: Self = Self(0x0000_0008);
    pub const ANISOTROPIC: Self = Self(0x0000_0010);
    pub const HINT_DXT5: Self = Self(0x0000_0020);
    pub const PWL_CORRECTED: Self = Self(0x0000_0040);
    pub const NORMAL: Self = Self(0x0000_0080);
    pub const NOMIP: Self = Self(0x0000_0100);
    pub const NOLOD: Self = Self(0x0000_0200);
    pub const ALL_MIPS: Self = Self(0x0000_0400);
    pub const PROCEDURAL: Self = Self(0x0000_0800);
    pub const ONEBITALPHA: Self = Self(0x0000_1000);
    pub const EIGHTBITALPHA: Self = Self(0x0000_2000);
    pub const ENVMAP: Self = Self(0x0000_4000);
    pub const RENDERTARGET: Self = Self(0x0000_8000);
    pub const DEPTHRENDERTARGET: Self = Self(0x0001_0000);
    pub const NODEBUGOVERRIDE: Self = Self(0x0002_0000);
    pub const SINGLECOPY: Self = Self(0x0004_0000);
    pub const PRE_SRGB: Self = Self(0x0008_0000);
    pub const NODEPTHBUFFER: Self = Self(0x0080_0000);
    pub const CLAMPU: Self = Self(0x0200_0000);
    pub const VERTEXTEXTURE: Self = Self(0x0400_0000);
    pub const SSBUMP: Self = Self(0x0800_0000);
    pub const BORDER: Self = Self(0x2000_0000);

    const NAMES: [(Self, &'static str); 25] = [
        (Self::POINTSAMPLE, "POINTSAMPLE"),
        (Self::TRILINEAR, "TRILINEAR"),
        (Self::CLAMPS, "CLAMPS"),
        (Self::CLAMPT, "CLAMPT"),
        (Self::ANISOTROPIC, "ANISOTROPIC"),
        (Self::HINT_DXT5, "HINT_DXT5"),
        (Self::PWL_CORRECTED, "PWL_CORRECTED"),
        (Self::NORMAL, "NORMAL"),
        (Self::NOMIP, "NOMIP"),
        (Self::NOLOD, "NOLOD"),
        (Self::ALL_MIPS, "ALL_MIPS"),
        (Self::PROCEDURAL, "PROCEDURAL"),
        (Self::ONEBITALPHA, "ONEBITALPHA"),
        (Self::EIGHTBITALPHA, "EIGHTBITALPHA"),
        (Self::ENVMAP, "ENVMAP"),
        (Self::RENDERTARGET, "RENDERTARGET"),
        (Self::DEPTHRENDERTARGET, "DEPTHRENDERTARGET"),
        (Self::NODEBUGOVERRIDE, "NODEBUGOVERRIDE"),
        (Self::SINGLECOPY, "SINGLECOPY"),
        (Self::PRE_SRGB, "PRE_SRGB"),
        (Self::NODEPTHBUFFER, "NODEPTHBUFFER"),
        (Self::CLAMPU, "CLAMPU"),
        (Self::VERTEXTEXTURE, "VERTEXTEXTURE"),
        (Self::SSBUMP, "SSBUMP"),
        (Self::BORDER, "BORDER"),
    ];

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Names of the set flags that have one.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMES
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl std::ops::BitOr for VtfFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for VtfFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Magic and version, common to every revision.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct VtfPreamble {
    pub magic: [u8; 4],
    pub major: u32,
    pub minor: u32,
}

/// Fixed record of VTF 7.0 and 7.1.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct HeaderV70 {
    /// Size of the whole header, preamble included.
    pub header_size: u32,
    pub width: u16,
    pub height: u16,
    pub flags: u32,
    pub frames: u16,
    pub first_frame: u16,
    pub padding0: [u8; 4],
    pub reflectivity: [f32; 3],
    pub padding1: [u8; 4],
    pub bumpmap_scale: f32,
    pub high_res_format: i32,
    pub mipmap_count: u8,
    pub low_res_format: i32,
    pub low_res_width: u8,
    pub low_res_height: u8,
}

/// Fixed record of VTF 7.2.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct HeaderV72 {
    pub base: HeaderV70,
    pub depth: u16,
}

/// Fixed record of VTF 7.3 and 7.4.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct HeaderV73 {
    pub base: HeaderV72,
    pub padding2: [u8; 3],
    pub resource_count: u32,
    pub padding3: [u8; 8],
}

/// One stored resource dictionary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct ResourceEntry {
    pub tag: [u8; 3],
    pub flags: u8,
    /// Absolute offset of the data, or the data itself when flagged.
    pub offset: u32,
}

/// Tag of the low-resolution image resource.
pub const RESOURCE_LOW_RES: [u8; 3] = [0x01, 0x00, 0x00];
/// Tag of the high-resolution image resource.
pub const RESOURCE_HIGH_RES: [u8; 3] = [0x30, 0x00, 0x00];

/// Resource tags found in shipped files that carry no surface data.
const KNOWN_TAGS: [[u8; 3]; 5] = [*b"CRC", *b"LOD", *b"TSO", *b"KVD", [0x10, 0x00, 0x00]];

/// Canonical view of a resource dictionary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VtfResource {
    pub tag: [u8; 3],
    pub flags: u8,
    pub offset: u32,
}

impl VtfResource {
    pub const fn low_res(offset: u32) -> Self {
        Self {
            tag: RESOURCE_LOW_RES,
            flags: 0,
            offset,
        }
    }

    pub const fn high_res(offset: u32) -> Self {
        Self {
            tag: RESOURCE_HIGH_RES,
            flags: 0,
            offset,
        }
    }

    fn entry(&self) -> ResourceEntry {
        ResourceEntry {
            tag: self.tag,
            flags: self.flags,
            offset: self.offset,
        }
    }
}

impl From<ResourceEntry> for VtfResource {
    fn from(entry: ResourceEntry) -> Self {
        Self {
            tag: entry.tag,
            flags: entry.flags,
            offset: entry.offset,
        }
    }
}

/// The fixed record as stored, keyed by version.
#[derive(Debug, Clone, Copy)]
pub enum VtfLayout {
    V70(HeaderV70),
    V72(HeaderV72),
    V73(HeaderV73),
}

impl VtfLayout {
    /// Read the record for `version` from `reader`, consuming exactly its size.
    pub fn read(reader: &mut BinaryReader<'_>, version: VtfVersion) -> Result<Self> {
        let layout = if version.has_resources() {
            VtfLayout::V73(reader.read_struct()?)
        } else if version.has_depth() {
            VtfLayout::V72(reader.read_struct()?)
        } else {
            VtfLayout::V70(reader.read_struct()?)
        };
        Ok(layout)
    }

    /// The 7.0 fields shared by every layout.
    pub fn base(&self) -> &HeaderV70 {
        match self {
            VtfLayout::V70(h) => h,
            VtfLayout::V72(h) => &h.base,
            VtfLayout::V73(h) => &h.base.base,
        }
    }

    /// Depth, 1 before 7.2.
    pub fn depth(&self) -> u16 {
        match self {
            VtfLayout::V70(_) => 1,
            VtfLayout::V72(h) => h.depth,
            VtfLayout::V73(h) => h.base.depth,
        }
    }

    /// Resource count, 0 before 7.3.
    pub fn resource_count(&self) -> u32 {
        match self {
            VtfLayout::V73(h) => h.resource_count,
            _ => 0,
        }
    }

    /// The stored bytes of the record.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            VtfLayout::V70(h) => h.as_bytes(),
            VtfLayout::V72(h) => h.as_bytes(),
            VtfLayout::V73(h) => h.as_bytes(),
        }
    }
}

/// Canonical VTF header.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VtfHeader {
    pub version: VtfVersion,
    /// Declared size of the header; surface data starts here unless the
    /// resource dictionary says otherwise.
    pub header_size: u32,
    pub width: u16,
    pub height: u16,
    pub flags: VtfFlags,
    pub frames: u16,
    pub first_frame: u16,
    pub reflectivity: [f32; 3],
    pub bumpmap_scale: f32,
    pub pixel_format: VtfPixelFormat,
    pub mipmap_count: u8,
    pub low_res_format: VtfPixelFormat,
    pub low_res_width: u8,
    pub low_res_height: u8,
    /// Volume depth, 1 for flat textures.
    pub depth: u16,
    pub resources: Vec<VtfResource>,
}

impl VtfHeader {
    /// Parse the header at the start of `data`.
    ///
    /// Fails with [`Error::InvalidMagic`] when `data` is not a VTF file at
    /// all, so callers can try another format.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);

        let magic = match reader.peek_bytes(4) {
            Ok(bytes) => [bytes[0], bytes[1], bytes[2], bytes[3]],
            Err(_) => {
                let mut short = [0u8; 4];
                short[..data.len()].copy_from_slice(data);
                return Err(Error::InvalidMagic(short));
            }
        };
        if &magic != VTF_MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let preamble: VtfPreamble = reader.read_struct()?;
        let version = VtfVersion::new(preamble.major, preamble.minor);
        if !version.is_supported() {
            return Err(Error::UnsupportedVersion(version));
        }

        let layout = VtfLayout::read(&mut reader, version)?;

        let resource_count = layout.resource_count();
        if resource_count > MAX_RESOURCES {
            return Err(Error::TooManyResources(resource_count));
        }
        let entries: Vec<ResourceEntry> = reader.read_array(resource_count as usize)?;

        let base = layout.base();
        let declared = base.header_size;
        let used = reader.position();
        let aligned = used.next_multiple_of(HEADER_ALIGNMENT);
        if declared as usize != used && declared as usize != aligned {
            return Err(Error::HeaderSizeMismatch {
                version,
                declared,
                expected: aligned as u32,
            });
        }
        if data.len() < declared as usize {
            return Err(Error::TruncatedHeader {
                declared: declared as usize,
                available: data.len(),
            });
        }

        for entry in &entries {
            let tag = entry.tag;
            if tag != RESOURCE_LOW_RES && tag != RESOURCE_HIGH_RES && !KNOWN_TAGS.contains(&tag) {
                warn!(?tag, "unknown VTF resource tag");
            }
        }

        let header = Self {
            version,
            header_size: declared,
            width: base.width,
            height: base.height,
            flags: VtfFlags(base.flags),
            frames: base.frames,
            first_frame: base.first_frame,
            reflectivity: base.reflectivity,
            bumpmap_scale: base.bumpmap_scale,
            pixel_format: VtfPixelFormat::from_code(base.high_res_format),
            mipmap_count: base.mipmap_count,
            low_res_format: VtfPixelFormat::from_code(base.low_res_format),
            low_res_width: base.low_res_width,
            low_res_height: base.low_res_height,
            depth: layout.depth(),
            resources: entries.into_iter().map(VtfResource::from).collect(),
        };

        debug!(
            version = %header.version,
            width = header.width,
            height = header.height,
            format = %header.pixel_format,
            mips = header.mipmap_count,
            frames = header.frames,
            resources = header.resources.len(),
            "parsed VTF header"
        );
        Ok(header)
    }

    /// Header size a writer emits for `version` with `resources` entries:
    /// the fixed record plus dictionary, padded to 16 bytes.
    pub fn aligned_size(version: VtfVersion, resources: usize) -> usize {
        let dictionary = if version.has_resources() {
            resources * std::mem::size_of::<ResourceEntry>()
        } else {
            0
        };
        (version.fixed_size() + dictionary).next_multiple_of(HEADER_ALIGNMENT)
    }

    /// Build the stored record for this header's version.
    pub fn layout(&self) -> VtfLayout {
        let base = HeaderV70 {
            header_size: self.header_size,
            width: self.width,
            height: self.height,
            flags: self.flags.bits(),
            frames: self.frames,
            first_frame: self.first_frame,
            padding0: [0; 4],
            reflectivity: self.reflectivity,
            padding1: [0; 4],
            bumpmap_scale: self.bumpmap_scale,
            high_res_format: self.pixel_format.code(),
            mipmap_count: self.mipmap_count,
            low_res_format: self.low_res_format.code(),
            low_res_width: self.low_res_width,
            low_res_height: self.low_res_height,
        };
        if !self.version.has_depth() {
            return VtfLayout::V70(base);
        }

        let v72 = HeaderV72 {
            base,
            depth: self.depth,
        };
        if !self.version.has_resources() {
            return VtfLayout::V72(v72);
        }

        VtfLayout::V73(HeaderV73 {
            base: v72,
            padding2: [0; 3],
            resource_count: self.resources.len() as u32,
            padding3: [0; 8],
        })
    }

    /// Serialize the header, zero-padded to `header_size`.
    ///
    /// Resources are only written for 7.3 and later.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if !self.version.is_supported() {
            return Err(Error::UnsupportedVersion(self.version));
        }
        if self.resources.len() > MAX_RESOURCES as usize {
            return Err(Error::TooManyResources(self.resources.len() as u32));
        }

        let preamble = VtfPreamble {
            magic: *VTF_MAGIC,
            major: self.version.major,
            minor: self.version.minor,
        };

        let mut out = Vec::with_capacity(self.header_size as usize);
        out.extend_from_slice(preamble.as_bytes());
        out.extend_from_slice(self.layout().as_bytes());
        if self.version.has_resources() {
            for resource in &self.resources {
                out.extend_from_slice(resource.entry().as_bytes());
            }
        }

        let declared = self.header_size as usize;
        if declared != out.len() && declared != out.len().next_multiple_of(HEADER_ALIGNMENT) {
            return Err(Error::HeaderSizeMismatch {
                version: self.version,
                declared: self.header_size,
                expected: out.len().next_multiple_of(HEADER_ALIGNMENT) as u32,
            });
        }
        out.resize(declared, 0);
        Ok(out)
    }

    /// First resource with `tag`.
    pub fn resource(&self, tag: [u8; 3]) -> Option<&VtfResource> {
        self.resources.iter().find(|r| r.tag == tag)
    }

    /// Whether the header declares a thumbnail.
    pub fn has_thumbnail(&self) -> bool {
        !self.low_res_format.is_none() && self.low_res_width > 0 && self.low_res_height > 0
    }

    /// Faces per frame: 6 for cube maps, 7 when a sphere map follows them.
    pub fn face_count(&self) -> u32 {
        if !self.flags.contains(VtfFlags::ENVMAP) {
            1
        } else if self.first_frame != 0xFFFF {
            7
        } else {
            6
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(version: VtfVersion) -> VtfHeader {
        let resources = if version.has_resources() {
            vec![VtfResource::low_res(96), VtfResource::high_res(96 + 128)]
        } else {
            Vec::new()
        };
        VtfHeader {
            version,
            header_size: VtfHeader::aligned_size(version, resources.len()) as u32,
            width: 256,
            height: 128,
            flags: VtfFlags::EIGHTBITALPHA,
            frames: 1,
            first_frame: 0,
            reflectivity: [1.0; 3],
            bumpmap_scale: 1.0,
            pixel_format: VtfPixelFormat::Rgba8888,
            mipmap_count: 9,
            low_res_format: VtfPixelFormat::Dxt1,
            low_res_width: 16,
            low_res_height: 8,
            depth: 1,
            resources,
        }
    }

    #[test]
    fn test_struct_sizes() {
        assert_eq!(std::mem::size_of::<VtfPreamble>(), 12);
        assert_eq!(std::mem::size_of::<HeaderV70>(), 51);
        assert_eq!(std::mem::size_of::<HeaderV72>(), 53);
        assert_eq!(std::mem::size_of::<HeaderV73>(), 68);
        assert_eq!(std::mem::size_of::<ResourceEntry>(), 8);
    }

    #[test]
    fn test_aligned_sizes() {
        assert_eq!(VtfHeader::aligned_size(VtfVersion::V7_0, 0), 64);
        assert_eq!(VtfHeader::aligned_size(VtfVersion::V7_1, 2), 64);
        assert_eq!(VtfHeader::aligned_size(VtfVersion::V7_2, 0), 80);
        assert_eq!(VtfHeader::aligned_size(VtfVersion::V7_3, 2), 96);
        assert_eq!(VtfHeader::aligned_size(VtfVersion::V7_4, 3), 112);
    }

    #[test]
    fn test_serialize_then_parse() {
        for version in [VtfVersion::V7_0, VtfVersion::V7_1, VtfVersion::V7_2, VtfVersion::V7_3, VtfVersion::V7_4] {
            let header = sample(version);
            let bytes = header.to_bytes().unwrap();
            assert_eq!(bytes.len(), header.header_size as usize);
            assert_eq!(bytes.len() % HEADER_ALIGNMENT, 0);
            assert_eq!(VtfHeader::parse(&bytes).unwrap(), header, "{version}");
        }
    }

    #[test]
    fn test_v73_dictionary_bytes() {
        let bytes = sample(VtfVersion::V7_4).to_bytes().unwrap();
        assert_eq!(&bytes[80..84], &[0x01, 0, 0, 0]);
        assert_eq!(&bytes[84..88], &96u32.to_le_bytes());
        assert_eq!(&bytes[88..92], &[0x30, 0, 0, 0]);
        assert_eq!(&bytes[92..96], &224u32.to_le_bytes());
    }

    #[test]
    fn test_header_size_mismatch() {
        let mut bytes = sample(VtfVersion::V7_2).to_bytes().unwrap();
        bytes[12..16].copy_from_slice(&72u32.to_le_bytes());
        match VtfHeader::parse(&bytes) {
            Err(err @ Error::HeaderSizeMismatch { .. }) => {
                assert_eq!(err.kind(), texmap_common::ErrorKind::TruncatedHeader);
            }
            other => panic!("expected HeaderSizeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_unaligned_exact_size_is_accepted() {
        let mut header = sample(VtfVersion::V7_0);
        header.header_size = 63;
        let bytes = header.to_bytes().unwrap();
        assert_eq!(bytes.len(), 63);
        assert_eq!(VtfHeader::parse(&bytes).unwrap().header_size, 63);
    }

    #[test]
    fn test_short_input_is_truncated() {
        let bytes = sample(VtfVersion::V7_4).to_bytes().unwrap();
        for len in [12, 40, 79, 90] {
            let err = VtfHeader::parse(&bytes[..len]).unwrap_err();
            assert_eq!(err.kind(), texmap_common::ErrorKind::TruncatedHeader, "len {len}");
        }
    }

    #[test]
    fn test_version_gate() {
        let mut bytes = sample(VtfVersion::V7_4).to_bytes().unwrap();
        bytes[8..12].copy_from_slice(&5u32.to_le_bytes());
        assert!(matches!(VtfHeader::parse(&bytes), Err(Error::UnsupportedVersion(_))));

        bytes[4..8].copy_from_slice(&6u32.to_le_bytes());
        bytes[8..12].copy_from_slice(&0u32.to_le_bytes());
        assert!(matches!(VtfHeader::parse(&bytes), Err(Error::UnsupportedVersion(_))));
    }

    #[test]
    fn test_foreign_magic() {
        let err = VtfHeader::parse(b"DDS \x7c\x00\x00\x00").unwrap_err();
        assert!(err.is_not_this_format());
        assert!(VtfHeader::parse(b"VT").unwrap_err().is_not_this_format());
    }

    #[test]
    fn test_too_many_resources() {
        let mut bytes = sample(VtfVersion::V7_3).to_bytes().unwrap();
        bytes[12 + 53 + 3..12 + 53 + 7].copy_from_slice(&33u32.to_le_bytes());
        assert!(matches!(VtfHeader::parse(&bytes), Err(Error::TooManyResources(33))));
    }

    #[test]
    fn test_faces() {
        let mut header = sample(VtfVersion::V7_4);
        assert_eq!(header.face_count(), 1);
        header.flags |= VtfFlags::ENVMAP;
        header.first_frame = 0xFFFF;
        assert_eq!(header.face_count(), 6);
        header.first_frame = 0;
        assert_eq!(header.face_count(), 7);
    }

    #[test]
    fn test_flag_names_and_version_parse() {
        let flags = VtfFlags::EIGHTBITALPHA | VtfFlags::CLAMPS;
        assert_eq!(flags.names().collect::<Vec<_>>(), ["CLAMPS", "EIGHTBITALPHA"]);
        assert_eq!("7.3".parse::<VtfVersion>().unwrap(), VtfVersion::V7_3);
        assert!("seven".parse::<VtfVersion>().is_err());
    }
}
