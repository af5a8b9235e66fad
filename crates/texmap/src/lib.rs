//! Texmap - GPU texture container reading and writing.
//!
//! This crate provides a unified interface to the texmap crates:
//!
//! - [`texmap_common`] - Binary reading, pixel classification, mip planning, layouts
//! - [`texmap_codec`] - Raw and block-compressed pixel codecs, image operations
//! - [`texmap_vtf`] - Valve Texture Format 7.0-7.4
//! - [`texmap_dds`] - DirectDraw Surface, legacy and DX10 headers
//!
//! # Example
//!
//! ```no_run
//! use texmap::prelude::*;
//!
//! let data = std::fs::read("rock.vtf")?;
//! let texture = Texture::parse(&data)?;
//! println!("{} {}x{} {}", texture.kind(), texture.width(), texture.height(), texture.format_name());
//!
//! let image = texture.decode(&data, &StandardCodec)?;
//! assert_eq!(image.width, texture.width());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

// Re-export all sub-crates
pub use texmap_codec as codec;
pub use texmap_common as common;
pub use texmap_dds as dds;
pub use texmap_vtf as vtf;

use texmap_common::{
    ErrorKind, ImageOps, LayoutPlan, PixelBuffer, PixelFormatInfo, SurfaceCodec, SurfaceDescriptor,
};
use texmap_dds::{DdsFile, DdsWriteOptions, DdsWriter};
use texmap_vtf::{VtfFile, VtfWriteOptions, VtfWriter};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{ContainerKind, Texture, WriteOptions};
    pub use texmap_codec::{ImageRsOps, StandardCodec};
    pub use texmap_common::{ColorMode, ErrorKind, ImageOps, PixelBuffer, SurfaceCodec};
    pub use texmap_dds::{DdsFile, DdsFormat, DdsWriteOptions, DdsWriter};
    pub use texmap_vtf::{VtfFile, VtfPixelFormat, VtfVersion, VtfWriteOptions, VtfWriter};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Errors from format probing and dispatch.
#[derive(Debug, Error)]
pub enum Error {
    #[error("VTF: {0}")]
    Vtf(#[from] texmap_vtf::Error),

    #[error("DDS: {0}")]
    Dds(#[from] texmap_dds::Error),

    #[error("{0}")]
    Common(#[from] texmap_common::Error),

    /// No container claims the signature.
    #[error("unrecognized texture signature {0:02X?}")]
    Unrecognized(Vec<u8>),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Vtf(e) => e.kind(),
            Error::Dds(e) => e.kind(),
            Error::Common(e) => e.kind(),
            Error::Unrecognized(_) => ErrorKind::NotThisFormat,
        }
    }

    /// Whether the input is not a texture container at all.
    pub fn is_not_this_format(&self) -> bool {
        self.kind() == ErrorKind::NotThisFormat
    }
}

/// Result type for texmap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Supported container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ContainerKind {
    Vtf,
    Dds,
}

impl ContainerKind {
    /// Pick a container from a file extension, case-insensitively.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("vtf") {
            Some(Self::Vtf)
        } else if ext.eq_ignore_ascii_case("dds") {
            Some(Self::Dds)
        } else {
            None
        }
    }

    /// Identify a container by its magic.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(texmap_vtf::VTF_MAGIC) {
            Some(Self::Vtf)
        } else if data.starts_with(texmap_dds::DDS_MAGIC) {
            Some(Self::Dds)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Vtf => "VTF",
            Self::Dds => "DDS",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed texture of any supported container.
#[derive(Debug, Clone)]
pub enum Texture {
    Vtf(VtfFile),
    Dds(DdsFile),
}

impl Texture {
    /// Parse `data` with the first container that claims it.
    ///
    /// Each reader is tried in turn; a `NotThisFormat` failure moves on to
    /// the next, any other failure is returned.
    pub fn parse(data: &[u8]) -> Result<Self> {
        match DdsFile::parse(data) {
            Ok(file) => return Ok(Self::Dds(file)),
            Err(e) if e.is_not_this_format() => {}
            Err(e) => return Err(e.into()),
        }
        match VtfFile::parse(data) {
            Ok(file) => return Ok(Self::Vtf(file)),
            Err(e) if e.is_not_this_format() => {}
            Err(e) => return Err(e.into()),
        }

        let magic = data[..data.len().min(4)].to_vec();
        debug!(magic = ?magic, "no container claims the input");
        Err(Error::Unrecognized(magic))
    }

    pub fn kind(&self) -> ContainerKind {
        match self {
            Self::Vtf(_) => ContainerKind::Vtf,
            Self::Dds(_) => ContainerKind::Dds,
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            Self::Vtf(f) => f.width(),
            Self::Dds(f) => f.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Vtf(f) => f.height(),
            Self::Dds(f) => f.height(),
        }
    }

    /// Classification of the primary pixel format.
    pub fn format(&self) -> PixelFormatInfo {
        match self {
            Self::Vtf(f) => f.format(),
            Self::Dds(f) => f.format(),
        }
    }

    /// The container's own name for the primary pixel format.
    pub fn format_name(&self) -> String {
        match self {
            Self::Vtf(f) => f.header().pixel_format.to_string(),
            Self::Dds(f) => f.info().format.to_string(),
        }
    }

    pub fn layout(&self) -> &LayoutPlan {
        match self {
            Self::Vtf(f) => f.layout(),
            Self::Dds(f) => f.layout(),
        }
    }

    pub fn primary(&self) -> &SurfaceDescriptor {
        self.layout().primary()
    }

    pub fn thumbnail(&self) -> Option<&SurfaceDescriptor> {
        self.layout().thumbnail()
    }

    /// Borrow the bytes of `surface` from `data`.
    pub fn surface_bytes<'a>(&self, data: &'a [u8], surface: &SurfaceDescriptor) -> Result<&'a [u8]> {
        Ok(match self {
            Self::Vtf(f) => f.surface_bytes(data, surface)?,
            Self::Dds(f) => f.surface_bytes(data, surface)?,
        })
    }

    /// Decode any surface with `codec`.
    pub fn decode_surface<C: SurfaceCodec>(
        &self,
        data: &[u8],
        surface: &SurfaceDescriptor,
        codec: &C,
    ) -> Result<PixelBuffer> {
        Ok(match self {
            Self::Vtf(f) => f.decode_surface(data, surface, codec)?,
            Self::Dds(f) => f.decode_surface(data, surface, codec)?,
        })
    }

    /// Decode the full-resolution image.
    pub fn decode<C: SurfaceCodec>(&self, data: &[u8], codec: &C) -> Result<PixelBuffer> {
        self.decode_surface(data, self.primary(), codec)
    }
}

/// Parse `data` and decode its primary surface with the standard codec.
pub fn decode(data: &[u8]) -> Result<PixelBuffer> {
    Texture::parse(data)?.decode(data, &texmap_codec::StandardCodec)
}

/// Writer configuration for either container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOptions {
    Vtf(VtfWriteOptions),
    Dds(DdsWriteOptions),
}

impl WriteOptions {
    /// Default options for `kind`.
    pub fn for_kind(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Vtf => Self::Vtf(VtfWriteOptions::default()),
            ContainerKind::Dds => Self::Dds(DdsWriteOptions::default()),
        }
    }

    pub fn kind(&self) -> ContainerKind {
        match self {
            Self::Vtf(_) => ContainerKind::Vtf,
            Self::Dds(_) => ContainerKind::Dds,
        }
    }

    /// Encode `image` into a complete file.
    pub fn write<O, C>(&self, image: &PixelBuffer, ops: &O, codec: &C) -> Result<Vec<u8>>
    where
        O: ImageOps,
        C: SurfaceCodec,
    {
        Ok(match *self {
            Self::Vtf(options) => VtfWriter::new(options).write(image, ops, codec)?,
            Self::Dds(options) => DdsWriter::new(options).write(image, ops, codec)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_path() {
        assert_eq!(ContainerKind::from_path("a/b/brick.VTF"), Some(ContainerKind::Vtf));
        assert_eq!(ContainerKind::from_path("normal.dds"), Some(ContainerKind::Dds));
        assert_eq!(ContainerKind::from_path("image.png"), None);
        assert_eq!(ContainerKind::from_path("noext"), None);
    }

    #[test]
    fn test_sniff() {
        assert_eq!(ContainerKind::sniff(b"VTF\0\x07\0\0\0"), Some(ContainerKind::Vtf));
        assert_eq!(ContainerKind::sniff(b"DDS \x7c"), Some(ContainerKind::Dds));
        assert_eq!(ContainerKind::sniff(b"\x89PNG"), None);
    }

    #[test]
    fn test_unrecognized() {
        let inputs: [&[u8]; 3] = [b"\x89PNG\r\n\x1a\n", b"", b"VT"];
        for data in inputs {
            let err = Texture::parse(data).unwrap_err();
            assert!(err.is_not_this_format(), "{data:?}");
        }
    }

    #[test]
    fn test_truncated_is_not_probed_further() {
        let err = Texture::parse(b"DDS \x7c\0\0\0").unwrap_err();
        assert!(matches!(err, Error::Dds(_)));
        assert_eq!(err.kind(), ErrorKind::TruncatedHeader);
    }
}
