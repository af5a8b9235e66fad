//! Error types for VTF handling.

use texmap_common::ErrorKind;
use thiserror::Error;

use crate::format::VtfPixelFormat;
use crate::header::VtfVersion;

/// Errors that can occur when reading or writing VTF files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] texmap_common::Error),

    /// Invalid VTF magic.
    #[error("invalid VTF magic: expected 'VTF\\0', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// Version outside 7.0-7.4.
    #[error("unsupported VTF version {0}")]
    UnsupportedVersion(VtfVersion),

    /// Declared header size does not fit the version's layout.
    #[error("VTF header size mismatch: declared {declared}, expected {expected} for version {version}")]
    HeaderSizeMismatch {
        version: VtfVersion,
        declared: u32,
        expected: u32,
    },

    /// Input ends before the declared header size.
    #[error("truncated VTF header: declared {declared} bytes, {available} available")]
    TruncatedHeader { declared: usize, available: usize },

    /// Resource dictionary larger than any real file uses.
    #[error("VTF resource count {0} exceeds the maximum of {max}", max = crate::header::MAX_RESOURCES)]
    TooManyResources(u32),

    /// Pixel format without a decode method.
    #[error("unsupported VTF pixel format {0}")]
    UnsupportedPixelFormat(VtfPixelFormat),

    /// Frames, faces and mips multiply past the surface limit.
    #[error("VTF describes {0} surfaces, more than the supported maximum")]
    TooManySurfaces(usize),

    /// A surface extends past the end of the data.
    #[error("surface at {offset}+{length} exceeds data length {available}")]
    TruncatedSurface {
        offset: usize,
        length: usize,
        available: usize,
    },
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Common(e) => e.kind(),
            Error::InvalidMagic(_) => ErrorKind::NotThisFormat,
            Error::UnsupportedVersion(_) => ErrorKind::UnsupportedVersion,
            Error::HeaderSizeMismatch { .. }
            | Error::TruncatedHeader { .. }
            | Error::TooManyResources(_) => ErrorKind::TruncatedHeader,
            Error::UnsupportedPixelFormat(_) => ErrorKind::UnsupportedPixelFormat,
            Error::TooManySurfaces(_) => ErrorKind::InvalidDimensions,
            Error::TruncatedSurface { .. } => ErrorKind::TruncatedSurface,
        }
    }

    /// Whether the input simply is not a VTF file.
    pub fn is_not_this_format(&self) -> bool {
        self.kind() == ErrorKind::NotThisFormat
    }
}

/// Result type for VTF operations.
pub type Result<T> = std::result::Result<T, Error>;
