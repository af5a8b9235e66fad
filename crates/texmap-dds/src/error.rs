//! Error types for DDS handling.

use texmap_common::ErrorKind;
use thiserror::Error;

/// Errors that can occur when reading or writing DDS files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] texmap_common::Error),

    /// Invalid DDS magic.
    #[error("invalid DDS magic: expected 'DDS ', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// Header size field is not 124.
    #[error("DDS header size mismatch: declared {0}, expected 124")]
    HeaderSizeMismatch(u32),

    /// Pixel format without a decode method.
    #[error("unsupported DDS pixel format {0}")]
    UnsupportedPixelFormat(String),

    /// Array elements, faces and mips multiply past the surface limit.
    #[error("DDS describes {0} surfaces, more than the supported maximum")]
    TooManySurfaces(usize),

    /// A surface extends past the end of the data.
    #[error("surface at {offset}+{length} exceeds data length {available}")]
    TruncatedSurface {
        offset: usize,
        length: usize,
        available: usize,
    },

    /// Block formats are written at whole-block dimensions only.
    #[error("{format} needs dimensions divisible by 4, got {width}x{height}")]
    UnalignedDimensions {
        format: String,
        width: u32,
        height: u32,
    },
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Common(e) => e.kind(),
            Error::InvalidMagic(_) => ErrorKind::NotThisFormat,
            Error::HeaderSizeMismatch(_) => ErrorKind::TruncatedHeader,
            Error::UnsupportedPixelFormat(_) => ErrorKind::UnsupportedPixelFormat,
            Error::TooManySurfaces(_) | Error::UnalignedDimensions { .. } => ErrorKind::InvalidDimensions,
            Error::TruncatedSurface { .. } => ErrorKind::TruncatedSurface,
        }
    }

    /// Whether the input simply is not a DDS file.
    pub fn is_not_this_format(&self) -> bool {
        self.kind() == ErrorKind::NotThisFormat
    }
}

/// Result type for DDS operations.
pub type Result<T> = std::result::Result<T, Error>;
