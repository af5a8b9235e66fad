//! Error types for texmap-common.

use thiserror::Error;

use crate::pixel::DecodeMethod;

/// Coarse classification shared by every texmap error type.
///
/// A format-sniffing caller only needs to tell [`ErrorKind::NotThisFormat`]
/// apart from the rest: it means "try another decoder", every other kind is
/// fatal for the current call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ErrorKind {
    /// The signature does not belong to this container format.
    NotThisFormat,
    /// The header is shorter than its declared or fixed size, or its declared
    /// size does not match the layout of its version.
    TruncatedHeader,
    /// The container version is outside the supported range.
    UnsupportedVersion,
    /// The container is valid but its pixel encoding is not handled.
    UnsupportedPixelFormat,
    /// Zero, absurd or inconsistent width, height, depth or mip count.
    InvalidDimensions,
    /// A surface extends past the end of the available data.
    TruncatedSurface,
    /// A codec or image collaborator failed.
    Codec,
    /// I/O error.
    Io,
}

/// Common error type for texmap operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading a fixed-size record.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Dimensions rejected by the planner or size calculator.
    #[error("invalid dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        width: u64,
        height: u64,
        reason: &'static str,
    },

    /// A codec was asked for a method it does not implement.
    #[error("no codec for {0}")]
    UnsupportedMethod(DecodeMethod),

    /// A pixel buffer does not hold `width * height * channels` bytes.
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Collaborator failure with a message.
    #[error("codec error: {0}")]
    Codec(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for an [`Error::InvalidDimensions`].
    pub fn invalid_dimensions(width: impl Into<u64>, height: impl Into<u64>, reason: &'static str) -> Self {
        Self::InvalidDimensions {
            width: width.into(),
            height: height.into(),
            reason,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnexpectedEof { .. } => ErrorKind::TruncatedHeader,
            Error::InvalidDimensions { .. } => ErrorKind::InvalidDimensions,
            Error::UnsupportedMethod(_) => ErrorKind::UnsupportedPixelFormat,
            Error::BufferSizeMismatch { .. } | Error::Codec(_) => ErrorKind::Codec,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
