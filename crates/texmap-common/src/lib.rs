//! Common types for texmap.
//!
//! This crate provides the pieces shared by the container crates:
//!
//! - [`BinaryReader`] - exact, bounds-checked reads of fixed-layout headers
//! - [`PixelFormatInfo`] - the classification every format code maps onto
//! - [`surface_size`] - the one byte-length formula used by readers and writers
//! - [`MipPlan`] - mipmap chain planning and power-of-two helpers
//! - [`SurfaceDescriptor`] / [`LayoutPlan`] - where each surface lives
//! - [`SurfaceCodec`] / [`ImageOps`] - the pixel-level collaborators

mod error;
mod reader;

pub mod codec;
pub mod mip;
pub mod pixel;
pub mod surface;

pub use codec::{encode_level, prepare_surface, ImageOps, PixelBuffer, SurfaceCodec};
pub use error::{Error, ErrorKind, Result};
pub use mip::{
    closest_power_of_two, mip_count, plan_mips, thumbnail_dimensions, validate_dimensions,
    validate_mip_count, MipLevel, MipPlan, MAX_DIMENSION, THUMBNAIL_MAX,
};
pub use pixel::{BlockVariant, ColorMode, DecodeMethod, PixelFormatInfo, RawLayout, BLOCK_SIZE};
pub use reader::BinaryReader;
pub use surface::{
    stored_dimensions, stored_surface_size, surface_size, LayoutPlan, SurfaceDescriptor,
    SurfaceKind,
};

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
