//! Pixel codecs and image operations for texmap containers.
//!
//! The container crates only compute where surfaces live. This crate turns
//! those surfaces into pixels and back:
//!
//! - [`RawCodec`] - raw channel layouts (RGBA, BGR, BGRX, ...)
//! - [`BcnCodec`] - BC1-BC7 via `bcdec_rs` and `intel_tex_2` (feature `bcn`)
//! - [`StandardCodec`] - dispatches on the decode method
//! - [`ImageRsOps`] - mode conversion and resizing via `image`

mod ops;
mod raw;

#[cfg(feature = "bcn")]
mod bcn;

#[cfg(feature = "bcn")]
pub use bcn::{native_mode, BcnCodec};
pub use ops::{from_dynamic, from_dynamic_as, to_dynamic, ImageRsOps};
pub use raw::RawCodec;

use texmap_common::{DecodeMethod, PixelBuffer, Result, SurfaceCodec, SurfaceDescriptor};

/// Codec handling every method this build supports.
///
/// Block-compressed methods fail with
/// [`Error::UnsupportedMethod`](texmap_common::Error::UnsupportedMethod) when
/// the `bcn` feature is off.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCodec;

impl SurfaceCodec for StandardCodec {
    fn encode_surface(&self, image: &PixelBuffer, method: DecodeMethod) -> Result<Vec<u8>> {
        match method {
            DecodeMethod::Raw(_) => RawCodec.encode_surface(image, method),
            #[cfg(feature = "bcn")]
            DecodeMethod::Block(_) => BcnCodec.encode_surface(image, method),
            #[cfg(not(feature = "bcn"))]
            DecodeMethod::Block(_) => Err(texmap_common::Error::UnsupportedMethod(method)),
        }
    }

    fn decode_surface(&self, bytes: &[u8], surface: &SurfaceDescriptor) -> Result<PixelBuffer> {
        match surface.method {
            DecodeMethod::Raw(_) => RawCodec.decode_surface(bytes, surface),
            #[cfg(feature = "bcn")]
            DecodeMethod::Block(_) => BcnCodec.decode_surface(bytes, surface),
            #[cfg(not(feature = "bcn"))]
            DecodeMethod::Block(_) => Err(texmap_common::Error::UnsupportedMethod(surface.method)),
        }
    }
}
