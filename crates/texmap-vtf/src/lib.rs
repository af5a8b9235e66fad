//! Valve Texture Format (VTF) support.
//!
//! Versions 7.0 through 7.4 are read and written. A VTF file is a header,
//! an optional low-resolution thumbnail, and a mip chain stored from the
//! smallest level up to the full-resolution base.
//!
//! # Example
//!
//! ```no_run
//! use texmap_codec::StandardCodec;
//! use texmap_vtf::VtfFile;
//!
//! let data = std::fs::read("brick.vtf")?;
//! let file = VtfFile::parse(&data)?;
//! println!("{}x{} {}", file.width(), file.height(), file.header().pixel_format);
//!
//! let image = file.decode(&data, &StandardCodec)?;
//! assert_eq!(image.width, file.width());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod file;
mod format;
mod header;
mod layout;
mod writer;

pub use error::{Error, Result};
pub use file::VtfFile;
pub use format::VtfPixelFormat;
pub use header::{
    HeaderV70, HeaderV72, HeaderV73, ResourceEntry, VtfFlags, VtfHeader, VtfLayout, VtfPreamble,
    VtfResource, VtfVersion, HEADER_ALIGNMENT, MAX_RESOURCES, RESOURCE_HIGH_RES, RESOURCE_LOW_RES,
};
pub use layout::{resolve, MAX_SURFACES};
pub use writer::{alpha_flags, VtfWriteOptions, VtfWriter, THUMBNAIL_FORMAT};

/// VTF file magic bytes ("VTF\0").
pub const VTF_MAGIC: &[u8; 4] = b"VTF\0";

/// Byte length of one surface of `format`, or `UnsupportedPixelFormat`.
pub fn surface_size(format: VtfPixelFormat, width: u32, height: u32) -> Result<usize> {
    let info = format.classify()?;
    Ok(texmap_common::surface_size(info.method, width, height)?)
}
