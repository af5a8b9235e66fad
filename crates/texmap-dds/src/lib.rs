//! DirectDraw Surface (DDS) support.
//!
//! Legacy headers (FourCC or channel masks) and DX10 extended headers are
//! read. Unlike VTF, a DDS file stores the base level first, and every
//! array element or cube face carries its own mip chain.
//!
//! # Example
//!
//! ```no_run
//! use texmap_codec::StandardCodec;
//! use texmap_dds::DdsFile;
//!
//! let data = std::fs::read("normal.dds")?;
//! let file = DdsFile::parse(&data)?;
//! println!("{}x{} {}", file.width(), file.height(), file.info().format);
//!
//! let image = file.decode(&data, &StandardCodec)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod file;
mod format;
mod header;
mod layout;
mod writer;

pub use error::{Error, Result};
pub use file::DdsFile;
pub use format::{DdsFormat, DxgiFormat};
pub use header::{ddpf, ddscaps, ddsd, DdsHeader, DdsHeaderDxt10, DdsInfo, DdsLayout, DdsPixelFormat, FourCC};
pub use layout::{resolve, MAX_SURFACES};
pub use writer::{DdsWriteOptions, DdsWriter};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";

/// Byte length of one surface of `format`, or `UnsupportedPixelFormat`.
pub fn surface_size(format: DdsFormat, width: u32, height: u32) -> Result<usize> {
    let info = format.classify()?;
    Ok(texmap_common::surface_size(info.method, width, height)?)
}
