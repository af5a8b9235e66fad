//! DDS writer.

use std::io::Write;

use texmap_common::{
    encode_level, mip_count, stored_surface_size, validate_dimensions, DecodeMethod, ImageOps,
    MipPlan, PixelBuffer, SurfaceCodec, BLOCK_SIZE,
};
use tracing::{debug, trace};

use crate::format::DdsFormat;
use crate::header::{ddscaps, ddsd, DdsHeader, DdsLayout};
use crate::{Error, Result};

/// Options for [`DdsWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DdsWriteOptions {
    /// Stored format. `None` picks one from the image mode.
    pub format: Option<DdsFormat>,
    /// Write a full mip chain. Default `false`.
    pub generate_mipmaps: bool,
}

impl DdsWriteOptions {
    pub fn with_format(mut self, format: DdsFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_mipmaps(mut self, generate_mipmaps: bool) -> Self {
        self.generate_mipmaps = generate_mipmaps;
        self
    }
}

/// Encodes images as DDS files.
///
/// The image keeps its dimensions. Formats without a FourCC of their own,
/// such as BC7, are written with a DX10 extension.
#[derive(Debug, Clone, Default)]
pub struct DdsWriter {
    options: DdsWriteOptions,
}

impl DdsWriter {
    pub fn new(options: DdsWriteOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DdsWriteOptions {
        &self.options
    }

    /// Encode `image` into a complete DDS file.
    pub fn write<O, C>(&self, image: &PixelBuffer, ops: &O, codec: &C) -> Result<Vec<u8>>
    where
        O: ImageOps,
        C: SurfaceCodec,
    {
        let format = self.options.format.unwrap_or(DdsFormat::for_mode(image.mode));
        let info = format.classify()?;
        let (pixel_format, ext) = format.to_pixel_format()?;

        let (width, height) = (image.width, image.height);
        validate_dimensions(width, height)?;
        if info.is_block_compressed() && (width % BLOCK_SIZE != 0 || height % BLOCK_SIZE != 0) {
            return Err(Error::UnalignedDimensions {
                format: format.to_string(),
                width,
                height,
            });
        }

        let levels = if self.options.generate_mipmaps { mip_count(width, height) } else { 1 };
        let plan = MipPlan::new(width, height, levels)?;

        let mut flags = ddsd::CAPS | ddsd::HEIGHT | ddsd::WIDTH | ddsd::PIXELFORMAT;
        let mut caps = ddscaps::TEXTURE;
        flags |= match info.method {
            DecodeMethod::Raw(_) => ddsd::PITCH,
            DecodeMethod::Block(_) => ddsd::LINEARSIZE,
        };
        let pitch_or_linear_size = pitch_or_linear_size(info.method, pixel_format.rgb_bit_count, width, height)?;
        if plan.len() > 1 {
            flags |= ddsd::MIPMAPCOUNT;
            caps |= ddscaps::COMPLEX | ddscaps::MIPMAP;
        }

        let header = DdsHeader {
            size: DdsHeader::SIZE,
            flags,
            height,
            width,
            pitch_or_linear_size,
            depth: 0,
            mipmap_count: if plan.len() > 1 { plan.len() as u32 } else { 0 },
            reserved1: [0; 11],
            pixel_format,
            caps,
            caps2: 0,
            caps3: 0,
            caps4: 0,
            reserved2: 0,
        };
        let stored = match ext {
            Some(ext) => DdsLayout::Dx10(header, ext),
            None => DdsLayout::Legacy(header),
        };

        let mut out = stored.to_bytes();
        for level in plan.levels() {
            let bytes = encode_level(image, level, info, ops, codec)?;
            trace!(level = level.level, bytes = bytes.len(), "encoded mip level");
            out.extend_from_slice(&bytes);
        }

        debug!(
            width,
            height,
            format = %format,
            mips = plan.len(),
            bytes = out.len(),
            "wrote DDS"
        );
        Ok(out)
    }

    /// Encode `image` and write the file to `writer`.
    pub fn write_to<W, O, C>(&self, writer: &mut W, image: &PixelBuffer, ops: &O, codec: &C) -> Result<()>
    where
        W: Write,
        O: ImageOps,
        C: SurfaceCodec,
    {
        let bytes = self.write(image, ops, codec)?;
        writer.write_all(&bytes)?;
        Ok(())
    }
}

/// Row pitch of a raw surface, or the byte size of a block-compressed base
/// level. Either must fit the 32-bit header field.
fn pitch_or_linear_size(method: DecodeMethod, bit_count: u32, width: u32, height: u32) -> Result<u32> {
    let size = match method {
        DecodeMethod::Raw(_) => (u64::from(width) * u64::from(bit_count)).div_ceil(8),
        DecodeMethod::Block(_) => stored_surface_size(method, width, height)? as u64,
    };
    u32::try_from(size).map_err(|_| {
        Error::from(texmap_common::Error::invalid_dimensions(
            width,
            height,
            "linear size exceeds 32 bits",
        ))
    })
}
