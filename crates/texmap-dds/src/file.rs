//! DDS reader.

use texmap_common::{LayoutPlan, PixelBuffer, PixelFormatInfo, SurfaceCodec, SurfaceDescriptor};
use tracing::warn;

use crate::header::{DdsInfo, DdsLayout};
use crate::layout::resolve;
use crate::{Error, Result};

/// A parsed DDS file.
#[derive(Debug, Clone)]
pub struct DdsFile {
    info: DdsInfo,
    stored: DdsLayout,
    format: PixelFormatInfo,
    layout: LayoutPlan,
}

impl DdsFile {
    /// Parse the header of `data` and resolve its layout.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (info, stored) = DdsInfo::parse(data)?;
        let format = info.format.classify()?;
        let layout = resolve(&info)?;

        if layout.data_end() > data.len() {
            warn!(
                data_end = layout.data_end(),
                available = data.len(),
                "DDS surfaces extend past the end of the file"
            );
        }

        Ok(Self {
            info,
            stored,
            format,
            layout,
        })
    }

    pub fn info(&self) -> &DdsInfo {
        &self.info
    }

    /// The header records exactly as stored.
    pub fn stored_header(&self) -> &DdsLayout {
        &self.stored
    }

    pub fn layout(&self) -> &LayoutPlan {
        &self.layout
    }

    pub fn format(&self) -> PixelFormatInfo {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    /// The base level of the first layer.
    pub fn primary(&self) -> &SurfaceDescriptor {
        self.layout.primary()
    }

    /// Borrow the bytes of `surface` from `data`.
    pub fn surface_bytes<'a>(&self, data: &'a [u8], surface: &SurfaceDescriptor) -> Result<&'a [u8]> {
        surface.slice(data).ok_or(Error::TruncatedSurface {
            offset: surface.byte_offset,
            length: surface.byte_length,
            available: data.len(),
        })
    }

    /// Decode any surface with `codec`.
    pub fn decode_surface<C: SurfaceCodec>(
        &self,
        data: &[u8],
        surface: &SurfaceDescriptor,
        codec: &C,
    ) -> Result<PixelBuffer> {
        let bytes = self.surface_bytes(data, surface)?;
        Ok(codec.decode_surface(bytes, surface)?)
    }

    /// Decode the full-resolution image of the first layer.
    pub fn decode<C: SurfaceCodec>(&self, data: &[u8], codec: &C) -> Result<PixelBuffer> {
        self.decode_surface(data, self.primary(), codec)
    }
}
