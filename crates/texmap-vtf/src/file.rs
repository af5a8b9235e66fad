//! VTF reader.

use texmap_common::{LayoutPlan, PixelBuffer, PixelFormatInfo, SurfaceCodec, SurfaceDescriptor};
use tracing::warn;

use crate::header::VtfHeader;
use crate::layout::resolve;
use crate::{Error, Result};

/// A parsed VTF file: header plus the location of every surface.
///
/// Parsing only looks at the header; pixel bytes are touched when a surface
/// is decoded.
#[derive(Debug, Clone)]
pub struct VtfFile {
    header: VtfHeader,
    format: PixelFormatInfo,
    layout: LayoutPlan,
}

impl VtfFile {
    /// Parse the header of `data` and resolve its layout.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = VtfHeader::parse(data)?;
        let format = header.pixel_format.classify()?;
        let layout = resolve(&header)?;

        if layout.data_end() > data.len() {
            warn!(
                data_end = layout.data_end(),
                available = data.len(),
                "VTF surfaces extend past the end of the file"
            );
        }

        Ok(Self {
            header,
            format,
            layout,
        })
    }

    pub fn header(&self) -> &VtfHeader {
        &self.header
    }

    pub fn layout(&self) -> &LayoutPlan {
        &self.layout
    }

    /// Classification of the high-resolution format.
    pub fn format(&self) -> PixelFormatInfo {
        self.format
    }

    pub fn width(&self) -> u32 {
        u32::from(self.header.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.header.height)
    }

    /// The base level of the first frame.
    pub fn primary(&self) -> &SurfaceDescriptor {
        self.layout.primary()
    }

    pub fn thumbnail(&self) -> Option<&SurfaceDescriptor> {
        self.layout.thumbnail()
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

    /// Decode the full-resolution image.
    pub fn decode<C: SurfaceCodec>(&self, data: &[u8], codec: &C) -> Result<PixelBuffer> {
        self.decode_surface(data, self.primary(), codec)
    }

    /// Decode the thumbnail, if there is one.
    pub fn decode_thumbnail<C: SurfaceCodec>(&self, data: &[u8], codec: &C) -> Result<Option<PixelBuffer>> {
        self.thumbnail()
            .map(|thumb| self.decode_surface(data, thumb, codec))
            .transpose()
    }
}
