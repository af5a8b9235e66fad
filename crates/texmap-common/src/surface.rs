//! Surface sizing and surface descriptors.
//!
//! [`surface_size`] is the single formula used both to advance offsets on
//! the read path and to size encoded buffers on the write path.

use crate::pixel::{ColorMode, DecodeMethod, PixelFormatInfo, BLOCK_SIZE};
use crate::{Error, Result};

/// Byte length of one surface of `width` x `height` texels.
///
/// The result is linear in `width * height`:
///
/// - 4-bit block family (BC1, BC1A, BC4): `w * h / 2`
/// - 8-bit block family (BC2, BC3, BC5, BC7): `w * h`
/// - raw: `w * h * bytes_per_texel`
///
/// Callers pass stored dimensions (see [`stored_dimensions`]) so that block
/// formats are sized in whole blocks.
pub fn surface_size(method: DecodeMethod, width: u32, height: u32) -> Result<usize> {
    let texels = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::invalid_dimensions(width, height, "surface size overflows"))?;

    let size = match method {
        DecodeMethod::Block(variant) => match variant.bits_per_texel() {
            4 => Some(texels / 2),
            _ => Some(texels),
        },
        DecodeMethod::Raw(layout) => texels.checked_mul(layout.bytes_per_texel()),
    };

    size.ok_or_else(|| Error::invalid_dimensions(width, height, "surface size overflows"))
}

/// Dimensions a surface of nominal `width` x `height` is stored at.
///
/// Block-compressed surfaces are rounded up to whole 4x4 blocks, so they are
/// never smaller than 4x4. Raw surfaces are clamped to at least 1x1.
pub fn stored_dimensions(method: DecodeMethod, width: u32, height: u32) -> (u32, u32) {
    match method {
        DecodeMethod::Block(_) => (
            width.max(1).div_ceil(BLOCK_SIZE) * BLOCK_SIZE,
            height.max(1).div_ceil(BLOCK_SIZE) * BLOCK_SIZE,
        ),
        DecodeMethod::Raw(_) => (width.max(1), height.max(1)),
    }
}

/// Byte length of a surface given its nominal dimensions.
pub fn stored_surface_size(method: DecodeMethod, width: u32, height: u32) -> Result<usize> {
    let (w, h) = stored_dimensions(method, width, height);
    surface_size(method, w, h)
}

/// What a surface represents within its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SurfaceKind {
    /// Low-resolution preview image (VTF).
    Thumbnail,
    /// Mip level, `0` being the full-resolution base.
    Level(u32),
}

/// Location and shape of one surface in a container's byte stream.
///
/// Produced by the layout resolvers, consumed by a
/// [`SurfaceCodec`](crate::SurfaceCodec). Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SurfaceDescriptor {
    pub kind: SurfaceKind,
    /// Flattened frame/face/array index within the level.
    pub layer: u32,
    /// Absolute offset from the start of the file.
    pub byte_offset: usize,
    pub byte_length: usize,
    /// Nominal dimensions.
    pub width: u32,
    pub height: u32,
    /// Dimensions the bytes are actually encoded at.
    pub stored_width: u32,
    pub stored_height: u32,
    pub mode: ColorMode,
    pub method: DecodeMethod,
}

impl SurfaceDescriptor {
    /// Describe a surface of `format` at `byte_offset`.
    ///
    /// `slices` multiplies the byte length for volume textures.
    pub fn new(
        kind: SurfaceKind,
        layer: u32,
        byte_offset: usize,
        format: PixelFormatInfo,
        width: u32,
        height: u32,
        slices: u32,
    ) -> Result<Self> {
        let (stored_width, stored_height) = stored_dimensions(format.method, width, height);
        let byte_length = surface_size(format.method, stored_width, stored_height)?
            .checked_mul(slices.max(1) as usize)
            .ok_or_else(|| Error::invalid_dimensions(width, height, "volume size overflows"))?;

        Ok(Self {
            kind,
            layer,
            byte_offset,
            byte_length,
            width: width.max(1),
            height: height.max(1),
            stored_width,
            stored_height,
            mode: format.mode,
            method: format.method,
        })
    }

    /// Offset one past the last byte of the surface.
    pub fn end(&self) -> usize {
        self.byte_offset + self.byte_length
    }

    /// Borrow the surface's bytes from the whole file.
    ///
    /// Returns `None` when the file is too short.
    pub fn slice<'a>(&self, data: &'a [u8]) -> Option<&'a [u8]> {
        data.get(self.byte_offset..self.end())
    }
}

/// Every surface of a container in stream order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LayoutPlan {
    /// Offset of the first byte after the header.
    pub header_end: usize,
    /// Descriptors in the order the bytes appear.
    pub surfaces: Vec<SurfaceDescriptor>,
    /// Index of the full-resolution surface of the first layer.
    pub primary: usize,
}

impl LayoutPlan {
    /// The full-resolution surface.
    pub fn primary(&self) -> &SurfaceDescriptor {
        &self.surfaces[self.primary]
    }

    /// The thumbnail surface, if the container has one.
    pub fn thumbnail(&self) -> Option<&SurfaceDescriptor> {
        self.surfaces.iter().find(|s| s.kind == SurfaceKind::Thumbnail)
    }

    /// Offset one past the last surface.
    pub fn data_end(&self) -> usize {
        self.surfaces.iter().map(SurfaceDescriptor::end).max().unwrap_or(self.header_end)
    }

    /// Surfaces of one mip level.
    pub fn level(&self, level: u32) -> impl Iterator<Item = &SurfaceDescriptor> {
        self.surfaces.iter().filter(move |s| s.kind == SurfaceKind::Level(level))
    }
}
