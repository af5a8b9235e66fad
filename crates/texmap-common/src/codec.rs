//! Pixel buffers and the collaborator traits the containers call into.
//!
//! The container crates never touch pixel values. Turning stored bytes into
//! pixels goes through a [`SurfaceCodec`], and mode conversion or resizing
//! while building a mip chain goes through an [`ImageOps`].

use crate::mip::MipLevel;
use crate::pixel::{BlockVariant, ColorMode, DecodeMethod, PixelFormatInfo, RawLayout};
use crate::surface::{stored_dimensions, SurfaceDescriptor};
use crate::{Error, Result};

/// A tightly packed 8-bit image in canonical channel order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub mode: ColorMode,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap `data`, checking it holds exactly `width * height * channels` bytes.
    pub fn new(mode: ColorMode, width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = Self::byte_len(mode, width, height)?;
        if data.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            mode,
            width,
            height,
            data,
        })
    }

    /// A zero-filled buffer.
    pub fn zeroed(mode: ColorMode, width: u32, height: u32) -> Result<Self> {
        let len = Self::byte_len(mode, width, height)?;
        Ok(Self {
            mode,
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Bytes needed for a buffer of this shape.
    pub fn byte_len(mode: ColorMode, width: u32, height: u32) -> Result<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|texels| texels.checked_mul(mode.channels()))
            .ok_or_else(|| Error::invalid_dimensions(width, height, "pixel buffer overflows"))
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.mode.channels()
    }

    /// Copy out the top-left `width` x `height` region.
    ///
    /// Used to drop the block padding of surfaces stored at larger
    /// dimensions than their nominal size.
    pub fn crop(&self, width: u32, height: u32) -> Result<Self> {
        if width > self.width || height > self.height {
            return Err(Error::invalid_dimensions(width, height, "crop exceeds buffer"));
        }
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        let row = width as usize * self.mode.channels();
        let mut data = Vec::with_capacity(row * height as usize);
        for line in self.data.chunks_exact(self.stride()).take(height as usize) {
            data.extend_from_slice(&line[..row]);
        }
        Self::new(self.mode, width, height, data)
    }

    /// Copy into a larger zero-padded buffer, top-left aligned.
    pub fn pad_to(&self, width: u32, height: u32) -> Result<Self> {
        if width < self.width || height < self.height {
            return Err(Error::invalid_dimensions(width, height, "padding shrinks buffer"));
        }
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        let mut out = Self::zeroed(self.mode, width, height)?;
        let dst_stride = out.stride();
        let src_stride = self.stride();
        if src_stride > 0 {
            for (y, line) in self.data.chunks_exact(src_stride).enumerate() {
                let start = y * dst_stride;
                out.data[start..start + src_stride].copy_from_slice(line);
            }
        }
        Ok(out)
    }
}

/// Turns pixel buffers into stored surface bytes and back.
pub trait SurfaceCodec {
    /// Encode `image` with `method`. The image is already at the surface's
    /// stored dimensions and in the mode the method expects.
    fn encode_surface(&self, image: &PixelBuffer, method: DecodeMethod) -> Result<Vec<u8>>;

    /// Decode the bytes of one surface.
    ///
    /// `bytes` holds exactly `surface.byte_length` bytes. The result is in
    /// `surface.mode` at the nominal `surface.width` x `surface.height`.
    fn decode_surface(&self, bytes: &[u8], surface: &SurfaceDescriptor) -> Result<PixelBuffer>;
}

/// Image operations needed to build a mip chain.
pub trait ImageOps {
    /// Convert `image` to `mode`.
    fn convert(&self, image: &PixelBuffer, mode: ColorMode) -> Result<PixelBuffer>;

    /// Resample `image` to `width` x `height`.
    fn resize(&self, image: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer>;
}

impl<T: SurfaceCodec + ?Sized> SurfaceCodec for &T {
    fn encode_surface(&self, image: &PixelBuffer, method: DecodeMethod) -> Result<Vec<u8>> {
        (**self).encode_surface(image, method)
    }

    fn decode_surface(&self, bytes: &[u8], surface: &SurfaceDescriptor) -> Result<PixelBuffer> {
        (**self).decode_surface(bytes, surface)
    }
}

impl<T: ImageOps + ?Sized> ImageOps for &T {
    fn convert(&self, image: &PixelBuffer, mode: ColorMode) -> Result<PixelBuffer> {
        (**self).convert(image, mode)
    }

    fn resize(&self, image: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer> {
        (**self).resize(image, width, height)
    }
}

/// Bring `image` into the mode a codec expects for `format`.
///
/// Alpha-only layouts store the alpha channel, so it is taken from the RGBA
/// form rather than converted to luminance.
pub fn prepare_surface<O: ImageOps>(image: &PixelBuffer, format: PixelFormatInfo, ops: &O) -> Result<PixelBuffer> {
    match format.method {
        DecodeMethod::Raw(RawLayout::A) => {
            let rgba = ops.convert(image, ColorMode::Rgba)?;
            let alpha = rgba.data.chunks_exact(4).map(|p| p[3]).collect();
            PixelBuffer::new(ColorMode::L, rgba.width, rgba.height, alpha)
        }
        DecodeMethod::Block(BlockVariant::Bc4) => ops.convert(image, ColorMode::L),
        DecodeMethod::Block(BlockVariant::Bc5 | BlockVariant::Bc5s) => ops.convert(image, ColorMode::Rgb),
        _ => ops.convert(image, format.mode),
    }
}

/// Encode one mip level of `base`.
///
/// The image is resized to the level's nominal dimensions, padded to its
/// stored dimensions and encoded. The result is checked against
/// [`MipLevel::byte_size`], the same size the readers advance by.
pub fn encode_level<O, C>(
    base: &PixelBuffer,
    level: &MipLevel,
    format: PixelFormatInfo,
    ops: &O,
    codec: &C,
) -> Result<Vec<u8>>
where
    O: ImageOps,
    C: SurfaceCodec,
{
    let resized = ops.resize(base, level.width, level.height)?;
    let pixels = prepare_surface(&resized, format, ops)?;
    let (stored_width, stored_height) = stored_dimensions(format.method, level.width, level.height);
    let padded = pixels.pad_to(stored_width, stored_height)?;

    let bytes = codec.encode_surface(&padded, format.method)?;
    let expected = level.byte_size(format.method)?;
    if bytes.len() != expected {
        return Err(Error::BufferSizeMismatch {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_length_is_checked() {
        assert!(PixelBuffer::new(ColorMode::Rgb, 2, 2, vec![0; 12]).is_ok());
        match PixelBuffer::new(ColorMode::Rgba, 2, 2, vec![0; 12]) {
            Err(Error::BufferSizeMismatch { expected, actual }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 12);
            }
            other => panic!("expected BufferSizeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_pad_then_crop() {
        let data: Vec<u8> = (0..6).collect();
        let image = PixelBuffer::new(ColorMode::L, 3, 2, data.clone()).unwrap();

        let padded = image.pad_to(4, 4).unwrap();
        assert_eq!(&padded.data[..4], &[0, 1, 2, 0]);
        assert_eq!(&padded.data[4..8], &[3, 4, 5, 0]);
        assert!(padded.data[8..].iter().all(|&b| b == 0));

        let cropped = padded.crop(3, 2).unwrap();
        assert_eq!(cropped.data, data);
        assert!(padded.crop(5, 1).is_err());
    }

    struct Nearest;

    impl ImageOps for Nearest {
        fn convert(&self, image: &PixelBuffer, mode: ColorMode) -> Result<PixelBuffer> {
            assert_eq!(image.mode, mode);
            Ok(image.clone())
        }

        fn resize(&self, image: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer> {
            let channels = image.mode.channels();
            let mut data = Vec::new();
            for y in 0..height {
                for x in 0..width {
                    let sx = (x * image.width / width) as usize;
                    let sy = (y * image.height / height) as usize;
                    let at = (sy * image.width as usize + sx) * channels;
                    data.extend_from_slice(&image.data[at..at + channels]);
                }
            }
            PixelBuffer::new(image.mode, width, height, data)
        }
    }

    /// Emits `rate` bytes per stored texel.
    struct Fixed(usize);

    impl SurfaceCodec for Fixed {
        fn encode_surface(&self, image: &PixelBuffer, _method: DecodeMethod) -> Result<Vec<u8>> {
            Ok(vec![0; image.width as usize * image.height as usize * self.0])
        }

        fn decode_surface(&self, _bytes: &[u8], surface: &SurfaceDescriptor) -> Result<PixelBuffer> {
            PixelBuffer::zeroed(surface.mode, surface.width, surface.height)
        }
    }

    #[test]
    fn test_encode_level_pads_block_levels() {
        let base = PixelBuffer::zeroed(ColorMode::Rgba, 8, 8).unwrap();
        let level = MipLevel { level: 3, width: 1, height: 1 };
        let format = PixelFormatInfo::block(BlockVariant::Bc3, ColorMode::Rgba);

        // 4x4 stored texels at one byte each is one BC3 block
        let bytes = encode_level(&base, &level, format, &Nearest, &Fixed(1)).unwrap();
        assert_eq!(bytes.len(), 16);

        let err = encode_level(&base, &level, format, &Nearest, &Fixed(2)).unwrap_err();
        assert!(matches!(err, Error::BufferSizeMismatch { expected: 16, actual: 32 }));
    }

    #[test]
    fn test_alpha_layout_takes_alpha() {
        struct ToRgba;
        impl ImageOps for ToRgba {
            fn convert(&self, image: &PixelBuffer, _mode: ColorMode) -> Result<PixelBuffer> {
                let data = image.data.chunks_exact(2).flat_map(|p| [p[0], p[0], p[0], p[1]]).collect();
                PixelBuffer::new(ColorMode::Rgba, image.width, image.height, data)
            }
            fn resize(&self, image: &PixelBuffer, _width: u32, _height: u32) -> Result<PixelBuffer> {
                Ok(image.clone())
            }
        }

        let image = PixelBuffer::new(ColorMode::La, 2, 1, vec![1, 200, 2, 100]).unwrap();
        let prepared = prepare_surface(&image, PixelFormatInfo::raw(RawLayout::A), &ToRgba).unwrap();
        assert_eq!(prepared.mode, ColorMode::L);
        assert_eq!(prepared.data, [200, 100]);
    }
}
