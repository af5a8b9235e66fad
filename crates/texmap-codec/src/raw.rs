//! Raw channel-layout codec.

use texmap_common::{
    DecodeMethod, Error, PixelBuffer, RawLayout, Result, SurfaceCodec, SurfaceDescriptor,
};

/// Row-major copy with a per-layout channel permutation.
///
/// Encoding expects the buffer in the layout's own mode (see
/// [`RawLayout::mode`]). Bytes with no channel, like the pad byte of BGRX,
/// are written as zero and skipped on decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCodec;

impl RawCodec {
    /// Pack `image` into `layout` byte order.
    pub fn encode(&self, image: &PixelBuffer, layout: RawLayout) -> Result<Vec<u8>> {
        if image.mode != layout.mode() {
            return Err(Error::Codec(format!(
                "raw {} expects {} pixels, got {}",
                layout.name(),
                layout.mode(),
                image.mode
            )));
        }

        let map = layout.channel_map();
        let channels = image.mode.channels();
        let mut out = Vec::with_capacity(image.data.len() / channels * map.len());

        for pixel in image.data.chunks_exact(channels) {
            out.extend(map.iter().map(|slot| slot.map_or(0, |c| pixel[c])));
        }
        Ok(out)
    }

    /// Unpack `width` x `height` texels of `layout` from `bytes`.
    ///
    /// Trailing bytes beyond the first slice are ignored.
    pub fn decode(&self, bytes: &[u8], layout: RawLayout, width: u32, height: u32) -> Result<PixelBuffer> {
        let map = layout.channel_map();
        let mut image = PixelBuffer::zeroed(layout.mode(), width, height)?;
        let texels = width as usize * height as usize;
        let needed = texels * map.len();

        if bytes.len() < needed {
            return Err(Error::BufferSizeMismatch {
                expected: needed,
                actual: bytes.len(),
            });
        }

        let channels = image.mode.channels();
        for (src, dst) in bytes[..needed]
            .chunks_exact(map.len())
            .zip(image.data.chunks_exact_mut(channels))
        {
            for (byte, slot) in src.iter().zip(map) {
                if let Some(c) = slot {
                    dst[*c] = *byte;
                }
            }
        }
        Ok(image)
    }
}

impl SurfaceCodec for RawCodec {
    fn encode_surface(&self, image: &PixelBuffer, method: DecodeMethod) -> Result<Vec<u8>> {
        match method {
            DecodeMethod::Raw(layout) => self.encode(image, layout),
            other => Err(Error::UnsupportedMethod(other)),
        }
    }

    fn decode_surface(&self, bytes: &[u8], surface: &SurfaceDescriptor) -> Result<PixelBuffer> {
        match surface.method {
            DecodeMethod::Raw(layout) => {
                let image = self.decode(bytes, layout, surface.stored_width, surface.stored_height)?;
                image.crop(surface.width, surface.height)
            }
            other => Err(Error::UnsupportedMethod(other)),
        }
    }
}
