//! Block-compression codec.
//!
//! Decoding goes through `bcdec_rs`, encoding through `intel_tex_2`. The ISPC
//! encoders have no BC2 or signed BC5 kernel, so those variants decode only.

use texmap_common::{
    BlockVariant, ColorMode, DecodeMethod, Error, PixelBuffer, Result, SurfaceCodec,
    SurfaceDescriptor, BLOCK_SIZE,
};
use tracing::trace;

/// BCn encoder/decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct BcnCodec;

/// Mode a variant decodes into and encodes from.
pub const fn native_mode(variant: BlockVariant) -> ColorMode {
    match variant {
        BlockVariant::Bc4 => ColorMode::L,
        BlockVariant::Bc5 | BlockVariant::Bc5s => ColorMode::Rgb,
        _ => ColorMode::Rgba,
    }
}

/// Bytes per texel `bcdec_rs` writes for a variant.
const fn decoded_channels(variant: BlockVariant) -> usize {
    match variant {
        BlockVariant::Bc4 => 1,
        BlockVariant::Bc5 | BlockVariant::Bc5s => 2,
        _ => 4,
    }
}

fn check_block_aligned(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 || width % BLOCK_SIZE != 0 || height % BLOCK_SIZE != 0 {
        return Err(Error::invalid_dimensions(
            width,
            height,
            "block-compressed surfaces must be a multiple of 4",
        ));
    }
    Ok(())
}

impl BcnCodec {
    /// Decode `width` x `height` texels (block aligned) of `variant`.
    pub fn decode(&self, bytes: &[u8], variant: BlockVariant, width: u32, height: u32) -> Result<PixelBuffer> {
        check_block_aligned(width, height)?;

        let blocks_x = (width / BLOCK_SIZE) as usize;
        let blocks_y = (height / BLOCK_SIZE) as usize;
        let block_bytes = variant.block_bytes();
        let needed = blocks_x * blocks_y * block_bytes;
        if bytes.len() < needed {
            return Err(Error::BufferSizeMismatch {
                expected: needed,
                actual: bytes.len(),
            });
        }

        let mode = native_mode(variant);
        let channels = mode.channels();
        let decoded = decoded_channels(variant);
        let pitch = 4 * decoded;
        let mut image = PixelBuffer::zeroed(mode, width, height)?;
        let stride = image.stride();

        // 16 texels of up to 4 bytes
        let mut block_pixels = [0u8; 64];

        for (index, block) in bytes[..needed].chunks_exact(block_bytes).enumerate() {
            let (bx, by) = (index % blocks_x, index / blocks_x);
            match variant {
                BlockVariant::Bc1 | BlockVariant::Bc1a => bcdec_rs::bc1(block, &mut block_pixels, pitch),
                BlockVariant::Bc2 => bcdec_rs::bc2(block, &mut block_pixels, pitch),
                BlockVariant::Bc3 => bcdec_rs::bc3(block, &mut block_pixels, pitch),
                BlockVariant::Bc4 => bcdec_rs::bc4(block, &mut block_pixels, pitch, false),
                BlockVariant::Bc5 => bcdec_rs::bc5(block, &mut block_pixels, pitch, false),
                BlockVariant::Bc5s => {
                    bcdec_rs::bc5(block, &mut block_pixels, pitch, true);
                    // snorm to unorm
                    for byte in &mut block_pixels[..16 * decoded] {
                        *byte ^= 0x80;
                    }
                }
                BlockVariant::Bc7 => bcdec_rs::bc7(block, &mut block_pixels, pitch),
            }

            for py in 0..4 {
                let row = (by * 4 + py) * stride + bx * 4 * channels;
                for px in 0..4 {
                    let src = (py * 4 + px) * decoded;
                    let dst = row + px * channels;
                    image.data[dst..dst + decoded].copy_from_slice(&block_pixels[src..src + decoded]);
                }
            }
        }

        trace!(variant = variant.name(), width, height, "decoded block surface");
        Ok(image)
    }

    /// Encode a block-aligned buffer in the variant's native mode.
    pub fn encode(&self, image: &PixelBuffer, variant: BlockVariant) -> Result<Vec<u8>> {
        check_block_aligned(image.width, image.height)?;

        let mode = native_mode(variant);
        if image.mode != mode {
            return Err(Error::Codec(format!(
                "{} expects {} pixels, got {}",
                variant.name(),
                mode,
                image.mode
            )));
        }

        let blocks = match variant {
            BlockVariant::Bc1 => intel_tex_2::bc1::compress_blocks(&rgba_surface(image)),
            BlockVariant::Bc1a => {
                let mut blocks = intel_tex_2::bc1::compress_blocks(&rgba_surface(image));
                punch_through(image, &mut blocks);
                blocks
            }
            BlockVariant::Bc3 => intel_tex_2::bc3::compress_blocks(&rgba_surface(image)),
            BlockVariant::Bc7 => {
                intel_tex_2::bc7::compress_blocks(&intel_tex_2::bc7::alpha_basic_settings(), &rgba_surface(image))
            }
            BlockVariant::Bc4 => intel_tex_2::bc4::compress_blocks(&intel_tex_2::RSurface {
                data: &image.data,
                width: image.width,
                height: image.height,
                stride: image.width,
            }),
            BlockVariant::Bc5 => {
                let rg: Vec<u8> = image.data.chunks_exact(3).flat_map(|p| [p[0], p[1]]).collect();
                intel_tex_2::bc5::compress_blocks(&intel_tex_2::RgSurface {
                    data: &rg,
                    width: image.width,
                    height: image.height,
                    stride: image.width * 2,
                })
            }
            BlockVariant::Bc2 | BlockVariant::Bc5s => {
                return Err(Error::UnsupportedMethod(DecodeMethod::Block(variant)));
            }
        };

        trace!(variant = variant.name(), bytes = blocks.len(), "encoded block surface");
        Ok(blocks)
    }
}

/// Alpha below this is transparent in one-bit-alpha blocks.
const ALPHA_CUTOFF: u8 = 128;

/// Re-emit every BC1 block that holds a transparent texel in three-colour
/// mode (`c0 <= c1`), with index 3 for the transparent texels.
fn punch_through(image: &PixelBuffer, blocks: &mut [u8]) {
    let blocks_x = (image.width / BLOCK_SIZE) as usize;
    let stride = image.stride();

    for (index, block) in blocks.chunks_exact_mut(8).enumerate() {
        let (bx, by) = (index % blocks_x, index / blocks_x);
        let mut texels = [[0u8; 4]; 16];
        for (i, texel) in texels.iter_mut().enumerate() {
            let offset = (by * 4 + i / 4) * stride + (bx * 4 + i % 4) * 4;
            texel.copy_from_slice(&image.data[offset..offset + 4]);
        }
        if texels.iter().all(|t| t[3] >= ALPHA_CUTOFF) {
            continue;
        }

        let a = u16::from_le_bytes([block[0], block[1]]);
        let b = u16::from_le_bytes([block[2], block[3]]);
        let (c0, c1) = (a.min(b), a.max(b));
        let palette = {
            let (p0, p1) = (expand_565(c0), expand_565(c1));
            let mid = |i: usize| ((u16::from(p0[i]) + u16::from(p1[i])) / 2) as u8;
            [p0, p1, [mid(0), mid(1), mid(2)]]
        };

        let mut indices = 0u32;
        for (i, texel) in texels.iter().enumerate() {
            let selector = if texel[3] < ALPHA_CUTOFF {
                3
            } else {
                (0..3u32)
                    .min_by_key(|&p| distance(&palette[p as usize], texel))
                    .unwrap_or(0)
            };
            indices |= selector << (2 * i);
        }

        block[0..2].copy_from_slice(&c0.to_le_bytes());
        block[2..4].copy_from_slice(&c1.to_le_bytes());
        block[4..8].copy_from_slice(&indices.to_le_bytes());
    }
}

fn expand_565(color: u16) -> [u8; 3] {
    let r = ((color >> 11) & 0x1F) as u8;
    let g = ((color >> 5) & 0x3F) as u8;
    let b = (color & 0x1F) as u8;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}

fn distance(color: &[u8; 3], texel: &[u8; 4]) -> u32 {
    (0..3)
        .map(|i| {
            let d = u32::from(color[i].abs_diff(texel[i]));
            d * d
        })
        .sum()
}

fn rgba_surface(image: &PixelBuffer) -> intel_tex_2::RgbaSurface<'_> {
    intel_tex_2::RgbaSurface {
        data: &image.data,
        width: image.width,
        height: image.height,
        stride: image.width * 4,
    }
}

impl SurfaceCodec for BcnCodec {
    fn encode_surface(&self, image: &PixelBuffer, method: DecodeMethod) -> Result<Vec<u8>> {
        match method {
            DecodeMethod::Block(variant) => self.encode(image, variant),
            other => Err(Error::UnsupportedMethod(other)),
        }
    }

    fn decode_surface(&self, bytes: &[u8], surface: &SurfaceDescriptor) -> Result<PixelBuffer> {
        let DecodeMethod::Block(variant) = surface.method else {
            return Err(Error::UnsupportedMethod(surface.method));
        };
        let image = self.decode(bytes, variant, surface.stored_width, surface.stored_height)?;
        if image.mode != surface.mode {
            return Err(Error::Codec(format!(
                "{} decodes to {}, surface wants {}",
                variant.name(),
                image.mode,
                surface.mode
            )));
        }
        image.crop(surface.width, surface.height)
    }
}
