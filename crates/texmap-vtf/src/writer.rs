//! VTF writer.

use std::io::Write;

use texmap_common::{
    closest_power_of_two, encode_level, mip_count, thumbnail_dimensions, validate_dimensions,
    Error as CommonError, ImageOps, MipLevel, MipPlan, PixelBuffer, SurfaceCodec,
};
use tracing::{debug, trace};

use crate::format::VtfPixelFormat;
use crate::header::{VtfFlags, VtfHeader, VtfResource, VtfVersion};
use crate::{Error, Result};

/// Format of the thumbnail, whatever the primary format.
pub const THUMBNAIL_FORMAT: VtfPixelFormat = VtfPixelFormat::Dxt1;

/// Options for [`VtfWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VtfWriteOptions {
    /// High-resolution format. Default `RGBA8888`.
    pub pixel_format: VtfPixelFormat,
    /// Container version. Default 7.4.
    pub version: VtfVersion,
    /// Write a full mip chain. Default `true`.
    pub generate_mipmaps: bool,
}

impl Default for VtfWriteOptions {
    fn default() -> Self {
        Self {
            pixel_format: VtfPixelFormat::Rgba8888,
            version: VtfVersion::V7_4,
            generate_mipmaps: true,
        }
    }
}

impl VtfWriteOptions {
    pub fn with_pixel_format(mut self, pixel_format: VtfPixelFormat) -> Self {
        self.pixel_format = pixel_format;
        self
    }

    pub fn with_version(mut self, version: VtfVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_mipmaps(mut self, generate_mipmaps: bool) -> Self {
        self.generate_mipmaps = generate_mipmaps;
        self
    }
}

/// Flags a writer sets for `format`.
pub fn alpha_flags(format: VtfPixelFormat) -> VtfFlags {
    match format {
        VtfPixelFormat::Dxt1OneBitAlpha => VtfFlags::ONEBITALPHA,
        VtfPixelFormat::Dxt3
        | VtfPixelFormat::Dxt5
        | VtfPixelFormat::Rgba8888
        | VtfPixelFormat::Bgra8888
        | VtfPixelFormat::A8
        | VtfPixelFormat::Ia88 => VtfFlags::EIGHTBITALPHA,
        _ => VtfFlags::empty(),
    }
}

/// Encodes images as VTF files.
///
/// The image is resized to power-of-two dimensions first. The file holds a
/// DXT1 thumbnail, then the mip chain from the smallest level to the base.
#[derive(Debug, Clone, Default)]
pub struct VtfWriter {
    options: VtfWriteOptions,
}

impl VtfWriter {
    pub fn new(options: VtfWriteOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &VtfWriteOptions {
        &self.options
    }

    /// Encode `image` into a complete VTF file.
    pub fn write<O, C>(&self, image: &PixelBuffer, ops: &O, codec: &C) -> Result<Vec<u8>>
    where
        O: ImageOps,
        C: SurfaceCodec,
    {
        let VtfWriteOptions {
            pixel_format,
            version,
            generate_mipmaps,
        } = self.options;

        if !version.is_supported() {
            return Err(Error::UnsupportedVersion(version));
        }
        let format = pixel_format.classify()?;
        let thumb_format = THUMBNAIL_FORMAT.classify()?;

        validate_dimensions(image.width, image.height)?;
        let width = closest_power_of_two(image.width);
        let height = closest_power_of_two(image.height);
        validate_dimensions(width, height)?;
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(CommonError::invalid_dimensions(width, height, "VTF dimensions are 16-bit").into());
        }
        let base = ops.resize(image, width, height)?;

        let levels = if generate_mipmaps { mip_count(width, height) } else { 1 };
        let plan = MipPlan::new(width, height, levels)?;

        let (thumb_width, thumb_height) = thumbnail_dimensions(width, height);
        let thumbnail = encode_level(
            &base,
            &MipLevel {
                level: 0,
                width: thumb_width,
                height: thumb_height,
            },
            thumb_format,
            ops,
            codec,
        )?;

        let resources = if version.has_resources() { 2 } else { 0 };
        let header_size = VtfHeader::aligned_size(version, resources);
        let resources = if version.has_resources() {
            vec![
                VtfResource::low_res(header_size as u32),
                VtfResource::high_res((header_size + thumbnail.len()) as u32),
            ]
        } else {
            Vec::new()
        };

        let header = VtfHeader {
            version,
            header_size: header_size as u32,
            width: width as u16,
            height: height as u16,
            flags: alpha_flags(pixel_format),
            frames: 1,
            first_frame: 0,
            reflectivity: [1.0; 3],
            bumpmap_scale: 1.0,
            pixel_format,
            mipmap_count: plan.len() as u8,
            low_res_format: THUMBNAIL_FORMAT,
            low_res_width: thumb_width as u8,
            low_res_height: thumb_height as u8,
            depth: 1,
            resources,
        };

        let mut out = header.to_bytes()?;
        out.extend_from_slice(&thumbnail);

        for level in plan.smallest_first() {
            let bytes = encode_level(&base, level, format, ops, codec)?;
            trace!(level = level.level, bytes = bytes.len(), "encoded mip level");
            out.extend_from_slice(&bytes);
        }

        debug!(
            width,
            height,
            format = %pixel_format,
            version = %version,
            mips = plan.len(),
            bytes = out.len(),
            "wrote VTF"
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::VtfFile;
    use texmap_codec::{ImageRsOps, StandardCodec};
    use texmap_common::{ColorMode, SurfaceKind};

    fn gradient(mode: ColorMode, width: u32, height: u32) -> PixelBuffer {
        let len = PixelBuffer::byte_len(mode, width, height).unwrap();
        let data = (0..len).map(|i| (i * 7 % 251) as u8).collect();
        PixelBuffer::new(mode, width, height, data).unwrap()
    }

    #[test]
    fn test_raw_roundtrip_without_mips() {
        let image = gradient(ColorMode::Rgba, 16, 8);
        let options = VtfWriteOptions::default().with_mipmaps(false);
        let bytes = VtfWriter::new(options).write(&image, &ImageRsOps::new(), &StandardCodec).unwrap();

        let file = VtfFile::parse(&bytes).unwrap();
        assert_eq!(file.header().mipmap_count, 1);
        assert_eq!(file.header().flags, VtfFlags::EIGHTBITALPHA);
        assert_eq!(file.header().header_size, 96);

        let decoded = file.decode(&bytes, &StandardCodec).unwrap();
        assert_eq!(decoded, image);
        assert_eq!(file.layout().data_end(), bytes.len());
    }

    #[test]
    fn test_full_chain_layout_matches_bytes() {
        let image = gradient(ColorMode::Rgb, 32, 16);
        for version in [VtfVersion::V7_0, VtfVersion::V7_2, VtfVersion::V7_4] {
            let options = VtfWriteOptions::default()
                .with_pixel_format(VtfPixelFormat::Bgr888)
                .with_version(version);
            let bytes = VtfWriter::new(options).write(&image, &ImageRsOps::new(), &StandardCodec).unwrap();

            let file = VtfFile::parse(&bytes).unwrap();
            assert_eq!(file.header().version, version);
            assert_eq!(file.header().mipmap_count, 6);
            assert_eq!(file.layout().data_end(), bytes.len(), "{version}");
            assert_eq!(file.primary().end(), bytes.len());
            assert_eq!(file.decode(&bytes, &StandardCodec).unwrap(), image);
        }
    }

    #[test]
    fn test_thumbnail_is_dxt1() {
        let image = gradient(ColorMode::Rgba, 64, 32);
        let bytes = VtfWriter::default().write(&image, &ImageRsOps::new(), &StandardCodec).unwrap();
        let file = VtfFile::parse(&bytes).unwrap();

        let header = file.header();
        assert_eq!(header.low_res_format, VtfPixelFormat::Dxt1);
        assert_eq!((header.low_res_width, header.low_res_height), (16, 8));

        let thumb = file.thumbnail().unwrap();
        assert_eq!(thumb.kind, SurfaceKind::Thumbnail);
        assert_eq!(thumb.byte_offset, 96);
        assert_eq!(thumb.byte_length, 64);
        let decoded = file.decode_thumbnail(&bytes, &StandardCodec).unwrap().unwrap();
        assert_eq!((decoded.width, decoded.height), (16, 8));
    }

    #[test]
    fn test_resized_to_power_of_two() {
        let image = gradient(ColorMode::L, 9, 192);
        let options = VtfWriteOptions::default().with_pixel_format(VtfPixelFormat::I8);
        let bytes = VtfWriter::new(options).write(&image, &ImageRsOps::new(), &StandardCodec).unwrap();
        let file = VtfFile::parse(&bytes).unwrap();
        assert_eq!((file.width(), file.height()), (8, 256));
        assert_eq!(file.header().flags, VtfFlags::empty());
    }

    #[test]
    fn test_dxt5_chain() {
        let image = gradient(ColorMode::Rgba, 16, 16);
        let options = VtfWriteOptions::default().with_pixel_format(VtfPixelFormat::Dxt5);
        let bytes = VtfWriter::new(options).write(&image, &ImageRsOps::new(), &StandardCodec).unwrap();

        let file = VtfFile::parse(&bytes).unwrap();
        assert_eq!(file.layout().data_end(), bytes.len());
        let decoded = file.decode(&bytes, &StandardCodec).unwrap();
        assert_eq!((decoded.width, decoded.height, decoded.mode), (16, 16, ColorMode::Rgba));
    }

    #[test]
    fn test_a8_stores_alpha() {
        let image = PixelBuffer::new(ColorMode::La, 1, 1, vec![10, 77]).unwrap();
        let options = VtfWriteOptions::default()
            .with_pixel_format(VtfPixelFormat::A8)
            .with_mipmaps(false);
        let bytes = VtfWriter::new(options).write(&image, &ImageRsOps::new(), &StandardCodec).unwrap();
        let file = VtfFile::parse(&bytes).unwrap();
        let decoded = file.decode(&bytes, &StandardCodec).unwrap();
        assert_eq!(decoded.mode, ColorMode::L);
        assert_eq!(decoded.data, [77]);
    }

    #[test]
    fn test_rejected_options() {
        let image = gradient(ColorMode::Rgb, 4, 4);
        let ops = ImageRsOps::new();

        let unsupported = VtfWriteOptions::default().with_pixel_format(VtfPixelFormat::Rgb565);
        assert!(matches!(
            VtfWriter::new(unsupported).write(&image, &ops, &StandardCodec),
            Err(Error::UnsupportedPixelFormat(_))
        ));

        let future = VtfWriteOptions::default().with_version(VtfVersion::new(7, 5));
        assert!(matches!(
            VtfWriter::new(future).write(&image, &ops, &StandardCodec),
            Err(Error::UnsupportedVersion(_))
        ));
    }
}
