//! Write, probe and decode through the public API.

use texmap::prelude::*;
use texmap::common::{stored_surface_size, SurfaceKind};
use texmap::vtf::{VtfFlags, VtfHeader};

fn checker(mode: ColorMode, width: u32, height: u32) -> PixelBuffer {
    let channels = mode.channels();
    let mut data = Vec::with_capacity(width as usize * height as usize * channels);
    for y in 0..height {
        for x in 0..width {
            let on = (x / 2 + y / 2) % 2 == 0;
            for c in 0..channels {
                data.push(if on { 200 - c as u8 * 10 } else { 20 + c as u8 * 10 });
            }
        }
    }
    PixelBuffer::new(mode, width, height, data).unwrap()
}

#[test]
fn test_vtf_raw_roundtrip() {
    let image = checker(ColorMode::Rgba, 32, 32);
    let options = WriteOptions::Vtf(VtfWriteOptions::default());
    let bytes = options.write(&image, &ImageRsOps::new(), &StandardCodec).unwrap();

    let texture = Texture::parse(&bytes).unwrap();
    assert_eq!(texture.kind(), ContainerKind::Vtf);
    assert_eq!((texture.width(), texture.height()), (32, 32));
    assert_eq!(texture.format_name(), "RGBA8888");
    assert_eq!(texture.primary().end(), bytes.len());
    assert_eq!(texture.decode(&bytes, &StandardCodec).unwrap(), image);
    assert_eq!(texmap::decode(&bytes).unwrap(), image);
}

#[test]
fn test_dds_raw_roundtrip() {
    let image = checker(ColorMode::Rgb, 12, 7);
    let options = WriteOptions::for_kind(ContainerKind::Dds);
    let bytes = options.write(&image, &ImageRsOps::new(), &StandardCodec).unwrap();

    let texture = Texture::parse(&bytes).unwrap();
    assert_eq!(texture.kind(), ContainerKind::Dds);
    assert_eq!(texture.format_name(), "BGR");
    assert!(texture.thumbnail().is_none());
    assert_eq!(texture.decode(&bytes, &StandardCodec).unwrap(), image);
}

#[test]
fn test_base_offset_formula() {
    let image = checker(ColorMode::Rgba, 64, 16);
    let options = VtfWriteOptions::default().with_pixel_format(VtfPixelFormat::Dxt1);
    let bytes = VtfWriter::new(options).write(&image, &ImageRsOps::new(), &StandardCodec).unwrap();

    let file = VtfFile::parse(&bytes).unwrap();
    let header = file.header();
    let method = file.format().method;
    let thumbnail = file.thumbnail().unwrap();
    assert_eq!(thumbnail.kind, SurfaceKind::Thumbnail);

    let skipped: usize = (1..u32::from(header.mipmap_count))
        .map(|n| stored_surface_size(method, (64 >> n).max(1), (16 >> n).max(1)).unwrap())
        .sum();
    assert_eq!(
        file.primary().byte_offset,
        header.header_size as usize + thumbnail.byte_length + skipped
    );
    assert_eq!(file.primary().byte_length, 64 * 16 / 2);
}

#[test]
fn test_unsupported_version_is_fatal() {
    let image = checker(ColorMode::Rgb, 4, 4);
    let options = VtfWriteOptions::default().with_version(VtfVersion::V7_2);
    let mut bytes = VtfWriter::new(options).write(&image, &ImageRsOps::new(), &StandardCodec).unwrap();

    bytes[8..12].copy_from_slice(&5u32.to_le_bytes());
    let err = Texture::parse(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedVersion);
    assert!(!err.is_not_this_format());
}

#[test]
fn test_header_size_mismatch() {
    let image = checker(ColorMode::Rgb, 4, 4);
    let options = VtfWriteOptions::default().with_version(VtfVersion::V7_1);
    let mut bytes = VtfWriter::new(options).write(&image, &ImageRsOps::new(), &StandardCodec).unwrap();

    // 7.1 headers are 63 bytes, so 64 is the only other accepted size
    bytes[12..16].copy_from_slice(&72u32.to_le_bytes());
    let err = Texture::parse(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TruncatedHeader);
}

#[test]
fn test_unsupported_pixel_format_is_distinguishable() {
    let header = VtfHeader {
        version: VtfVersion::V7_1,
        header_size: 64,
        width: 4,
        height: 4,
        flags: VtfFlags::empty(),
        frames: 1,
        first_frame: 0,
        reflectivity: [0.0; 3],
        bumpmap_scale: 1.0,
        pixel_format: VtfPixelFormat::Rgb565,
        mipmap_count: 1,
        low_res_format: VtfPixelFormat::None,
        low_res_width: 0,
        low_res_height: 0,
        depth: 1,
        resources: Vec::new(),
    };
    let bytes = header.to_bytes().unwrap();
    let err = Texture::parse(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedPixelFormat);
}

#[test]
fn test_foreign_magic() {
    let err = Texture::parse(b"GIF89a\x01\x00\x01\x00").unwrap_err();
    assert!(err.is_not_this_format());
}

#[test]
fn test_vtf_one_bit_alpha_roundtrip() {
    let mut image = checker(ColorMode::Rgba, 8, 8);
    for pixel in image.data.chunks_exact_mut(4).take(8 * 4) {
        pixel[3] = 0;
    }
    for pixel in image.data.chunks_exact_mut(4).skip(8 * 4) {
        pixel[3] = 255;
    }
    let options = VtfWriteOptions::default().with_pixel_format(VtfPixelFormat::Dxt1OneBitAlpha);
    let bytes = VtfWriter::new(options).write(&image, &ImageRsOps::new(), &StandardCodec).unwrap();

    let file = VtfFile::parse(&bytes).unwrap();
    assert!(file.header().flags.contains(VtfFlags::ONEBITALPHA));

    let decoded = texmap::decode(&bytes).unwrap();
    let (top, bottom) = decoded.data.split_at(8 * 4 * 4);
    assert!(top.chunks_exact(4).all(|p| p[3] == 0));
    assert!(bottom.chunks_exact(4).all(|p| p[3] == 255));
}
