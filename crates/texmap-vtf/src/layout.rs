//! VTF layout resolver.
//!
//! VTF stores the thumbnail first, then the mip chain from the smallest
//! level up to the base. Within a level the surfaces are ordered by frame,
//! then face, and each one holds all depth slices of that level.

use texmap_common::{
    validate_dimensions, validate_mip_count, LayoutPlan, MipPlan, SurfaceDescriptor, SurfaceKind,
};
use tracing::{debug, trace};

use crate::header::{VtfHeader, RESOURCE_HIGH_RES, RESOURCE_LOW_RES};
use crate::{Error, Result};

/// Most surfaces a single file may describe.
pub const MAX_SURFACES: usize = 1 << 16;

/// Compute where every surface of `header` lives.
pub fn resolve(header: &VtfHeader) -> Result<LayoutPlan> {
    let format = header.pixel_format.classify()?;

    let (width, height) = (u32::from(header.width), u32::from(header.height));
    validate_dimensions(width, height)?;
    let mip_count = u32::from(header.mipmap_count);
    validate_mip_count(width, height, mip_count)?;
    let plan = MipPlan::new(width, height, mip_count)?;

    let frames = u32::from(header.frames.max(1));
    let faces = header.face_count();
    let depth = u32::from(header.depth.max(1));
    let layers = frames * faces;

    let total = plan.len() * layers as usize;
    if total > MAX_SURFACES {
        return Err(Error::TooManySurfaces(total));
    }

    let header_end = header.header_size as usize;
    let mut surfaces = Vec::with_capacity(total + 1);

    let mut offset = header
        .resource(RESOURCE_LOW_RES)
        .map_or(header_end, |r| r.offset as usize);

    if header.has_thumbnail() {
        let thumb_format = header.low_res_format.classify()?;
        let thumbnail = SurfaceDescriptor::new(
            SurfaceKind::Thumbnail,
            0,
            offset,
            thumb_format,
            u32::from(header.low_res_width),
            u32::from(header.low_res_height),
            1,
        )?;
        trace!(offset, length = thumbnail.byte_length, "thumbnail");
        offset = thumbnail.end();
        surfaces.push(thumbnail);
    }

    if let Some(high) = header.resource(RESOURCE_HIGH_RES) {
        offset = high.offset as usize;
    }

    let mut primary = 0;
    for level in plan.smallest_first() {
        let slices = (depth >> level.level).max(1);
        for layer in 0..layers {
            let surface = SurfaceDescriptor::new(
                SurfaceKind::Level(level.level),
                layer,
                offset,
                format,
                level.width,
                level.height,
                slices,
            )?;
            trace!(
                level = level.level,
                layer,
                offset,
                length = surface.byte_length,
                "surface"
            );
            if level.level == 0 && layer == 0 {
                primary = surfaces.len();
            }
            offset = surface.end();
            surfaces.push(surface);
        }
    }

    let layout = LayoutPlan {
        header_end,
        surfaces,
        primary,
    };

    debug!(
        surfaces = layout.surfaces.len(),
        primary_offset = layout.primary().byte_offset,
        data_end = layout.data_end(),
        "resolved VTF layout"
    );
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::VtfPixelFormat;
    use crate::header::{VtfFlags, VtfResource, VtfVersion};
    use texmap_common::{stored_surface_size, ErrorKind};

    fn header(format: VtfPixelFormat, width: u16, height: u16, mips: u8) -> VtfHeader {
        VtfHeader {
            version: VtfVersion::V7_2,
            header_size: 80,
            width,
            height,
            flags: VtfFlags::empty(),
            frames: 1,
            first_frame: 0,
            reflectivity: [1.0; 3],
            bumpmap_scale: 1.0,
            pixel_format: format,
            mipmap_count: mips,
            low_res_format: VtfPixelFormat::Dxt1,
            low_res_width: 16,
            low_res_height: 16,
            depth: 1,
            resources: Vec::new(),
        }
    }

    #[test]
    fn test_primary_offset_formula() {
        let h = header(VtfPixelFormat::Dxt5, 64, 32, 7);
        let layout = resolve(&h).unwrap();

        let thumbnail = 16 * 16 / 2;
        let method = VtfPixelFormat::Dxt5.classify().unwrap().method;
        let skipped: usize = (1..7)
            .map(|n| stored_surface_size(method, (64 >> n).max(1), (32 >> n).max(1)).unwrap())
            .sum();

        let primary = layout.primary();
        assert_eq!(primary.kind, SurfaceKind::Level(0));
        assert_eq!(primary.byte_offset, 80 + thumbnail + skipped);
        assert_eq!(primary.byte_length, 64 * 32);
        assert_eq!(layout.data_end(), primary.end());
        assert_eq!(layout.surfaces.len(), 8);
    }

    #[test]
    fn test_small_block_levels_are_clamped() {
        let h = header(VtfPixelFormat::Dxt1, 8, 8, 4);
        let layout = resolve(&h).unwrap();
        let lengths: Vec<usize> = layout.surfaces.iter().map(|s| s.byte_length).collect();
        // thumbnail, 1x1, 2x2, 4x4, 8x8
        assert_eq!(lengths, [128, 8, 8, 8, 32]);
    }

    #[test]
    fn test_no_thumbnail() {
        let mut h = header(VtfPixelFormat::Rgba8888, 4, 4, 1);
        h.low_res_format = VtfPixelFormat::None;
        let layout = resolve(&h).unwrap();
        assert!(layout.thumbnail().is_none());
        assert_eq!(layout.primary().byte_offset, 80);

        h.low_res_format = VtfPixelFormat::Dxt1;
        h.low_res_width = 0;
        assert!(resolve(&h).unwrap().thumbnail().is_none());
    }

    #[test]
    fn test_frames_faces_and_depth() {
        let mut h = header(VtfPixelFormat::Rgba8888, 4, 4, 3);
        h.low_res_format = VtfPixelFormat::None;
        h.frames = 2;
        h.flags = VtfFlags::ENVMAP;
        h.first_frame = 0xFFFF;
        h.depth = 4;

        let layout = resolve(&h).unwrap();
        assert_eq!(layout.surfaces.len(), 3 * 2 * 6);

        let level2 = layout.level(2).next().unwrap();
        assert_eq!(level2.byte_length, 4);
        let base: Vec<_> = layout.level(0).collect();
        assert_eq!(base.len(), 12);
        assert_eq!(base[0].byte_length, 4 * 4 * 4 * 4);
        assert_eq!(layout.primary().layer, 0);
        assert_eq!(layout.primary().byte_offset, base[0].byte_offset);
    }

    #[test]
    fn test_resource_offsets_are_honored() {
        let mut h = header(VtfPixelFormat::Rgb888, 4, 4, 1);
        h.version = VtfVersion::V7_3;
        h.header_size = 96;
        h.resources = vec![VtfResource::low_res(200), VtfResource::high_res(400)];

        let layout = resolve(&h).unwrap();
        assert_eq!(layout.thumbnail().map(|t| t.byte_offset), Some(200));
        assert_eq!(layout.primary().byte_offset, 400);
    }

    #[test]
    fn test_rejections() {
        let h = header(VtfPixelFormat::Rgb565, 4, 4, 1);
        assert_eq!(resolve(&h).unwrap_err().kind(), ErrorKind::UnsupportedPixelFormat);

        let h = header(VtfPixelFormat::Rgba8888, 4, 4, 0);
        assert_eq!(resolve(&h).unwrap_err().kind(), ErrorKind::InvalidDimensions);

        let h = header(VtfPixelFormat::Rgba8888, 4, 4, 200);
        assert_eq!(resolve(&h).unwrap_err().kind(), ErrorKind::InvalidDimensions);

        let h = header(VtfPixelFormat::Rgba8888, 0, 4, 1);
        assert_eq!(resolve(&h).unwrap_err().kind(), ErrorKind::InvalidDimensions);

        let mut h = header(VtfPixelFormat::Rgba8888, 4, 4, 1);
        h.frames = u16::MAX;
        h.flags = VtfFlags::ENVMAP;
        assert_eq!(resolve(&h).unwrap_err().kind(), ErrorKind::InvalidDimensions);
    }
}
