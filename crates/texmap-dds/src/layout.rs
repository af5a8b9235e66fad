//! DDS layout resolver.
//!
//! DDS stores surfaces right after the header. Each layer (array element
//! and cube face) holds its whole mip chain from the base down to the
//! smallest level; volume levels hold all their depth slices.

use texmap_common::{
    validate_dimensions, validate_mip_count, LayoutPlan, MipPlan, SurfaceDescriptor, SurfaceKind,
};
use tracing::{debug, trace};

use crate::header::DdsInfo;
use crate::{Error, Result};

/// Most surfaces a single file may describe.
pub const MAX_SURFACES: usize = 1 << 16;

/// Compute where every surface of `info` lives.
pub fn resolve(info: &DdsInfo) -> Result<LayoutPlan> {
    let format = info.format.classify()?;

    validate_dimensions(info.width, info.height)?;
    validate_mip_count(info.width, info.height, info.mip_count)?;
    let plan = MipPlan::new(info.width, info.height, info.mip_count)?;

    let layers = u64::from(info.array_size) * u64::from(info.faces);
    let total = (plan.len() as u64).saturating_mul(layers);
    if total > MAX_SURFACES as u64 {
        return Err(Error::TooManySurfaces(usize::try_from(total).unwrap_or(usize::MAX)));
    }
    let layers = layers as u32;

    let header_end = info.data_offset;
    let mut surfaces = Vec::with_capacity(total as usize);
    let mut offset = header_end;

    for layer in 0..layers {
        for level in plan.levels() {
            let slices = (info.depth >> level.level).max(1);
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
            offset = surface.end();
            surfaces.push(surface);
        }
    }

    let layout = LayoutPlan {
        header_end,
        surfaces,
        primary: 0,
    };

    debug!(
        surfaces = layout.surfaces.len(),
        data_end = layout.data_end(),
        "resolved DDS layout"
    );
    Ok(layout)
}
