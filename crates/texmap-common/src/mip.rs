//! Mipmap chain planning.

use crate::pixel::DecodeMethod;
use crate::surface::{stored_dimensions, surface_size};
use crate::{Error, Result};

/// Largest width, height or depth accepted by the planner.
pub const MAX_DIMENSION: u32 = 1 << 16;

/// Largest edge of a VTF-style thumbnail.
pub const THUMBNAIL_MAX: u32 = 16;

/// Reject zero and absurd dimensions.
pub fn validate_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(width, height, "zero dimension"));
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Error::invalid_dimensions(width, height, "dimension exceeds 65536"));
    }
    Ok(())
}

/// Number of levels in a full mip chain.
///
/// Levels are counted while `width >> n` or `height >> n` is still at least
/// one, so a 1024x1 strip has 11 levels like a 1024x1024 square.
pub fn mip_count(width: u32, height: u32) -> u32 {
    let mut count = 0;
    while count < 32 && ((width >> count) >= 1 || (height >> count) >= 1) {
        count += 1;
    }
    count.max(1)
}

/// Fail unless `count` is between one and the full chain length.
pub fn validate_mip_count(width: u32, height: u32, count: u32) -> Result<()> {
    if count == 0 {
        return Err(Error::invalid_dimensions(width, height, "mip count is zero"));
    }
    if count > mip_count(width, height) {
        return Err(Error::invalid_dimensions(
            width,
            height,
            "mip count exceeds the chain length",
        ));
    }
    Ok(())
}

/// One level of a mip chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MipLevel {
    /// `0` is the base level.
    pub level: u32,
    /// Nominal width, `max(1, base >> level)`.
    pub width: u32,
    /// Nominal height, `max(1, base >> level)`.
    pub height: u32,
}

impl MipLevel {
    /// Dimensions this level is encoded at for `method`.
    pub fn stored(&self, method: DecodeMethod) -> (u32, u32) {
        stored_dimensions(method, self.width, self.height)
    }

    /// Encoded byte length of this level for `method`.
    pub fn byte_size(&self, method: DecodeMethod) -> Result<usize> {
        let (w, h) = self.stored(method);
        surface_size(method, w, h)
    }
}

/// An ordered mip chain, base level first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MipPlan {
    levels: Vec<MipLevel>,
}

impl MipPlan {
    /// Plan the first `count` levels of a `width` x `height` chain.
    pub fn new(width: u32, height: u32, count: u32) -> Result<Self> {
        validate_dimensions(width, height)?;
        validate_mip_count(width, height, count)?;

        let levels = (0..count)
            .map(|level| MipLevel {
                level,
                width: (width >> level).max(1),
                height: (height >> level).max(1),
            })
            .collect();

        Ok(Self { levels })
    }

    /// Plan a full chain.
    pub fn full(width: u32, height: u32) -> Result<Self> {
        Self::new(width, height, mip_count(width, height))
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// A plan always holds the base level.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Levels base first.
    pub fn levels(&self) -> &[MipLevel] {
        &self.levels
    }

    /// The base level.
    pub fn base(&self) -> MipLevel {
        self.levels[0]
    }

    /// Levels smallest first, the order VTF stores them in.
    pub fn smallest_first(&self) -> impl Iterator<Item = &MipLevel> {
        self.levels.iter().rev()
    }
}

/// Plan a full mip chain for `width` x `height`.
pub fn plan_mips(width: u32, height: u32) -> Result<MipPlan> {
    MipPlan::full(width, height)
}

/// The power of two nearest to `x`.
///
/// The candidates are `round(log2 x)` and `ceil(log2 x)`; the first one with
/// the smallest distance wins, so 192 becomes 256 and 9 becomes 8.
pub fn closest_power_of_two(x: u32) -> u32 {
    if x <= 1 {
        return 1;
    }
    let log = f64::from(x).log2();
    let candidates = [log.round() as u32, log.ceil() as u32];

    let mut best = candidates[0];
    for &k in &candidates[1..] {
        if distance(x, k) < distance(x, best) {
            best = k;
        }
    }
    1u32 << best.min(31)
}

fn distance(x: u32, exponent: u32) -> u64 {
    let power = 1u64 << exponent.min(63);
    power.abs_diff(u64::from(x))
}

/// Dimensions of a thumbnail for a `width` x `height` image.
///
/// The image is fitted inside `min(16, width)` x `min(16, height)` keeping
/// its aspect ratio, then each axis is snapped to the closest power of two.
pub fn thumbnail_dimensions(width: u32, height: u32) -> (u32, u32) {
    let (width, height) = (width.max(1), height.max(1));
    let box_w = width.min(THUMBNAIL_MAX);
    let box_h = height.min(THUMBNAIL_MAX);

    let (w, h) = if u64::from(width) * u64::from(box_h) > u64::from(height) * u64::from(box_w) {
        let h = (f64::from(height) * f64::from(box_w) / f64::from(width)).round() as u32;
        (box_w, h.max(1))
    } else {
        let w = (f64::from(width) * f64::from(box_h) / f64::from(height)).round() as u32;
        (w.max(1), box_h)
    };

    (closest_power_of_two(w), closest_power_of_two(h))
}
