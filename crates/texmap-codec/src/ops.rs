//! [`ImageOps`] backed by the `image` crate, plus conversions between
//! [`PixelBuffer`] and [`DynamicImage`].

use image::imageops::FilterType;
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use texmap_common::{ColorMode, Error, ImageOps, PixelBuffer, Result};

/// Image operations using `image`'s converters and resamplers.
#[derive(Debug, Clone, Copy)]
pub struct ImageRsOps {
    filter: FilterType,
}

impl Default for ImageRsOps {
    fn default() -> Self {
        Self {
            filter: FilterType::CatmullRom,
        }
    }
}

impl ImageRsOps {
    /// Create with the default bicubic filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `filter` for resizing.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }
}

impl ImageOps for ImageRsOps {
    fn convert(&self, image: &PixelBuffer, mode: ColorMode) -> Result<PixelBuffer> {
        if image.mode == mode {
            return Ok(image.clone());
        }
        let dynamic = to_dynamic(image)?;
        Ok(from_dynamic_as(&dynamic, mode))
    }

    fn resize(&self, image: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer> {
        if image.width == width && image.height == height {
            return Ok(image.clone());
        }
        let dynamic = to_dynamic(image)?.resize_exact(width, height, self.filter);
        Ok(from_dynamic_as(&dynamic, image.mode))
    }
}

/// Wrap a buffer as a [`DynamicImage`] of the matching type.
pub fn to_dynamic(image: &PixelBuffer) -> Result<DynamicImage> {
    let (w, h, data) = (image.width, image.height, image.data.clone());
    let dynamic = match image.mode {
        ColorMode::L => GrayImage::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
        ColorMode::La => GrayAlphaImage::from_raw(w, h, data).map(DynamicImage::ImageLumaA8),
        ColorMode::Rgb => RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
        ColorMode::Rgba => RgbaImage::from_raw(w, h, data).map(DynamicImage::ImageRgba8),
    };
    dynamic.ok_or_else(|| Error::Codec(format!("{}x{} {} buffer has the wrong size", w, h, image.mode)))
}

/// Take a [`DynamicImage`] in the closest canonical mode.
pub fn from_dynamic(image: &DynamicImage) -> PixelBuffer {
    let color = image.color();
    let mode = match (color.has_color(), color.has_alpha()) {
        (false, false) => ColorMode::L,
        (false, true) => ColorMode::La,
        (true, false) => ColorMode::Rgb,
        (true, true) => ColorMode::Rgba,
    };
    from_dynamic_as(image, mode)
}

/// Take a [`DynamicImage`] converted to `mode`.
pub fn from_dynamic_as(image: &DynamicImage, mode: ColorMode) -> PixelBuffer {
    let data = match mode {
        ColorMode::L => image.to_luma8().into_raw(),
        ColorMode::La => image.to_luma_alpha8().into_raw(),
        ColorMode::Rgb => image.to_rgb8().into_raw(),
        ColorMode::Rgba => image.to_rgba8().into_raw(),
    };
    PixelBuffer {
        mode,
        width: image.width(),
        height: image.height(),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_rgb_to_rgba() {
        let image = PixelBuffer::new(ColorMode::Rgb, 1, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let rgba = ImageRsOps::new().convert(&image, ColorMode::Rgba).unwrap();
        assert_eq!(rgba.data, [1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn test_resize_keeps_mode() {
        let image = PixelBuffer::zeroed(ColorMode::La, 6, 3).unwrap();
        let resized = ImageRsOps::new().resize(&image, 8, 4).unwrap();
        assert_eq!(resized.mode, ColorMode::La);
        assert_eq!((resized.width, resized.height), (8, 4));
        assert_eq!(resized.data.len(), 8 * 4 * 2);
    }

    #[test]
    fn test_dynamic_mode_detection() {
        let gray = DynamicImage::ImageLuma8(GrayImage::new(2, 2));
        assert_eq!(from_dynamic(&gray).mode, ColorMode::L);

        let rgba = DynamicImage::ImageRgba8(RgbaImage::new(2, 2));
        let buffer = from_dynamic(&rgba);
        assert_eq!(buffer.mode, ColorMode::Rgba);
        assert_eq!(to_dynamic(&buffer).unwrap().color(), image::ColorType::Rgba8);
    }
}
