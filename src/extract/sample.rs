//! Horizontal band sampling at a bounded working resolution.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView};

/// A horizontal slice of an image, as fractions of its height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub top: f32,
    pub bottom: f32,
}

impl Band {
    /// The middle of the frame, where the subject usually sits.
    pub const SUBJECT: Self = Self {
        top: 0.3,
        bottom: 0.7,
    };

    /// The last `fraction` of the height.
    pub fn bottom(fraction: f32) -> Self {
        Self {
            top: 1.0 - fraction.clamp(0.0, 1.0),
            bottom: 1.0,
        }
    }

    /// Pixel rows `[start, end)` for an image `height` tall, at least one row.
    pub fn rows(&self, height: u32) -> (u32, u32) {
        if height == 0 {
            return (0, 0);
        }
        let top = self.top.clamp(0.0, 1.0);
        let bottom = self.bottom.clamp(top, 1.0);
        let start = ((height as f32 * top).floor() as u32).min(height - 1);
        let end = ((height as f32 * bottom).ceil() as u32).clamp(start + 1, height);
        (start, end)
    }
}

/// Crop `band` out of `image` and resample it to `size`.
///
/// `size` of `None` keeps the band's aspect ratio at `working_width` pixels
/// wide (never upscaling), with the height capped at `working_width` rows.
/// Nearest-neighbour sampling keeps flat areas at their literal colour.
/// Returns `None` for an empty image.
pub fn band_image(
    image: &DynamicImage,
    band: Band,
    working_width: u32,
    size: Option<(u32, u32)>,
) -> Option<image::RgbaImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let (start, end) = band.rows(height);
    let band_height = end - start;
    let slice = image.crop_imm(0, start, width, band_height).to_rgba8();

    let (w, h) = size.unwrap_or_else(|| {
        let w = working_width.clamp(1, width);
        let h = ((band_height as u64 * w as u64 + width as u64 / 2) / width as u64)
            .clamp(1, working_width.max(1) as u64) as u32;
        (w, h)
    });
    if (w, h) == (width, band_height) {
        return Some(slice);
    }
    Some(imageops::resize(&slice, w.max(1), h.max(1), FilterType::Nearest))
}

/// Opaque-enough RGB samples from `band`; fully transparent pixels are skipped.
pub fn band_pixels(image: &DynamicImage, band: Band, working_width: u32) -> Vec<[u8; 3]> {
    band_image(image, band, working_width, None)
        .map(|img| {
            img.pixels()
                .filter(|p| p.0[3] > 0)
                .map(|p| [p.0[0], p.0[1], p.0[2]])
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_band_rows() {
        assert_eq!(Band::SUBJECT.rows(100), (30, 70));
        assert_eq!(Band::bottom(0.2).rows(100), (80, 100));
        assert_eq!(Band::bottom(0.05).rows(10), (9, 10));
        assert_eq!(Band::bottom(0.0).rows(10), (9, 10));
        assert_eq!(Band::SUBJECT.rows(1), (0, 1));
        assert_eq!(Band::SUBJECT.rows(0), (0, 0));
    }

    #[test]
    fn test_band_pixels_working_resolution() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1000, 500, Rgba([9, 8, 7, 255])));
        let pixels = band_pixels(&img, Band::bottom(0.2), 100);
        // 1000x100 band at width 100 keeps a 10:1 ratio
        assert_eq!(pixels.len(), 100 * 10);
        assert!(pixels.iter().all(|p| *p == [9, 8, 7]));
    }

    #[test]
    fn test_band_pixels_skip_transparent() {
        let mut img = RgbaImage::from_pixel(4, 10, Rgba([0, 0, 0, 0]));
        img.put_pixel(0, 9, Rgba([1, 2, 3, 255]));
        let pixels = band_pixels(&DynamicImage::ImageRgba8(img), Band::bottom(0.1), 100);
        assert_eq!(pixels, vec![[1, 2, 3]]);
    }

    #[test]
    fn test_band_height_is_bounded_for_tall_images() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 20_000, Rgba([4, 5, 6, 255])));
        let band = band_image(&img, Band::bottom(0.4), 100, None).unwrap();
        assert_eq!(band.dimensions(), (100, 100));
        assert_eq!(band_pixels(&img, Band::SUBJECT, 100).len(), 100 * 100);
    }

    #[test]
    fn test_band_image_empty() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(0, 0));
        assert!(band_image(&img, Band::SUBJECT, 100, None).is_none());
        assert!(band_pixels(&img, Band::SUBJECT, 100).is_empty());
    }

    #[test]
    fn test_band_image_fixed_size() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(50, 50, Rgba([1, 1, 1, 255])));
        let out = band_image(&img, Band::bottom(0.2), 100, Some((100, 20))).unwrap();
        assert_eq!(out.dimensions(), (100, 20));
    }
}
