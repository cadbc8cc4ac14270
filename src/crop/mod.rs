//! Content-aware cropping to a target size under a byte ceiling.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};
use tracing::{debug, warn};

use crate::codec::{fit_to_ceiling, flatten, scaled_size, CompressionConfig};
use crate::error::{AdsynthError, Result};
use crate::types::{EncodedAsset, Region};

/// A pixel rectangle inside the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropWindow {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Largest window with the target aspect ratio, centred on `region`.
///
/// Only the axis on which the source overflows the target ratio is cut; the
/// other axis is kept whole. The window is centred on the region centroid
/// (or the image centre when there is no usable region) and shifted back
/// inside the image when it would cross an edge.
pub fn crop_window(
    src_width: u32,
    src_height: u32,
    target_width: u32,
    target_height: u32,
    region: Option<&Region>,
) -> CropWindow {
    if src_width == 0 || src_height == 0 || target_width == 0 || target_height == 0 {
        return CropWindow {
            x: 0,
            y: 0,
            width: src_width,
            height: src_height,
        };
    }

    let (sw, sh) = (src_width as u64, src_height as u64);
    let (tw, th) = (target_width as u64, target_height as u64);

    let (width, height) = if sw * th > tw * sh {
        // wider than the target: keep height
        let w = ((sh * tw + th / 2) / th).clamp(1, sw);
        (w as u32, src_height)
    } else {
        let h = ((sw * th + tw / 2) / tw).clamp(1, sh);
        (src_width, h as u32)
    };

    let centre = match region {
        Some(region) => match region.centroid() {
            Some(c) => c,
            None => {
                warn!(?region, "degenerate important region, centring crop");
                (0.5, 0.5)
            }
        },
        None => (0.5, 0.5),
    };

    let place = |centre: f32, extent: u32, window: u32| -> u32 {
        let start = (centre as f64 * extent as f64 - window as f64 / 2.0).round();
        start.clamp(0.0, (extent - window) as f64) as u32
    };

    CropWindow {
        x: place(centre.0, src_width, width),
        y: place(centre.1, src_height, height),
        width,
        height,
    }
}

/// Crop `image` to `target_width` x `target_height` around `region` and
/// encode it under `max_bytes`.
///
/// The crop is resampled with Lanczos3. When the ceiling cannot be met at
/// the resolution scale of 1.0 the output is smaller than the target; see
/// [`fit_to_ceiling`].
pub fn smart_crop(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
    max_bytes: usize,
    region: Option<&Region>,
    config: &CompressionConfig,
) -> Result<EncodedAsset> {
    if target_width == 0 || target_height == 0 {
        return Err(AdsynthError::InvalidRequest {
            message: format!("target size {}x{} has a zero side", target_width, target_height),
        });
    }
    let (src_width, src_height) = image.dimensions();
    if src_width == 0 || src_height == 0 {
        return Err(AdsynthError::InvalidRequest {
            message: "source image is empty".to_string(),
        });
    }

    let window = crop_window(src_width, src_height, target_width, target_height, region);
    debug!(
        x = window.x,
        y = window.y,
        width = window.width,
        height = window.height,
        "crop window"
    );

    let cropped: RgbaImage = image
        .crop_imm(window.x, window.y, window.width, window.height)
        .to_rgba8();

    fit_to_ceiling(max_bytes, config, |scale| {
        let (w, h) = scaled_size(target_width, target_height, scale);
        let resized = if (w, h) == cropped.dimensions() {
            cropped.clone()
        } else {
            imageops::resize(&cropped, w, h, FilterType::Lanczos3)
        };
        Ok(flatten(&resized))
    })
}
