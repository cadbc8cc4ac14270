//! Canvas drawing primitives.
//!
//! All layers are straight-alpha RGBA and are blended source-over in integer
//! arithmetic. Fully opaque source pixels replace the destination exactly.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::crop::crop_window;
use crate::types::{Colour, Fit, PxRect};

/// Vertical placement inside a rectangle for [`Fit::Contain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Top,
    Centre,
}

/// Alpha stops of the gradient band: `(position, alpha)` over the band height.
const BAND_STOPS: [(f32, f32); 4] = [(0.0, 0.0), (0.1, 1.0), (0.3, 1.0), (1.0, 0.0)];

/// Source-over blend of one straight-alpha pixel.
pub fn blend_pixel(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src.0[3] as u32;
    if sa == 255 {
        *dst = src;
        return;
    }
    if sa == 0 {
        return;
    }

    let da = dst.0[3] as u32;
    // alpha scaled by 255
    let out_a = sa * 255 + da * (255 - sa);
    for c in 0..3 {
        let num = src.0[c] as u32 * sa * 255 + dst.0[c] as u32 * da * (255 - sa);
        dst.0[c] = ((num + out_a / 2) / out_a) as u8;
    }
    dst.0[3] = ((out_a + 127) / 255) as u8;
}

/// Blend `layer` onto `canvas` with its top-left corner at `(x, y)`.
/// Parts outside the canvas are clipped.
pub fn overlay(canvas: &mut RgbaImage, layer: &RgbaImage, x: i64, y: i64) {
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
    for (lx, ly, px) in layer.enumerate_pixels() {
        let (tx, ty) = (x + lx as i64, y + ly as i64);
        if tx < 0 || ty < 0 || tx >= cw || ty >= ch {
            continue;
        }
        blend_pixel(canvas.get_pixel_mut(tx as u32, ty as u32), *px);
    }
}

/// `image` at `width` x `height`, resampled only when the size differs.
pub fn resized(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (width, height) = (width.max(1), height.max(1));
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, FilterType::Lanczos3)
}

/// Stretch `image` over `rect`.
pub fn draw_stretched(canvas: &mut RgbaImage, image: &RgbaImage, rect: PxRect) {
    let layer = resized(image, rect.w, rect.h);
    overlay(canvas, &layer, rect.x as i64, rect.y as i64);
}

/// Draw `image` into `rect` with the given fit. Cover crops the centre of
/// the image to the rectangle's ratio; contain letterboxes inside it.
pub fn draw_fit(canvas: &mut RgbaImage, image: &RgbaImage, rect: PxRect, fit: Fit, align: Align) {
    let (sw, sh) = image.dimensions();
    if sw == 0 || sh == 0 || rect.w == 0 || rect.h == 0 {
        return;
    }

    match fit {
        Fit::Cover => {
            let window = crop_window(sw, sh, rect.w, rect.h, None);
            let cropped = imageops::crop_imm(image, window.x, window.y, window.width, window.height).to_image();
            draw_stretched(canvas, &cropped, rect);
        }
        Fit::Contain => {
            let scale = (rect.w as f64 / sw as f64).min(rect.h as f64 / sh as f64);
            let w = ((sw as f64 * scale).round() as u32).clamp(1, rect.w);
            let h = ((sh as f64 * scale).round() as u32).clamp(1, rect.h);
            let x = rect.x + (rect.w - w) / 2;
            let y = match align {
                Align::Top => rect.y,
                Align::Centre => rect.y + (rect.h - h) / 2,
            };
            draw_stretched(canvas, image, PxRect::new(x, y, w, h));
        }
    }
}

/// Draw `image` scaled to the canvas width, anchored at the top edge.
pub fn draw_full_width(canvas: &mut RgbaImage, image: &RgbaImage) {
    let (sw, sh) = image.dimensions();
    if sw == 0 || sh == 0 {
        return;
    }
    let width = canvas.width();
    let height = ((sh as u64 * width as u64 + sw as u64 / 2) / sw as u64).max(1) as u32;
    draw_stretched(canvas, image, PxRect::new(0, 0, width, height));
}

/// Solid `colour` kept only where `mask` is opaque (mask stretched to `rect`).
pub fn fill_through_mask(canvas: &mut RgbaImage, colour: Colour, mask: &RgbaImage, rect: PxRect) {
    let mask = resized(mask, rect.w, rect.h);
    let [r, g, b] = colour.to_rgb();
    let layer = RgbaImage::from_fn(mask.width(), mask.height(), |x, y| {
        Rgba([r, g, b, mask.get_pixel(x, y).0[3]])
    });
    overlay(canvas, &layer, rect.x as i64, rect.y as i64);
}

/// Band opacity at relative height `t` in `0.0..=1.0`.
pub fn band_alpha(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    for pair in BAND_STOPS.windows(2) {
        let ((t0, a0), (t1, a1)) = (pair[0], pair[1]);
        if t <= t1 {
            let span = t1 - t0;
            if span <= 0.0 {
                return a1;
            }
            return a0 + (a1 - a0) * (t - t0) / span;
        }
    }
    0.0
}

/// Fill `rect` with `colour` under the vertical band feather, optionally
/// modulated by the luminance of `luma_mask`.
pub fn draw_band(canvas: &mut RgbaImage, colour: Colour, rect: PxRect, luma_mask: Option<&RgbaImage>) {
    if rect.w == 0 || rect.h == 0 {
        return;
    }
    let mask = luma_mask.map(|m| resized(m, rect.w, rect.h));
    let [r, g, b] = colour.to_rgb();
    let layer = RgbaImage::from_fn(rect.w, rect.h, |x, y| {
        let t = (y as f32 + 0.5) / rect.h as f32;
        let mut alpha = band_alpha(t);
        if let Some(mask) = &mask {
            alpha *= luminance(*mask.get_pixel(x, y));
        }
        Rgba([r, g, b, (alpha * 255.0).round() as u8])
    });
    overlay(canvas, &layer, rect.x as i64, rect.y as i64);
}

/// Rec. 601 luma of a pixel, weighted by its alpha, in `0.0..=1.0`.
fn luminance(px: Rgba<u8>) -> f32 {
    let [r, g, b, a] = px.0;
    let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    (luma / 255.0) * (a as f32 / 255.0)
}
