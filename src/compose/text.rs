//! Caption rendering.

use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};

use crate::error::{AdsynthError, Result};
use crate::types::Colour;

use super::blend::blend_pixel;

/// Letter spacing as a share of the font size.
pub const LETTER_SPACING: f32 = 0.1;

/// Parse a TrueType/OpenType font.
pub fn load_font(bytes: Vec<u8>, what: &str) -> Result<Font<'static>> {
    Font::try_from_vec(bytes).ok_or_else(|| AdsynthError::Decode {
        what: what.to_string(),
        message: "not a TrueType or OpenType font".to_string(),
    })
}

/// Advance width of `text` including letter spacing between glyphs.
pub fn text_width(font: &Font<'_>, px: f32, text: &str, spacing: f32) -> f32 {
    let scale = Scale::uniform(px);
    let mut width = 0.0;
    let mut count = 0;
    for ch in text.chars() {
        width += font.glyph(ch).scaled(scale).h_metrics().advance_width;
        count += 1;
    }
    if count > 1 {
        width += spacing * (count - 1) as f32;
    }
    width
}

/// A line of text placed by its horizontal centre and bottom edge.
#[derive(Debug, Clone)]
pub struct Caption<'a> {
    pub text: &'a str,
    pub px: f32,
    pub centre_x: f32,
    /// Canvas row the descender line sits on.
    pub bottom_y: f32,
    pub colour: Colour,
}

/// Draw `caption` onto `canvas` with glyph coverage as alpha.
pub fn draw_caption(canvas: &mut RgbaImage, font: &Font<'_>, caption: &Caption<'_>) {
    let scale = Scale::uniform(caption.px);
    let v_metrics = font.v_metrics(scale);
    let spacing = caption.px * LETTER_SPACING;

    let width = text_width(font, caption.px, caption.text, spacing);
    let mut caret_x = caption.centre_x - width / 2.0;
    let baseline_y = caption.bottom_y + v_metrics.descent;
    let [r, g, b] = caption.colour.to_rgb();
    let (cw, ch) = (canvas.width() as i32, canvas.height() as i32);

    for c in caption.text.chars() {
        let glyph = font.glyph(c).scaled(scale).positioned(point(caret_x, baseline_y));
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let x = gx as i32 + bb.min.x;
                let y = gy as i32 + bb.min.y;
                if x < 0 || y < 0 || x >= cw || y >= ch {
                    return;
                }
                let a = (v * 255.0).round() as u8;
                if a > 0 {
                    blend_pixel(canvas.get_pixel_mut(x as u32, y as u32), Rgba([r, g, b, a]));
                }
            });
        }
        caret_x += glyph.unpositioned().h_metrics().advance_width + spacing;
    }
}
