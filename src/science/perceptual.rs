//! Conversions between sRGB and the LCh / HSB colour spaces.

use palette::convert::FromColorUnclamped;
use palette::{FromColor, Hsv, Lch, Srgb};

use crate::types::Colour;

/// Tolerance when deciding whether an unclamped sRGB channel is representable.
const GAMUT_EPSILON: f32 = 1e-4;

/// CIE LCh(ab) coordinates under D65.
///
/// `hue` is in degrees `0..360`, `chroma` roughly `0..134` for sRGB colours,
/// `lightness` `0..100`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perceptual {
    pub hue: f32,
    pub chroma: f32,
    pub lightness: f32,
}

/// HSB (HSV) coordinates: hue in degrees, saturation and brightness in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsb {
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
}

fn srgb(colour: Colour) -> Srgb<f32> {
    let [r, g, b] = colour.to_unit();
    Srgb::new(r, g, b)
}

/// Convert a colour to LCh.
pub fn to_perceptual(colour: Colour) -> Perceptual {
    let lch: Lch = Lch::from_color(srgb(colour));
    Perceptual {
        hue: lch.hue.into_positive_degrees(),
        chroma: lch.chroma,
        lightness: lch.l,
    }
}

fn unclamped_rgb(p: Perceptual) -> Srgb<f32> {
    let lch: Lch = Lch::new(p.lightness, p.chroma, p.hue);
    Srgb::from_color_unclamped(lch)
}

/// Convert LCh back to a colour. Out-of-gamut channels are clipped.
pub fn from_perceptual(p: Perceptual) -> Colour {
    let rgb = unclamped_rgb(p);
    Colour::from_unit(rgb.red, rgb.green, rgb.blue)
}

/// Whether the coordinates map to a colour inside the sRGB gamut.
pub fn in_gamut(p: Perceptual) -> bool {
    let rgb = unclamped_rgb(p);
    [rgb.red, rgb.green, rgb.blue]
        .iter()
        .all(|c| (-GAMUT_EPSILON..=1.0 + GAMUT_EPSILON).contains(c))
}

/// Convert a colour to HSB.
pub fn to_hsb(colour: Colour) -> Hsb {
    let hsv: Hsv = Hsv::from_color(srgb(colour));
    Hsb {
        hue: hsv.hue.into_positive_degrees(),
        saturation: hsv.saturation,
        brightness: hsv.value,
    }
}

/// Convert HSB back to a colour.
pub fn from_hsb(hsb: Hsb) -> Colour {
    let hsv: Hsv = Hsv::new(
        hsb.hue,
        hsb.saturation.clamp(0.0, 1.0),
        hsb.brightness.clamp(0.0, 1.0),
    );
    let rgb: Srgb<f32> = Srgb::from_color(hsv);
    Colour::from_unit(rgb.red, rgb.green, rgb.blue)
}
