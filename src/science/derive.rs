//! Derived icon and band colours.
//!
//! The correction model and clamp bands were tuned by eye against the
//! production brand art and are kept as fixed constants.

use crate::types::Colour;

use super::perceptual::{from_hsb, from_perceptual, in_gamut, to_hsb, to_perceptual, Hsb, Perceptual};

/// Chroma range an icon colour is clamped into.
pub const ICON_CHROMA_BAND: (f32, f32) = (30.0, 80.0);

/// Lightness range an icon colour is clamped into.
pub const ICON_LIGHTNESS_BAND: (f32, f32) = (40.0, 72.0);

/// Band colour saturation (HSB).
pub const GRADIENT_SATURATION: f32 = 1.0;

/// Band colour brightness (HSB).
pub const GRADIENT_BRIGHTNESS: f32 = 0.1;

/// Divisor applied to the literal bottom colour in strict-dominance mode.
pub const STRICT_DARKEN_FACTOR: f32 = 2.5;

/// Below this chroma the LCh hue is noise; such inputs get [`ACHROMATIC_HUE`].
const ACHROMATIC_CHROMA: f32 = 0.5;
const ACHROMATIC_HUE: f32 = 0.0;

/// Bisection steps when pulling chroma back into gamut.
const GAMUT_STEPS: usize = 24;

/// Lightness increment when searching for a lightness that holds the chroma floor.
const LIGHTNESS_STEP: f32 = 0.25;

/// Cubic chroma correction.
fn corrected_chroma(c: f32) -> f32 {
    0.0002 * c.powi(3) - 0.0347 * c.powi(2) + 2.0053 * c + 18.413
}

/// Quadratic lightness correction with the mid-tone compensation zones.
fn corrected_lightness(l: f32) -> f32 {
    let mut out = -0.0047 * l.powi(2) + (1.0 - 0.3217) * l + 39.273;
    if l > 64.0 && l < 74.0 {
        out -= 12.0;
    } else if l > 54.0 && l < 64.0 {
        out += 12.0;
    }
    out
}

/// Target LCh coordinates for the icon colour, before gamut mapping.
pub fn icon_target(colour: Colour) -> Perceptual {
    let p = to_perceptual(colour);
    let hue = if p.chroma < ACHROMATIC_CHROMA {
        ACHROMATIC_HUE
    } else {
        p.hue
    };
    Perceptual {
        hue,
        chroma: corrected_chroma(p.chroma).clamp(ICON_CHROMA_BAND.0, ICON_CHROMA_BAND.1),
        lightness: corrected_lightness(p.lightness)
            .clamp(ICON_LIGHTNESS_BAND.0, ICON_LIGHTNESS_BAND.1),
    }
}

/// Derive a legible, saturated badge colour from a sampled colour.
///
/// Hue is kept; chroma and lightness go through the correction model and
/// are clamped into the icon bands. A target outside sRGB first gains
/// lightness, within its band, until the chroma floor fits, then loses
/// chroma down to no less than that floor.
pub fn derive_icon_colour(colour: Colour) -> Colour {
    let target = icon_target(colour);
    if in_gamut(target) {
        return from_perceptual(target);
    }

    let floor = ICON_CHROMA_BAND.0;
    let lightness = floor_lightness(target, floor);
    let target = Perceptual { lightness, ..target };
    if in_gamut(target) {
        return from_perceptual(target);
    }

    let (mut lo, mut hi) = (floor, target.chroma);
    for _ in 0..GAMUT_STEPS {
        let mid = (lo + hi) / 2.0;
        if in_gamut(Perceptual { chroma: mid, ..target }) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    from_perceptual(Perceptual { chroma: lo, ..target })
}

/// Lowest lightness from the target's up to the band ceiling at which the
/// hue holds `floor` chroma in gamut. Falls back to searching downwards, then
/// to the target's own lightness.
fn floor_lightness(target: Perceptual, floor: f32) -> f32 {
    let fits = |lightness: f32| {
        in_gamut(Perceptual {
            chroma: floor,
            lightness,
            ..target
        })
    };
    let (low, high) = ICON_LIGHTNESS_BAND;
    let steps = ((high - low) / LIGHTNESS_STEP).ceil() as usize;

    let up = (0..=steps)
        .map(|i| (target.lightness + i as f32 * LIGHTNESS_STEP).min(high))
        .find(|&l| fits(l));
    let down = || {
        (0..=steps)
            .map(|i| (target.lightness - i as f32 * LIGHTNESS_STEP).max(low))
            .find(|&l| fits(l))
    };
    up.or_else(down).unwrap_or(target.lightness)
}

/// Derive the deep band colour: same HSB hue, full saturation, 10% brightness.
pub fn derive_gradient_colour(colour: Colour) -> Colour {
    let hsb = to_hsb(colour);
    from_hsb(Hsb {
        hue: hsb.hue,
        saturation: GRADIENT_SATURATION,
        brightness: GRADIENT_BRIGHTNESS,
    })
}

/// Divide every channel by `factor`. Factors below 1 are treated as 1.
pub fn darken(colour: Colour, factor: f32) -> Colour {
    let factor = if factor.is_finite() { factor.max(1.0) } else { 1.0 };
    let channel = |v: u8| (v as f32 / factor).round() as u8;
    Colour::rgb(channel(colour.r), channel(colour.g), channel(colour.b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1.0;

    fn assert_in_band(value: f32, band: (f32, f32), what: &str, c: Colour) {
        assert!(
            value >= band.0 - TOLERANCE && value <= band.1 + TOLERANCE,
            "{} {} outside {:?} for {}",
            what,
            value,
            band,
            c
        );
    }

    #[test]
    fn test_icon_colour_extremes_land_in_bands() {
        let extremes = [
            Colour::BLACK,
            Colour::WHITE,
            Colour::rgb(128, 128, 128),
            Colour::rgb(30, 30, 30),
            Colour::rgb(220, 220, 220),
        ];
        for c in extremes {
            let p = to_perceptual(derive_icon_colour(c));
            assert_in_band(p.lightness, ICON_LIGHTNESS_BAND, "lightness", c);
            assert_in_band(p.chroma, ICON_CHROMA_BAND, "chroma", c);
        }
    }

    #[test]
    fn test_icon_colour_bands_for_all_hues() {
        for r in (0..=255u16).step_by(17) {
            for g in (0..=255u16).step_by(17) {
                for b in (0..=255u16).step_by(17) {
                    let c = Colour::rgb(r as u8, g as u8, b as u8);
                    let p = to_perceptual(derive_icon_colour(c));
                    assert_in_band(p.lightness, ICON_LIGHTNESS_BAND, "lightness", c);
                    assert_in_band(p.chroma, ICON_CHROMA_BAND, "chroma", c);
                }
            }
        }
    }

    #[test]
    fn test_dark_cyan_keeps_chroma_floor() {
        for c in [
            Colour::rgb(0x00, 0x05, 0x05),
            Colour::rgb(0x00, 0x33, 0x33),
            Colour::rgb(0x00, 0x20, 0x28),
            Colour::rgb(0x05, 0x10, 0x05),
        ] {
            let target = icon_target(c);
            let p = to_perceptual(derive_icon_colour(c));
            assert_in_band(p.chroma, ICON_CHROMA_BAND, "chroma", c);
            assert_in_band(p.lightness, ICON_LIGHTNESS_BAND, "lightness", c);
            assert!(p.lightness >= target.lightness - TOLERANCE, "lightness dropped for {}", c);
        }
    }

    #[test]
    fn test_icon_target_is_clamped() {
        let t = icon_target(Colour::rgb(0, 0, 255));
        assert_eq!(t.chroma, ICON_CHROMA_BAND.1);
        let t = icon_target(Colour::BLACK);
        assert_eq!(t.lightness, ICON_LIGHTNESS_BAND.0);
        assert_eq!(t.chroma, ICON_CHROMA_BAND.0);
    }

    #[test]
    fn test_icon_colour_keeps_hue_family() {
        let source = Colour::rgb(40, 90, 200);
        let icon = derive_icon_colour(source);
        let dh = (to_perceptual(icon).hue - to_perceptual(source).hue).abs();
        assert!(dh.min(360.0 - dh) < 3.0);
    }

    #[test]
    fn test_gradient_colour_hsb_rule() {
        assert_eq!(derive_gradient_colour(Colour::rgb(0, 0, 255)), Colour::rgb(0, 0, 26));
        assert_eq!(derive_gradient_colour(Colour::rgb(255, 0, 0)), Colour::rgb(26, 0, 0));

        let deep = to_hsb(derive_gradient_colour(Colour::rgb(0x33, 0x66, 0xFF)));
        assert!((deep.hue - 225.0).abs() < 3.0);
        assert!(deep.saturation > 0.99);
        assert!((deep.brightness - 0.1).abs() < 0.01);
    }

    #[test]
    fn test_darken_exact() {
        assert_eq!(
            darken(Colour::rgb(0xFF, 0xAA, 0x00), STRICT_DARKEN_FACTOR),
            Colour::rgb(102, 68, 0)
        );
        assert_eq!(darken(Colour::WHITE, 0.5), Colour::WHITE);
        assert_eq!(darken(Colour::WHITE, f32::NAN), Colour::WHITE);
    }
}
