//! Aesthetic ranking of candidate colours.
//!
//! Scores are only used to order candidates; they never feed rendering.

use palette::{FromColor, Hsl, Srgb};

use crate::types::Colour;

use super::perceptual::to_perceptual;

pub const HUE_WEIGHT: f32 = 0.4;
pub const TONE_WEIGHT: f32 = 0.4;
pub const COLOURFULNESS_WEIGHT: f32 = 0.2;

/// Largest LCh chroma reachable in sRGB (pure blue).
const MAX_SRGB_CHROMA: f32 = 133.8;

/// Preferred saturation/lightness windows (HSL).
const SATURATION_SWEET_SPOT: (f32, f32) = (0.5, 0.85);
const LIGHTNESS_SWEET_SPOT: (f32, f32) = (0.45, 0.65);

/// Hue preference by HSL hue band, as `(upper bound in degrees, preference)`.
const HUE_PREFERENCE: [(f32, f32); 9] = [
    (15.0, 0.8),   // red
    (45.0, 0.55),  // orange / brown
    (70.0, 0.35),  // yellow
    (160.0, 0.3),  // green
    (200.0, 0.8),  // cyan
    (260.0, 1.0),  // blue
    (290.0, 0.95), // violet
    (345.0, 0.9),  // pink / magenta
    (360.0, 0.8),  // red
];

fn hue_preference(hue: f32) -> f32 {
    HUE_PREFERENCE
        .iter()
        .find(|(upper, _)| hue < *upper)
        .map_or(0.8, |(_, pref)| *pref)
}

/// 1.0 inside `window`, falling off linearly to 0.0 over `falloff`.
fn window_score(value: f32, window: (f32, f32), falloff: f32) -> f32 {
    let distance = if value < window.0 {
        window.0 - value
    } else if value > window.1 {
        value - window.1
    } else {
        0.0
    };
    (1.0 - distance / falloff).clamp(0.0, 1.0)
}

/// Saturation/lightness fitness with the grey and mud penalties applied.
fn tone_score(hue: f32, saturation: f32, lightness: f32) -> f32 {
    let mut score = window_score(saturation, SATURATION_SWEET_SPOT, 0.5)
        * window_score(lightness, LIGHTNESS_SWEET_SPOT, 0.35);

    if saturation < 0.15 {
        score *= 0.2;
    }
    let brownish = (15.0..50.0).contains(&hue) && lightness < 0.45 && saturation < 0.65;
    if brownish {
        score *= 0.4;
    }
    score
}

/// Weighted aesthetic fitness in `0.0..=1.0`.
///
/// 40% hue preference (blue, violet, pink, cyan and red over yellow, green
/// and brown), 40% saturation/lightness fitness, 20% normalized chroma.
pub fn aesthetic_score(colour: Colour) -> f32 {
    let [r, g, b] = colour.to_unit();
    let hsl: Hsl = Hsl::from_color(Srgb::new(r, g, b));
    let hue = hsl.hue.into_positive_degrees();

    let hue_term = hue_preference(hue);
    let tone_term = tone_score(hue, hsl.saturation, hsl.lightness);
    let colourfulness = (to_perceptual(colour).chroma / MAX_SRGB_CHROMA).clamp(0.0, 1.0);

    (HUE_WEIGHT * hue_term + TONE_WEIGHT * tone_term + COLOURFULNESS_WEIGHT * colourfulness)
        .clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hsl(h: f32, s: f32, l: f32) -> Colour {
        let rgb: Srgb<f32> = Srgb::from_color(Hsl::new(h, s, l));
        Colour::from_unit(rgb.red, rgb.green, rgb.blue)
    }

    #[test]
    fn test_mid_blue_beats_grey_of_same_hue() {
        let blue = hsl(220.0, 0.7, 0.55);
        let grey = hsl(220.0, 0.05, 0.55);
        assert!(aesthetic_score(blue) > aesthetic_score(grey));
    }

    #[test]
    fn test_blue_beats_yellow_and_brown() {
        let blue = hsl(225.0, 0.7, 0.55);
        let yellow = hsl(58.0, 0.7, 0.55);
        let brown = hsl(30.0, 0.45, 0.3);
        assert!(aesthetic_score(blue) > aesthetic_score(yellow));
        assert!(aesthetic_score(blue) > aesthetic_score(brown));
    }

    #[test]
    fn test_mid_tone_beats_extremes() {
        let mid = hsl(300.0, 0.7, 0.55);
        let washed = hsl(300.0, 0.7, 0.95);
        let murky = hsl(300.0, 0.7, 0.08);
        assert!(aesthetic_score(mid) > aesthetic_score(washed));
        assert!(aesthetic_score(mid) > aesthetic_score(murky));
    }

    #[test]
    fn test_score_bounds() {
        for r in (0..=255u16).step_by(51) {
            for g in (0..=255u16).step_by(51) {
                for b in (0..=255u16).step_by(51) {
                    let s = aesthetic_score(Colour::rgb(r as u8, g as u8, b as u8));
                    assert!((0.0..=1.0).contains(&s));
                }
            }
        }
    }

    #[test]
    fn test_hue_table_wraps() {
        assert_eq!(hue_preference(0.0), 0.8);
        assert_eq!(hue_preference(230.0), 1.0);
        assert_eq!(hue_preference(359.9), 0.8);
        assert_eq!(hue_preference(100.0), 0.3);
    }
}
