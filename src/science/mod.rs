//! Colour science: perceptual conversions, derived colours and scoring.
//!
//! Every function here is pure and total over 8-bit RGB input.

mod derive;
mod perceptual;
mod score;

pub use derive::{
    darken, derive_gradient_colour, derive_icon_colour, icon_target, GRADIENT_BRIGHTNESS,
    GRADIENT_SATURATION, ICON_CHROMA_BAND, ICON_LIGHTNESS_BAND, STRICT_DARKEN_FACTOR,
};
pub use perceptual::{from_hsb, from_perceptual, in_gamut, to_hsb, to_perceptual, Hsb, Perceptual};
pub use score::{aesthetic_score, COLOURFULNESS_WEIGHT, HUE_WEIGHT, TONE_WEIGHT};
