//! Palette extraction.
//!
//! Two bands of the source are sampled: the subject band (middle of the
//! frame) feeds the icon colour, the bottom band feeds the gradient colour.
//! Each band is reduced to a handful of candidates by median cut and the
//! candidates are paired into an ordered list of [`ColourScheme`]s.

mod quantize;
mod sample;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AdsynthError, Result};
use crate::science::{aesthetic_score, darken, derive_gradient_colour, derive_icon_colour};
use crate::types::{Colour, ColourScheme};

pub use quantize::{quantize, Swatch};
pub use sample::{band_image, band_pixels, Band};

/// Seed used when a band yields no candidates.
pub const FALLBACK_COLOUR: Colour = Colour::rgb(0x25, 0x63, 0xEB);

/// Top edge of the smart-colour band, as a fraction of the height.
const SMART_BAND_TOP: f32 = 194.0 / 300.0;
const SMART_BAND_SIZE: (u32, u32) = (375, 106);

const BOTTOM_COLOUR_FRACTION: f32 = 0.2;
const BOTTOM_COLOUR_SIZE: (u32, u32) = (100, 20);

/// Palette extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Default share of the height sampled as the bottom band.
    pub bottom_fraction: f32,
    /// Smallest bottom band a caller may ask for.
    pub min_bottom_fraction: f32,
    /// Width each band is resampled to before quantizing.
    pub working_width: u32,
    /// Upper bound on candidates per band.
    pub max_candidates: usize,
    /// Number of schemes produced.
    pub scheme_count: usize,
    /// Divisor for the literal bottom colour in strict-dominance mode.
    pub strict_darken_factor: f32,
    /// Strict mode cycles only this many of the most dominant bottom colours.
    pub strict_cycle: usize,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            bottom_fraction: 0.2,
            min_bottom_fraction: 0.05,
            working_width: 100,
            max_candidates: 10,
            scheme_count: 5,
            strict_darken_factor: crate::science::STRICT_DARKEN_FACTOR,
            strict_cycle: 3,
        }
    }
}

impl PaletteConfig {
    pub fn validate(&self) -> Result<()> {
        let bad = |message: String| AdsynthError::Config {
            message,
            help: Some("See the `palette` section of adsynth.yaml".to_string()),
        };
        if !(self.min_bottom_fraction > 0.0 && self.min_bottom_fraction <= 1.0) {
            return Err(bad(format!(
                "min_bottom_fraction {} must be in (0, 1]",
                self.min_bottom_fraction
            )));
        }
        if !(self.bottom_fraction >= self.min_bottom_fraction && self.bottom_fraction <= 1.0) {
            return Err(bad(format!(
                "bottom_fraction {} must be within [{}, 1]",
                self.bottom_fraction, self.min_bottom_fraction
            )));
        }
        if self.working_width == 0 || self.max_candidates == 0 {
            return Err(bad("working_width and max_candidates must be positive".to_string()));
        }
        if self.scheme_count == 0 || self.strict_cycle == 0 {
            return Err(bad("scheme_count and strict_cycle must be positive".to_string()));
        }
        if !(self.strict_darken_factor >= 1.0) {
            return Err(bad(format!(
                "strict_darken_factor {} must be at least 1",
                self.strict_darken_factor
            )));
        }
        Ok(())
    }

    /// Clamp a requested bottom fraction into `[min_bottom_fraction, 1]`.
    pub fn bottom_band(&self, requested: f32) -> f32 {
        if !requested.is_finite() {
            return self.bottom_fraction;
        }
        requested.clamp(self.min_bottom_fraction, 1.0)
    }
}

/// Extract `scheme_count` colour schemes with the default settings.
///
/// See [`extract_palette_with`].
pub fn extract_palette(image: &DynamicImage, bottom_fraction: f32, strict: bool) -> Vec<ColourScheme> {
    extract_palette_with(image, bottom_fraction, strict, &PaletteConfig::default())
}

/// Extract an ordered list of colour schemes from `image`.
///
/// Subject candidates are always ranked by [`aesthetic_score`]. Bottom
/// candidates are ranked the same way unless `strict` is set, in which case
/// they stay in coverage order and the gradient colour is the literal bottom
/// colour darkened by `strict_darken_factor`. Index 0 is the default choice.
pub fn extract_palette_with(
    image: &DynamicImage,
    bottom_fraction: f32,
    strict: bool,
    config: &PaletteConfig,
) -> Vec<ColourScheme> {
    let bottom_band = Band::bottom(config.bottom_band(bottom_fraction));

    let mut subject = candidates(image, Band::SUBJECT, config, "subject");
    rank_by_score(&mut subject);

    let mut bottom = candidates(image, bottom_band, config, "bottom");
    if !strict {
        rank_by_score(&mut bottom);
    }

    debug!(
        subject = subject.len(),
        bottom = bottom.len(),
        strict,
        "palette candidates"
    );

    let strict_pool = bottom.len().min(config.strict_cycle.max(1));
    (0..config.scheme_count)
        .map(|i| {
            let icon = derive_icon_colour(subject[i % subject.len()]);
            let gradient = if strict {
                darken(bottom[i % strict_pool], config.strict_darken_factor)
            } else {
                derive_gradient_colour(bottom[i % bottom.len()])
            };
            ColourScheme::new(icon, gradient)
        })
        .collect()
}

/// Quantized candidates for `band`, most populous first, never empty.
fn candidates(image: &DynamicImage, band: Band, config: &PaletteConfig, name: &str) -> Vec<Colour> {
    let pixels = band_pixels(image, band, config.working_width);
    let colours: Vec<Colour> = quantize(&pixels, config.max_candidates)
        .into_iter()
        .map(|s| s.colour)
        .collect();
    if colours.is_empty() {
        warn!(band = name, "no colour candidates, using fallback");
        return vec![FALLBACK_COLOUR];
    }
    colours
}

/// Stable sort, best score first.
fn rank_by_score(colours: &mut Vec<Colour>) {
    let mut scored: Vec<(f32, Colour)> = colours.iter().map(|&c| (aesthetic_score(c), c)).collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    *colours = scored.into_iter().map(|(_, c)| c).collect();
}

/// A single legible accent colour taken from the lower part of the frame.
///
/// Falls back to [`FALLBACK_COLOUR`] when the image has nothing to sample.
pub fn smart_colour(image: &DynamicImage) -> Colour {
    let band = Band {
        top: SMART_BAND_TOP,
        bottom: 1.0,
    };
    let dominant = band_image(image, band, SMART_BAND_SIZE.0, Some(SMART_BAND_SIZE))
        .map(|img| {
            img.pixels()
                .filter(|p| p.0[3] > 0)
                .map(|p| [p.0[0], p.0[1], p.0[2]])
                .collect::<Vec<_>>()
        })
        .and_then(|pixels| quantize(&pixels, PaletteConfig::default().max_candidates).first().copied());

    match dominant {
        Some(swatch) => derive_icon_colour(swatch.colour),
        None => {
            warn!("smart colour sampling failed, using fallback");
            FALLBACK_COLOUR
        }
    }
}

/// The exact most frequent colour of the bottom fifth of the frame.
///
/// Ties go to the numerically smallest RGB value.
pub fn bottom_colour(image: &DynamicImage) -> Colour {
    let band = Band::bottom(BOTTOM_COLOUR_FRACTION);
    let Some(img) = band_image(image, band, BOTTOM_COLOUR_SIZE.0, Some(BOTTOM_COLOUR_SIZE)) else {
        warn!("bottom colour sampling failed, using fallback");
        return FALLBACK_COLOUR;
    };

    let mut counts = std::collections::BTreeMap::<[u8; 3], u32>::new();
    for p in img.pixels().filter(|p| p.0[3] > 0) {
        *counts.entry([p.0[0], p.0[1], p.0[2]]).or_default() += 1;
    }

    // BTreeMap iterates in ascending key order; keep the first maximum
    let mut best: Option<([u8; 3], u32)> = None;
    for (rgb, count) in counts {
        if best.map_or(true, |(_, n)| count > n) {
            best = Some((rgb, count));
        }
    }
    best.map_or(FALLBACK_COLOUR, |(rgb, _)| Colour::from(rgb))
}
