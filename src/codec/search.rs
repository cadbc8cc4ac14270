//! Quality/resolution search against a byte ceiling.
//!
//! The search state is `(scale level, quality)`. Quality drops in fixed steps
//! to its floor; then the scale drops one level and quality resets. Each step
//! strictly lowers `(remaining scale levels, quality)` in lexicographic order,
//! so the loop runs at most `quality_levels * scale_levels` encodes.

use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AdsynthError, Result};
use crate::types::{AssetFormat, CeilingStatus, EncodedAsset};

use super::encode_jpeg;

/// Compression search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    pub initial_quality: u8,
    pub quality_step: u8,
    pub quality_floor: u8,
    pub scale_step: f32,
    pub scale_floor: f32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            initial_quality: 80,
            quality_step: 5,
            quality_floor: 20,
            scale_step: 0.1,
            scale_floor: 0.5,
        }
    }
}

impl CompressionConfig {
    pub fn validate(&self) -> Result<()> {
        let bad = |message: String| AdsynthError::Config {
            message,
            help: Some("See the `compression` section of adsynth.yaml".to_string()),
        };
        if !(1..=100).contains(&self.initial_quality) || self.quality_floor == 0 {
            return Err(bad(format!(
                "quality must be within 1..=100 (initial {}, floor {})",
                self.initial_quality, self.quality_floor
            )));
        }
        if self.quality_floor > self.initial_quality {
            return Err(bad(format!(
                "quality_floor {} is above initial_quality {}",
                self.quality_floor, self.initial_quality
            )));
        }
        if self.quality_step == 0 {
            return Err(bad("quality_step must be positive".to_string()));
        }
        if !(self.scale_step > 0.0 && self.scale_step < 1.0) {
            return Err(bad(format!("scale_step {} must be in (0, 1)", self.scale_step)));
        }
        if !(self.scale_floor > 0.0 && self.scale_floor <= 1.0) {
            return Err(bad(format!("scale_floor {} must be in (0, 1]", self.scale_floor)));
        }
        Ok(())
    }

    /// Number of scale reductions available below 1.0.
    fn scale_levels(&self) -> u32 {
        if self.scale_step <= 0.0 || !self.scale_step.is_finite() {
            return 0;
        }
        let span = (1.0 - self.scale_floor).max(0.0);
        (span / self.scale_step + 1e-4).floor() as u32
    }

    fn start_quality(&self) -> u8 {
        self.initial_quality.max(self.quality_floor).min(100)
    }
}

/// One point of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchState {
    pub quality: u8,
    /// Number of scale reductions applied so far.
    pub level: u32,
}

impl SearchState {
    pub fn initial(config: &CompressionConfig) -> Self {
        Self {
            quality: config.start_quality(),
            level: 0,
        }
    }

    pub fn scale(&self, config: &CompressionConfig) -> f32 {
        (1.0 - self.level as f32 * config.scale_step).max(config.scale_floor.min(1.0))
    }

    /// The next, strictly cheaper, state; `None` once both floors are reached.
    pub fn next(self, config: &CompressionConfig) -> Option<Self> {
        if self.quality > config.quality_floor {
            let step = config.quality_step.max(1);
            return Some(Self {
                quality: self.quality.saturating_sub(step).max(config.quality_floor),
                level: self.level,
            });
        }
        if self.level < config.scale_levels() {
            return Some(Self {
                quality: config.start_quality(),
                level: self.level + 1,
            });
        }
        None
    }
}

/// Pixel size for `(width, height)` at `scale`, never below 1x1.
pub fn scaled_size(width: u32, height: u32, scale: f32) -> (u32, u32) {
    let w = ((width as f32 * scale).round() as u32).max(1);
    let h = ((height as f32 * scale).round() as u32).max(1);
    (w, h)
}

/// Encode progressively cheaper JPEGs until one fits `ceiling` bytes.
///
/// `render` produces the frame for a given resolution scale; it is called
/// once per scale level. When no state fits, the smallest encode is returned
/// with [`CeilingStatus::NotMet`].
pub fn fit_to_ceiling<F>(ceiling: usize, config: &CompressionConfig, mut render: F) -> Result<EncodedAsset>
where
    F: FnMut(f32) -> Result<RgbImage>,
{
    let mut state = SearchState::initial(config);
    let mut frame = render(state.scale(config))?;
    let mut frame_level = state.level;
    let mut best: Option<EncodedAsset> = None;

    loop {
        if frame_level != state.level {
            frame = render(state.scale(config))?;
            frame_level = state.level;
        }

        let bytes = encode_jpeg(&frame, state.quality)?;
        debug!(
            quality = state.quality,
            scale = state.scale(config),
            size = bytes.len(),
            ceiling,
            "compression attempt"
        );

        let asset = EncodedAsset {
            bytes,
            format: AssetFormat::Jpeg,
            width: frame.width(),
            height: frame.height(),
            ceiling: CeilingStatus::Met,
        };
        if asset.size() <= ceiling {
            return Ok(asset);
        }

        if best.as_ref().map_or(true, |b| asset.size() < b.size()) {
            best = Some(asset);
        }

        match state.next(config) {
            Some(next) => state = next,
            None => break,
        }
    }

    let mut best = best.ok_or_else(|| AdsynthError::Encode {
        message: "compression search produced no output".to_string(),
    })?;
    warn!(
        ceiling,
        achieved = best.size(),
        "size ceiling unreachable at quality and scale floors"
    );
    best.ceiling = CeilingStatus::NotMet { ceiling };
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn walk(config: &CompressionConfig) -> Vec<SearchState> {
        let mut states = vec![SearchState::initial(config)];
        while let Some(next) = states.last().unwrap().next(config) {
            states.push(next);
        }
        states
    }

    #[test]
    fn test_default_search_is_bounded() {
        let config = CompressionConfig::default();
        let states = walk(&config);
        // 13 quality levels (80..=20 by 5) at 6 scales (1.0..=0.5 by 0.1)
        assert_eq!(states.len(), 13 * 6);
        assert_eq!(states[0], SearchState { quality: 80, level: 0 });
        assert_eq!(states[12], SearchState { quality: 20, level: 0 });
        assert_eq!(states[13], SearchState { quality: 80, level: 1 });
        let last = states.last().unwrap();
        assert_eq!(last.quality, 20);
        assert!((last.scale(&config) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_potential_strictly_decreases() {
        let config = CompressionConfig::default();
        let potential = |s: &SearchState| (10 - s.level as i64) * 1000 + s.quality as i64;
        let states = walk(&config);
        for pair in states.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(b.level > a.level || (b.level == a.level && b.quality < a.quality));
            assert!(potential(b) < potential(a));
        }
    }

    #[test]
    fn test_uneven_step_clamps_to_floor() {
        let config = CompressionConfig {
            initial_quality: 80,
            quality_step: 25,
            quality_floor: 20,
            ..Default::default()
        };
        let qualities: Vec<u8> = walk(&config)
            .iter()
            .take_while(|s| s.level == 0)
            .map(|s| s.quality)
            .collect();
        assert_eq!(qualities, vec![80, 55, 30, 20]);
    }

    #[test]
    fn test_validate() {
        assert!(CompressionConfig::default().validate().is_ok());
        let bad = CompressionConfig {
            quality_floor: 90,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = CompressionConfig {
            scale_step: 0.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_fit_stops_at_first_fitting_attempt() {
        let config = CompressionConfig::default();
        let mut renders = 0;
        let asset = fit_to_ceiling(1_000_000, &config, |scale| {
            renders += 1;
            let (w, h) = scaled_size(64, 32, scale);
            Ok(RgbImage::from_pixel(w, h, Rgb([10, 20, 200])))
        })
        .unwrap();
        assert_eq!(renders, 1);
        assert_eq!((asset.width, asset.height), (64, 32));
        assert_eq!(asset.ceiling, CeilingStatus::Met);
        assert_eq!(&asset.bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_fit_reports_unreachable_with_smallest_result() {
        let config = CompressionConfig::default();
        let mut scales = Vec::new();
        let asset = fit_to_ceiling(10, &config, |scale| {
            scales.push(scale);
            let (w, h) = scaled_size(40, 40, scale);
            Ok(RgbImage::from_fn(w, h, |x, y| {
                Rgb([(x * 37 % 256) as u8, (y * 91 % 256) as u8, ((x ^ y) * 13 % 256) as u8])
            }))
        })
        .unwrap();
        assert_eq!(scales.len(), 6);
        assert_eq!(asset.ceiling, CeilingStatus::NotMet { ceiling: 10 });
        assert!(asset.size() > 10);
        assert!(asset.width <= 40 && asset.width >= 20);
    }
}
