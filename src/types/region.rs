//! Normalized important-region boxes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AdsynthError, Result};

/// A bounding box in normalized `0.0..=1.0` image coordinates.
///
/// Detection services usually report boxes on a 0-1000 grid; use
/// [`Region::from_permille`] for those.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub y_min: f32,
    pub x_min: f32,
    pub y_max: f32,
    pub x_max: f32,
}

impl Region {
    pub const fn new(y_min: f32, x_min: f32, y_max: f32, x_max: f32) -> Self {
        Self {
            y_min,
            x_min,
            y_max,
            x_max,
        }
    }

    /// The whole image.
    pub const FULL: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Build a region from 0-1000 coordinates.
    pub fn from_permille(y_min: f32, x_min: f32, y_max: f32, x_max: f32) -> Self {
        Self::new(y_min / 1000.0, x_min / 1000.0, y_max / 1000.0, x_max / 1000.0)
    }

    /// Centroid `(x, y)` of the part of the region that lies inside the image.
    ///
    /// Returns `None` for degenerate regions: non-finite coordinates, zero or
    /// negative area, or no overlap with the unit square.
    pub fn centroid(&self) -> Option<(f32, f32)> {
        let coords = [self.y_min, self.x_min, self.y_max, self.x_max];
        if coords.iter().any(|c| !c.is_finite()) {
            return None;
        }

        let x0 = self.x_min.max(0.0);
        let x1 = self.x_max.min(1.0);
        let y0 = self.y_min.max(0.0);
        let y1 = self.y_max.min(1.0);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(((x0 + x1) / 2.0, (y0 + y1) / 2.0))
    }
}

/// Parses `ymin,xmin,ymax,xmax` on the 0-1000 grid.
impl FromStr for Region {
    type Err = AdsynthError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<f32> = s
            .split(',')
            .map(|p| p.trim().parse::<f32>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| AdsynthError::Parse {
                message: format!("Invalid region '{}': {}", s, e),
                help: Some("Use ymin,xmin,ymax,xmax on a 0-1000 grid".to_string()),
            })?;

        match parts.as_slice() {
            [y0, x0, y1, x1] => Ok(Self::from_permille(*y0, *x0, *y1, *x1)),
            _ => Err(AdsynthError::Parse {
                message: format!("Region needs 4 values, got {}", parts.len()),
                help: Some("Use ymin,xmin,ymax,xmax on a 0-1000 grid".to_string()),
            }),
        }
    }
}
