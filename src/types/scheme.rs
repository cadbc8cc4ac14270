//! Icon/gradient colour pairs.

use serde::{Deserialize, Serialize};

use super::Colour;

/// A derived colour pair consumed by the focal-window compositor.
///
/// `icon` fills the icon-shape mask; `gradient` tints the background band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColourScheme {
    pub icon: Colour,
    pub gradient: Colour,
}

impl ColourScheme {
    pub const fn new(icon: Colour, gradient: Colour) -> Self {
        Self { icon, gradient }
    }

    /// Build a scheme from a single base colour, deriving the band colour
    /// with the HSB gradient rule.
    pub fn from_base(base: Colour) -> Self {
        Self::new(base, crate::science::derive_gradient_colour(base))
    }
}
