//! Core domain types for adsynth.
//!
//! All values here are created per request and never mutated in place:
//! - `Colour` - RGB colour values
//! - `ColourScheme` - icon/gradient colour pairs
//! - `Region` - normalized important-region boxes
//! - `TemplateGeometry` - template layouts and overlay references
//! - `CompositeJob` / `EncodedAsset` - compositor input and pipeline output

mod asset;
mod colour;
mod region;
mod scheme;
mod template;

pub use asset::{AssetFormat, CeilingStatus, CompositeJob, EncodedAsset, Source, Visibility};
pub use colour::Colour;
pub use region::Region;
pub use scheme::ColourScheme;
pub use template::{
    BuiltinTemplates, Category, FeedStyle, Fit, FocalStyle, InsetSpec, Layout, MaskOrder,
    Overlays, PopupStyle, PxRect, SplashStyle, TemplateGeometry,
};
