//! adsynth - Creative asset synthesis for ad templates
//!
//! A library for turning a raw image into template-ready ad creatives:
//! palette extraction, content-aware cropping under a byte ceiling, and
//! layered compositing onto fixed template art.

pub mod batch;
pub mod cli;
pub mod codec;
pub mod compose;
pub mod crop;
pub mod error;
pub mod extract;
pub mod manifest;
pub mod output;
pub mod science;
pub mod types;

pub use batch::{build_thread_pool, composite_all};
pub use codec::{fit_to_ceiling, CompressionConfig};
pub use compose::{
    canvas_size, composite, render_canvas, AssetStore, CompositeConfig, Compositor, FsAssetStore,
    MemoryAssetStore,
};
pub use crop::{crop_window, smart_crop, CropWindow};
pub use error::{AdsynthError, Result};
pub use extract::{bottom_colour, extract_palette, extract_palette_with, smart_colour, PaletteConfig};
pub use manifest::Manifest;
pub use science::{aesthetic_score, darken, derive_gradient_colour, derive_icon_colour};
pub use types::{
    BuiltinTemplates, Category, CeilingStatus, Colour, ColourScheme, CompositeJob, EncodedAsset,
    Layout, Region, Source, TemplateGeometry, Visibility,
};
