//! Template geometry: the closed set of layouts the compositor knows how to draw.
//!
//! Every template resolves to exactly one [`Layout`] variant, chosen once when
//! the registry record is built. The variant carries the fixed pixel geometry
//! of its art assets, so nothing downstream re-derives layout from ids or names.
//!
//! # Example
//!
//! ```yaml
//! id: mt-f-3
//! name: Immersive focal window
//! width: 1126
//! height: 2436
//! layout: { category: focal-window, variant: immersive }
//! overlays:
//!   badge: badges/mt-f-3.png
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Template category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Splash,
    FocalWindow,
    InfoFeed,
    IconBanner,
    Popup,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Splash => "splash",
            Category::FocalWindow => "focal-window",
            Category::InfoFeed => "info-feed",
            Category::IconBanner => "icon-banner",
            Category::Popup => "popup",
        };
        f.write_str(name)
    }
}

/// A pixel rectangle measured on a reference canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PxRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PxRect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Map this rectangle from `reference` canvas size onto `canvas` size.
    pub fn scaled(self, reference: (u32, u32), canvas: (u32, u32)) -> PxRect {
        if reference == canvas {
            return self;
        }
        let sx = canvas.0 as f32 / reference.0 as f32;
        let sy = canvas.1 as f32 / reference.1 as f32;
        PxRect {
            x: (self.x as f32 * sx).round() as u32,
            y: (self.y as f32 * sy).round() as u32,
            w: ((self.w as f32 * sx).round() as u32).max(1),
            h: ((self.h as f32 * sy).round() as u32).max(1),
        }
    }
}

/// Image fit mode inside a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Fill the rectangle, cropping overflow.
    Cover,
    /// Fit inside the rectangle, leaving margins.
    Contain,
}

/// Whether the template mask art sits under or over the inset image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskOrder {
    Under,
    Over,
}

/// Fixed geometry for layouts that drop the source into a sub-rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsetSpec {
    /// Canvas size the rectangle was measured on.
    pub reference: (u32, u32),
    pub rect: PxRect,
    pub fit: Fit,
    pub mask_order: MaskOrder,
    /// Output size when the mask layer is not drawn.
    pub unmasked: (u32, u32),
}

/// Splash screen variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplashStyle {
    Standard,
    UpSlide,
    NonFullscreen,
}

impl SplashStyle {
    /// Caption font size in pixels.
    pub fn caption_px(self) -> f32 {
        match self {
            SplashStyle::UpSlide | SplashStyle::NonFullscreen => 58.0,
            SplashStyle::Standard => 42.0,
        }
    }

    /// Distance from the canvas bottom to the caption's bottom edge.
    pub fn caption_bottom_offset(self, canvas_height: u32) -> f32 {
        match self {
            SplashStyle::NonFullscreen => 610.0,
            SplashStyle::UpSlide => 285.0,
            SplashStyle::Standard => canvas_height as f32 * 0.0897,
        }
    }

    /// Canvas height when the mask is hidden.
    pub fn unmasked_height(self, declared: u32) -> u32 {
        match self {
            SplashStyle::NonFullscreen => 1938,
            _ => declared,
        }
    }
}

/// Focal window variants. Both share one drawing path and differ only in
/// their art set and band placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocalStyle {
    Standard,
    Immersive,
}

impl FocalStyle {
    /// Width the band geometry below was measured against.
    pub const REFERENCE_WIDTH: f32 = 1126.0;

    /// Band height on the reference width.
    pub const BAND_HEIGHT: f32 = 500.0;

    /// Asset directory holding this variant's fixed art.
    pub fn art_dir(self) -> &'static str {
        match self {
            FocalStyle::Standard => "focal-window",
            FocalStyle::Immersive => "focal-window-immersive",
        }
    }

    /// Top of the gradient band on the reference width.
    pub fn band_top(self) -> f32 {
        match self {
            FocalStyle::Standard => 750.0,
            FocalStyle::Immersive => 1600.0,
        }
    }

    /// Canvas size when the mask is hidden.
    pub fn unmasked_size(self) -> (u32, u32) {
        match self {
            FocalStyle::Standard => (1126, 900),
            FocalStyle::Immersive => (1440, 2340),
        }
    }

    /// Height of the box the badge is fitted into when the mask is shown.
    pub fn masked_badge_height(self) -> u32 {
        match self {
            FocalStyle::Standard => 900,
            FocalStyle::Immersive => 2436,
        }
    }
}

/// Badge-style layouts shared by the info-feed and icon/banner categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedStyle {
    Plain,
    HotRecommend,
    TopicBackground,
}

impl FeedStyle {
    pub fn inset(self) -> Option<InsetSpec> {
        match self {
            FeedStyle::Plain => None,
            FeedStyle::HotRecommend => Some(InsetSpec {
                reference: (1126, 2436),
                rect: PxRect::new(708, 1779, 288, 384),
                fit: Fit::Cover,
                mask_order: MaskOrder::Under,
                unmasked: (720, 960),
            }),
            FeedStyle::TopicBackground => Some(InsetSpec {
                reference: (1126, 2436),
                rect: PxRect::new(0, 0, 1126, 640),
                fit: Fit::Cover,
                mask_order: MaskOrder::Over,
                unmasked: (1126, 640),
            }),
        }
    }
}

/// Popup variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PopupStyle {
    Plain,
    Home,
    ScorePage,
    Shaped,
}

impl PopupStyle {
    /// Inset rectangles measured from the popup mask art on its 1080x1920 canvas.
    pub fn inset(self) -> Option<InsetSpec> {
        match self {
            PopupStyle::Plain => None,
            PopupStyle::Home => Some(InsetSpec {
                reference: (1080, 1920),
                rect: PxRect::new(140, 460, 800, 1000),
                fit: Fit::Cover,
                mask_order: MaskOrder::Over,
                unmasked: (800, 1000),
            }),
            PopupStyle::ScorePage => Some(InsetSpec {
                reference: (1080, 1920),
                rect: PxRect::new(90, 380, 900, 1200),
                fit: Fit::Cover,
                mask_order: MaskOrder::Over,
                unmasked: (900, 1200),
            }),
            PopupStyle::Shaped => Some(InsetSpec {
                reference: (1080, 1920),
                rect: PxRect::new(140, 420, 800, 1080),
                fit: Fit::Contain,
                mask_order: MaskOrder::Under,
                unmasked: (800, 1080),
            }),
        }
    }
}

/// Per-template layout, one variant per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", content = "variant", rename_all = "kebab-case")]
pub enum Layout {
    Splash(SplashStyle),
    FocalWindow(FocalStyle),
    InfoFeed(FeedStyle),
    IconBanner(FeedStyle),
    Popup(PopupStyle),
}

impl Layout {
    pub fn category(self) -> Category {
        match self {
            Layout::Splash(_) => Category::Splash,
            Layout::FocalWindow(_) => Category::FocalWindow,
            Layout::InfoFeed(_) => Category::InfoFeed,
            Layout::IconBanner(_) => Category::IconBanner,
            Layout::Popup(_) => Category::Popup,
        }
    }

    /// Inset geometry, for the layouts that have one.
    pub fn inset(self) -> Option<InsetSpec> {
        match self {
            Layout::InfoFeed(style) | Layout::IconBanner(style) => style.inset(),
            Layout::Popup(style) => style.inset(),
            Layout::Splash(_) | Layout::FocalWindow(_) => None,
        }
    }
}

/// Optional per-template overlay art, addressed by asset key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overlays {
    pub mask: Option<String>,
    pub crop_guide: Option<String>,
    pub badge: Option<String>,
}

/// A read-only snapshot of one template registry record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateGeometry {
    /// Registry id. Manifest entries take it from their map key.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Declared output width with the mask layer shown.
    pub width: u32,
    /// Declared output height with the mask layer shown.
    pub height: u32,
    pub layout: Layout,
    #[serde(default)]
    pub overlays: Overlays,
}

impl TemplateGeometry {
    pub fn new(id: impl Into<String>, width: u32, height: u32, layout: Layout) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            width,
            height,
            layout,
            overlays: Overlays::default(),
        }
    }

    pub fn category(&self) -> Category {
        self.layout.category()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_overlays(mut self, overlays: Overlays) -> Self {
        self.overlays = overlays;
        self
    }
}

/// The stock template set.
pub struct BuiltinTemplates;

impl BuiltinTemplates {
    /// Get a builtin template by id.
    pub fn get(id: &str) -> Option<TemplateGeometry> {
        Self::all().into_iter().find(|t| t.id == id)
    }

    /// All builtin templates, in registry order.
    pub fn all() -> Vec<TemplateGeometry> {
        use FeedStyle as F;
        use Layout as L;

        let rows: [(&str, &str, Layout); 30] = [
            ("mt-s-1", "Dynamic splash", L::Splash(SplashStyle::Standard)),
            ("mt-s-2", "Swipe-up splash", L::Splash(SplashStyle::UpSlide)),
            ("mt-s-3", "Twist splash", L::Splash(SplashStyle::Standard)),
            ("mt-s-4", "Bubble splash", L::Splash(SplashStyle::Standard)),
            ("mt-s-5", "Non-fullscreen splash", L::Splash(SplashStyle::NonFullscreen)),
            ("mt-f-1", "Dynamic focal window", L::FocalWindow(FocalStyle::Standard)),
            ("mt-f-2", "Static focal window", L::FocalWindow(FocalStyle::Standard)),
            ("mt-f-3", "Immersive focal window", L::FocalWindow(FocalStyle::Immersive)),
            ("mt-fe-1", "Recipe feed card", L::InfoFeed(F::Plain)),
            ("mt-ib-1", "Hot recommend #3", L::IconBanner(F::HotRecommend)),
            ("mt-ib-2", "Trending word #4", L::IconBanner(F::Plain)),
            ("mt-ib-3", "Topic page background", L::IconBanner(F::TopicBackground)),
            ("mt-ib-4", "Topic page banner", L::IconBanner(F::Plain)),
            ("mt-p-1", "Score page popup", L::Popup(PopupStyle::ScorePage)),
            ("mt-p-2", "Home popup", L::Popup(PopupStyle::Home)),
            ("mt-p-3", "Home popup (shaped)", L::Popup(PopupStyle::Shaped)),
            ("my-s-1", "Dynamic splash", L::Splash(SplashStyle::Standard)),
            ("my-s-2", "Swipe-up splash", L::Splash(SplashStyle::UpSlide)),
            ("my-s-3", "Twist splash", L::Splash(SplashStyle::Standard)),
            ("my-s-4", "Bubble splash", L::Splash(SplashStyle::Standard)),
            ("my-f-1", "Dynamic focal window", L::FocalWindow(FocalStyle::Standard)),
            ("my-f-2", "Static focal window", L::FocalWindow(FocalStyle::Standard)),
            ("my-p-1", "Featured popup", L::Popup(PopupStyle::Home)),
            ("my-ib-1", "Toolbox top banner", L::IconBanner(F::Plain)),
            ("wk-s-1", "Dynamic splash", L::Splash(SplashStyle::Standard)),
            ("wk-s-2", "Swipe-up splash", L::Splash(SplashStyle::UpSlide)),
            ("wk-s-3", "Twist splash", L::Splash(SplashStyle::Standard)),
            ("wk-s-4", "Bubble splash", L::Splash(SplashStyle::Standard)),
            ("wk-f-1", "Dynamic focal window", L::FocalWindow(FocalStyle::Standard)),
            ("wk-f-2", "Static focal window", L::FocalWindow(FocalStyle::Standard)),
        ];

        rows.into_iter()
            .map(|(id, name, layout)| {
                let (width, height) = default_size(layout);
                let overlays = Overlays {
                    mask: Some(format!("masks/{id}.png")),
                    crop_guide: matches!(layout, Layout::Splash(_))
                        .then(|| format!("crops/{id}.png")),
                    badge: Some(format!("badges/{id}.png")),
                };
                TemplateGeometry::new(id, width, height, layout)
                    .with_name(name)
                    .with_overlays(overlays)
            })
            .collect()
    }
}

/// Declared output size for a layout.
fn default_size(layout: Layout) -> (u32, u32) {
    if let Some(inset) = layout.inset() {
        return inset.reference;
    }
    match layout.category() {
        Category::Splash => (1440, 2340),
        Category::FocalWindow => (1126, 2436),
        Category::InfoFeed | Category::IconBanner | Category::Popup => (1080, 1920),
    }
}
