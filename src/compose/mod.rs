//! Layer compositing.
//!
//! A [`CompositeJob`] is rendered by drawing an ordered stack of layers onto a
//! white canvas sized for its template [`Layout`], then re-encoded under the
//! byte ceiling with the same search the cropper uses.
//!
//! Layer order per category:
//!
//! | Layout        | Layers (bottom to top)                                          |
//! |---------------|-----------------------------------------------------------------|
//! | splash        | source (contain), mask, caption, crop guide                     |
//! | focal window  | source, base art, gradient band, icon fill, top art, badge      |
//! | inset (under) | mask, source (cover/contain in rect), badge                     |
//! | inset (over)  | source (cover/contain in rect), badge, mask                     |
//! | plain         | source (cover), mask, badge                                     |
//!
//! Optional layers whose asset is missing are skipped.

mod assets;
mod blend;
mod text;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::codec::{decode_raster, fit_to_ceiling, flatten, scaled_size, CompressionConfig};
use crate::error::{AdsynthError, Result};
use crate::types::{
    Colour, CompositeJob, EncodedAsset, Fit, FocalStyle, Layout, MaskOrder, PxRect, Source,
    SplashStyle, TemplateGeometry, Visibility,
};

pub use assets::{AssetStore, FsAssetStore, MemoryAssetStore};
pub use blend::{band_alpha, blend_pixel, Align};
pub use text::{load_font, text_width, LETTER_SPACING};

use assets::load_layer;
use blend::{draw_band, draw_fit, draw_full_width, draw_stretched, fill_through_mask};
use text::{draw_caption, Caption};

/// Caption shown on splash templates when a job carries none.
pub const DEFAULT_CAPTION: &str = "跳转至第三方平台";

/// Compositing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    /// Byte ceiling for composited output, in KiB.
    pub ceiling_kb: usize,
    /// Asset key of the caption font.
    pub caption_font: String,
    pub default_caption: String,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            ceiling_kb: 200,
            caption_font: "fonts/caption.ttf".to_string(),
            default_caption: DEFAULT_CAPTION.to_string(),
        }
    }
}

impl CompositeConfig {
    pub fn ceiling_bytes(&self) -> usize {
        self.ceiling_kb.saturating_mul(1024)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ceiling_kb == 0 {
            return Err(AdsynthError::Config {
                message: "composite.ceiling_kb must be positive".to_string(),
                help: Some("See the `composite` section of adsynth.yaml".to_string()),
            });
        }
        Ok(())
    }
}

/// Asset keys of the fixed focal-window art for one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocalArt {
    pub base: String,
    pub top: String,
    pub icon_mask: String,
    pub band_mask: String,
}

impl FocalArt {
    pub fn for_style(style: FocalStyle) -> Self {
        let dir = style.art_dir();
        Self {
            base: format!("{dir}/base.png"),
            top: format!("{dir}/top.png"),
            icon_mask: format!("{dir}/icon_mask.png"),
            band_mask: format!("{dir}/band_mask.png"),
        }
    }
}

/// Output canvas size for `template` under `visibility`.
pub fn canvas_size(template: &TemplateGeometry, visibility: Visibility) -> (u32, u32) {
    let declared = (template.width.max(1), template.height.max(1));
    if visibility.mask {
        return declared;
    }
    match template.layout {
        Layout::Splash(style) => (declared.0, style.unmasked_height(declared.1)),
        Layout::FocalWindow(style) => style.unmasked_size(),
        layout => layout.inset().map_or(declared, |inset| inset.unmasked),
    }
}

/// Renders jobs against one asset store.
pub struct Compositor<'a> {
    store: &'a dyn AssetStore,
    config: CompositeConfig,
    compression: CompressionConfig,
}

impl<'a> Compositor<'a> {
    pub fn new(store: &'a dyn AssetStore) -> Self {
        Self {
            store,
            config: CompositeConfig::default(),
            compression: CompressionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CompositeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_compression(mut self, compression: CompressionConfig) -> Self {
        self.compression = compression;
        self
    }

    pub fn config(&self) -> &CompositeConfig {
        &self.config
    }

    /// Render and encode `job`.
    ///
    /// Video sources are returned unchanged. A source that cannot be decoded
    /// fails this job only.
    pub fn composite(&self, job: &CompositeJob) -> Result<EncodedAsset> {
        let _span = info_span!("composite", template = %job.template.id).entered();

        let bytes = match &job.source {
            Source::Video { bytes, mime } => {
                debug!(mime = %mime, "video source, passing through");
                return Ok(EncodedAsset::passthrough(bytes.clone(), mime.clone()));
            }
            Source::Raster(bytes) => bytes,
        };

        let source = decode_raster(bytes, "source image")?;
        let canvas = self.render_canvas(&source, job)?;

        fit_to_ceiling(self.config.ceiling_bytes(), &self.compression, |scale| {
            let (w, h) = scaled_size(canvas.width(), canvas.height(), scale);
            if (w, h) == canvas.dimensions() {
                return Ok(flatten(&canvas));
            }
            Ok(flatten(&imageops::resize(&canvas, w, h, FilterType::Lanczos3)))
        })
    }

    /// Draw the full layer stack for `job` at full resolution.
    pub fn render_canvas(&self, source: &DynamicImage, job: &CompositeJob) -> Result<RgbaImage> {
        let (width, height) = canvas_size(&job.template, job.visibility);
        let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
        let source = source.to_rgba8();

        debug!(
            layout = ?job.template.layout,
            width,
            height,
            "rendering canvas"
        );

        match job.template.layout {
            Layout::Splash(style) => self.draw_splash(&mut canvas, &source, job, style)?,
            Layout::FocalWindow(style) => self.draw_focal(&mut canvas, &source, job, style)?,
            Layout::InfoFeed(_) | Layout::IconBanner(_) | Layout::Popup(_) => {
                self.draw_inset(&mut canvas, &source, job)?
            }
        }

        Ok(canvas)
    }

    fn layer(&self, key: Option<&str>, name: &str) -> Result<Option<RgbaImage>> {
        load_layer(self.store, key, name)
    }

    fn draw_splash(
        &self,
        canvas: &mut RgbaImage,
        source: &RgbaImage,
        job: &CompositeJob,
        style: SplashStyle,
    ) -> Result<()> {
        let full = full_rect(canvas);
        let overlays = &job.template.overlays;

        let align = if job.visibility.mask {
            Align::Top
        } else {
            Align::Centre
        };
        draw_fit(canvas, source, full, Fit::Contain, align);

        if job.visibility.mask {
            if let Some(mask) = self.layer(overlays.mask.as_deref(), "mask")? {
                draw_stretched(canvas, &mask, full);
            }
            self.draw_splash_caption(canvas, job, style)?;
        }

        if job.visibility.crop {
            if let Some(guide) = self.layer(overlays.crop_guide.as_deref(), "crop guide")? {
                draw_fit(canvas, &guide, full, Fit::Contain, Align::Centre);
            }
        }
        Ok(())
    }

    fn draw_splash_caption(&self, canvas: &mut RgbaImage, job: &CompositeJob, style: SplashStyle) -> Result<()> {
        let text = job.caption.as_deref().unwrap_or(&self.config.default_caption);
        if text.trim().is_empty() {
            return Ok(());
        }
        let Some(bytes) = self.store.fetch(&self.config.caption_font)? else {
            debug!(key = %self.config.caption_font, "caption font missing, skipping caption");
            return Ok(());
        };
        let font = load_font(bytes, &self.config.caption_font)?;

        let caption = Caption {
            text,
            px: style.caption_px(),
            centre_x: canvas.width() as f32 / 2.0,
            bottom_y: canvas.height() as f32 - style.caption_bottom_offset(canvas.height()),
            colour: Colour::WHITE,
        };
        draw_caption(canvas, &font, &caption);
        Ok(())
    }

    fn draw_focal(
        &self,
        canvas: &mut RgbaImage,
        source: &RgbaImage,
        job: &CompositeJob,
        style: FocalStyle,
    ) -> Result<()> {
        let full = full_rect(canvas);
        let width = canvas.width() as f32;
        let unit = width / FocalStyle::REFERENCE_WIDTH;

        if job.visibility.mask {
            draw_full_width(canvas, source);
            let art = FocalArt::for_style(style);

            if let Some(base) = self.layer(Some(&art.base), "focal base art")? {
                draw_stretched(canvas, &base, full);
            }

            let band = PxRect::new(
                0,
                (style.band_top() * unit).round() as u32,
                canvas.width(),
                ((FocalStyle::BAND_HEIGHT * unit).round() as u32).max(1),
            );
            let band_mask = self.layer(Some(&art.band_mask), "band mask")?;
            draw_band(canvas, job.scheme.gradient, band, band_mask.as_ref());

            if let Some(icon_mask) = self.layer(Some(&art.icon_mask), "icon mask")? {
                fill_through_mask(canvas, job.scheme.icon, &icon_mask, full);
            }

            if let Some(top) = self.layer(Some(&art.top), "focal top art")? {
                draw_stretched(canvas, &top, full);
            }
        } else {
            draw_stretched(canvas, source, full);
        }

        if job.visibility.badge {
            if let Some(badge) = self.layer(job.template.overlays.badge.as_deref(), "badge")? {
                let rect = if job.visibility.mask {
                    let h = (style.masked_badge_height() as f32 * unit).round() as u32;
                    PxRect::new(0, 0, canvas.width(), h.clamp(1, canvas.height()))
                } else {
                    full
                };
                draw_fit(canvas, &badge, rect, Fit::Contain, Align::Top);
            }
        }
        Ok(())
    }

    fn draw_inset(&self, canvas: &mut RgbaImage, source: &RgbaImage, job: &CompositeJob) -> Result<()> {
        let full = full_rect(canvas);
        let overlays = &job.template.overlays;
        let show_mask = job.visibility.mask;

        let (rect, fit, order) = match job.template.layout.inset() {
            Some(inset) if show_mask => (
                inset.rect.scaled(inset.reference, canvas.dimensions()),
                inset.fit,
                inset.mask_order,
            ),
            Some(inset) => (full, inset.fit, inset.mask_order),
            None => (full, Fit::Cover, MaskOrder::Over),
        };

        let mask = if show_mask {
            self.layer(overlays.mask.as_deref(), "mask")?
        } else {
            None
        };

        if let (Some(mask), MaskOrder::Under) = (&mask, order) {
            draw_stretched(canvas, mask, full);
        }

        draw_fit(canvas, source, rect, fit, Align::Centre);

        if job.visibility.badge {
            if let Some(badge) = self.layer(overlays.badge.as_deref(), "badge")? {
                let align = if show_mask { Align::Top } else { Align::Centre };
                draw_fit(canvas, &badge, rect, Fit::Contain, align);
            }
        }

        if let (Some(mask), MaskOrder::Over) = (&mask, order) {
            draw_stretched(canvas, mask, full);
        }
        Ok(())
    }
}

fn full_rect(canvas: &RgbaImage) -> PxRect {
    PxRect::new(0, 0, canvas.width(), canvas.height())
}

/// Composite `job` with default settings.
pub fn composite(job: &CompositeJob, store: &dyn AssetStore) -> Result<EncodedAsset> {
    Compositor::new(store).composite(job)
}

/// Render `job` onto its canvas with default settings, without encoding.
pub fn render_canvas(source: &DynamicImage, job: &CompositeJob, store: &dyn AssetStore) -> Result<RgbaImage> {
    Compositor::new(store).render_canvas(source, job)
}
