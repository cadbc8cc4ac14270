//! Compose command implementation.
//!
//! Renders one source against one or more templates. Templates are
//! processed in parallel; one failing template does not stop the others.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::batch::{build_thread_pool, composite_all};
use crate::codec::decode_raster;
use crate::compose::Compositor;
use crate::error::{AdsynthError, Result};
use crate::extract::extract_palette_with;
use crate::output::{plural, Printer};
use crate::types::{Colour, ColourScheme, CompositeJob, Source, Visibility};

use super::{file_stem, read_file, write_file, GlobalArgs};

/// Composite an image onto templates
#[derive(Args, Debug)]
pub struct ComposeArgs {
    /// Source image (or video, which is copied through unchanged)
    #[arg(required = true)]
    pub file: PathBuf,

    /// Template id (repeat for several)
    #[arg(long = "template", short, required = true)]
    pub templates: Vec<String>,

    /// Icon colour (#RRGGBB); extracted from the source when omitted
    #[arg(long)]
    pub icon: Option<Colour>,

    /// Gradient band colour (#RRGGBB); derived from --icon, or extracted, when omitted
    #[arg(long)]
    pub gradient: Option<Colour>,

    /// Which extracted scheme to use
    #[arg(long, default_value = "0")]
    pub scheme: usize,

    /// Extract the gradient colour in strict-dominance mode
    #[arg(long)]
    pub strict: bool,

    /// Hide the template mask
    #[arg(long)]
    pub no_mask: bool,

    /// Show the crop guide
    #[arg(long)]
    pub crop_guide: bool,

    /// Hide the badge
    #[arg(long)]
    pub no_badge: bool,

    /// Splash caption text
    #[arg(long)]
    pub caption: Option<String>,

    /// Output directory
    #[arg(long, short, default_value = "dist")]
    pub output: PathBuf,

    /// Worker threads (default: one per core)
    #[arg(long, short)]
    pub jobs: Option<usize>,
}

/// MIME type for a video file extension.
fn video_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "mp4" | "m4v" => Some("video/mp4"),
        "mov" => Some("video/quicktime"),
        "webm" => Some("video/webm"),
        _ => None,
    }
}

pub fn run(args: ComposeArgs, global: &GlobalArgs, printer: &Printer) -> Result<()> {
    let manifest = global.manifest()?;
    let bytes = read_file(&args.file)?;

    let (source, scheme) = match video_mime(&args.file) {
        Some(mime) => {
            let scheme = match (args.icon, args.gradient) {
                (Some(icon), Some(gradient)) => ColourScheme::new(icon, gradient),
                (Some(icon), None) => ColourScheme::from_base(icon),
                (None, gradient) => ColourScheme::new(Colour::WHITE, gradient.unwrap_or(Colour::BLACK)),
            };
            (
                Source::Video {
                    bytes,
                    mime: mime.to_string(),
                },
                scheme,
            )
        }
        None => {
            let scheme = match (args.icon, args.gradient) {
                (Some(icon), Some(gradient)) => ColourScheme::new(icon, gradient),
                (Some(icon), None) if !args.strict => ColourScheme::from_base(icon),
                (icon, gradient) => {
                    let image = decode_raster(&bytes, &args.file.display().to_string())?;
                    let schemes = extract_palette_with(
                        &image,
                        manifest.palette.bottom_fraction,
                        args.strict,
                        &manifest.palette,
                    );
                    let picked = schemes.get(args.scheme).copied().ok_or_else(|| AdsynthError::InvalidRequest {
                        message: format!(
                            "scheme {} requested but only {} extracted",
                            args.scheme,
                            plural(schemes.len(), "scheme was", "schemes were")
                        ),
                    })?;
                    ColourScheme::new(icon.unwrap_or(picked.icon), gradient.unwrap_or(picked.gradient))
                }
            };
            (Source::Raster(bytes), scheme)
        }
    };

    printer.scheme(args.scheme, &scheme);

    let visibility = Visibility {
        mask: !args.no_mask,
        crop: args.crop_guide,
        badge: !args.no_badge,
    };

    let jobs = args
        .templates
        .iter()
        .map(|id| {
            let mut job = CompositeJob::new(source.clone(), manifest.template(id)?, scheme)
                .with_visibility(visibility);
            if let Some(caption) = &args.caption {
                job = job.with_caption(caption.clone());
            }
            Ok(job)
        })
        .collect::<Result<Vec<_>>>()?;

    let store = manifest.asset_store(&global.project);
    let compositor = Compositor::new(&store)
        .with_config(manifest.composite.clone())
        .with_compression(manifest.compression.clone());
    let pool = build_thread_pool(args.jobs)?;
    let results = composite_all(&compositor, &jobs, &pool);

    let stem = file_stem(&args.file);
    let mut failed = 0;
    for (job, result) in jobs.iter().zip(results) {
        let id = &job.template.id;
        match result {
            Ok(asset) => {
                let path = args
                    .output
                    .join(format!("{}-{}.{}", stem, id, asset.format.extension()));
                write_file(&path, &asset.bytes)?;
                printer.asset("Composited", id, &path, &asset);
            }
            Err(e) => {
                failed += 1;
                printer.error("Failed", &format!("{}: {}", id, e));
            }
        }
    }

    if failed > 0 {
        return Err(AdsynthError::InvalidRequest {
            message: format!(
                "{} of {} failed",
                plural(failed, "template", "templates"),
                jobs.len()
            ),
        });
    }

    printer.status("Finished", &plural(jobs.len(), "asset", "assets"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_mime() {
        assert_eq!(video_mime(Path::new("a.MP4")), Some("video/mp4"));
        assert_eq!(video_mime(Path::new("a.webm")), Some("video/webm"));
        assert_eq!(video_mime(Path::new("a.png")), None);
        assert_eq!(video_mime(Path::new("noext")), None);
    }
}
