pub mod completions;
pub mod compose;
pub mod crop;
pub mod init;
pub mod palette;
pub mod templates;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use image::DynamicImage;

use crate::codec::decode_raster;
use crate::error::{AdsynthError, Result};
use crate::manifest::Manifest;

/// adsynth - Creative asset synthesis for ad templates
#[derive(Parser, Debug)]
#[command(name = "adsynth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Project directory holding adsynth.yaml and the asset root
    #[arg(long, short = 'C', global = true, default_value = ".")]
    pub project: PathBuf,

    /// Increase log detail (-v debug, -vv trace)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

impl GlobalArgs {
    /// Log filter for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "adsynth=warn",
            1 => "adsynth=debug",
            _ => "adsynth=trace",
        }
    }

    /// The project manifest, or defaults when there is none.
    pub fn manifest(&self) -> Result<Manifest> {
        Manifest::discover(&self.project).map(|(manifest, _)| manifest)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract colour schemes from an image (JSON on stdout)
    Palette(palette::PaletteArgs),

    /// Crop and resize an image to a target size under a byte ceiling
    Crop(crop::CropArgs),

    /// Composite an image onto one or more templates
    Compose(compose::ComposeArgs),

    /// List known templates
    Templates(templates::TemplatesArgs),

    /// Initialize an adsynth project (generates adsynth.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Read and decode an image file.
pub(crate) fn read_image(path: &Path) -> Result<DynamicImage> {
    let bytes = read_file(path)?;
    decode_raster(&bytes, &path.display().to_string())
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| AdsynthError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Write `bytes` to `path`, creating parent directories as needed.
pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| AdsynthError::Io {
            path: parent.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }
    fs::write(path, bytes).map_err(|e| AdsynthError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write output: {}", e),
    })
}

/// Input file stem, for naming outputs.
pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}
