//! Palette command implementation.
//!
//! Prints colour schemes as JSON on stdout; status lines go to stderr.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::error::{AdsynthError, Result};
use crate::extract::{bottom_colour, extract_palette_with, smart_colour};
use crate::output::{display_path, plural, Printer};
use crate::types::{Colour, ColourScheme};

use super::{read_image, GlobalArgs};

/// Extract colour schemes from an image
#[derive(Args, Debug)]
pub struct PaletteArgs {
    /// Image to sample
    #[arg(required = true)]
    pub file: PathBuf,

    /// Share of the image height sampled as the bottom band
    #[arg(long)]
    pub bottom_fraction: Option<f32>,

    /// Keep bottom colours in coverage order and only darken them
    #[arg(long)]
    pub strict: bool,

    /// Also report the single smart accent colour and the bottom edge colour
    #[arg(long)]
    pub smart: bool,
}

#[derive(Debug, Serialize)]
struct PaletteReport {
    schemes: Vec<ColourScheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    smart: Option<Colour>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bottom: Option<Colour>,
}

pub fn run(args: PaletteArgs, global: &GlobalArgs, printer: &Printer) -> Result<()> {
    let manifest = global.manifest()?;
    let image = read_image(&args.file)?;

    let fraction = args.bottom_fraction.unwrap_or(manifest.palette.bottom_fraction);
    let schemes = extract_palette_with(&image, fraction, args.strict, &manifest.palette);

    let report = PaletteReport {
        schemes,
        smart: args.smart.then(|| smart_colour(&image)),
        bottom: args.smart.then(|| bottom_colour(&image)),
    };

    printer.status(
        "Extracted",
        &format!(
            "{} from {}",
            plural(report.schemes.len(), "scheme", "schemes"),
            display_path(&args.file)
        ),
    );
    for (i, scheme) in report.schemes.iter().enumerate() {
        printer.scheme(i, scheme);
    }

    let json = serde_json::to_string_pretty(&report).map_err(|e| AdsynthError::Encode {
        message: format!("Failed to serialize palette: {}", e),
    })?;
    println!("{}", json);
    Ok(())
}
