//! Crop command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::crop::smart_crop;
use crate::error::Result;
use crate::output::{display_path, Printer};
use crate::types::Region;

use super::{file_stem, read_image, write_file, GlobalArgs};

/// Crop and resize an image to an exact size under a byte ceiling
#[derive(Args, Debug)]
pub struct CropArgs {
    /// Image to crop
    #[arg(required = true)]
    pub file: PathBuf,

    /// Target width in pixels
    #[arg(long)]
    pub width: u32,

    /// Target height in pixels
    #[arg(long)]
    pub height: u32,

    /// Byte ceiling in KiB
    #[arg(long, default_value = "200")]
    pub max_kb: usize,

    /// Important region as ymin,xmin,ymax,xmax on a 0-1000 grid
    #[arg(long)]
    pub region: Option<Region>,

    /// Fail instead of writing a best-effort result over the ceiling
    #[arg(long)]
    pub require_ceiling: bool,

    /// Output file (default: <name>-<width>x<height>.jpg)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(args: CropArgs, global: &GlobalArgs, printer: &Printer) -> Result<()> {
    let manifest = global.manifest()?;
    let image = read_image(&args.file)?;

    let ceiling = args.max_kb.saturating_mul(1024);
    let mut asset = smart_crop(
        &image,
        args.width,
        args.height,
        ceiling,
        args.region.as_ref(),
        &manifest.compression,
    )?;

    if args.require_ceiling {
        asset = asset.require_ceiling()?;
    }

    let output = args.output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "{}-{}x{}.{}",
            file_stem(&args.file),
            args.width,
            args.height,
            asset.format.extension()
        ))
    });
    write_file(&output, &asset.bytes)?;

    printer.asset("Cropped", &display_path(&args.file), &output, &asset);
    Ok(())
}
