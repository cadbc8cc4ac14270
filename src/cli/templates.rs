//! Templates command implementation.

use clap::Args;

use crate::error::{AdsynthError, Result};
use crate::output::{plural, Printer};

use super::GlobalArgs;

/// List builtin and manifest templates
#[derive(Args, Debug)]
pub struct TemplatesArgs {
    /// Print the records as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: TemplatesArgs, global: &GlobalArgs, printer: &Printer) -> Result<()> {
    let manifest = global.manifest()?;
    let templates = manifest.all_templates();

    if args.json {
        let json = serde_json::to_string_pretty(&templates).map_err(|e| AdsynthError::Encode {
            message: format!("Failed to serialize templates: {}", e),
        })?;
        println!("{}", json);
        return Ok(());
    }

    for t in &templates {
        println!(
            "{:<10} {:<13} {:>4}x{:<4}  {}",
            t.id,
            t.category().to_string(),
            t.width,
            t.height,
            printer.dim(&t.name)
        );
    }
    printer.info("Listed", &plural(templates.len(), "template", "templates"));
    Ok(())
}
