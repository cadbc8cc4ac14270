//! Init command implementation.
//!
//! Writes an `adsynth.yaml` holding every default setting, and creates the
//! asset directory layout the compositor looks in.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::error::{AdsynthError, Result};
use crate::manifest::{Manifest, MANIFEST_FILENAME};
use crate::output::{display_path, Printer};
use crate::types::FocalStyle;

/// Asset subdirectories created by `init`.
fn asset_dirs() -> Vec<String> {
    let mut dirs = vec![
        "masks".to_string(),
        "badges".to_string(),
        "crops".to_string(),
        "fonts".to_string(),
    ];
    for style in [FocalStyle::Standard, FocalStyle::Immersive] {
        dirs.push(style.art_dir().to_string());
    }
    dirs
}

/// Initialize an adsynth project by generating an adsynth.yaml manifest
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing adsynth.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    // Check for existing manifest
    if manifest_path.exists() && !args.force {
        return Err(AdsynthError::Config {
            message: format!("{} already exists", MANIFEST_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    let manifest = Manifest::default();
    let yaml = serde_yaml::to_string(&manifest).map_err(|e| AdsynthError::Encode {
        message: format!("Failed to serialize manifest: {}", e),
    })?;

    fs::create_dir_all(&args.path).map_err(|e| AdsynthError::Io {
        path: args.path.clone(),
        message: format!("Failed to create project directory: {}", e),
    })?;
    fs::write(&manifest_path, &yaml).map_err(|e| AdsynthError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    let asset_root = args.path.join(&manifest.assets);
    for dir in asset_dirs() {
        let path = asset_root.join(dir);
        fs::create_dir_all(&path).map_err(|e| AdsynthError::Io {
            path: path.clone(),
            message: format!("Failed to create asset directory: {}", e),
        })?;
    }

    printer.info("Assets", &display_path(&asset_root));
    printer.status("Created", MANIFEST_FILENAME);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Printer;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_manifest() {
        let dir = tempdir().unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };

        run(args, &Printer::new()).unwrap();

        let manifest_path = dir.path().join(MANIFEST_FILENAME);
        let manifest = Manifest::load(&manifest_path).unwrap();
        assert_eq!(manifest, Manifest::default());
        assert!(dir.path().join("assets/masks").is_dir());
        assert!(dir.path().join("assets/focal-window-immersive").is_dir());
    }

    #[test]
    fn test_init_errors_if_manifest_exists() {
        let dir = tempdir().unwrap();

        // Create existing manifest
        fs::write(dir.path().join(MANIFEST_FILENAME), "assets: art").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };

        let result = run(args, &Printer::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join(MANIFEST_FILENAME), "assets: art").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: true,
        };

        run(args, &Printer::new()).unwrap();

        let content = fs::read_to_string(dir.path().join(MANIFEST_FILENAME)).unwrap();
        assert!(content.contains("assets: assets"));
    }
}
