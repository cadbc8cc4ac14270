//! Project manifest (adsynth.yaml) parsing.
//!
//! The manifest holds the tuning of every pipeline stage plus extra or
//! overriding template records. Every field has a default, so an empty file
//! (or no file at all) gives the stock behaviour.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codec::CompressionConfig;
use crate::compose::{CompositeConfig, FsAssetStore};
use crate::error::{AdsynthError, Result};
use crate::extract::PaletteConfig;
use crate::types::{BuiltinTemplates, TemplateGeometry};

/// Name of the manifest file looked up in a project directory.
pub const MANIFEST_FILENAME: &str = "adsynth.yaml";

/// Project manifest loaded from adsynth.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Root directory of fixed overlay art, relative to the manifest.
    #[serde(default = "default_assets")]
    pub assets: PathBuf,

    pub compression: CompressionConfig,

    pub palette: PaletteConfig,

    pub composite: CompositeConfig,

    /// Extra or overriding templates keyed by id.
    pub templates: BTreeMap<String, TemplateGeometry>,
}

fn default_assets() -> PathBuf {
    PathBuf::from("assets")
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            assets: default_assets(),
            compression: CompressionConfig::default(),
            palette: PaletteConfig::default(),
            composite: CompositeConfig::default(),
            templates: BTreeMap::new(),
        }
    }
}

impl Manifest {
    /// Load manifest from an adsynth.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AdsynthError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Load `adsynth.yaml` from `dir` if present, otherwise the defaults.
    ///
    /// Returns the manifest and whether a file was found.
    pub fn discover(dir: &Path) -> Result<(Self, bool)> {
        let path = dir.join(MANIFEST_FILENAME);
        if path.is_file() {
            Ok((Self::load(&path)?, true))
        } else {
            Ok((Self::default(), false))
        }
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut manifest: Manifest = serde_yaml::from_str(content).map_err(|e| AdsynthError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check adsynth.yaml syntax".to_string()),
        })?;

        for (id, template) in manifest.templates.iter_mut() {
            template.id = id.clone();
        }
        manifest.validate()?;
        Ok(manifest)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.compression.validate()?;
        self.palette.validate()?;
        self.composite.validate()?;

        for (id, template) in &self.templates {
            if template.width == 0 || template.height == 0 {
                return Err(AdsynthError::Config {
                    message: format!(
                        "template '{}' has a zero size ({}x{})",
                        id, template.width, template.height
                    ),
                    help: Some("Templates need a positive width and height".to_string()),
                });
            }
        }
        Ok(())
    }

    /// Look up a template, preferring manifest records over the builtins.
    pub fn template(&self, id: &str) -> Result<TemplateGeometry> {
        if let Some(template) = self.templates.get(id) {
            return Ok(template.clone());
        }
        BuiltinTemplates::get(id).ok_or_else(|| AdsynthError::InvalidRequest {
            message: format!("Unknown template '{}' (run `adsynth templates` to list them)", id),
        })
    }

    /// Builtin templates (with manifest overrides applied) followed by
    /// manifest-only templates in id order.
    pub fn all_templates(&self) -> Vec<TemplateGeometry> {
        let mut all: Vec<TemplateGeometry> = BuiltinTemplates::all()
            .into_iter()
            .map(|t| self.templates.get(&t.id).cloned().unwrap_or(t))
            .collect();

        for (id, template) in &self.templates {
            if BuiltinTemplates::get(id).is_none() {
                all.push(template.clone());
            }
        }
        all
    }

    /// Asset store rooted at `assets`, resolved against `base_dir`.
    pub fn asset_store(&self, base_dir: &Path) -> FsAssetStore {
        FsAssetStore::new(base_dir.join(&self.assets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FocalStyle, Layout};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_parse_empty_manifest() {
        let manifest = Manifest::parse("").unwrap();
        assert_eq!(manifest, Manifest::default());
        assert_eq!(manifest.assets, PathBuf::from("assets"));
        assert_eq!(manifest.compression.initial_quality, 80);
        assert_eq!(manifest.palette.scheme_count, 5);
        assert_eq!(manifest.composite.ceiling_kb, 200);
    }

    #[test]
    fn test_parse_full_manifest() {
        let yaml = r#"
assets: art
compression:
  initial_quality: 90
  quality_floor: 30
palette:
  bottom_fraction: 0.1
  strict_darken_factor: 3.0
composite:
  ceiling_kb: 150
  caption_font: fonts/bold.ttf
templates:
  brand-focal:
    name: Brand focal window
    width: 1126
    height: 2436
    layout: { category: focal-window, variant: standard }
    overlays:
      badge: badges/brand.png
"#;
        let manifest = Manifest::parse(yaml).unwrap();

        assert_eq!(manifest.assets, PathBuf::from("art"));
        assert_eq!(manifest.compression.initial_quality, 90);
        assert_eq!(manifest.compression.quality_step, 5);
        assert_eq!(manifest.palette.bottom_fraction, 0.1);
        assert_eq!(manifest.palette.strict_darken_factor, 3.0);
        assert_eq!(manifest.composite.ceiling_bytes(), 150 * 1024);
        assert_eq!(manifest.composite.caption_font, "fonts/bold.ttf");

        let t = manifest.template("brand-focal").unwrap();
        assert_eq!(t.id, "brand-focal");
        assert_eq!(t.layout, Layout::FocalWindow(FocalStyle::Standard));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Manifest::parse("compression:\n  quality_floor: 95\n").unwrap_err();
        assert!(matches!(err, AdsynthError::Config { .. }));

        let err = Manifest::parse("palette:\n  bottom_fraction: 0.01\n").unwrap_err();
        assert!(matches!(err, AdsynthError::Config { .. }));

        let yaml = "templates:\n  bad:\n    width: 0\n    height: 10\n    layout: { category: popup, variant: plain }\n";
        assert!(matches!(Manifest::parse(yaml).unwrap_err(), AdsynthError::Config { .. }));

        assert!(matches!(
            Manifest::parse("compression: [1, 2]").unwrap_err(),
            AdsynthError::Parse { .. }
        ));
    }

    #[test]
    fn test_template_lookup_and_override() {
        let yaml = r#"
templates:
  mt-s-1:
    width: 720
    height: 1170
    layout: { category: splash, variant: standard }
  zz-custom:
    width: 100
    height: 100
    layout: { category: popup, variant: plain }
"#;
        let manifest = Manifest::parse(yaml).unwrap();
        assert_eq!(manifest.template("mt-s-1").unwrap().width, 720);
        assert_eq!(manifest.template("mt-f-1").unwrap().width, 1126);
        assert!(manifest.template("nope").is_err());

        let all = manifest.all_templates();
        assert_eq!(all.len(), BuiltinTemplates::all().len() + 1);
        assert_eq!(all[0].width, 720);
        assert_eq!(all.last().unwrap().id, "zz-custom");
    }

    #[test]
    fn test_discover() {
        let dir = TempDir::new().unwrap();
        let (manifest, found) = Manifest::discover(dir.path()).unwrap();
        assert!(!found);
        assert_eq!(manifest, Manifest::default());

        std::fs::write(dir.path().join(MANIFEST_FILENAME), "assets: art\n").unwrap();
        let (manifest, found) = Manifest::discover(dir.path()).unwrap();
        assert!(found);
        assert_eq!(manifest.asset_store(dir.path()).root(), dir.path().join("art"));
    }
}
