//! Job inputs and encoded outputs.

use crate::error::{AdsynthError, Result};

use super::{ColourScheme, TemplateGeometry};

/// Container format of an [`EncodedAsset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetFormat {
    Jpeg,
    /// Opaque bytes returned untouched, tagged with their original MIME type.
    Passthrough(String),
}

impl AssetFormat {
    pub fn mime(&self) -> &str {
        match self {
            AssetFormat::Jpeg => "image/jpeg",
            AssetFormat::Passthrough(mime) => mime,
        }
    }

    /// Conventional file extension; `bin` for MIME types without one.
    pub fn extension(&self) -> &str {
        match self {
            AssetFormat::Jpeg => "jpg",
            AssetFormat::Passthrough(mime) => match mime.to_ascii_lowercase().as_str() {
                "video/mp4" => "mp4",
                "video/x-m4v" => "m4v",
                "video/quicktime" => "mov",
                "video/webm" => "webm",
                "image/gif" => "gif",
                "image/png" => "png",
                "image/jpeg" => "jpg",
                "image/webp" => "webp",
                _ => "bin",
            },
        }
    }
}

/// Outcome of the byte-budget search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeilingStatus {
    /// The asset fits the requested ceiling.
    Met,
    /// Quality and resolution floors were reached without fitting.
    /// The asset is the smallest result achieved.
    NotMet { ceiling: usize },
    /// No budget applied (pass-through content).
    Unbounded,
}

/// Encoded output of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedAsset {
    pub bytes: Vec<u8>,
    pub format: AssetFormat,
    /// Pixel width; 0 for pass-through content whose size is not inspected.
    pub width: u32,
    /// Pixel height; 0 for pass-through content whose size is not inspected.
    pub height: u32,
    pub ceiling: CeilingStatus,
}

impl EncodedAsset {
    /// Wrap bytes that bypass processing.
    pub fn passthrough(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            format: AssetFormat::Passthrough(mime.into()),
            width: 0,
            height: 0,
            ceiling: CeilingStatus::Unbounded,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn ceiling_met(&self) -> bool {
        !matches!(self.ceiling, CeilingStatus::NotMet { .. })
    }

    /// Turn a missed ceiling into an error, for callers that reject
    /// best-effort output.
    pub fn require_ceiling(self) -> Result<Self> {
        match self.ceiling {
            CeilingStatus::NotMet { ceiling } => Err(AdsynthError::SizeCeilingUnreachable {
                ceiling,
                achieved: self.size(),
            }),
            _ => Ok(self),
        }
    }
}

/// Source media handed to the compositor.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// Encoded still image (PNG, JPEG, WebP, ...). Decoded per job.
    Raster(Vec<u8>),
    /// Motion content. Never composited.
    Video { bytes: Vec<u8>, mime: String },
}

/// Which optional layers to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub mask: bool,
    pub crop: bool,
    pub badge: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            mask: true,
            crop: false,
            badge: true,
        }
    }
}

impl Visibility {
    pub const ALL: Self = Self {
        mask: true,
        crop: true,
        badge: true,
    };
}

/// One source rendered against one template.
#[derive(Debug, Clone)]
pub struct CompositeJob {
    pub source: Source,
    pub template: TemplateGeometry,
    pub scheme: ColourScheme,
    pub visibility: Visibility,
    /// Splash caption; falls back to the configured default when `None`.
    pub caption: Option<String>,
}

impl CompositeJob {
    pub fn new(source: Source, template: TemplateGeometry, scheme: ColourScheme) -> Self {
        Self {
            source,
            template,
            scheme,
            visibility: Visibility::default(),
            caption: None,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_ceiling() {
        let mut asset = EncodedAsset {
            bytes: vec![0; 10],
            format: AssetFormat::Jpeg,
            width: 1,
            height: 1,
            ceiling: CeilingStatus::Met,
        };
        assert!(asset.clone().require_ceiling().is_ok());

        asset.ceiling = CeilingStatus::NotMet { ceiling: 4 };
        assert!(!asset.ceiling_met());
        match asset.require_ceiling() {
            Err(AdsynthError::SizeCeilingUnreachable { ceiling, achieved }) => {
                assert_eq!(ceiling, 4);
                assert_eq!(achieved, 10);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_passthrough() {
        let asset = EncodedAsset::passthrough(vec![1, 2, 3], "video/mp4");
        assert_eq!(asset.format.mime(), "video/mp4");
        assert_eq!(asset.format.extension(), "mp4");
        assert_eq!(asset.ceiling, CeilingStatus::Unbounded);
        assert!(asset.ceiling_met());
    }

    #[test]
    fn test_passthrough_extensions() {
        let ext = |mime: &str| EncodedAsset::passthrough(Vec::new(), mime).format.extension().to_string();
        assert_eq!(ext("video/quicktime"), "mov");
        assert_eq!(ext("video/webm"), "webm");
        assert_eq!(ext("Video/MP4"), "mp4");
        assert_eq!(ext("application/octet-stream"), "bin");
        assert_eq!(AssetFormat::Jpeg.extension(), "jpg");
    }
}
