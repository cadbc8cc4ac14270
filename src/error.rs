use miette::Diagnostic;
use thiserror::Error;

/// Main error type for adsynth operations
#[derive(Error, Diagnostic, Debug)]
pub enum AdsynthError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(adsynth::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    /// A source image, overlay or font could not be decoded.
    #[error("Failed to decode {what}: {message}")]
    #[diagnostic(code(adsynth::decode))]
    Decode { what: String, message: String },

    #[error("Failed to encode image: {message}")]
    #[diagnostic(code(adsynth::encode))]
    Encode { message: String },

    #[error("Parse error: {message}")]
    #[diagnostic(code(adsynth::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(adsynth::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Invalid request: {message}")]
    #[diagnostic(code(adsynth::request))]
    InvalidRequest { message: String },

    /// Only raised when a caller asks for the ceiling to be enforced.
    #[error("Could not fit under {ceiling} bytes (best effort was {achieved} bytes)")]
    #[diagnostic(
        code(adsynth::ceiling),
        help("Accept the best-effort asset, raise the ceiling, or reject the source")
    )]
    SizeCeilingUnreachable { ceiling: usize, achieved: usize },
}

impl AdsynthError {
    pub(crate) fn decode(what: impl Into<String>, err: impl std::fmt::Display) -> Self {
        AdsynthError::Decode {
            what: what.into(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdsynthError>;
