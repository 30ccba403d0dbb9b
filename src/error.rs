use std::path::PathBuf;
use thiserror::Error;

/// Result type for segmentation operations
pub type Result<T> = std::result::Result<T, SegmentError>;

/// Fatal errors surfaced by the segmenter.
///
/// Recoverable conditions such as an unterminated block comment are not
/// errors; they are reported as [`crate::models::document::Diagnostic`]s on
/// the returned document.
#[derive(Error, Debug)]
pub enum SegmentError {
    /// Malformed grammar table or configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No grammar table is registered under this identifier
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    /// Configuration file could not be parsed
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// IO error while reading a configuration file
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SegmentError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn unknown_language(lang: impl Into<String>) -> Self {
        Self::UnknownLanguage(lang.into())
    }

    /// Whether this error belongs to the configuration class (bad table or
    /// unknown language id).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::UnknownLanguage(_) | Self::Parse { .. }
        )
    }
}
