//! Error types for the shortcut library.
//!
//! Codec failures carry the byte offset where parsing stopped, since the
//! shortcuts format has no length prefixes and a single bad byte
//! desynchronizes everything after it.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for shortcut operations.
#[derive(Debug, Error)]
pub enum ShortcutError {
    // Codec errors
    #[error("Malformed shortcuts data at byte {offset}: {message}")]
    Format { offset: usize, message: String },

    #[error("Failed to encode shortcuts data: {message}")]
    Encode { message: String },

    // App bundle errors
    #[error("App not found: {0}")]
    BundleNotFound(PathBuf),

    #[error("Not a valid macOS app bundle: {0}")]
    NotAnAppBundle(PathBuf),

    #[error("App metadata unreadable at {path:?}: {message}")]
    MetadataMissing { path: PathBuf, message: String },

    // Icon conversion errors
    #[error("Icon conversion failed: {message}")]
    IconConversion { message: String },

    // Steam installation errors
    #[error("No Steam user found: {message}")]
    NoSteamUserFound { message: String },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for shortcut operations.
pub type Result<T> = std::result::Result<T, ShortcutError>;

impl From<std::io::Error> for ShortcutError {
    fn from(err: std::io::Error) -> Self {
        ShortcutError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl ShortcutError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        ShortcutError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a codec error at a byte offset.
    pub fn format_at(offset: usize, message: impl Into<String>) -> Self {
        ShortcutError::Format {
            offset,
            message: message.into(),
        }
    }

    /// True for codec-level failures where the caller's recourse is
    /// starting from a fresh database.
    pub fn is_format_error(&self) -> bool {
        matches!(self, ShortcutError::Format { .. })
    }
}
