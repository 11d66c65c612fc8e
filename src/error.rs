//! Error types for layered-styles
//!
//! All modules use `LayeredResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for layered-styles operations
pub type LayeredResult<T> = Result<T, LayeredError>;

/// All errors that can occur in layered-styles
#[derive(Error, Debug)]
pub enum LayeredError {
    // Generation errors
    #[error("Source stylesheet not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Failed to read source stylesheet {}: {source}", .path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write cache file {}: {source}", .path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Handle {0:?} does not produce a usable cache file name")]
    InvalidHandle(String),

    // Cache directory errors
    #[error("Failed to create cache directory {}: {source}", .path.display())]
    CacheDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Configuration errors
    #[error("Invalid configuration at {}: {reason}", .path.display())]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {}: {source}", .path.display())]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid layer name: {0:?}")]
    InvalidLayerName(String),

    #[error("Stylesheet handle configured more than once: {0}")]
    DuplicateHandle(String),

    #[error("Stylesheet entry not found: {0}")]
    EntryNotFound(String),

    // Registry and snapshot errors
    #[error("Invalid style registry at {}: {reason}", .path.display())]
    RegistryInvalid { path: PathBuf, reason: String },

    #[error("Handle not present in the registered style snapshot: {0}")]
    HandleNotInSnapshot(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl LayeredError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::SourceMissing(_) => {
                Some("Use an absolute path or a path relative to site.content_dir")
            }
            Self::InvalidLayerName(_) => {
                Some("Layer names are identifiers such as plugin-styles or vendor.forms")
            }
            Self::DuplicateHandle(_) => Some("Run: layered-styles entry list"),
            Self::EntryNotFound(_) => Some("Run: layered-styles entry list"),
            Self::HandleNotInSnapshot(_) => {
                Some("Run a render pass first, then: layered-styles handles")
            }
            Self::ConfigInvalid { .. } => Some("Run: layered-styles config show"),
            _ => None,
        }
    }
}
