//! Configuration schema for layered-styles
//!
//! Configuration is stored at `~/.config/layered-styles/config.toml`

use crate::error::{LayeredError, LayeredResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Default cascade layer wrapping every configured stylesheet
pub const DEFAULT_LAYER_NAME: &str = "plugin-styles";

/// Name of the cache directory below the uploads directory
pub const CACHE_DIR_NAME: &str = "layered-styles";

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Site filesystem and URL layout
    pub site: SiteConfig,

    /// Cascade layer settings
    pub layer: LayerConfig,

    /// Stylesheets to re-emit inside the layer
    pub stylesheets: Vec<StylesheetEntry>,
}

/// General application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable audit logging of administrative actions
    pub audit_log: bool,

    /// Directory for the handle snapshot and audit log
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            audit_log: true,
            state_dir: None,
        }
    }
}

/// Where the site lives on disk and how it is served
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public base URL of the site
    pub url: String,

    /// Installation root, the last fallback for relative sources
    pub install_dir: PathBuf,

    /// Content root, the first fallback for relative sources
    pub content_dir: PathBuf,

    /// Upload area on disk; the cache directory lives below it
    pub uploads_dir: PathBuf,

    /// Public URL of the upload area
    pub uploads_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost".to_string(),
            install_dir: PathBuf::from("."),
            content_dir: PathBuf::from("content"),
            uploads_dir: PathBuf::from("content/uploads"),
            uploads_url: "http://localhost/content/uploads".to_string(),
        }
    }
}

/// Cascade layer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Name used in the `@layer <name> { ... }` wrapper
    pub name: String,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_LAYER_NAME.to_string(),
        }
    }
}

/// A stylesheet registered by a plugin that should be layered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylesheetEntry {
    /// Handle the stylesheet is registered under
    #[serde(default)]
    pub handle: String,

    /// Path of the CSS file, absolute or relative to the site
    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub enabled: bool,
}

impl StylesheetEntry {
    pub fn new(handle: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            source: source.into(),
            enabled: true,
        }
    }

    /// Enabled with a handle; enough to remove the original registration
    pub fn dequeues(&self) -> bool {
        self.enabled && !self.handle.is_empty()
    }

    /// Enabled and fully specified; eligible for a layered replacement
    pub fn is_active(&self) -> bool {
        self.dequeues() && !self.source.is_empty()
    }

    /// Handle the layered replacement is registered under
    pub fn layered_handle(&self) -> String {
        layered_handle(&self.handle)
    }
}

/// Derive the handle of the layered replacement for `handle`
pub fn layered_handle(handle: &str) -> String {
    format!("{handle}-layered")
}

impl Config {
    /// Cache directory holding the generated layered files
    pub fn cache_dir(&self) -> PathBuf {
        self.site.uploads_dir.join(CACHE_DIR_NAME)
    }

    /// Public URL of the cache directory, without trailing slash
    pub fn cache_url(&self) -> String {
        format!(
            "{}/{}",
            self.site.uploads_url.trim_end_matches('/'),
            CACHE_DIR_NAME
        )
    }

    pub fn find_entry(&self, handle: &str) -> Option<&StylesheetEntry> {
        self.stylesheets.iter().find(|e| e.handle == handle)
    }

    pub fn find_entry_mut(&mut self, handle: &str) -> Option<&mut StylesheetEntry> {
        self.stylesheets.iter_mut().find(|e| e.handle == handle)
    }

    /// Normalize and check the settings before they are persisted.
    ///
    /// Trims handles and sources, drops rows where both are empty, rejects
    /// duplicate handles and layer names that are not valid CSS layer names.
    pub fn sanitize_for_save(&mut self) -> LayeredResult<()> {
        self.layer.name = self.layer.name.trim().to_string();
        if !is_valid_layer_name(&self.layer.name) {
            return Err(LayeredError::InvalidLayerName(self.layer.name.clone()));
        }

        for entry in &mut self.stylesheets {
            entry.handle = entry.handle.trim().to_string();
            entry.source = entry.source.trim().to_string();
        }
        self.stylesheets
            .retain(|e| !(e.handle.is_empty() && e.source.is_empty()));

        let mut seen = HashSet::new();
        for entry in &self.stylesheets {
            if !entry.handle.is_empty() && !seen.insert(entry.handle.as_str()) {
                return Err(LayeredError::DuplicateHandle(entry.handle.clone()));
            }
        }

        Ok(())
    }
}

/// Check a layer name: dot-separated CSS identifiers, e.g. `vendor.forms`
pub fn is_valid_layer_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_css_ident)
}

fn is_css_ident(segment: &str) -> bool {
    let mut chars = segment.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };

    if first == '-' {
        // "-" alone and "-<digit>" are not identifiers
        match segment.chars().nth(1) {
            Some(c) if c.is_ascii_digit() => return false,
            None => return false,
            _ => {}
        }
    } else if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
