//! Snapshot of the style registry, persisted for the `handles` listing
//!
//! Captured at the end of a render pass and written only when it differs
//! from what is already stored.

use crate::config::SiteConfig;
use crate::error::{LayeredError, LayeredResult};
use crate::registry::RegisteredStyle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One registered stylesheet as seen during the last render
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    /// Filesystem path the source maps to, when it lives on this site
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_path: Option<String>,

    pub deps: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ver: Option<String>,
}

/// Handle to snapshot entry, ordered by handle
pub type RegisteredStyleSnapshot = BTreeMap<String, SnapshotEntry>;

/// Build a snapshot from the registry's current contents
pub fn capture(
    registered: &BTreeMap<String, RegisteredStyle>,
    site: &SiteConfig,
) -> RegisteredStyleSnapshot {
    registered
        .iter()
        .map(|(handle, style)| {
            let src_path = style
                .src
                .as_deref()
                .and_then(|src| source_path_for(src, site))
                .map(|p| p.to_string_lossy().into_owned());

            (
                handle.clone(),
                SnapshotEntry {
                    src: style.src.clone(),
                    src_path,
                    deps: style.deps.clone(),
                    ver: style.ver.clone(),
                },
            )
        })
        .collect()
}

/// Map a stylesheet URL onto the site's install directory.
///
/// Absolute URLs must start with `site.url`; root-relative sources map
/// directly. Query strings and fragments are dropped. Anything else is
/// served from elsewhere and has no local path.
pub fn source_path_for(src: &str, site: &SiteConfig) -> Option<PathBuf> {
    let base = site.url.trim_end_matches('/');
    let rest = if !base.is_empty() && src.starts_with(base) {
        &src[base.len()..]
    } else if src.starts_with('/') && !src.starts_with("//") {
        src
    } else {
        return None;
    };

    if !(rest.is_empty() || rest.starts_with('/')) {
        // "https://example.com.evil/..." shares the prefix but not the host
        return None;
    }

    let rest = rest.split(['?', '#']).next().unwrap_or_default();
    let rest = rest.trim_start_matches('/');
    if rest.is_empty() {
        return None;
    }

    Some(site.install_dir.join(rest))
}

/// JSON file holding the last captured snapshot
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored snapshot, empty if none has been captured yet
    pub fn load(&self) -> LayeredResult<RegisteredStyleSnapshot> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(LayeredError::io(
                    format!("reading snapshot {}", self.path.display()),
                    e,
                ))
            }
        };

        Ok(serde_json::from_str(&content)?)
    }

    /// Persist `snapshot` unless it equals the stored one.
    ///
    /// Returns `true` if the file was written. An unreadable stored snapshot
    /// counts as different.
    pub fn save_if_changed(&self, snapshot: &RegisteredStyleSnapshot) -> LayeredResult<bool> {
        match self.load() {
            Ok(stored) if &stored == snapshot && self.path.exists() => {
                debug!("Registered style snapshot unchanged");
                return Ok(false);
            }
            Ok(_) => {}
            Err(e) => debug!("Replacing unreadable snapshot: {}", e),
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| LayeredError::io(format!("creating {}", parent.display()), e))?;
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, json).map_err(|e| {
            LayeredError::io(format!("writing snapshot {}", self.path.display()), e)
        })?;

        debug!(
            "Saved snapshot of {} registered style(s) to {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site() -> SiteConfig {
        SiteConfig {
            url: "https://example.com/".to_string(),
            install_dir: PathBuf::from("/srv/www"),
            ..SiteConfig::default()
        }
    }

    fn style(src: &str) -> RegisteredStyle {
        RegisteredStyle {
            src: Some(src.to_string()),
            deps: vec![],
            ver: Some("1.0".to_string()),
        }
    }

    #[test]
    fn maps_site_urls_to_paths() {
        let site = site();
        assert_eq!(
            source_path_for("https://example.com/content/plugins/forms/forms.css?ver=3", &site),
            Some(PathBuf::from("/srv/www/content/plugins/forms/forms.css"))
        );
        assert_eq!(
            source_path_for("/content/themes/a.css", &site),
            Some(PathBuf::from("/srv/www/content/themes/a.css"))
        );
    }

    #[test]
    fn foreign_sources_have_no_path() {
        let site = site();
        assert_eq!(source_path_for("https://cdn.example.net/a.css", &site), None);
        assert_eq!(source_path_for("//cdn.example.net/a.css", &site), None);
        assert_eq!(source_path_for("https://example.com.evil/a.css", &site), None);
        assert_eq!(source_path_for("https://example.com", &site), None);
    }

    #[test]
    fn capture_copies_registry() {
        let mut registered = BTreeMap::new();
        registered.insert("forms".to_string(), style("/content/forms.css"));
        registered.insert("inline".to_string(), RegisteredStyle::default());

        let snapshot = capture(&registered, &site());
        assert_eq!(
            snapshot["forms"].src_path.as_deref(),
            Some("/srv/www/content/forms.css")
        );
        assert_eq!(snapshot["forms"].ver.as_deref(), Some("1.0"));
        assert_eq!(snapshot["inline"], SnapshotEntry::default());
    }

    #[test]
    fn save_only_when_changed() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path().join("state").join("snapshot.json"));
        assert!(store.load().unwrap().is_empty());

        let mut registered = BTreeMap::new();
        registered.insert("forms".to_string(), style("/content/forms.css"));
        let snapshot = capture(&registered, &site());

        assert!(store.save_if_changed(&snapshot).unwrap());
        assert!(!store.save_if_changed(&snapshot).unwrap());
        assert_eq!(store.load().unwrap(), snapshot);

        registered.insert("extra".to_string(), style("/content/extra.css"));
        assert!(store.save_if_changed(&capture(&registered, &site())).unwrap());
    }

    #[test]
    fn empty_snapshot_is_persisted_once() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path().join("snapshot.json"));

        assert!(store.save_if_changed(&BTreeMap::new()).unwrap());
        assert!(!store.save_if_changed(&BTreeMap::new()).unwrap());
    }

    #[test]
    fn corrupt_snapshot_is_replaced() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("snapshot.json");
        fs::write(&path, "garbage").unwrap();

        let store = SnapshotStore::new(&path);
        assert!(store.save_if_changed(&BTreeMap::new()).unwrap());
        assert!(store.load().unwrap().is_empty());
    }
}
