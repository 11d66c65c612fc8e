//! Render pass: replace configured stylesheets with layered copies
//!
//! A pass runs three steps in a fixed order:
//!
//! 1. [`dequeue_original`] removes every enabled handle from the registry,
//! 2. [`enqueue_layered`] regenerates stale cache files and registers
//!    `<handle>-layered` for each,
//! 3. optionally, the registry is captured into a [`SnapshotStore`].
//!
//! Dequeueing completes before anything is enqueued, so the original and
//! its layered replacement are never emitted together and a replacement is
//! never removed by its own entry.

use crate::cache::{LayerCache, Published};
use crate::config::{is_valid_layer_name, Config, SiteConfig, StylesheetEntry};
use crate::error::LayeredError;
use crate::registry::{StyleRegistration, StyleRegistry};
use crate::snapshot::{capture, SnapshotStore};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A layered replacement that was registered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayeredStyle {
    /// Original handle from the configuration
    pub handle: String,
    /// Handle the replacement was registered under
    pub layered_handle: String,
    pub cache_path: PathBuf,
    pub url: String,
    pub version: u64,
    /// Whether the cache file was rewritten during this pass
    pub regenerated: bool,
}

/// An entry that produced no replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub handle: String,
    pub reason: String,
}

/// Summary of a render pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderReport {
    /// Handles removed from the registry
    pub dequeued: Vec<String>,
    pub layered: Vec<LayeredStyle>,
    pub skipped: Vec<SkippedEntry>,
    /// Whether the stored snapshot was rewritten
    pub snapshot_updated: bool,
}

/// Run a full pass: dequeue, enqueue, then capture the registry.
///
/// Per-entry generation failures never fail the pass; they are returned in
/// [`RenderReport::skipped`]. Only a failure to persist the snapshot is
/// logged, since the page itself is unaffected by it.
///
/// An unusable layer name leaves the registry untouched, so every original
/// stylesheet is still emitted.
pub fn render(
    config: &Config,
    cache: &LayerCache,
    registry: &mut dyn StyleRegistry,
    snapshot: Option<&SnapshotStore>,
) -> RenderReport {
    let mut report = RenderReport::default();

    if is_valid_layer_name(&config.layer.name) {
        report.dequeued = dequeue_original(&config.stylesheets, registry);
        let (layered, skipped) = enqueue_layered(config, cache, registry);
        report.layered = layered;
        report.skipped = skipped;
    } else {
        warn!(
            "Invalid layer name {:?}, leaving stylesheets unlayered",
            config.layer.name
        );
    }

    if let Some(store) = snapshot {
        let captured = capture(&registry.registered(), &config.site);
        match store.save_if_changed(&captured) {
            Ok(updated) => report.snapshot_updated = updated,
            Err(e) => warn!("Failed to save registered style snapshot: {}", e),
        }
    }

    report
}

/// Remove every enabled handle from the output queue and the registry.
///
/// Handles that were never registered are ignored. Returns the handles
/// that were actually removed.
pub fn dequeue_original(
    entries: &[StylesheetEntry],
    registry: &mut dyn StyleRegistry,
) -> Vec<String> {
    let mut removed = Vec::new();

    for entry in entries.iter().filter(|e| e.dequeues()) {
        if !registry.is_registered(&entry.handle) {
            debug!("Handle not registered, nothing to dequeue: {}", entry.handle);
            continue;
        }

        registry.dequeue(&entry.handle);
        registry.deregister(&entry.handle);
        debug!("Dequeued original stylesheet: {}", entry.handle);
        removed.push(entry.handle.clone());
    }

    removed
}

/// Generate and register the layered replacement of every active entry.
///
/// Entries whose source cannot be found, read or cached are skipped: the
/// original is already gone and no replacement is emitted for them.
pub fn enqueue_layered(
    config: &Config,
    cache: &LayerCache,
    registry: &mut dyn StyleRegistry,
) -> (Vec<LayeredStyle>, Vec<SkippedEntry>) {
    let mut layered = Vec::new();
    let mut skipped = Vec::new();

    for entry in config.stylesheets.iter().filter(|e| e.is_active()) {
        match layer_entry(config, cache, entry) {
            Ok(style) => {
                registry.enqueue(StyleRegistration {
                    handle: style.layered_handle.clone(),
                    src: style.url.clone(),
                    deps: Vec::new(),
                    ver: Some(style.version.to_string()),
                });
                layered.push(style);
            }
            Err(e) => {
                warn!("Skipping stylesheet {}: {}", entry.handle, e);
                skipped.push(SkippedEntry {
                    handle: entry.handle.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    (layered, skipped)
}

fn layer_entry(
    config: &Config,
    cache: &LayerCache,
    entry: &StylesheetEntry,
) -> Result<LayeredStyle, LayeredError> {
    let source = resolve_source(&entry.source, &config.site);
    let generation = cache.generate(&entry.handle, &source, &config.layer.name)?;
    let regenerated = generation.was_regenerated();
    let cache_path = generation.into_path();
    let Published { url, version } = cache.publish(&cache_path)?;

    Ok(LayeredStyle {
        handle: entry.handle.clone(),
        layered_handle: entry.layered_handle(),
        cache_path,
        url,
        version,
        regenerated,
    })
}

/// Resolve a configured source to a filesystem path.
///
/// Tried in order: the path as given, relative to `site.content_dir`, then
/// relative to `site.install_dir`. Falls back to the path as given when
/// none exist.
pub fn resolve_source(source: &str, site: &SiteConfig) -> PathBuf {
    let as_given = Path::new(source);
    if as_given.exists() {
        return as_given.to_path_buf();
    }

    let relative = source.trim_start_matches('/');
    for root in [&site.content_dir, &site.install_dir] {
        let candidate = root.join(relative);
        if candidate.exists() {
            debug!("Resolved {} to {}", source, candidate.display());
            return candidate;
        }
    }

    as_given.to_path_buf()
}
