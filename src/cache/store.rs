//! Cache directory management: generate, publish, list and clear

use crate::cache::compose::{compose_layered, LayeredHeader};
use crate::cache::name::{cache_file_name, is_cache_file_name, is_temp_file_name, temp_file_name};
use crate::config::{is_valid_layer_name, Config};
use crate::error::{LayeredError, LayeredResult};
use chrono::{DateTime, Local, Utc};
use std::fs::{self, Metadata};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, info};

/// Marker written once into a new cache directory
const ACCESS_MARKER: &str = ".htaccess";
const ACCESS_MARKER_CONTENT: &str = "# Protect directory listing\nOptions -Indexes";

/// Outcome of a successful generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// Existing cache file was at least as new as the source
    Fresh(PathBuf),
    /// Cache file was (re)written from the source
    Regenerated(PathBuf),
}

impl Generation {
    pub fn path(&self) -> &Path {
        match self {
            Self::Fresh(p) | Self::Regenerated(p) => p,
        }
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            Self::Fresh(p) | Self::Regenerated(p) => p,
        }
    }

    pub fn was_regenerated(&self) -> bool {
        matches!(self, Self::Regenerated(_))
    }
}

/// Public location of a cache file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub url: String,
    /// Cache file mtime in seconds, used only for cache busting
    pub version: u64,
}

/// A file present in the cache directory
#[derive(Debug, Clone)]
pub struct CachedArtifact {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

/// The shared directory of layered stylesheets
#[derive(Debug, Clone)]
pub struct LayerCache {
    dir: PathBuf,
    base_url: String,
}

impl LayerCache {
    /// Create a cache rooted at `dir`, served from `base_url`
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            dir: dir.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Cache located below the configured uploads directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_dir(), config.cache_url())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the cache directory and its access marker if missing.
    ///
    /// Returns `true` when the directory was created.
    pub fn init(&self) -> LayeredResult<bool> {
        if self.dir.exists() {
            return Ok(false);
        }

        fs::create_dir_all(&self.dir).map_err(|e| LayeredError::CacheDirCreate {
            path: self.dir.clone(),
            source: e,
        })?;

        let marker = self.dir.join(ACCESS_MARKER);
        fs::write(&marker, ACCESS_MARKER_CONTENT)
            .map_err(|e| LayeredError::io(format!("writing {}", marker.display()), e))?;

        info!("Created cache directory {}", self.dir.display());
        Ok(true)
    }

    /// Path of the cache file for `handle`
    pub fn cache_path(&self, handle: &str) -> LayeredResult<PathBuf> {
        Ok(self.dir.join(cache_file_name(handle)?))
    }

    /// Produce the layered cache file for `handle` from `source`.
    ///
    /// The existing cache file is reused when its mtime is not older than
    /// the source's; otherwise the source is read, wrapped in
    /// `@layer <layer_name>` and written atomically. Nothing is written when
    /// the source does not exist.
    pub fn generate(
        &self,
        handle: &str,
        source: &Path,
        layer_name: &str,
    ) -> LayeredResult<Generation> {
        if !is_valid_layer_name(layer_name) {
            return Err(LayeredError::InvalidLayerName(layer_name.to_string()));
        }

        let source_meta = match fs::metadata(source) {
            Ok(meta) if meta.is_file() => meta,
            _ => return Err(LayeredError::SourceMissing(source.to_path_buf())),
        };

        let cache_path = self.cache_path(handle)?;

        if is_fresh(&source_meta, &cache_path) {
            debug!("Cache hit for {}: {}", handle, cache_path.display());
            return Ok(Generation::Fresh(cache_path));
        }

        let css = fs::read(source).map_err(|e| LayeredError::SourceRead {
            path: source.to_path_buf(),
            source: e,
        })?;

        let source_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let header = LayeredHeader {
            handle,
            generated: Local::now().naive_local(),
            source_name: &source_name,
        };
        let layered = compose_layered(&header, layer_name, &css);

        self.write_atomic(&cache_path, &layered)?;

        info!(
            "Generated {} from {} ({} bytes)",
            cache_path.display(),
            source.display(),
            layered.len()
        );
        Ok(Generation::Regenerated(cache_path))
    }

    /// Public URL and cache-busting version of a cache file
    pub fn publish(&self, cache_path: &Path) -> LayeredResult<Published> {
        let meta = fs::metadata(cache_path)
            .map_err(|e| LayeredError::io(format!("reading {}", cache_path.display()), e))?;

        let file_name = cache_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| LayeredError::User(format!("not a file: {}", cache_path.display())))?;

        Ok(Published {
            url: format!("{}/{}", self.base_url, file_name),
            version: mtime_secs(&meta),
        })
    }

    /// Delete every managed cache file, returning how many were removed.
    ///
    /// Staging files orphaned by an interrupted write are removed too, but
    /// not counted. A missing or empty directory is not an error. The access
    /// marker and any unrelated files are left alone.
    pub fn clear(&self) -> LayeredResult<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(LayeredError::io(
                    format!("listing {}", self.dir.display()),
                    e,
                ))
            }
        };

        let mut removed = 0;
        for entry in entries {
            let entry =
                entry.map_err(|e| LayeredError::io(format!("listing {}", self.dir.display()), e))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();

            let managed = is_cache_file_name(&name);
            if !(managed || is_temp_file_name(&name)) || !entry.path().is_file() {
                continue;
            }

            debug!("Removing cache file: {}", name);
            fs::remove_file(entry.path())
                .map_err(|e| LayeredError::io(format!("removing {}", entry.path().display()), e))?;
            if managed {
                removed += 1;
            }
        }

        info!("Cleared {} cache file(s) from {}", removed, self.dir.display());
        Ok(removed)
    }

    /// Stylesheets currently in the cache directory, sorted by name
    pub fn artifacts(&self) -> LayeredResult<Vec<CachedArtifact>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(LayeredError::io(
                    format!("listing {}", self.dir.display()),
                    e,
                ))
            }
        };

        let mut artifacts = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if file_name.starts_with('.') || !file_name.ends_with(".css") {
                continue;
            }

            let meta = match entry.metadata() {
                Ok(meta) if meta.is_file() => meta,
                _ => continue,
            };

            let modified = meta
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            artifacts.push(CachedArtifact {
                path,
                file_name,
                size: meta.len(),
                modified,
            });
        }

        artifacts.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(artifacts)
    }

    /// Write via a temporary file in the cache directory, then rename.
    fn write_atomic(&self, path: &Path, contents: &[u8]) -> LayeredResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| LayeredError::CacheDirCreate {
            path: self.dir.clone(),
            source: e,
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp = self.dir.join(temp_file_name(&file_name, std::process::id()));

        if let Err(e) = fs::write(&tmp, contents).and_then(|_| fs::rename(&tmp, path)) {
            let _ = fs::remove_file(&tmp);
            return Err(LayeredError::CacheWrite {
                path: path.to_path_buf(),
                source: e,
            });
        }

        Ok(())
    }
}

/// Cache is fresh iff it is a regular file and `cache.mtime >= source.mtime`
fn is_fresh(source: &Metadata, cache_path: &Path) -> bool {
    let cache_modified = match fs::metadata(cache_path) {
        Ok(meta) if meta.is_file() => match meta.modified() {
            Ok(t) => t,
            Err(_) => return false,
        },
        _ => return false,
    };

    match source.modified() {
        Ok(source_modified) => cache_modified >= source_modified,
        Err(_) => false,
    }
}

fn mtime_secs(meta: &Metadata) -> u64 {
    meta.modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
