//! Audit trail of administrative changes
//!
//! Each saved configuration change or cache clear becomes one JSON line in
//! `<state_dir>/audit.log`:
//!
//! ```text
//! {"at":"2026-03-14T09:26:53Z","event":"cache.cleared","data":{"dir":"...","removed":2}}
//! ```

use crate::config::{Config, ConfigManager};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Something worth recording
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum AuditEvent<'a> {
    #[serde(rename = "config.saved")]
    ConfigSaved(ConfigChange<'a>),
    #[serde(rename = "cache.cleared")]
    CacheCleared { dir: String, removed: usize },
}

/// What a saved configuration changed
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ConfigChange<'a> {
    /// A stylesheet entry was added, removed or toggled
    Entry { action: &'a str, handle: &'a str },
    /// A `config set` key
    Setting { key: &'a str, value: &'a str },
}

#[derive(Serialize)]
struct Record<'a> {
    at: DateTime<Utc>,
    #[serde(flatten)]
    event: &'a AuditEvent<'a>,
}

/// Appends [`AuditEvent`]s to the audit log when enabled in config
pub struct AuditLog {
    path: Option<PathBuf>,
}

impl AuditLog {
    pub fn new(config: &Config) -> Self {
        Self {
            path: config
                .general
                .audit_log
                .then(|| ConfigManager::audit_log_path(config)),
        }
    }

    /// Record `event`. Failures are only warned about, since the change
    /// being recorded has already happened.
    pub async fn record(&self, event: AuditEvent<'_>) {
        let Some(path) = &self.path else {
            return;
        };

        let record = Record {
            at: Utc::now(),
            event: &event,
        };
        let line = match serde_json::to_string(&record) {
            Ok(json) => json + "\n",
            Err(e) => {
                warn!("Failed to serialize audit event: {}", e);
                return;
            }
        };

        if let Err(e) = append_line(path, &line).await {
            warn!("Failed to write audit log {}: {}", path.display(), e);
        }
    }
}

async fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await
}
