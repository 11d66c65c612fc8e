//! Config command - show or edit configuration

use crate::audit::{AuditEvent, AuditLog, ConfigChange};
use crate::cache::LayerCache;
use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{LayeredError, LayeredResult};
use crate::ui::{self, UiContext};
use std::path::PathBuf;

/// Keys accepted by `config set`
const VALID_KEYS: &[&str] = &[
    "general.audit_log",
    "general.state_dir",
    "layer.name",
    "site.url",
    "site.install_dir",
    "site.content_dir",
    "site.uploads_dir",
    "site.uploads_url",
];

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
) -> LayeredResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Set { key, value }) => set_value(manager, config, &key, &value).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> LayeredResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn set_value(
    manager: &ConfigManager,
    config: &Config,
    key: &str,
    value: &str,
) -> LayeredResult<()> {
    let ctx = UiContext::detect();

    let mut updated = match apply_value(config, key, value) {
        Ok(updated) => updated,
        Err(LayeredError::User(msg)) if msg.starts_with("Unknown config key") => {
            ui::step_error_detail(&ctx, "Unknown config key", key);
            ui::remark(&ctx, &format!("Valid keys: {}", VALID_KEYS.join(", ")));
            return Err(LayeredError::User(msg));
        }
        Err(e) => return Err(e),
    };

    updated.sanitize_for_save()?;
    manager.save(&updated).await?;

    // Cache freshness ignores the layer name
    if updated.layer.name != config.layer.name {
        let removed = LayerCache::from_config(config).clear()?;
        ui::step_info(&ctx, &format!("Cleared {} cached file(s)", removed));
    }

    AuditLog::new(&updated)
        .record(AuditEvent::ConfigSaved(ConfigChange::Setting { key, value }))
        .await;

    ui::step_ok(&ctx, &format!("Set {} = {}", key, value));
    Ok(())
}

/// Copy of `config` with the dot-separated `key` set to `value`
fn apply_value(config: &Config, key: &str, value: &str) -> LayeredResult<Config> {
    let mut config = config.clone();
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "audit_log"] => config.general.audit_log = parse_bool(value)?,
        ["general", "state_dir"] => {
            config.general.state_dir = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            }
        }

        ["layer", "name"] => config.layer.name = value.to_string(),

        ["site", "url"] => config.site.url = value.to_string(),
        ["site", "install_dir"] => config.site.install_dir = PathBuf::from(value),
        ["site", "content_dir"] => config.site.content_dir = PathBuf::from(value),
        ["site", "uploads_dir"] => config.site.uploads_dir = PathBuf::from(value),
        ["site", "uploads_url"] => config.site.uploads_url = value.to_string(),

        _ => return Err(LayeredError::User(format!("Unknown config key: {}", key))),
    }

    Ok(config)
}

fn parse_bool(value: &str) -> LayeredResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(LayeredError::User(format!(
            "Invalid boolean value: {}",
            value
        ))),
    }
}
