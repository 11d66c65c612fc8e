//! Entry command - manage configured stylesheets

use crate::audit::{AuditEvent, AuditLog, ConfigChange};
use crate::cli::args::{EntryAction, EntryArgs, OutputFormat};
use crate::config::{Config, ConfigManager, StylesheetEntry};
use crate::error::{LayeredError, LayeredResult};
use crate::snapshot::SnapshotStore;
use crate::ui::{self, UiContext};
use console::style;

/// Execute the entry command
pub async fn execute(
    args: EntryArgs,
    config: &Config,
    manager: &ConfigManager,
) -> LayeredResult<()> {
    let ctx = UiContext::detect();

    let (updated, action, handle) = match args.action {
        EntryAction::List { format } => {
            list_entries(config, format)?;
            return Ok(());
        }
        EntryAction::Add {
            handle,
            source,
            from_snapshot,
            disabled,
        } => {
            let source = match source {
                Some(source) if !from_snapshot => source,
                _ => snapshot_source(config, &handle)?,
            };
            let updated = add_entry(config, &handle, &source, !disabled)?;
            (updated, "add", handle)
        }
        EntryAction::Remove { handle } => (remove_entry(config, &handle)?, "remove", handle),
        EntryAction::Enable { handle } => (set_enabled(config, &handle, true)?, "enable", handle),
        EntryAction::Disable { handle } => {
            (set_enabled(config, &handle, false)?, "disable", handle)
        }
    };

    manager.save(&updated).await?;
    AuditLog::new(&updated)
        .record(AuditEvent::ConfigSaved(ConfigChange::Entry {
            action,
            handle: &handle,
        }))
        .await;

    ui::step_ok(&ctx, &format!("Stylesheet {}: {}", past_tense(action), handle));
    Ok(())
}

fn past_tense(action: &str) -> &'static str {
    match action {
        "add" => "added",
        "remove" => "removed",
        "enable" => "enabled",
        _ => "disabled",
    }
}

/// Source path recorded for `handle` by the last render pass
fn snapshot_source(config: &Config, handle: &str) -> LayeredResult<String> {
    let snapshot = SnapshotStore::new(ConfigManager::snapshot_path(config)).load()?;
    let entry = snapshot
        .get(handle)
        .ok_or_else(|| LayeredError::HandleNotInSnapshot(handle.to_string()))?;

    entry.src_path.clone().ok_or_else(|| {
        LayeredError::User(format!(
            "{} is not served from this site; give the source path explicitly",
            handle
        ))
    })
}

fn add_entry(config: &Config, handle: &str, source: &str, enabled: bool) -> LayeredResult<Config> {
    let mut updated = config.clone();
    let mut entry = StylesheetEntry::new(handle, source);
    entry.enabled = enabled;
    updated.stylesheets.push(entry);
    updated.sanitize_for_save()?;
    Ok(updated)
}

fn remove_entry(config: &Config, handle: &str) -> LayeredResult<Config> {
    let mut updated = config.clone();
    let before = updated.stylesheets.len();
    updated.stylesheets.retain(|e| e.handle != handle);
    if updated.stylesheets.len() == before {
        return Err(LayeredError::EntryNotFound(handle.to_string()));
    }
    updated.sanitize_for_save()?;
    Ok(updated)
}

fn set_enabled(config: &Config, handle: &str, enabled: bool) -> LayeredResult<Config> {
    let mut updated = config.clone();
    updated
        .find_entry_mut(handle)
        .ok_or_else(|| LayeredError::EntryNotFound(handle.to_string()))?
        .enabled = enabled;
    updated.sanitize_for_save()?;
    Ok(updated)
}

fn list_entries(config: &Config, format: OutputFormat) -> LayeredResult<()> {
    let entries = &config.stylesheets;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(entries)?),
        OutputFormat::Plain => {
            for entry in entries {
                println!("{}", entry.handle);
            }
        }
        OutputFormat::Table => {
            let ctx = UiContext::detect();
            if entries.is_empty() {
                ui::step_info(&ctx, "No stylesheets configured");
                ui::remark(&ctx, "Add one with: layered-styles entry add <handle> <source>");
                return Ok(());
            }

            ui::intro(&ctx, &format!("Stylesheets (layer: {})", config.layer.name));
            println!(
                "{:<8} {:<32} {}",
                style("ENABLED").bold(),
                style("HANDLE").bold(),
                style("SOURCE").bold()
            );
            println!("{}", "-".repeat(80));

            for entry in entries {
                let enabled = if entry.enabled {
                    style("yes").green()
                } else {
                    style("no").dim()
                };
                println!("{:<8} {:<32} {}", enabled, entry.handle, entry.source);
            }

            println!();
            println!("{} stylesheet(s)", entries.len());
        }
    }

    Ok(())
}
