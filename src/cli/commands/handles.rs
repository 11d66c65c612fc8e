//! Handles command - show the registered style snapshot

use crate::cli::args::{HandlesArgs, OutputFormat};
use crate::config::{Config, ConfigManager};
use crate::error::LayeredResult;
use crate::snapshot::SnapshotStore;
use crate::ui::{self, UiContext};
use console::style;

/// Execute the handles command
pub async fn execute(args: HandlesArgs, config: &Config) -> LayeredResult<()> {
    let snapshot = SnapshotStore::new(ConfigManager::snapshot_path(config)).load()?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Plain => {
            for handle in snapshot.keys() {
                println!("{}", handle);
            }
        }
        OutputFormat::Table => {
            let ctx = UiContext::detect();
            if snapshot.is_empty() {
                ui::step_info(&ctx, "No captured style handles");
                ui::remark(&ctx, "Run: layered-styles render --registry <file>");
                return Ok(());
            }

            ui::intro(&ctx, "Registered style handles");
            println!(
                "{:<36} {:<11} {}",
                style("HANDLE").bold(),
                style("CONFIGURED").bold(),
                style("SOURCE").bold()
            );
            println!("{}", "-".repeat(80));

            for (handle, entry) in &snapshot {
                let configured = if config.find_entry(handle).is_some() {
                    style("yes").green()
                } else {
                    style("-").dim()
                };
                let source = entry
                    .src_path
                    .as_deref()
                    .or(entry.src.as_deref())
                    .unwrap_or("(no source)");
                println!("{:<36} {:<11} {}", handle, configured, source);
            }

            println!();
            println!("{} handle(s)", snapshot.len());
            ui::remark(&ctx, "Add one with: layered-styles entry add <handle> --from-snapshot");
        }
    }

    Ok(())
}
