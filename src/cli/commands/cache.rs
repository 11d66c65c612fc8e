//! Cache command - inspect and clear layered stylesheets

use crate::audit::{AuditEvent, AuditLog};
use crate::cache::{CachedArtifact, LayerCache};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::Config;
use crate::error::LayeredResult;
use crate::ui::{self, UiContext};
use console::style;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> LayeredResult<()> {
    let cache = LayerCache::from_config(config);

    match args.action {
        CacheAction::List { format } => list_cache(&cache, format),
        CacheAction::Clear { yes } => clear_cache(&cache, config, yes).await,
        CacheAction::Path => {
            println!("{}", cache.dir().display());
            Ok(())
        }
    }
}

fn list_cache(cache: &LayerCache, format: OutputFormat) -> LayeredResult<()> {
    let artifacts = cache.artifacts()?;

    match format {
        OutputFormat::Table => print_cache_table(cache, &artifacts),
        OutputFormat::Json => print_cache_json(&artifacts)?,
        OutputFormat::Plain => {
            for artifact in &artifacts {
                println!("{}", artifact.file_name);
            }
        }
    }

    Ok(())
}

fn print_cache_table(cache: &LayerCache, artifacts: &[CachedArtifact]) {
    let ctx = UiContext::detect();

    if !cache.dir().exists() {
        ui::step_info(&ctx, "Cache directory does not exist yet");
        return;
    }
    if artifacts.is_empty() {
        ui::step_info(&ctx, "No cached files found");
        return;
    }

    println!(
        "{:<44} {:>10} {:<20}",
        style("FILE").bold(),
        style("SIZE").bold(),
        style("MODIFIED").bold()
    );
    println!("{}", "-".repeat(76));

    for artifact in artifacts {
        println!(
            "{:<44} {:>10} {:<20}",
            artifact.file_name,
            format_size(artifact.size),
            artifact.modified.format("%Y-%m-%d %H:%M:%S").to_string()
        );
    }

    println!();
    println!("Total: {} file(s)", artifacts.len());
}

fn print_cache_json(artifacts: &[CachedArtifact]) -> LayeredResult<()> {
    #[derive(serde::Serialize)]
    struct ArtifactJson<'a> {
        file: &'a str,
        path: String,
        size: u64,
        modified: String,
    }

    let json: Vec<ArtifactJson> = artifacts
        .iter()
        .map(|a| ArtifactJson {
            file: &a.file_name,
            path: a.path.display().to_string(),
            size: a.size,
            modified: a.modified.to_rfc3339(),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

async fn clear_cache(cache: &LayerCache, config: &Config, yes: bool) -> LayeredResult<()> {
    let ctx = UiContext::detect().with_auto_yes(yes);

    let message = format!("Delete all layered stylesheets in {}?", cache.dir().display());
    if !ui::confirm(&ctx, &message, false).await? {
        ui::step_warn_hint(&ctx, "Aborted", "Pass --yes to clear without a prompt");
        return Ok(());
    }

    let removed = cache.clear()?;
    AuditLog::new(config)
        .record(AuditEvent::CacheCleared {
            dir: cache.dir().display().to_string(),
            removed,
        })
        .await;

    ui::step_ok(&ctx, &format!("Cleared {} cached file(s)", removed));
    Ok(())
}

/// Human-readable byte count
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_formatting() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
