//! Render command - run a render pass against a registry file

use crate::cache::LayerCache;
use crate::cli::args::{OutputFormat, RenderArgs};
use crate::config::{Config, ConfigManager};
use crate::error::LayeredResult;
use crate::registry::StyleQueue;
use crate::render::{render, RenderReport};
use crate::snapshot::SnapshotStore;
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;
use tracing::warn;

/// Execute the render command
pub async fn execute(args: RenderArgs, config: &Config) -> LayeredResult<()> {
    let mut registry = StyleQueue::load(&args.registry)?;

    let cache = LayerCache::from_config(config);
    if let Err(e) = cache.init() {
        // Each entry reports its own write failure below
        warn!("{}", e);
    }

    let snapshot = if args.no_snapshot {
        None
    } else {
        Some(SnapshotStore::new(ConfigManager::snapshot_path(config)))
    };

    let report = render(config, &cache, &mut registry, snapshot.as_ref());

    match args.format {
        OutputFormat::Table => print_table(&report, &registry),
        OutputFormat::Json => print_json(&report, &registry)?,
        OutputFormat::Plain => print_plain(&registry),
    }

    Ok(())
}

fn print_table(report: &RenderReport, registry: &StyleQueue) {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "Render");

    for handle in &report.dequeued {
        ui::step_info(&ctx, &format!("Dequeued {}", handle));
    }
    for layered in &report.layered {
        let state = if layered.regenerated {
            "regenerated"
        } else {
            "cached"
        };
        ui::step_ok_detail(
            &ctx,
            &format!("{} -> {}", layered.handle, layered.layered_handle),
            state,
        );
    }
    for skipped in &report.skipped {
        ui::step_warn_hint(&ctx, &format!("Skipped {}", skipped.handle), &skipped.reason);
    }

    println!();
    println!(
        "{:<36} {:<12} {}",
        style("HANDLE").bold(),
        style("VERSION").bold(),
        style("SOURCE").bold()
    );
    println!("{}", "-".repeat(80));

    let mut count = 0;
    for (handle, registered) in registry.emitted() {
        println!(
            "{:<36} {:<12} {}",
            handle,
            registered.ver.as_deref().unwrap_or("-"),
            registered.src.as_deref().unwrap_or("-")
        );
        count += 1;
    }

    println!();
    println!("{} stylesheet(s) queued", count);
}

fn print_json(report: &RenderReport, registry: &StyleQueue) -> LayeredResult<()> {
    #[derive(Serialize)]
    struct QueuedJson<'a> {
        handle: &'a str,
        src: Option<&'a str>,
        deps: &'a [String],
        ver: Option<&'a str>,
    }

    #[derive(Serialize)]
    struct RenderJson<'a> {
        report: &'a RenderReport,
        queue: Vec<QueuedJson<'a>>,
    }

    let queue = registry
        .emitted()
        .map(|(handle, s)| QueuedJson {
            handle,
            src: s.src.as_deref(),
            deps: &s.deps,
            ver: s.ver.as_deref(),
        })
        .collect();

    println!(
        "{}",
        serde_json::to_string_pretty(&RenderJson { report, queue })?
    );
    Ok(())
}

fn print_plain(registry: &StyleQueue) {
    for handle in registry.queued() {
        println!("{}", handle);
    }
}
