//! layered-styles CLI entry point
//!
//! Loads configuration and dispatches to subcommands.

use clap::Parser;
use console::style;
use layered_styles::cli::{Cli, Commands, LogFormat};
use layered_styles::config::ConfigManager;
use layered_styles::error::LayeredResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> LayeredResult<()> {
    let cli = Cli::parse();

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("layered_styles=warn"),
        1 => EnvFilter::new("layered_styles=info"),
        _ => EnvFilter::new("layered_styles=debug"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    match cli.log_format {
        LogFormat::Text => subscriber.without_time().init(),
        LogFormat::Json => subscriber.json().init(),
    }

    layered_styles::ui::init_theme();

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    debug!("Using config file {}", manager.path().display());

    if let Commands::Init(args) = cli.command {
        return layered_styles::cli::commands::init(args, &manager).await;
    }

    let config = manager.load().await?;

    match cli.command {
        Commands::Init(_) => unreachable!("Init handled above"),
        Commands::Render(args) => layered_styles::cli::commands::render(args, &config).await,
        Commands::Generate(args) => layered_styles::cli::commands::generate(args, &config).await,
        Commands::Entry(args) => {
            layered_styles::cli::commands::entry(args, &config, &manager).await
        }
        Commands::Handles(args) => layered_styles::cli::commands::handles(args, &config).await,
        Commands::Cache(args) => layered_styles::cli::commands::cache(args, &config).await,
        Commands::Config(args) => {
            layered_styles::cli::commands::config(args, &config, &manager).await
        }
    }
}
