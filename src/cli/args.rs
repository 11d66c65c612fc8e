//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// layered-styles - wrap plugin stylesheets in a CSS cascade layer
///
/// Replaces configured plugin stylesheets with cached copies wrapped in
/// `@layer <name> { ... }`, so theme CSS wins without specificity fights.
#[derive(Parser, Debug)]
#[command(name = "layered-styles")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "LAYERED_STYLES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration and create the cache directory
    Init(InitArgs),

    /// Run a render pass against a registry of styles
    Render(RenderArgs),

    /// Generate the layered cache file for one stylesheet
    Generate(GenerateArgs),

    /// Manage configured stylesheets
    Entry(EntryArgs),

    /// Show style handles captured by the last render
    Handles(HandlesArgs),

    /// Manage the layered stylesheet cache
    Cache(CacheArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the render command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// JSON file describing registered styles and the output queue
    #[arg(short, long)]
    pub registry: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Do not update the registered style snapshot
    #[arg(long)]
    pub no_snapshot: bool,
}

/// Arguments for the generate command
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Style handle the cache file is named after
    pub handle: String,

    /// Source CSS file
    pub source: String,
}

/// Arguments for the entry command
#[derive(Parser, Debug)]
pub struct EntryArgs {
    #[command(subcommand)]
    pub action: EntryAction,
}

/// Entry subcommands
#[derive(Subcommand, Debug)]
pub enum EntryAction {
    /// List configured stylesheets
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Add a stylesheet
    Add {
        /// Style handle
        handle: String,

        /// Source CSS file (absolute or relative to the site)
        #[arg(required_unless_present = "from_snapshot")]
        source: Option<String>,

        /// Take the source path from the registered style snapshot
        #[arg(long, conflicts_with = "source")]
        from_snapshot: bool,

        /// Add the entry disabled
        #[arg(long)]
        disabled: bool,
    },

    /// Remove a stylesheet
    Remove {
        /// Style handle
        handle: String,
    },

    /// Enable layering for a stylesheet
    Enable {
        /// Style handle
        handle: String,
    },

    /// Disable layering for a stylesheet
    Disable {
        /// Style handle
        handle: String,
    },
}

/// Arguments for the handles command
#[derive(Parser, Debug)]
pub struct HandlesArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List cached stylesheets
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Delete every layered cache file
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the cache directory
    Path,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., layer.name)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for listings
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
