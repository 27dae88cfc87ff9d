//! CLI adapter for docvec
//!
//! Provides the command-line interface over the indexing and search
//! services in `core/`.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!                       v
//!              +------------------+
//!              |      cli/        |
//!              | (clap adapter)   |
//!              +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// docvec - semantic search over local documents
///
/// Index folders of notes and documents, then search them by meaning.
/// Indexes are configured by name in the `[indexes]` table of the
/// config file.
#[derive(Parser, Debug)]
#[command(name = "docvec")]
#[command(version)]
#[command(about = "Semantic search over local document folders", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Config file (overrides DOCVEC_CONFIG and the XDG config file)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build or update configured indexes
    Index(commands::IndexArgs),

    /// Search indexed documents
    Search(commands::SearchArgs),

    /// Show index status and consistency
    Status(commands::StatusArgs),

    /// Delete a stored index
    Delete(commands::DeleteArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  docvec completions bash > ~/.local/share/bash-completion/completions/docvec
    ///   zsh:   docvec completions zsh > ~/.zfunc/_docvec
    ///   fish:  docvec completions fish > ~/.config/fish/completions/docvec.fish
    Completions(commands::CompletionsArgs),
}

/// Initialize logging to stderr
///
/// `DOCVEC_LOG` takes precedence over `-v` and `-q`.
pub fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("DOCVEC_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .compact()
        .init();
}

/// Run the CLI with the provided arguments
pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::core::xdg::XdgDirs;

    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let xdg = XdgDirs::new();
    xdg.log_paths();

    let config = Config::load_with_xdg(&xdg, cli.config.as_deref())?;
    config.log_config();

    let services = Services::new(config)?;

    match cli.command {
        Commands::Index(args) => commands::index::execute(args, &services, cli.format),
        Commands::Search(args) => commands::search::execute(args, &services, cli.format),
        Commands::Status(args) => commands::status::execute(args, &services, cli.format),
        Commands::Delete(args) => commands::delete::execute(args, &services, cli.format),
        Commands::ShowConfig(args) => commands::config::execute(args, &services, cli.format),
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
