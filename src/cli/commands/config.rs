//! Config command - show current configuration

use crate::cli::output;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    #[serde(flatten)]
    pub config: Config,
}

/// Execute the config command
pub fn execute(
    _args: ConfigArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let xdg = XdgDirs::new();
    let response = ConfigResponse {
        config_file: xdg.config_file().display().to_string(),
        config: services.config.as_ref().clone(),
    };

    match format {
        OutputFormat::Human => {
            let config = &response.config;
            println!("Configuration:");
            println!("  config_file: {}", response.config_file);
            println!("  index_dir: {}", config.storage.index_dir.display());
            println!("  indexing:");
            println!("    chunk_size: {}", config.indexing.chunk_size);
            println!("    overlap: {}", config.indexing.overlap);
            println!("    batch_size: {}", config.indexing.batch_size);
            println!("    max_file_bytes: {}", config.indexing.max_file_bytes);
            println!("    extensions: {:?}", config.indexing.extensions);
            println!("    excluded_dirs: {:?}", config.indexing.excluded_dirs);
            println!("    include_patterns: {:?}", config.indexing.include_patterns);
            println!("    exclude_patterns: {:?}", config.indexing.exclude_patterns);
            println!("  search:");
            println!("    default_k: {}", config.search.default_k);
            println!("    max_k: {}", config.search.max_k);
            println!("    preview_lines: {}", config.search.preview_lines);
            println!("    per_index_cap: {:?}", config.search.per_index_cap);
            println!("    min_score: {:?}", config.search.min_score);
            println!("    merge_gap: {:?}", config.search.merge_gap);
            println!("  embedding:");
            println!("    provider: {}", config.embedding.provider);
            println!("    model: {}", config.embedding.model);
            println!("    dimension: {}", config.embedding.dimension);
            println!("  indexes:");
            if config.indexes.is_empty() {
                println!("    (none)");
            }
            for (name, root) in &config.indexes {
                println!("    {}: {}", name, root.display());
            }
        }
        OutputFormat::Json => output::print_json(&response)?,
    }

    Ok(())
}
