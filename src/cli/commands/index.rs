//! Index command - build or update configured indexes

use crate::cli::output::{self, colors, format_duration};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::UpdateStats;
use clap::Args;
use serde::Serialize;

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Names of the indexes to update (from the `[indexes]` config table)
    pub names: Vec<String>,

    /// Update every configured index
    #[arg(long, short = 'a', conflicts_with = "names")]
    pub all: bool,
}

/// Failed update of one index
#[derive(Debug, Serialize)]
pub struct IndexFailure {
    pub name: String,
    pub error: String,
}

/// Indexing result response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub updated: Vec<UpdateStats>,
    pub failed: Vec<IndexFailure>,
}

/// Execute the index command
///
/// Indexes are updated one after another; a failure is reported and
/// the remaining indexes are still updated.
pub fn execute(
    args: IndexArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let names: Vec<String> = if args.all {
        services.config.indexes.keys().cloned().collect()
    } else {
        args.names
    };

    if names.is_empty() {
        let configured: Vec<&str> = services.config.indexes.keys().map(String::as_str).collect();
        return Err(if configured.is_empty() {
            "No indexes configured. Add name = \"/path\" entries to the [indexes] table \
             of your config file."
                .to_string()
        } else {
            format!(
                "Specify index names or --all. Configured indexes: {}",
                configured.join(", ")
            )
        }
        .into());
    }

    // Unknown names are a usage error before any work starts
    let requests = names
        .iter()
        .map(|name| services.update_request(name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut response = IndexResponse {
        updated: Vec::new(),
        failed: Vec::new(),
    };

    for request in &requests {
        if output::is_human(format) {
            eprintln!(
                "Indexing {} from {}...",
                colors::index_name(&request.name),
                colors::file_path(&request.root.display().to_string())
            );
        }

        match services.builder.update(request, services.embedder.as_ref()) {
            Ok(stats) => {
                if output::is_human(format) {
                    print_stats(&stats);
                }
                response.updated.push(stats);
            }
            Err(e) => {
                if output::is_human(format) {
                    output::print_error(&format!("{}: {e}", request.name));
                }
                response.failed.push(IndexFailure {
                    name: request.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    if format == OutputFormat::Json {
        output::print_json(&response)?;
    }

    if !response.failed.is_empty() {
        return Err(format!(
            "{} of {} index updates failed",
            response.failed.len(),
            requests.len()
        )
        .into());
    }

    Ok(())
}

fn print_stats(stats: &UpdateStats) {
    let duration = format_duration(stats.duration_ms as f64 / 1000.0);

    if stats.skipped {
        println!(
            "{} {} is up to date ({} files, {} chunks) in {}",
            colors::success("Unchanged:"),
            colors::index_name(&stats.name),
            colors::number(&stats.files.to_string()),
            colors::number(&stats.chunks.to_string()),
            colors::number(&duration)
        );
    } else {
        println!(
            "{} {}: {} files, {} chunks ({} embedded, {} reused) in {}",
            colors::success("Indexed"),
            colors::index_name(&stats.name),
            colors::number(&stats.files.to_string()),
            colors::number(&stats.chunks.to_string()),
            colors::number(&stats.embedded.to_string()),
            colors::number(&stats.reused.to_string()),
            colors::number(&duration)
        );
    }
}
