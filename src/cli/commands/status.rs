//! Status command - show index state and consistency

use crate::cli::output::{self, colors, format_bytes, format_relative_time};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::storage::{IndexValidator, ValidationReport};
use clap::Args;
use serde::Serialize;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Index to show (default: all configured indexes)
    pub name: Option<String>,
}

/// Status of one configured index
#[derive(Debug, Serialize)]
pub struct IndexStatusItem {
    pub name: String,
    pub root: String,
    pub built: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
}

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub index_dir: String,
    pub indexes: Vec<IndexStatusItem>,
}

/// Execute the status command
pub fn execute(
    args: StatusArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let names: Vec<String> = match args.name {
        Some(name) => {
            services.config.index_root(&name)?;
            vec![name]
        }
        None => services.config.indexes.keys().cloned().collect(),
    };

    let validator = IndexValidator::new(&services.storage);
    let mut items = Vec::with_capacity(names.len());

    for name in names {
        let root = services.config.index_root(&name)?.display().to_string();
        let item = match services.storage.store(&name).manifest() {
            Some(manifest) => IndexStatusItem {
                name: name.clone(),
                root,
                built: true,
                embedding_model: Some(manifest.embedding_model),
                updated: Some(manifest.updated),
                validation: Some(validator.validate_index(&name)?),
            },
            None => IndexStatusItem {
                name: name.clone(),
                root,
                built: false,
                embedding_model: None,
                updated: None,
                validation: None,
            },
        };
        items.push(item);
    }

    let response = StatusResponse {
        index_dir: services.storage.base_dir().display().to_string(),
        indexes: items,
    };

    match format {
        OutputFormat::Human => print_human(&response),
        OutputFormat::Json => output::print_json(&response)?,
    }

    Ok(())
}

fn print_human(response: &StatusResponse) {
    if response.indexes.is_empty() {
        println!(
            "No indexes configured. Add entries to the {} table of your config file.",
            colors::label("[indexes]")
        );
        return;
    }

    output::print_header(&format!("Indexes in {}:", response.index_dir));

    for item in &response.indexes {
        println!();
        println!(
            "{} {}",
            colors::index_name(&item.name),
            colors::dim(&format!("({})", item.root))
        );

        let Some(report) = &item.validation else {
            println!(
                "  {} run 'docvec index {}' to build it",
                colors::warning("not built:"),
                item.name
            );
            continue;
        };

        println!(
            "  files: {}  chunks: {}  size: {}",
            colors::number(&report.manifest_files.to_string()),
            colors::number(&report.manifest_chunks.to_string()),
            colors::number(&format_bytes(report.size_bytes))
        );
        if let (Some(model), Some(updated)) = (&item.embedding_model, &item.updated) {
            println!(
                "  model: {} ({} dims)  updated: {}",
                model,
                report
                    .vector_dim
                    .map_or_else(|| "-".to_string(), |d| d.to_string()),
                format_relative_time(updated)
            );
        }
        if report.is_consistent {
            println!("  {}", colors::success("consistent"));
        } else {
            println!(
                "  {} {} chunk records, {} vectors; re-run 'docvec index {}'",
                colors::error("inconsistent:"),
                report.chunk_records,
                report.embedding_vectors,
                item.name
            );
        }
    }
}
