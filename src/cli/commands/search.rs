//! Search command - search indexed documents

use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::search::{apply_threshold, group_by_file, merge_adjacent};
use crate::core::services::Services;
use crate::core::types::{IndexStatus, SearchHit};
use clap::Args;
use serde::Serialize;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Index to search (repeatable; default: all configured indexes)
    #[arg(long = "index", short = 'i')]
    pub indexes: Vec<String>,

    /// Maximum number of results
    #[arg(short = 'k', long = "top-k")]
    pub top_k: Option<usize>,

    /// Context lines shown around each hit
    #[arg(long)]
    pub preview_lines: Option<usize>,

    /// Maximum results taken from any one index
    #[arg(long)]
    pub per_index_cap: Option<usize>,

    /// Drop results scoring below this
    #[arg(long)]
    pub min_score: Option<f32>,

    /// Merge results from the same file at most this many lines apart
    #[arg(long)]
    pub merge_gap: Option<usize>,

    /// Only list matching files
    #[arg(long)]
    pub files_only: bool,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub total_results: usize,
    pub results: Vec<SearchHit>,
    pub indexes: Vec<IndexStatus>,
    pub duration_ms: u64,
}

/// Execute the search command
pub fn execute(
    args: SearchArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let search_config = &services.config.search;
    let top_k = args.top_k.unwrap_or(search_config.default_k);

    let mut request = services.search_request(&args.query, args.indexes, top_k);
    if let Some(preview) = args.preview_lines {
        request.preview_lines = preview;
    }
    if args.per_index_cap.is_some() {
        request.per_index_cap = args.per_index_cap;
    }

    let response = services
        .search
        .search(&request, services.embedder.as_ref())?;

    let mut hits = response.results;
    if let Some(min_score) = args.min_score.or(search_config.min_score) {
        hits = apply_threshold(hits, min_score);
    }
    if let Some(gap) = args.merge_gap.or(search_config.merge_gap) {
        hits = merge_adjacent(hits, gap, top_k);
    }

    let output = SearchOutput {
        query: response.query,
        total_results: hits.len(),
        results: hits,
        indexes: response.stats,
        duration_ms: response.duration_ms,
    };

    match format {
        OutputFormat::Human => print_human(&output, args.files_only),
        OutputFormat::Json => output::print_json(&output)?,
    }

    Ok(())
}

fn print_human(output: &SearchOutput, files_only: bool) {
    for status in output.indexes.iter().filter(|s| !s.loaded) {
        output::print_warning(&format!(
            "index '{}' skipped: {}",
            status.name,
            status.error.as_deref().unwrap_or("not loaded")
        ));
    }

    if output.results.is_empty() {
        println!("No results found for '{}'", colors::label(&output.query));
        return;
    }

    if files_only {
        for group in group_by_file(output.results.clone()) {
            println!(
                "{} {}",
                colors::file_path(&group.path),
                colors::dim(&format!("({}, {} hits)", group.index, group.hits.len()))
            );
        }
        return;
    }

    println!(
        "Found {} result(s) in {}ms:\n",
        colors::number(&output.total_results.to_string()),
        output.duration_ms
    );

    for (rank, hit) in output.results.iter().enumerate() {
        println!(
            "[{}] {}:{}-{} {} {}",
            colors::rank(&(rank + 1).to_string()),
            colors::file_path(&hit.path),
            hit.line_start,
            hit.line_end,
            colors::score(&format!("{:.4}", hit.score)),
            colors::dim(&format!("[{}]", hit.index))
        );
        for line in &hit.preview {
            let truncated = if line.chars().count() > 100 {
                format!("{}...", line.chars().take(97).collect::<String>())
            } else {
                line.clone()
            };
            println!("    {}", colors::dim(&truncated));
        }
        println!();
    }
}
