//! Delete command - remove a stored index

use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Index name
    pub name: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub name: String,
    pub deleted: bool,
}

/// Execute the delete command
///
/// Only the stored artifacts are removed; the config entry and the
/// indexed documents are left alone.
pub fn execute(
    args: DeleteArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if !args.force && format == OutputFormat::Human {
        print!(
            "Delete index '{}' and all its stored data? [y/N] ",
            colors::index_name(&args.name)
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !matches!(input.trim().to_lowercase().as_str(), "y" | "yes") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    services.storage.delete_index(&args.name)?;

    let response = DeleteResponse {
        name: args.name,
        deleted: true,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} index '{}'",
                colors::success("Deleted"),
                colors::index_name(&response.name)
            );
        }
        OutputFormat::Json => output::print_json(&response)?,
    }

    Ok(())
}
