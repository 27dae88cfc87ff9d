//! docvec - semantic search over local document folders
//!
//! Builds incremental embedding indexes for named folders and answers
//! natural-language queries against them.
//!
//! # Examples
//!
//! ```bash
//! # Build or refresh every configured index
//! docvec index --all
//!
//! # Search two indexes
//! docvec search "quarterly planning notes" -i notes -i wiki -k 5
//!
//! # Check what is stored
//! docvec status
//!
//! # Show configuration
//! docvec show-config
//! ```

use clap::Parser;
use docvec::cli::{init_tracing, run, Cli};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
