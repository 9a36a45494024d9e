//! Notes client - command-line access to a remote notes API.
//!
//! The library does the work; this binary wires up logging, parses the
//! command line and reports failures:
//!
//! - `config`: API origin and token storage location
//! - `auth`: persisted bearer token
//! - `api`: HTTP client for the note and auth resources
//! - `session`: note lifecycle and local state
//! - `cli`: commands and output

use clap::Parser;
use notes_manager::cli::{self, Cli};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = cli::run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
