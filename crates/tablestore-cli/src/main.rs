//! tablestore-filter entry point
//!
//! Usage: `tablestore-filter <filter> <records.json> [config.json]`

use std::path::{Path, PathBuf};
use tablestore_cli::{exit_code, run};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize logging; stdout carries the matched records
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(filter), Some(records_path)) = (args.next(), args.next()) else {
        error!("Usage: tablestore-filter <filter> <records.json> [config.json]");
        std::process::exit(1);
    };
    let config_path = args.next().map(PathBuf::from);

    info!("tablestore-filter v{}", env!("CARGO_PKG_VERSION"));

    let stdout = std::io::stdout().lock();
    if let Err(e) = run(&filter, Path::new(&records_path), config_path.as_deref(), stdout) {
        error!("Failed to filter records: {}", e);
        std::process::exit(exit_code(&e));
    }
}
