//! marcup - Main entry point

use clap::Parser;
use marcup_cli::{commands, Cli};
use marcup_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Pick up a .env file when present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Verbose flag wins; otherwise the environment decides
    let log_config = if cli.verbose {
        LogConfig::builder()
            .level(LogLevel::Debug)
            .output(LogOutput::Console)
            .log_file_prefix("marcup".to_string())
            .build()
    } else {
        LogConfig::from_env().unwrap_or_default()
    };

    // Initialize logging (the CLI still works without it)
    let _ = init_logging(&log_config);

    let result = commands::upload::run(cli.directory, cli.config, cli.site_url, cli.dry_run).await;

    if let Err(e) = result {
        error!(error = %e, "upload run failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
