//! `marcup` upload command implementation
//!
//! Command-level glue: loads configuration, runs the upload pipeline over
//! the input directory, publishes the record, and reports the outcome.

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::pipeline::Uploader;
use crate::{progress, publish};
use colored::Colorize;
use std::path::PathBuf;

/// Upload a directory of files and publish the linking record
pub async fn run(
    directory: PathBuf,
    config_path: Option<PathBuf>,
    site_url: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let config = Config::load(config_path.as_deref(), site_url.as_deref())?;

    if !directory.is_dir() {
        return Err(CliError::config(format!(
            "'{}' is not a directory",
            directory.display()
        )));
    }

    let files = Uploader::discover_files(&directory)?;
    println!(
        "{} Found {} file(s) in {}",
        "→".cyan(),
        files.len(),
        directory.display()
    );

    if dry_run {
        for file in &files {
            println!("  {}", file.display());
        }
        println!("{} Dry run, nothing uploaded", "✓".green());
        return Ok(());
    }

    let api = ApiClient::new(config.site_url.clone(), config.api_token.clone())?;
    let uploader = Uploader::new(&api, &config);

    let pb = progress::create_progress_bar(files.len() as u64, "Uploading files");
    let report = uploader.process_files(&files, Some(&pb)).await?;
    pb.finish_and_clear();

    for (path, reason) in &report.skipped {
        println!("{} {} ({})", "✗".red(), path.display(), reason);
    }

    let linked_bytes: u64 = report
        .linked
        .iter()
        .filter_map(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .sum();
    println!(
        "{} {} of {} file(s) uploaded and verified ({})",
        "✓".green(),
        report.linked.len(),
        files.len(),
        progress::format_bytes(linked_bytes)
    );

    let spinner = progress::create_spinner("Publishing record...");
    let export_path = publish::publish(&api, &config, &report.record, &directory).await?;
    spinner.finish_and_clear();

    println!(
        "{} Record exported to {}",
        "✓".green().bold(),
        export_path.display()
    );

    Ok(())
}
