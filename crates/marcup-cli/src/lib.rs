//! marcup CLI Library
//!
//! Batch uploader that attaches a directory of files to a single MARC record.
//!
//! # Overview
//!
//! For every regular file under an input directory, marcup:
//!
//! - **Authorization**: requests a pre-signed upload grant from the storage
//!   service (`api`)
//! - **Upload**: posts the file to the granted object-store URL (`api`)
//! - **Verification**: compares the local MD5 digest against the ETag the
//!   store reports (`pipeline`)
//! - **Linking**: appends an FFT datafield for every verified file to one
//!   aggregate MARCXML record (`marc`)
//! - **Publishing**: writes a local `export_<dir>.xml` copy and submits the
//!   record to the record-management API (`publish`)
//!
//! Processing is strictly sequential and best-effort: a file that fails any
//! step is skipped with a reported reason and the run continues.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod marc;
pub mod pipeline;
pub mod progress;
pub mod publish;

// Re-export commonly used types
pub use config::Config;
pub use error::{CliError, Result};
pub use marc::Record;

use clap::Parser;
use std::path::PathBuf;

/// marcup - upload a directory of files into a single MARC record
#[derive(Parser, Debug)]
#[command(name = "marcup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing the files to upload
    pub directory: PathBuf,

    /// Path to the configuration file (defaults to ./marcup.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Record service base URL (overrides configuration)
    #[arg(long)]
    pub site_url: Option<String>,

    /// List the files that would be uploaded without contacting the service
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
