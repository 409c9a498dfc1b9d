//! Record publishing
//!
//! Serializes the aggregate record, persists a local export copy, and
//! submits the record to the record API. The local copy always comes first:
//! a failed submission leaves the export on disk, while a failed local
//! write is fatal for the run.

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::Result;
use crate::marc::Record;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Serialize and publish the record.
///
/// Writes `export_<dirName>.xml` beside the input directory (a write
/// failure propagates), then submits the record in insert-or-replace mode.
/// Submission failures fail open: they are logged and the run completes
/// with the local export retained.
pub async fn publish(
    api: &ApiClient,
    config: &Config,
    record: &Record,
    root: &Path,
) -> Result<PathBuf> {
    let xml = record.to_xml()?;
    let export_path = export_path_for(root);

    std::fs::write(&export_path, &xml)?;
    info!(path = %export_path.display(), "record exported");

    match api.submit_record(&xml, &config.callback_email).await {
        Ok(body) => info!(response = %body.trim(), "record submitted"),
        Err(err) => {
            error!(error = %err, export = %export_path.display(), "record submission failed; local export retained");
        },
    }

    Ok(export_path)
}

/// The export file path for an input directory: `export_<dirName>.xml`
/// beside the directory.
pub fn export_path_for(root: &Path) -> PathBuf {
    let name = root
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("record");
    let parent = root
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    parent.join(format!("export_{}.xml", name))
}
