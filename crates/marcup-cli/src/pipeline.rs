//! Upload orchestration
//!
//! Drives the per-file authorize → upload → verify → link pipeline over a
//! directory tree and accumulates the aggregate record. Strictly sequential
//! and best-effort: each file's failure is contained to that file, and the
//! run never aborts early.

use crate::api::ApiClient;
use crate::config::{Config, MetadataPair};
use crate::error::{CliError, Result};
use crate::marc::{DataField, Record};
use indicatif::ProgressBar;
use marcup_common::checksum;
use reqwest::StatusCode;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

// ============================================================================
// Orchestrator Constants
// ============================================================================

/// Authorization attempts per file before the file is skipped
pub const AUTH_RETRY_LIMIT: usize = 5;

/// Filesystem housekeeping entries never uploaded
pub const EXCLUDED_FILES: &[&str] = &[".DS_Store"];

/// Files between progress log lines
pub const STATUS_LOG_INTERVAL: usize = 10;

/// Why a file was left out of the aggregate record
///
/// These are policy branches of the per-file pipeline, not run-level errors;
/// every variant leaves the rest of the run untouched.
#[derive(Debug)]
pub enum SkipReason {
    /// Upload authorization failed after the bounded retries
    Authorization(CliError),

    /// The transfer failed at the transport level, or the file could not
    /// be read
    Upload(CliError),

    /// The object store answered the upload with a non-success status
    Rejected(StatusCode),

    /// Local and store-reported digests differ
    ChecksumMismatch { local: String, remote: String },

    /// No media type could be resolved for the file name; the file stays
    /// uploaded but unlinked
    UnknownMediaType,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Authorization(err) => write!(f, "authorization failed: {}", err),
            SkipReason::Upload(err) => write!(f, "upload failed: {}", err),
            SkipReason::Rejected(status) => write!(f, "object store returned {}", status),
            SkipReason::ChecksumMismatch { local, remote } => write!(
                f,
                "checksum mismatch: local {} vs remote {}",
                local,
                if remote.is_empty() { "<absent>" } else { remote }
            ),
            SkipReason::UnknownMediaType => write!(f, "no media type resolved"),
        }
    }
}

/// Outcome of a whole run
#[derive(Debug)]
pub struct BatchReport {
    /// The aggregate record: configured fields first, then one link field
    /// per verified file in enumeration order
    pub record: Record,

    /// Files that were uploaded, verified, and linked
    pub linked: Vec<PathBuf>,

    /// Files left out, with the reason each was skipped
    pub skipped: Vec<(PathBuf, SkipReason)>,
}

/// Drives the per-file pipeline and owns the run's aggregate record
pub struct Uploader<'a> {
    api: &'a ApiClient,
    config: &'a Config,
}

impl<'a> Uploader<'a> {
    pub fn new(api: &'a ApiClient, config: &'a Config) -> Self {
        Self { api, config }
    }

    /// Enumerate the regular files to upload under `root`.
    ///
    /// Recursive, directories skipped, housekeeping entries excluded,
    /// results in lexicographic path order.
    pub fn discover_files(root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|e| CliError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let excluded = entry
                .file_name()
                .to_str()
                .map(|name| EXCLUDED_FILES.contains(&name))
                .unwrap_or(false);
            if excluded {
                debug!(file = %entry.path().display(), "excluded housekeeping entry");
                continue;
            }
            files.push(entry.into_path());
        }

        files.sort();
        Ok(files)
    }

    /// Run the full pipeline over `root` and return the aggregate record
    /// with per-file outcomes.
    pub async fn run(&self, root: &Path, progress: Option<&ProgressBar>) -> Result<BatchReport> {
        let files = Self::discover_files(root)?;
        self.process_files(&files, progress).await
    }

    /// Process an already-enumerated file list.
    ///
    /// Split from [`Uploader::run`] so callers that enumerate up front (for
    /// counts or a dry run) do not walk the tree twice.
    pub async fn process_files(
        &self,
        files: &[PathBuf],
        progress: Option<&ProgressBar>,
    ) -> Result<BatchReport> {
        let mut record = base_record(&self.config.metadata)?;
        let mut linked = Vec::new();
        let mut skipped = Vec::new();

        for (index, path) in files.iter().enumerate() {
            match self.process_file(path).await {
                Ok(field) => {
                    debug!(file = %path.display(), "file linked");
                    record.append(field);
                    linked.push(path.clone());
                },
                Err(SkipReason::UnknownMediaType) => {
                    // Deliberate no-op policy for unknown types
                    debug!(file = %path.display(), "no media type resolved, file left unlinked");
                    skipped.push((path.clone(), SkipReason::UnknownMediaType));
                },
                Err(reason) => {
                    warn!(file = %path.display(), reason = %reason, "file skipped");
                    skipped.push((path.clone(), reason));
                },
            }

            if let Some(pb) = progress {
                pb.inc(1);
            }
            if (index + 1) % STATUS_LOG_INTERVAL == 0 {
                info!(processed = index + 1, total = files.len(), "progress");
            }
        }

        Ok(BatchReport {
            record,
            linked,
            skipped,
        })
    }

    /// Per-file pipeline: Pending → Authorized → Uploaded → Verified, or a
    /// skip reason at whichever step failed.
    async fn process_file(&self, path: &Path) -> std::result::Result<DataField, SkipReason> {
        let grant = self.authorize().await?;

        let receipt = self
            .api
            .upload_file(path, &grant)
            .await
            .map_err(SkipReason::Upload)?;

        if !receipt.status.is_success() {
            return Err(SkipReason::Rejected(receipt.status));
        }

        let local = checksum::compute_file_checksum(path)
            .map_err(|e| SkipReason::Upload(CliError::from(e)))?;
        let remote = receipt.checksum();

        match remote {
            Some(ref digest) if *digest == local => {},
            other => {
                return Err(SkipReason::ChecksumMismatch {
                    local,
                    remote: other.unwrap_or_default(),
                })
            },
        }

        let object_key = grant.object_key().unwrap_or_default();
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();

        DataField::link(object_key, &local, &self.config.storage_location, file_name)
            .ok_or(SkipReason::UnknownMediaType)
    }

    /// Request an upload grant, retrying transient failures up to the
    /// fixed bound.
    async fn authorize(&self) -> std::result::Result<crate::api::PresignedPost, SkipReason> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .api
                .request_presigned_post(&self.config.storage_location)
                .await
            {
                Ok(grant) => return Ok(grant),
                Err(err) if err.is_transient() && attempt < AUTH_RETRY_LIMIT => {
                    debug!(attempt, error = %err, "authorization request failed, retrying");
                },
                Err(err) => return Err(SkipReason::Authorization(err)),
            }
        }
    }
}

/// Build the record seeded with the configured metadata fields, in
/// configured order. Keys that do not follow the 6-character
/// tag+indicators+code shape are warned about and skipped.
pub fn base_record(metadata: &[MetadataPair]) -> Result<Record> {
    let mut record = Record::new();

    for pair in metadata {
        let chars: Vec<char> = pair.key.chars().collect();
        if chars.len() != 6 {
            warn!(key = %pair.key, "skipping metadata key: expected tag, indicators, and subfield code");
            continue;
        }
        let field_key: String = chars[..5].iter().collect();
        record.append(DataField::from_key(&field_key, vec![(chars[5], pair.value.clone())])?);
    }

    Ok(record)
}
