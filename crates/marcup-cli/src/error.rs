//! Error types for the marcup CLI
//!
//! Per-file failures are represented separately as
//! [`crate::pipeline::SkipReason`]; the variants here cover failures that a
//! caller may want to propagate, retry, or report to the operator.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Pre-signed upload authorization could not be obtained
    #[error("Authorization request failed: {message}")]
    Authorization {
        message: String,
        /// Whether the failure class is worth retrying (connection-level
        /// faults and server 5xx responses)
        transient: bool,
    },

    /// File transfer to the object store failed at the transport level
    #[error("Upload of '{file}' failed: {source}")]
    Upload {
        file: String,
        #[source]
        source: reqwest::Error,
    },

    /// The record API rejected a request
    #[error("Record API error: {0}")]
    Api(String),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check marcup.toml or the MARCUP_* environment variables.")]
    Config(String),

    /// A configured metadata key does not follow the tag+indicators+code shape
    #[error("Invalid MARC key '{0}': expected tag (3 chars) followed by two indicators")]
    InvalidMarcKey(String),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("Network request failed: {0}. Check your internet connection and server URL.")]
    Http(#[from] reqwest::Error),

    /// MARCXML serialization failed
    #[error("Failed to serialize record: {0}")]
    Xml(#[from] quick_xml::SeError),

    /// TOML parsing failed
    #[error("Failed to parse configuration file: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Shared utility error
    #[error(transparent)]
    Common(#[from] marcup_common::CommonError),
}

impl CliError {
    /// Create an authorization error
    pub fn authorization(msg: impl Into<String>, transient: bool) -> Self {
        Self::Authorization {
            message: msg.into(),
            transient,
        }
    }

    /// Create a record API error
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether retrying the failed operation could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Authorization { transient: true, .. })
    }
}
