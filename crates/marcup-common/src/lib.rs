//! marcup Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared utilities for the marcup workspace.
//!
//! # Overview
//!
//! This crate provides functionality used across all marcup workspace members:
//!
//! - **Error Handling**: Common error type and result alias
//! - **Checksums**: MD5 content digests for upload verification
//! - **Logging**: Tracing-based logging setup
//!
//! # Example
//!
//! ```no_run
//! use marcup_common::Result;
//! use marcup_common::checksum::compute_file_checksum;
//!
//! fn digest(path: &str) -> Result<String> {
//!     compute_file_checksum(path)
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{CommonError, Result};
