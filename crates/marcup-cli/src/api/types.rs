//! API request and response types
//!
//! Matches the storage service wire format.

use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;

/// Envelope around the presigned-post response body
#[derive(Debug, Clone, Deserialize)]
pub struct PresignedPostResponse {
    pub data: PresignedPost,
}

/// A short-lived upload grant from the storage service
///
/// Single use: requested immediately before an upload and discarded after.
/// Expiry is implicit and shows up as an upload failure.
#[derive(Debug, Clone, Deserialize)]
pub struct PresignedPost {
    /// Object-store URL the file must be posted to
    pub url: String,

    /// Form fields the store requires on the POST, including the
    /// destination object key under `key`
    pub fields: HashMap<String, String>,
}

impl PresignedPost {
    /// The destination object key, if the grant carries one
    pub fn object_key(&self) -> Option<&str> {
        self.fields.get("key").map(String::as_str)
    }
}

/// Acknowledgment of a file transfer, consumed immediately by verification
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    /// HTTP status the object store answered with; inspected, not thrown
    pub status: StatusCode,

    /// Raw ETag header value, if present
    pub etag: Option<String>,
}

impl UploadReceipt {
    /// The store-reported content digest: the ETag with quoting stripped
    pub fn checksum(&self) -> Option<String> {
        self.etag
            .as_ref()
            .map(|etag| etag.trim_matches('"').to_string())
    }
}
