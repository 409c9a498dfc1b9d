//! HTTP client for the record service and the object store
//!
//! One client covers both collaborators: the record service issues upload
//! grants and accepts the finished record; the object store receives the
//! file bytes at the granted URL.

use crate::api::{
    endpoints,
    types::{PresignedPost, PresignedPostResponse, UploadReceipt},
};
use crate::error::{CliError, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, ETAG};
use reqwest::multipart;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio_util::io::ReaderStream;
use tracing::debug;

// ============================================================================
// API Client Constants
// ============================================================================

/// Default timeout for API requests in seconds.
/// Can be overridden via MARCUP_API_TIMEOUT_SECS environment variable.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Ceiling for a single file transfer. The upload must never hang
/// indefinitely on a stalled connection.
pub const UPLOAD_TIMEOUT_SECS: u64 = 10;

/// API client for the record service and object store
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    /// Create a new API client with a bounded request timeout
    pub fn new(base_url: String, token: String) -> Result<Self> {
        let timeout_secs = std::env::var("MARCUP_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_API_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Request a single-use upload grant for the given storage location.
    ///
    /// Any transport or server failure maps to [`CliError::Authorization`];
    /// the caller owns the retry policy and can consult
    /// [`CliError::is_transient`] for the failure class.
    pub async fn request_presigned_post(&self, location: &str) -> Result<PresignedPost> {
        let url = endpoints::presigned_post_url(&self.base_url, location);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.auth_header())
            .send()
            .await
            .map_err(|e| {
                CliError::authorization(e.to_string(), e.is_connect() || e.is_timeout())
            })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(CliError::authorization(
                format!("server returned {}", status),
                true,
            ));
        }
        if !status.is_success() {
            return Err(CliError::authorization(
                format!("server returned {}", status),
                false,
            ));
        }

        let body: PresignedPostResponse = response
            .json()
            .await
            .map_err(|e| CliError::authorization(format!("invalid response body: {}", e), false))?;

        if body.data.object_key().is_none() {
            return Err(CliError::authorization(
                "presigned response is missing the 'key' form field",
                false,
            ));
        }

        debug!(url = %body.data.url, "upload grant obtained");
        Ok(body.data)
    }

    /// Upload a file to the granted object-store URL.
    ///
    /// Sends a multipart POST with the grant's required form fields followed
    /// by the streamed file part, under a fixed per-request timeout. Transport and
    /// timeout failures map to [`CliError::Upload`]; a non-success HTTP
    /// status is returned in the receipt for the caller to inspect.
    pub async fn upload_file(&self, path: &Path, grant: &PresignedPost) -> Result<UploadReceipt> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();

        // Stream the file so large uploads never have to fit in memory
        let file = tokio::fs::File::open(path).await?;
        let length = file.metadata().await?.len();
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));

        let mut form = multipart::Form::new();
        for (name, value) in &grant.fields {
            form = form.text(name.clone(), value.clone());
        }
        // The object store requires the file part last
        form = form.part(
            "file",
            multipart::Part::stream_with_length(body, length).file_name(file_name),
        );

        let response = self
            .client
            .post(&grant.url)
            .header("x-amz-acl", "private")
            .multipart(form)
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| CliError::Upload {
                file: path.display().to_string(),
                source: e,
            })?;

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        debug!(status = %response.status(), file = %path.display(), "upload acknowledged");

        Ok(UploadReceipt {
            status: response.status(),
            etag,
        })
    }

    /// Submit the serialized record to the record API.
    ///
    /// Returns the API's response body on success; a non-success status maps
    /// to [`CliError::Api`] with the body attached.
    pub async fn submit_record(&self, xml: &str, callback_email: &str) -> Result<String> {
        let url = endpoints::record_url(&self.base_url, callback_email);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.auth_header())
            .header(CONTENT_TYPE, "application/xml")
            .body(xml.to_string())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(CliError::api(format!(
                "record submission returned {}: {}",
                status,
                body.trim()
            )));
        }

        Ok(body)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }
}
