//! API endpoint URL builders
//!
//! Helper functions to construct service endpoint URLs.

/// Build the presigned-post authorization URL for a storage location
pub fn presigned_post_url(base_url: &str, location: &str) -> String {
    format!(
        "{}/storage/presigned_post?location={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(location)
    )
}

/// Build the record submission URL (insert-or-replace mode)
pub fn record_url(base_url: &str, callback_email: &str) -> String {
    format!(
        "{}/api/v1/record?mode=insertorreplace&callback_email={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(callback_email)
    )
}
