//! API clients for the record service and the object store
//!
//! Split into the HTTP client, endpoint URL builders, and wire types.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::ApiClient;
pub use types::{PresignedPost, UploadReceipt};
