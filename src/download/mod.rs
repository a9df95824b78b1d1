//! HTTP download layer: client, error taxonomy, and retry policy.

pub mod client;
pub mod error;
pub mod retry;

pub use client::HttpClient;
pub use error::DownloadError;
pub use retry::{
    DEFAULT_MAX_ATTEMPTS, FailureType, RetryDecision, RetryPolicy, classify_error,
    fetch_with_retry,
};
