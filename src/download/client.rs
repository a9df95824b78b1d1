//! HTTP client wrapper for fetching pages and downloading files.
//!
//! One client is created per run and reused for every request so
//! connection pooling applies. File downloads stream to a `.part`
//! sibling and are renamed into place only after the full body has been
//! received, so an interrupted run never leaves a truncated file under
//! the target name.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use super::error::DownloadError;

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Per-request read timeout in seconds.
const READ_TIMEOUT_SECS: u64 = 120;

/// User-Agent sent with every request.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; KHPTDownloader/1.0)";

/// HTTP client for listing pages and attachment downloads.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(std::time::Duration::from_secs(READ_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Fetches a URL and returns the response body as text.
    ///
    /// Used for list and detail pages.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` when the URL is invalid, the request
    /// fails, or the server answers with a non-2xx status.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_text(&self, url: &str) -> Result<String, DownloadError> {
        validate_url(url)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        response.text().await.map_err(|e| request_error(url, e))
    }

    /// Downloads a URL to `target`, streaming the body to disk.
    ///
    /// Bytes are written to `<target>.part` and the file is renamed to
    /// `target` only once the stream completes; a failed transfer removes
    /// the partial file. Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` when the URL is invalid, the request or
    /// transfer fails, or writing to disk fails.
    #[instrument(skip(self), fields(url = %url, target = %target.display()))]
    pub async fn download_to_file(&self, url: &str, target: &Path) -> Result<u64, DownloadError> {
        validate_url(url)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let part_path = partial_path(target);
        let file = File::create(&part_path)
            .await
            .map_err(|e| DownloadError::io(&part_path, e))?;
        let mut writer = BufWriter::new(file);

        let mut stream = response.bytes_stream();
        let mut bytes_written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    remove_partial(&part_path).await;
                    return Err(request_error(url, e));
                }
            };
            if let Err(e) = writer.write_all(&chunk).await {
                remove_partial(&part_path).await;
                return Err(DownloadError::io(&part_path, e));
            }
            bytes_written += chunk.len() as u64;
        }

        if let Err(e) = writer.flush().await {
            remove_partial(&part_path).await;
            return Err(DownloadError::io(&part_path, e));
        }
        drop(writer);

        tokio::fs::rename(&part_path, target)
            .await
            .map_err(|e| DownloadError::io(target, e))?;

        debug!(bytes = bytes_written, "download complete");
        Ok(bytes_written)
    }
}

/// Rejects URLs that cannot be parsed before issuing a request.
fn validate_url(url: &str) -> Result<(), DownloadError> {
    Url::parse(url)
        .map(|_| ())
        .map_err(|_| DownloadError::invalid_url(url))
}

/// Maps a reqwest error to the timeout or network variant.
fn request_error(url: &str, error: reqwest::Error) -> DownloadError {
    if error.is_timeout() {
        DownloadError::timeout(url)
    } else {
        DownloadError::network(url, error)
    }
}

/// `.part` sibling used while a transfer is in flight.
fn partial_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_string());
    name.push_str(".part");
    target.with_file_name(name)
}

/// Best-effort cleanup after a failed transfer.
async fn remove_partial(part_path: &Path) {
    if let Err(e) = tokio::fs::remove_file(part_path).await {
        debug!(path = %part_path.display(), error = %e, "failed to remove partial file");
    }
}
