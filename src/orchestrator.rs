//! Run coordination: walk the listing, classify, filter, download.
//!
//! Execution is deliberately sequential - one page is fetched and fully
//! processed before the next is requested, and attachment fetches are
//! spaced by a fixed delay to avoid triggering origin-side abuse
//! detection. The run always completes with a best-effort count; only
//! destination-level filesystem failures abort it.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::classify::{Level, classify_attachment, classify_title};
use crate::download::{DownloadError, HttpClient, RetryPolicy, fetch_with_retry};
use crate::filename::build_filename;
use crate::listing::{ExamSite, parse_attachments, walker::ListingWalker};

/// Options for a download run.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Highest 1-indexed list page to visit; `None` walks to the end.
    pub max_pages: Option<u32>,
    /// Skip attachments whose target file already exists at the
    /// destination, without fetching their bytes.
    pub skip_existing: bool,
    /// Pause between successive attachment fetches, and between
    /// successive list-page fetches.
    pub delay: Duration,
    /// Restrict downloads to these levels. `None` downloads everything;
    /// attachments whose level cannot be resolved are downloaded
    /// regardless of the filter.
    pub levels: Option<HashSet<Level>>,
    /// Retry policy applied to every page and attachment fetch.
    pub retry_policy: RetryPolicy,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            max_pages: None,
            skip_existing: false,
            delay: Duration::from_secs(1),
            levels: None,
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl DownloadOptions {
    /// Whether an attachment with the given resolved level passes the
    /// level filter. Unknown levels always pass - data is never silently
    /// dropped by a filter that cannot be evaluated.
    fn level_allowed(&self, resolved_level: Option<Level>) -> bool {
        match (&self.levels, resolved_level) {
            (Some(filter), Some(level)) => filter.contains(&level),
            _ => true,
        }
    }
}

/// Downloads past exam papers and answer sheets into `dest`.
///
/// Walks the listing page by page, classifies each entry title and each
/// attachment name, resolves a deterministic target filename, and fetches
/// the accepted attachments under the retry policy. Entries whose detail
/// page fails or is empty are skipped; attachments that fail after
/// retries are skipped. Returns the number of files actually written.
///
/// # Errors
///
/// Returns `DownloadError` only for destination-level filesystem
/// failures: the destination directory cannot be created, or writing a
/// fully-fetched document fails.
#[instrument(skip(site, options), fields(dest = %dest.display()))]
pub async fn download_past_exams(
    site: &ExamSite,
    dest: &Path,
    options: &DownloadOptions,
) -> Result<usize, DownloadError> {
    let client = HttpClient::new();

    tokio::fs::create_dir_all(dest)
        .await
        .map_err(|e| DownloadError::io(dest, e))?;

    let mut walker = ListingWalker::new(
        &client,
        site,
        &options.retry_policy,
        options.max_pages,
        options.delay,
    );
    let mut downloaded: usize = 0;
    let mut fetched_before = false;

    while let Some(entries) = walker.next_page().await {
        info!(
            page_index = entries[0].page_index,
            entries = entries.len(),
            "processing listing page"
        );

        for entry in entries {
            let identity = classify_title(&entry.title);
            info!(entry = %entry.display(), round = ?identity.round, "exam entry");

            let detail_url = site.detail_url(&entry.entry_id);
            let detail_html = match fetch_with_retry(&options.retry_policy, || {
                client.get_text(&detail_url)
            })
            .await
            {
                Ok(html) => html,
                Err(error) => {
                    warn!(entry = %entry.title, error = %error, "failed to load detail page, skipping entry");
                    continue;
                }
            };

            let attachments = parse_attachments(&detail_html);
            if attachments.is_empty() {
                debug!(entry = %entry.title, "no attachments found, skipping entry");
                continue;
            }

            for attachment in attachments {
                let classification = classify_attachment(&attachment.display_name);
                let resolved_level = classification.resolved_level(&identity);

                if !options.level_allowed(resolved_level) {
                    debug!(
                        name = %attachment.display_name,
                        level = ?resolved_level,
                        "level filtered out, skipping attachment"
                    );
                    continue;
                }

                let resolved = build_filename(&identity, &classification, &attachment.display_name);
                if resolved.is_fallback_name {
                    debug!(
                        name = %attachment.display_name,
                        target = %resolved.target_filename,
                        "identity unresolved, using fallback name"
                    );
                }

                let target = dest.join(&resolved.target_filename);
                if options.skip_existing && target.exists() {
                    debug!(file = %resolved.target_filename, "skipping existing file");
                    continue;
                }

                if fetched_before && !options.delay.is_zero() {
                    tokio::time::sleep(options.delay).await;
                }
                fetched_before = true;

                let file_url = site.file_url(&attachment.file_id);
                match fetch_with_retry(&options.retry_policy, || {
                    client.download_to_file(&file_url, &target)
                })
                .await
                {
                    Ok(bytes) => {
                        downloaded += 1;
                        info!(file = %resolved.target_filename, bytes, "downloaded");
                    }
                    // Losing a fully-fetched document to a write failure
                    // would corrupt the count's meaning, so it is fatal
                    Err(error @ DownloadError::Io { .. }) => return Err(error),
                    Err(error) => {
                        warn!(
                            file = %resolved.target_filename,
                            error = %error,
                            "failed to download attachment, skipping"
                        );
                    }
                }
            }
        }
    }

    info!(downloaded, "run complete");
    Ok(downloaded)
}
