//! Page-by-page iteration over the paginated listing.

use std::time::Duration;

use tracing::{debug, warn};

use super::{ExamSite, ListingEntry, parse_entries};
use crate::download::{HttpClient, RetryPolicy, fetch_with_retry};

/// Walks the remote listing one page at a time, starting at page 1.
///
/// The walk ends when the source reports no further entries, when
/// `page_index` would exceed `max_pages`, or - early - when a page fails
/// after exhausting retries or parses as malformed. Early termination
/// yields partial results rather than an error; the walker never
/// re-yields a page, so partial runs cannot duplicate work.
///
/// List pages carry their own pacing: `page_delay` is slept before every
/// page fetch after the first, independent of whether any attachment is
/// eventually downloaded from the page.
///
/// Each walker starts fresh at page 1; there is no cross-walker state.
#[derive(Debug)]
pub struct ListingWalker<'a> {
    client: &'a HttpClient,
    site: &'a ExamSite,
    retry_policy: &'a RetryPolicy,
    max_pages: Option<u32>,
    page_delay: Duration,
    page_index: u32,
    done: bool,
}

impl<'a> ListingWalker<'a> {
    /// Creates a walker positioned before page 1.
    #[must_use]
    pub fn new(
        client: &'a HttpClient,
        site: &'a ExamSite,
        retry_policy: &'a RetryPolicy,
        max_pages: Option<u32>,
        page_delay: Duration,
    ) -> Self {
        Self {
            client,
            site,
            retry_policy,
            max_pages,
            page_delay,
            page_index: 1,
            done: false,
        }
    }

    /// Fetches and parses the next page of entries.
    ///
    /// Returns `None` once the walk is over; every returned batch is
    /// non-empty.
    pub async fn next_page(&mut self) -> Option<Vec<ListingEntry>> {
        if self.done {
            return None;
        }
        if let Some(max_pages) = self.max_pages {
            if self.page_index > max_pages {
                debug!(max_pages, "page cap reached");
                self.done = true;
                return None;
            }
        }

        let page_index = self.page_index;
        if page_index > 1 && !self.page_delay.is_zero() {
            tokio::time::sleep(self.page_delay).await;
        }

        let url = self.site.list_url(page_index);
        let html = match fetch_with_retry(self.retry_policy, || self.client.get_text(&url)).await {
            Ok(html) => html,
            Err(error) => {
                warn!(page_index, error = %error, "list page fetch failed, ending walk early");
                self.done = true;
                return None;
            }
        };

        let entries = match parse_entries(&html, page_index) {
            Ok(entries) => entries,
            Err(error) => {
                // Malformed structure is not retried
                warn!(page_index, error = %error, "list page is malformed, ending walk early");
                self.done = true;
                return None;
            }
        };

        if entries.is_empty() {
            debug!(page_index, "end of listing");
            self.done = true;
            return None;
        }

        self.page_index += 1;
        Some(entries)
    }
}
