//! Remote listing structure: URLs, list-row parsing, attachment parsing.
//!
//! The exam archive is a paginated board. List pages carry rows whose
//! links invoke `fn_goDetail('<id>')`; detail pages expose attachments
//! through `fnFileDownload('<file_id>')` links. Everything here is pure
//! HTML-to-struct extraction - fetching lives in
//! [`crate::download::HttpClient`] and pagination in [`walker`].

pub mod walker;

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use thiserror::Error;

/// Detail-link onclick handler, e.g. `fn_goDetail('12345')`.
#[allow(clippy::expect_used)]
static GO_DETAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"fn_goDetail\('(\d+)'").expect("detail onclick regex is valid") // Static pattern, safe to panic
});

/// File-download onclick handler, e.g. `fnFileDownload('FILE_0001')`.
#[allow(clippy::expect_used)]
static FILE_DOWNLOAD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"fnFileDownload\('([^']+)'").expect("download onclick regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static LISTING_TABLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table.type_table").expect("listing table selector is valid") // Static selector, safe to panic
});

#[allow(clippy::expect_used)]
static LISTING_ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table.type_table tbody tr").expect("listing row selector is valid") // Static selector, safe to panic
});

#[allow(clippy::expect_used)]
static ONCLICK_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[onclick]").expect("onclick link selector is valid") // Static selector, safe to panic
});

#[allow(clippy::expect_used)]
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("cell selector is valid")); // Static selector, safe to panic

#[allow(clippy::expect_used)]
static ATTACHMENT_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.file a[onclick]").expect("attachment link selector is valid") // Static selector, safe to panic
});

/// Error for remote pages whose structure does not match the board layout.
///
/// Malformed structure is never retried; callers skip the entry or stop
/// the walk per their own policy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The list page has no recognizable listing table at all, e.g. an
    /// error page served with a 200 status.
    #[error("page {page_index} has no listing table")]
    MissingListingTable {
        /// 1-indexed page that failed to parse.
        page_index: u32,
    },
}

/// One row of the paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Board-internal post id, used to build the detail-page URL.
    pub entry_id: String,
    /// Human-written entry title.
    pub title: String,
    /// Exam date from the listing row, when present. Display only.
    pub exam_date: Option<String>,
    /// 1-indexed page this entry was found on.
    pub page_index: u32,
}

impl ListingEntry {
    /// Human-readable form for log lines: `[date] title`.
    #[must_use]
    pub fn display(&self) -> String {
        match &self.exam_date {
            Some(date) => format!("[{date}] {}", self.title),
            None => self.title.clone(),
        }
    }
}

/// One downloadable attachment on a detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Server-side file id, used to build the download URL.
    pub file_id: String,
    /// Displayed filename, the classification input.
    pub display_name: String,
}

/// URL construction for one exam archive host.
///
/// The base URL is configurable so tests can point the whole pipeline at
/// a mock server.
#[derive(Debug, Clone)]
pub struct ExamSite {
    base_url: String,
}

impl ExamSite {
    /// Production archive host.
    pub const DEFAULT_BASE_URL: &'static str = "https://m.historyexam.go.kr";

    /// Creates a site rooted at `base_url` (trailing slashes are trimmed).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// URL of the 1-indexed list page.
    #[must_use]
    pub fn list_url(&self, page_index: u32) -> String {
        format!("{}/pst/list.do?bbs=dat&pageIndex={page_index}", self.base_url)
    }

    /// URL of an entry's detail page.
    #[must_use]
    pub fn detail_url(&self, entry_id: &str) -> String {
        format!("{}/pst/view.do?bbs=dat&pst_sno={entry_id}", self.base_url)
    }

    /// URL that serves an attachment's bytes.
    #[must_use]
    pub fn file_url(&self, file_id: &str) -> String {
        format!("{}/atchFile/FileDown.do?atch_file_id={file_id}", self.base_url)
    }
}

impl Default for ExamSite {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

/// Parses list-page HTML into entries.
///
/// Rows without a recognizable detail link are skipped. An empty result
/// on a well-formed page means end-of-listing.
///
/// # Errors
///
/// Returns [`ParseError::MissingListingTable`] when the page has no
/// listing table element at all.
pub fn parse_entries(html: &str, page_index: u32) -> Result<Vec<ListingEntry>, ParseError> {
    let document = Html::parse_document(html);

    if document.select(&LISTING_TABLE_SELECTOR).next().is_none() {
        return Err(ParseError::MissingListingTable { page_index });
    }

    let mut entries = Vec::new();
    for row in document.select(&LISTING_ROW_SELECTOR) {
        let Some(link) = row.select(&ONCLICK_LINK_SELECTOR).next() else {
            continue;
        };
        let onclick = link.value().attr("onclick").unwrap_or_default();
        let Some(caps) = GO_DETAIL_PATTERN.captures(onclick) else {
            continue;
        };
        let entry_id = caps[1].to_string();
        let title = collect_text(&link);

        // The third cell carries the exam date on well-formed rows.
        let exam_date = row
            .select(&CELL_SELECTOR)
            .nth(2)
            .map(|cell| collect_text(&cell))
            .filter(|date| !date.is_empty());

        entries.push(ListingEntry {
            entry_id,
            title,
            exam_date,
            page_index,
        });
    }
    Ok(entries)
}

/// Parses detail-page HTML into attachments.
///
/// The displayed name is the link text after its first `:` separator
/// (the board renders `첨부파일 : name.pdf`); a link without the
/// separator falls back to the file id. Total - a detail page without an
/// attachment block yields an empty list.
#[must_use]
pub fn parse_attachments(html: &str) -> Vec<Attachment> {
    let document = Html::parse_document(html);

    let mut attachments = Vec::new();
    for link in document.select(&ATTACHMENT_LINK_SELECTOR) {
        let onclick = link.value().attr("onclick").unwrap_or_default();
        let Some(caps) = FILE_DOWNLOAD_PATTERN.captures(onclick) else {
            continue;
        };
        let file_id = caps[1].to_string();
        let raw_name = collect_text(&link);
        let display_name = match raw_name.split_once(':') {
            Some((_, remainder)) => remainder.trim().to_string(),
            None => file_id.clone(),
        };
        attachments.push(Attachment {
            file_id,
            display_name,
        });
    }
    attachments
}

/// Concatenated, whitespace-normalized text content of an element.
fn collect_text(element: &scraper::ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
