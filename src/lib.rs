//! KHPT Downloader Core Library
//!
//! This library downloads publicly available past exam papers and answer
//! sheets for the Korean History Proficiency Test, classifying each
//! document from its human-written title and filename and normalizing it
//! into a deterministic filename scheme.
//!
//! # Architecture
//!
//! - [`classify`] - round/level/document-type extraction from titles and
//!   attachment names
//! - [`filename`] - canonical/fallback target filename resolution
//! - [`listing`] - list and detail page parsing plus the page walker
//! - [`download`] - HTTP client, error taxonomy, and retry policy
//! - [`orchestrator`] - the `download_past_exams` run coordinator

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod download;
pub mod filename;
pub mod listing;
pub mod orchestrator;

// Re-export commonly used types
pub use classify::{
    DocType, DocumentClassification, ExamIdentity, Level, classify_attachment, classify_title,
};
pub use download::{
    DEFAULT_MAX_ATTEMPTS, DownloadError, FailureType, HttpClient, RetryDecision, RetryPolicy,
    classify_error, fetch_with_retry,
};
pub use filename::{ResolvedName, build_filename, sanitize_filename};
pub use listing::{
    Attachment, ExamSite, ListingEntry, ParseError, parse_attachments, parse_entries,
    walker::ListingWalker,
};
pub use orchestrator::{DownloadOptions, download_past_exams};
