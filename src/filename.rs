//! Target filename resolution for downloaded exam documents.
//!
//! Fully-classified attachments get the canonical
//! `{round}회 한국사_{문제지|정답표}({기본|심화}).pdf` name, which downstream
//! consumers rely on for round/level/type lookup by filename alone. When
//! any identity field is unknown the sanitized original attachment name
//! is used instead - ambiguous source data never blocks a download.

use crate::classify::{DocumentClassification, ExamIdentity};

/// Name used when sanitization leaves nothing usable.
const EMPTY_NAME_FALLBACK: &str = "downloaded_file";

/// A resolved target filename plus how it was derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    /// Filename to write beneath the destination directory.
    pub target_filename: String,
    /// True when identity resolution failed and the sanitized original
    /// attachment name was used.
    pub is_fallback_name: bool,
}

/// Composes the target filename for an attachment.
///
/// The canonical name requires round, document type, and level to all be
/// known (level via [`DocumentClassification::resolved_level`]); any
/// unknown field selects the fallback path. Deterministic: identical
/// inputs always yield the identical string.
#[must_use]
pub fn build_filename(
    identity: &ExamIdentity,
    classification: &DocumentClassification,
    original_name: &str,
) -> ResolvedName {
    let level = classification.resolved_level(identity);
    if let (Some(round), Some(doc_type), Some(level)) = (identity.round, classification.doc_type, level)
    {
        return ResolvedName {
            target_filename: format!(
                "{round}회 한국사_{}({}).pdf",
                doc_type.label(),
                level.label()
            ),
            is_fallback_name: false,
        };
    }

    ResolvedName {
        target_filename: sanitize_filename(original_name),
        is_fallback_name: true,
    }
}

/// Sanitizes a filename for filesystem safety.
///
/// Characters invalid on common filesystems (`\ / : * ? " < > |`) and
/// control characters become `_`; non-breaking spaces are normalized and
/// whitespace runs collapse to a single space.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            '\u{00a0}' => ' ',
            c => c,
        })
        .collect();

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        EMPTY_NAME_FALLBACK.to_string()
    } else {
        collapsed
    }
}
