//! Keyword-driven classification of exam titles and attachment names.
//!
//! Listing titles and attachment filenames on the exam archive are
//! human-written, so classification is modeled as total functions that
//! return `None` on ambiguity instead of failing. Three independent
//! signals are extracted: the round number, the difficulty level, and
//! the document type. Composition of the signals (attachment evidence
//! over title evidence) happens in
//! [`DocumentClassification::resolved_level`].

use std::sync::LazyLock;

use regex::Regex;

/// Round number preceded by the `제` ordinal prefix, e.g. `제63회`.
#[allow(clippy::expect_used)]
static PREFIXED_ROUND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"제\s*(\d+)\s*회").expect("prefixed round regex is valid") // Static pattern, safe to panic
});

/// Bare round number followed by the `회` round marker, e.g. `63회`.
#[allow(clippy::expect_used)]
static BARE_ROUND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*회").expect("bare round regex is valid") // Static pattern, safe to panic
});

/// Keywords marking a question paper.
const PAPER_KEYWORDS: &[&str] = &["문제", "question"];

/// Keywords marking an answer sheet.
const ANSWER_KEYWORDS: &[&str] = &["정답", "답지", "answer"];

/// Exam difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// 기본 (basic) tier.
    Basic,
    /// 심화 (advanced) tier.
    Advanced,
}

impl Level {
    /// Korean label used in canonical filenames.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Basic => "기본",
            Self::Advanced => "심화",
        }
    }
}

/// Document type of an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocType {
    /// Question paper (문제지).
    Paper,
    /// Answer sheet (정답표).
    Answer,
}

impl DocType {
    /// Korean label used in canonical filenames.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Paper => "문제지",
            Self::Answer => "정답표",
        }
    }
}

/// Identity derived from a listing entry's title. Fields are `None` when
/// the title carries no usable signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExamIdentity {
    /// Sequential administration number of the exam, when present.
    pub round: Option<u32>,
    /// Difficulty tier named in the title, when unambiguous.
    pub level: Option<Level>,
}

/// Classification derived from an attachment's displayed filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentClassification {
    /// Document type, when exactly one type keyword matched.
    pub doc_type: Option<DocType>,
    /// Level evidence local to the attachment name, when unambiguous.
    pub level: Option<Level>,
}

impl DocumentClassification {
    /// Resolves the effective level by combining attachment-local evidence
    /// with the title-derived identity.
    ///
    /// Attachment names are typically more specific than listing titles,
    /// so a definite attachment-level signal takes precedence; otherwise
    /// the title-derived level is retained.
    #[must_use]
    pub fn resolved_level(&self, identity: &ExamIdentity) -> Option<Level> {
        self.level.or(identity.level)
    }
}

/// Extracts the round number and difficulty level from a listing title.
///
/// Round: first numeral followed by the `회` round marker, preferring the
/// `제…회` form. Level: exactly one of the `기본`/`심화` keywords must be
/// present; both or neither yields `None`. Total - malformed titles
/// produce an identity with unknown fields, never an error.
#[must_use]
pub fn classify_title(title: &str) -> ExamIdentity {
    ExamIdentity {
        round: extract_round(title),
        level: extract_level(title),
    }
}

/// Classifies an attachment by its displayed filename.
///
/// The document type requires exactly one of the paper/answer keyword
/// sets to match; both or neither yields `None`. The same level keyword
/// search as [`classify_title`] is applied to the attachment name itself.
#[must_use]
pub fn classify_attachment(display_name: &str) -> DocumentClassification {
    DocumentClassification {
        doc_type: extract_doc_type(display_name),
        level: extract_level(display_name),
    }
}

/// Finds the first round number in the text. Zero is not a valid round.
fn extract_round(text: &str) -> Option<u32> {
    PREFIXED_ROUND_PATTERN
        .captures(text)
        .or_else(|| BARE_ROUND_PATTERN.captures(text))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|round| *round > 0)
}

/// Level keyword search shared by title and attachment classification.
/// Both keywords present is treated as unknown rather than guessing.
fn extract_level(text: &str) -> Option<Level> {
    let basic = text.contains("기본");
    let advanced = text.contains("심화");
    match (basic, advanced) {
        (true, false) => Some(Level::Basic),
        (false, true) => Some(Level::Advanced),
        _ => None,
    }
}

/// Two-way keyword match for the document type, unknown on ambiguity.
fn extract_doc_type(name: &str) -> Option<DocType> {
    let lowered = name.to_lowercase();
    let paper = PAPER_KEYWORDS.iter().any(|kw| lowered.contains(kw));
    let answer = ANSWER_KEYWORDS.iter().any(|kw| lowered.contains(kw));
    match (paper, answer) {
        (true, false) => Some(DocType::Paper),
        (false, true) => Some(DocType::Answer),
        _ => None,
    }
}
