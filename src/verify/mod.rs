//! Anchored segment presence checks against raw document text.
//!
//! A tag only counts as present when it actually starts a segment:
//! preceded by start-of-text, the segment terminator, or a line break,
//! and immediately followed by the field delimiter. Without the
//! anchoring, `NM1` would "match" inside free-text data content like
//! patient names or note segments.
//!
//! The core never touches files; callers hand in the full document
//! text they read themselves.

use crate::core::types::{SegmentId, VerificationResult};

/// The delimiter characters in effect for a document.
///
/// X12 interchanges may declare their own delimiters in the ISA
/// segment; the defaults cover the common `*` / `~` convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterSet {
    /// Separates elements within a segment
    pub field: char,
    /// Terminates a segment
    pub terminator: char,
}

impl Default for DelimiterSet {
    fn default() -> Self {
        Self {
            field: '*',
            terminator: '~',
        }
    }
}

/// A raw EDI document prepared for presence checks
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    delimiters: DelimiterSet,
}

impl Document {
    /// Wrap document text using the default `*` / `~` delimiters
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delimiters: DelimiterSet::default(),
        }
    }

    /// Wrap document text with explicit delimiters
    pub fn with_delimiters(text: impl Into<String>, delimiters: DelimiterSet) -> Self {
        Self {
            text: text.into(),
            delimiters,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn delimiters(&self) -> DelimiterSet {
        self.delimiters
    }

    /// Byte offset of the first anchored occurrence of `segment`
    #[must_use]
    pub fn find_segment(&self, segment: &SegmentId) -> Option<usize> {
        let tag = segment.as_str();
        if tag.is_empty() {
            return None;
        }

        for (pos, _) in self.text.match_indices(tag) {
            if self.is_segment_start(pos) && self.is_followed_by_field(pos + tag.len()) {
                return Some(pos);
            }
        }
        None
    }

    /// Whether `segment` starts at least one segment in the document
    #[must_use]
    pub fn contains_segment(&self, segment: &SegmentId) -> bool {
        self.find_segment(segment).is_some()
    }

    /// Presence verdict for one segment
    #[must_use]
    pub fn verify(&self, segment: &SegmentId) -> VerificationResult {
        VerificationResult {
            segment_id: segment.clone(),
            found: self.contains_segment(segment),
        }
    }

    /// Presence verdicts for a set of segments
    #[must_use]
    pub fn verify_all(&self, segments: &[SegmentId]) -> Vec<VerificationResult> {
        segments.iter().map(|s| self.verify(s)).collect()
    }

    fn is_segment_start(&self, pos: usize) -> bool {
        if pos == 0 {
            return true;
        }
        self.text[..pos]
            .chars()
            .next_back()
            .is_some_and(|c| c == self.delimiters.terminator || c == '\n' || c == '\r')
    }

    fn is_followed_by_field(&self, pos: usize) -> bool {
        self.text[pos..]
            .chars()
            .next()
            .is_some_and(|c| c == self.delimiters.field)
    }
}
