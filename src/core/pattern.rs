use serde::{Deserialize, Serialize};

use crate::core::types::SegmentId;

/// Final search pattern handed to the document viewer.
///
/// Always begins with the segment tag immediately followed by the field
/// delimiter, e.g. `NM1*85*`, `HI*ABK`, `DTP*434*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPattern(String);

/// Default X12 field delimiter
pub const FIELD_DELIMITER: char = '*';

impl SearchPattern {
    /// Bare pattern for a segment: `<tag>*`
    pub fn bare(segment: &SegmentId) -> Self {
        Self(format!("{segment}{FIELD_DELIMITER}"))
    }

    /// Pattern with a suffix appended after the field delimiter,
    /// e.g. suffix `85*` gives `NM1*85*`
    pub fn with_suffix(segment: &SegmentId, suffix: &str) -> Self {
        Self(format!("{segment}{FIELD_DELIMITER}{suffix}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The segment tag portion of the pattern
    #[must_use]
    pub fn segment(&self) -> &str {
        self.0
            .split(FIELD_DELIMITER)
            .next()
            .unwrap_or(self.0.as_str())
    }
}

impl std::fmt::Display for SearchPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
