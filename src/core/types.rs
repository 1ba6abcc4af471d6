use serde::{Deserialize, Serialize};

/// Canonical EDI segment tag (e.g. `NM1`, `HI`, `DTP`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub String);

impl SegmentId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Segment tags are 2-4 uppercase alphanumeric characters
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (2..=4).contains(&self.0.len())
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    }
}

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a qualifier was attached to the raw reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualifierStyle {
    /// No qualifier present
    #[default]
    None,
    /// Single dash: `CLM05 - BG` or glued `CLM05-BG`
    Dash,
    /// Double dash: `2300HI01-2 -- BE`
    DoubleDash,
    /// Glued to an HI element suffix with no separator: `HI01-2-ABJ`
    Attached,
}

/// Confidence in a resolved reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
    Exact,
}

impl Confidence {
    /// Confidence for a classification produced by the given rule layer.
    ///
    /// Registry-backed layers (numbered, plain, two-letter) are high
    /// confidence; the generic shape layers are medium; the direct
    /// field-code fallback is low. A registry hit on loop/qualifier
    /// context upgrades high to exact.
    #[must_use]
    pub fn from_layer(layer: RuleLayer, context_resolved: bool) -> Self {
        match layer {
            RuleLayer::Numbered | RuleLayer::Plain | RuleLayer::TwoLetter => {
                if context_resolved {
                    Self::Exact
                } else {
                    Self::High
                }
            }
            RuleLayer::Generic | RuleLayer::EmbeddedDigit => Self::Medium,
            RuleLayer::DirectCode => Self::Low,
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Exact => write!(f, "EXACT"),
        }
    }
}

/// Which classifier rule layer produced a segment id.
///
/// Layers are tried in strict priority order and the first match wins;
/// a segment id is never re-derived from a later layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleLayer {
    /// Known numbered-segment prefix (`NM109` -> `NM1`)
    Numbered,
    /// Known plain three-letter tag found within the token
    Plain,
    /// Known two-letter tag immediately followed by a digit
    TwoLetter,
    /// Generic letters-then-digits shape
    Generic,
    /// Generic shape with an embedded digit in the tag, reconciled
    /// against the registry
    EmbeddedDigit,
    /// Direct field-code fallback on the original reference
    DirectCode,
}

/// Outcome of an anchored presence check for one segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub segment_id: SegmentId,
    pub found: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_id_validity() {
        assert!(SegmentId::new("NM1").is_valid());
        assert!(SegmentId::new("HI").is_valid());
        assert!(SegmentId::new("ISA").is_valid());
        assert!(!SegmentId::new("N").is_valid());
        assert!(!SegmentId::new("CLAIM").is_valid());
        assert!(!SegmentId::new("nm1").is_valid());
    }

    #[test]
    fn test_confidence_from_layer() {
        assert_eq!(
            Confidence::from_layer(RuleLayer::Numbered, true),
            Confidence::Exact
        );
        assert_eq!(
            Confidence::from_layer(RuleLayer::Numbered, false),
            Confidence::High
        );
        assert_eq!(
            Confidence::from_layer(RuleLayer::Generic, true),
            Confidence::Medium
        );
        assert_eq!(
            Confidence::from_layer(RuleLayer::DirectCode, false),
            Confidence::Low
        );
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::Exact > Confidence::High);
        assert!(Confidence::High > Confidence::Medium);
        assert!(Confidence::Medium > Confidence::Low);
    }
}
