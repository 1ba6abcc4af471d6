use serde::{Deserialize, Serialize};

use crate::core::types::QualifierStyle;

/// A raw field reference after normalization.
///
/// The `core_token` carries the searchable part of the reference with
/// qualifier, loop id, and annotations stripped; everything removed is
/// preserved in the side fields rather than lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedReference {
    /// Uppercased token with all noise removed (e.g. `NM109`, `HI01-2`)
    pub core_token: String,

    /// Transaction loop id stripped from the front (e.g. `2010AA`, `2300`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_id: Option<String>,

    /// Qualifier code stripped from the tail (e.g. `ABK`, `434`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,

    /// How the qualifier was written in the raw reference
    #[serde(default)]
    pub qualifier_style: QualifierStyle,

    /// Discarded members of a `+`-joined compound reference.
    ///
    /// Only the first member drives resolution; the rest are alternate
    /// encodings of the same semantic field, retained for diagnostics.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternates: Vec<String>,
}

impl NormalizedReference {
    /// A bare token with no loop, qualifier, or alternates
    pub fn bare(core_token: impl Into<String>) -> Self {
        Self {
            core_token: core_token.into(),
            loop_id: None,
            qualifier: None,
            qualifier_style: QualifierStyle::None,
            alternates: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_reference() {
        let r = NormalizedReference::bare("NM109");
        assert_eq!(r.core_token, "NM109");
        assert!(r.loop_id.is_none());
        assert!(r.qualifier.is_none());
        assert_eq!(r.qualifier_style, QualifierStyle::None);
        assert!(r.alternates.is_empty());
    }
}
