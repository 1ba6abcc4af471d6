//! Reference normalization: strip noise from raw field references.
//!
//! Human-authored references mix the searchable token with loop ids,
//! qualifier codes, parenthetical commentary, and conditional clauses:
//!
//! ```text
//! 2300HI01-2 -- BK/ABK
//! CLM05 - BG (place of service)
//! 2400DTP03 when claim is anesthesia
//! 2010AANM109 + 2010BANM109
//! ```
//!
//! [`ReferenceNormalizer`] rewrites the working string step by step,
//! preserving everything it removes as side fields on the resulting
//! [`NormalizedReference`]. Extraction order matters: compound split,
//! trailing qualifier, attached HI qualifier, loop-id prefix,
//! annotations, then case folding.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::core::reference::NormalizedReference;
use crate::core::types::QualifierStyle;
use crate::registry::SegmentRegistry;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Reference is empty after cleanup")]
    EmptyReference,
}

/// Trailing qualifier after a double dash: ` -- BK/ABK`, ` -- 300 RD8`
static DOUBLE_DASH_QUALIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s--\s*([A-Za-z0-9]{2,4}(?:[/ ][A-Za-z0-9]{2,4})*)\s*$").unwrap()
});

/// Trailing qualifier after a spaced single dash: ` - BG`
static SPACED_DASH_QUALIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s-\s+([A-Za-z0-9]{2,4})\s*$").unwrap());

/// Trailing qualifier glued to a dash after a space: ` -BG`
static GLUED_DASH_QUALIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s-([A-Za-z0-9]{2,4})\s*$").unwrap());

/// Qualifier glued to an HI element suffix with no separator: `HI01-2-ABJ`
static ATTACHED_HI_QUALIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(HI\d+(?:-\d+)?)-([A-Za-z]{2,4})\s*$").unwrap());

/// Parenthetical commentary at the end of a reference
static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\([^)]*\)\s*$").unwrap());

/// Trailing `when ...` conditional clause
static WHEN_CLAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+when\s.*$").unwrap());

/// Normalizes raw references into searchable tokens plus side data.
///
/// The registry is consulted when deciding where a loop-id prefix ends:
/// `2010AANM109` splits as loop `2010AA` + token `NM109` because `NM1`
/// is a known tag, while `2300HI01-2` keeps `HI` with the token.
pub struct ReferenceNormalizer<'a> {
    registry: &'a SegmentRegistry,
}

impl<'a> ReferenceNormalizer<'a> {
    pub fn new(registry: &'a SegmentRegistry) -> Self {
        Self { registry }
    }

    /// Normalize one raw reference.
    ///
    /// # Errors
    ///
    /// Returns `NormalizeError::EmptyReference` if the input trims or
    /// reduces to nothing; every other input normalizes successfully,
    /// extraction steps simply become no-ops.
    pub fn normalize(&self, raw: &str) -> Result<NormalizedReference, NormalizeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NormalizeError::EmptyReference);
        }

        // Compound lists join alternate encodings of the same semantic
        // field; the first member drives resolution
        let mut alternates = Vec::new();
        let mut working = if trimmed.contains('+') {
            let mut members = trimmed.split('+').map(str::trim);
            let first = members.next().unwrap_or_default().to_string();
            alternates.extend(
                members
                    .filter(|m| !m.is_empty())
                    .map(std::string::ToString::to_string),
            );
            first
        } else {
            trimmed.to_string()
        };

        let (mut qualifier, mut qualifier_style) = (None, QualifierStyle::None);

        // Three mutually exclusive trailing-qualifier shapes, in
        // priority order; at most one fires per reference
        for (pattern, style) in [
            (&*DOUBLE_DASH_QUALIFIER, QualifierStyle::DoubleDash),
            (&*SPACED_DASH_QUALIFIER, QualifierStyle::Dash),
            (&*GLUED_DASH_QUALIFIER, QualifierStyle::Dash),
        ] {
            if let Some(caps) = pattern.captures(&working) {
                let mut code = caps[1].to_uppercase();
                // A /-separated list carries alternate codes; the last
                // one is the code actually used in the document
                if style == QualifierStyle::DoubleDash && code.contains('/') {
                    if let Some(last) = code.rsplit('/').next() {
                        code = last.to_string();
                    }
                }
                working = working[..caps.get(0).map_or(0, |m| m.start())].to_string();
                qualifier = Some(code);
                qualifier_style = style;
                break;
            }
        }

        // HI diagnosis references sometimes glue the qualifier straight
        // onto the element suffix: HI01-2-ABJ
        if qualifier.is_none() {
            let cut = ATTACHED_HI_QUALIFIER
                .captures(&working)
                .and_then(|caps| caps.get(2))
                .map(|m| (m.start(), m.as_str().to_uppercase()));
            if let Some((start, code)) = cut {
                working.truncate(start - 1);
                qualifier = Some(code);
                qualifier_style = QualifierStyle::Attached;
            }
        }

        // Annotations are never part of the searchable token
        working = PARENTHETICAL.replace(&working, "").into_owned();
        working = WHEN_CLAUSE.replace(&working, "").into_owned();

        let mut token = working.trim().to_uppercase();

        // Leading loop-id prefix: 4 digits plus up to 2 letters
        let loop_id = strip_loop_prefix(&mut token, self.registry);

        if token.is_empty() {
            return Err(NormalizeError::EmptyReference);
        }

        debug!(
            raw,
            core_token = %token,
            loop_id = ?loop_id,
            qualifier = ?qualifier,
            "normalized reference"
        );

        Ok(NormalizedReference {
            core_token: token,
            loop_id,
            qualifier,
            qualifier_style,
            alternates,
        })
    }
}

/// Strip a leading loop id from `token`, returning it if present.
///
/// A loop id is 4 digits followed by up to 2 uppercase letters, but the
/// letters are ambiguous with the start of the segment tag. The split
/// keeping the most loop letters whose remainder still starts with a
/// known tag wins; if no split produces a known tag, only the digits
/// are stripped.
fn strip_loop_prefix(token: &mut String, registry: &SegmentRegistry) -> Option<String> {
    let bytes = token.as_bytes();
    if bytes.len() < 4 || !bytes[..4].iter().all(u8::is_ascii_digit) {
        return None;
    }

    let rest = &token[4..];
    let letter_run = rest
        .chars()
        .take_while(char::is_ascii_uppercase)
        .count()
        .min(2);

    for take in (0..=letter_run).rev() {
        if registry.known_prefix(&rest[take..]).is_some() {
            let loop_id = token[..4 + take].to_string();
            *token = token[4 + take..].to_string();
            return Some(loop_id);
        }
    }

    // No known tag after any split; treat the bare digits as the loop
    let loop_id = token[..4].to_string();
    *token = token[4..].to_string();
    Some(loop_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer_fixture() -> SegmentRegistry {
        SegmentRegistry::load_embedded().unwrap()
    }

    #[test]
    fn test_plain_reference_passes_through() {
        let registry = normalizer_fixture();
        let n = ReferenceNormalizer::new(&registry);

        let r = n.normalize("BHT03").unwrap();
        assert_eq!(r.core_token, "BHT03");
        assert!(r.loop_id.is_none());
        assert!(r.qualifier.is_none());
    }

    #[test]
    fn test_double_dash_qualifier() {
        let registry = normalizer_fixture();
        let n = ReferenceNormalizer::new(&registry);

        let r = n.normalize("2300HI01-2 -- BE").unwrap();
        assert_eq!(r.core_token, "HI01-2");
        assert_eq!(r.loop_id.as_deref(), Some("2300"));
        assert_eq!(r.qualifier.as_deref(), Some("BE"));
        assert_eq!(r.qualifier_style, QualifierStyle::DoubleDash);
    }

    #[test]
    fn test_double_dash_keeps_last_slash_segment() {
        let registry = normalizer_fixture();
        let n = ReferenceNormalizer::new(&registry);

        let r = n.normalize("2300HI01-2 -- BK/ABK").unwrap();
        assert_eq!(r.core_token, "HI01-2");
        assert_eq!(r.loop_id.as_deref(), Some("2300"));
        assert_eq!(r.qualifier.as_deref(), Some("ABK"));
    }

    #[test]
    fn test_spaced_dash_qualifier() {
        let registry = normalizer_fixture();
        let n = ReferenceNormalizer::new(&registry);

        let r = n.normalize("CLM05 - BG").unwrap();
        assert_eq!(r.core_token, "CLM05");
        assert_eq!(r.qualifier.as_deref(), Some("BG"));
        assert_eq!(r.qualifier_style, QualifierStyle::Dash);
    }

    #[test]
    fn test_glued_dash_qualifier() {
        let registry = normalizer_fixture();
        let n = ReferenceNormalizer::new(&registry);

        let r = n.normalize("CLM05 -BG").unwrap();
        assert_eq!(r.core_token, "CLM05");
        assert_eq!(r.qualifier.as_deref(), Some("BG"));
        assert_eq!(r.qualifier_style, QualifierStyle::Dash);
    }

    #[test]
    fn test_attached_hi_qualifier() {
        let registry = normalizer_fixture();
        let n = ReferenceNormalizer::new(&registry);

        let r = n.normalize("2300HI01-2-ABJ").unwrap();
        assert_eq!(r.core_token, "HI01-2");
        assert_eq!(r.loop_id.as_deref(), Some("2300"));
        assert_eq!(r.qualifier.as_deref(), Some("ABJ"));
        assert_eq!(r.qualifier_style, QualifierStyle::Attached);
    }

    #[test]
    fn test_element_suffix_not_taken_as_qualifier() {
        let registry = normalizer_fixture();
        let n = ReferenceNormalizer::new(&registry);

        // -3 is a subelement index, not a qualifier
        let r = n.normalize("2400SV202-3").unwrap();
        assert_eq!(r.core_token, "SV202-3");
        assert_eq!(r.loop_id.as_deref(), Some("2400"));
        assert!(r.qualifier.is_none());
    }

    #[test]
    fn test_loop_prefix_with_letters() {
        let registry = normalizer_fixture();
        let n = ReferenceNormalizer::new(&registry);

        let r = n.normalize("2010AANM109").unwrap();
        assert_eq!(r.core_token, "NM109");
        assert_eq!(r.loop_id.as_deref(), Some("2010AA"));
    }

    #[test]
    fn test_loop_prefix_unknown_segment_strips_digits_only() {
        let registry = normalizer_fixture();
        let n = ReferenceNormalizer::new(&registry);

        let r = n.normalize("2300XX01").unwrap();
        assert_eq!(r.core_token, "XX01");
        assert_eq!(r.loop_id.as_deref(), Some("2300"));
    }

    #[test]
    fn test_parenthetical_and_when_clause_stripped() {
        let registry = normalizer_fixture();
        let n = ReferenceNormalizer::new(&registry);

        let r = n.normalize("CLM05 (place of service)").unwrap();
        assert_eq!(r.core_token, "CLM05");

        let r = n.normalize("2400DTP03 when claim is anesthesia").unwrap();
        assert_eq!(r.core_token, "DTP03");
        assert_eq!(r.loop_id.as_deref(), Some("2400"));
    }

    #[test]
    fn test_compound_keeps_first_preserves_rest() {
        let registry = normalizer_fixture();
        let n = ReferenceNormalizer::new(&registry);

        let r = n.normalize("2010AANM109 + 2010BANM109").unwrap();
        assert_eq!(r.core_token, "NM109");
        assert_eq!(r.loop_id.as_deref(), Some("2010AA"));
        assert_eq!(r.alternates, vec!["2010BANM109".to_string()]);
    }

    #[test]
    fn test_empty_reference_fails() {
        let registry = normalizer_fixture();
        let n = ReferenceNormalizer::new(&registry);

        assert_eq!(n.normalize(""), Err(NormalizeError::EmptyReference));
        assert_eq!(n.normalize("   "), Err(NormalizeError::EmptyReference));
    }

    #[test]
    fn test_lowercase_input_is_folded() {
        let registry = normalizer_fixture();
        let n = ReferenceNormalizer::new(&registry);

        let r = n.normalize("bht03").unwrap();
        assert_eq!(r.core_token, "BHT03");
    }

    #[test]
    fn test_normalization_idempotent_on_core_tokens() {
        let registry = normalizer_fixture();
        let n = ReferenceNormalizer::new(&registry);

        for token in ["NM109", "HI01-2", "CLM05", "SV202-3", "BHT03"] {
            let once = n.normalize(token).unwrap();
            let twice = n.normalize(&once.core_token).unwrap();
            assert_eq!(once.core_token, twice.core_token);
            assert!(twice.qualifier.is_none());
            assert!(twice.loop_id.is_none());
        }
    }
}
