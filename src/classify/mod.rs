//! Segment classification: normalized token to canonical segment tag.
//!
//! Classification runs an ordered list of matcher strategies, each
//! implementing [`SegmentMatcher`]; layers are tried in strict priority
//! order and the first success wins. The numbered-segment layer runs
//! before any generic letter split because tags like `NM1` and `SV2`
//! contain digits that a naive letters/digits split would misplace.
//!
//! ```rust,no_run
//! use edi_resolver::{SegmentClassifier, SegmentRegistry};
//!
//! let registry = SegmentRegistry::load_embedded().unwrap();
//! let classifier = SegmentClassifier::new(&registry);
//!
//! let c = classifier.classify("NM109").unwrap();
//! assert_eq!(c.segment_id.as_str(), "NM1");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::types::{RuleLayer, SegmentId};
use crate::registry::SegmentRegistry;

/// A successful classification: which tag, and which rule layer found it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub segment_id: SegmentId,
    pub layer: RuleLayer,
}

/// One rule layer in the classifier chain
pub trait SegmentMatcher {
    /// The layer this matcher implements
    fn layer(&self) -> RuleLayer;

    /// Attempt to classify `token`; `None` passes control to the next layer
    fn attempt(&self, token: &str, registry: &SegmentRegistry) -> Option<SegmentId>;
}

/// Optional `element` or `element-subelement` numeric suffix
static ELEMENT_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(-\d+)?$").unwrap());

/// Letters-then-digits generic shape
static GENERIC_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Z]+)\d+(-\d+)?$").unwrap());

/// Generic shape allowing a digit inside the tag (`N101` -> `N1`)
static EMBEDDED_DIGIT_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]+\d?[A-Z]*)\d+(-\d+)?$").unwrap());

/// Direct field-code shape: a short tag, optionally followed by digits
static DIRECT_CODE_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Z]{2,4})(\d|$)").unwrap());

/// Layer 1: known numbered-segment tag as prefix, remainder an optional
/// numeric element suffix
struct NumberedPrefixMatcher;

impl SegmentMatcher for NumberedPrefixMatcher {
    fn layer(&self) -> RuleLayer {
        RuleLayer::Numbered
    }

    fn attempt(&self, token: &str, registry: &SegmentRegistry) -> Option<SegmentId> {
        for tag in registry.numbered_segments() {
            if let Some(rest) = token.strip_prefix(tag.as_str()) {
                if rest.is_empty() || ELEMENT_SUFFIX.is_match(rest) {
                    return Some(SegmentId::new(tag.clone()));
                }
            }
        }
        None
    }
}

/// Layer 2: known plain three-letter tag anywhere within the token.
/// Substring matching tolerates loop prefixes the normalizer left in.
struct PlainSubstringMatcher;

impl SegmentMatcher for PlainSubstringMatcher {
    fn layer(&self) -> RuleLayer {
        RuleLayer::Plain
    }

    fn attempt(&self, token: &str, registry: &SegmentRegistry) -> Option<SegmentId> {
        registry
            .plain_segments()
            .iter()
            .find(|tag| token.contains(tag.as_str()))
            .map(SegmentId::new)
    }
}

/// Layer 3: known two-letter tag, only when immediately followed by a
/// digit so arbitrary substrings do not fire
struct TwoLetterMatcher;

impl SegmentMatcher for TwoLetterMatcher {
    fn layer(&self) -> RuleLayer {
        RuleLayer::TwoLetter
    }

    fn attempt(&self, token: &str, registry: &SegmentRegistry) -> Option<SegmentId> {
        for tag in registry.two_letter_segments() {
            for (pos, _) in token.match_indices(tag.as_str()) {
                let next = token[pos + tag.len()..].chars().next();
                if next.is_some_and(|c| c.is_ascii_digit()) {
                    return Some(SegmentId::new(tag.clone()));
                }
            }
        }
        None
    }
}

/// Layer 4: generic letters-then-digits split
struct GenericShapeMatcher;

impl SegmentMatcher for GenericShapeMatcher {
    fn layer(&self) -> RuleLayer {
        RuleLayer::Generic
    }

    fn attempt(&self, token: &str, _registry: &SegmentRegistry) -> Option<SegmentId> {
        let caps = GENERIC_SHAPE.captures(token)?;
        let candidate = SegmentId::new(&caps[1]);
        candidate.is_valid().then_some(candidate)
    }
}

/// Layer 5: generic split allowing one digit inside the tag, accepted
/// only when the candidate reconciles against the registry
struct EmbeddedDigitMatcher;

impl SegmentMatcher for EmbeddedDigitMatcher {
    fn layer(&self) -> RuleLayer {
        RuleLayer::EmbeddedDigit
    }

    fn attempt(&self, token: &str, registry: &SegmentRegistry) -> Option<SegmentId> {
        let caps = EMBEDDED_DIGIT_SHAPE.captures(token)?;
        let candidate = &caps[1];
        registry.is_known(candidate).then(|| SegmentId::new(candidate))
    }
}

/// Classifies normalized tokens against the registry's segment sets.
pub struct SegmentClassifier<'a> {
    registry: &'a SegmentRegistry,
    matchers: Vec<Box<dyn SegmentMatcher + Send + Sync>>,
}

impl<'a> SegmentClassifier<'a> {
    pub fn new(registry: &'a SegmentRegistry) -> Self {
        Self {
            registry,
            matchers: vec![
                Box::new(NumberedPrefixMatcher),
                Box::new(PlainSubstringMatcher),
                Box::new(TwoLetterMatcher),
                Box::new(GenericShapeMatcher),
                Box::new(EmbeddedDigitMatcher),
            ],
        }
    }

    /// Classify a normalized core token (rule layers 1-5).
    ///
    /// The first layer to match wins; the tag is never re-derived from
    /// a later layer.
    #[must_use]
    pub fn classify(&self, core_token: &str) -> Option<Classification> {
        self.matchers.iter().find_map(|matcher| {
            matcher.attempt(core_token, self.registry).map(|segment_id| {
                Classification {
                    segment_id,
                    layer: matcher.layer(),
                }
            })
        })
    }

    /// Classify with the direct field-code fallback (rule layer 6).
    ///
    /// When the normalized token fails layers 1-5, the whole original
    /// reference is retried as a direct code; short references like
    /// `BHT03` arrive through CLI paths without loop or qualifier
    /// context and classify this way.
    #[must_use]
    pub fn classify_with_fallback(
        &self,
        core_token: &str,
        original: &str,
    ) -> Option<Classification> {
        self.classify(core_token)
            .or_else(|| self.classify_direct(original))
    }

    /// Direct field-code classification: numbered and plain layers as
    /// prefixes, no loop handling, plus a last-resort bare tag split.
    #[must_use]
    pub fn classify_direct(&self, code: &str) -> Option<Classification> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return None;
        }

        // Numbered tags keep their digit with the tag
        for tag in self.registry.numbered_segments() {
            if let Some(rest) = code.strip_prefix(tag.as_str()) {
                if rest.is_empty() || ELEMENT_SUFFIX.is_match(rest) {
                    return Some(Classification {
                        segment_id: SegmentId::new(tag.clone()),
                        layer: RuleLayer::DirectCode,
                    });
                }
            }
        }

        // Plain tags as prefixes; no loop ids exist in this path
        for tag in self.registry.plain_segments() {
            if code.starts_with(tag.as_str()) {
                return Some(Classification {
                    segment_id: SegmentId::new(tag.clone()),
                    layer: RuleLayer::DirectCode,
                });
            }
        }

        // Bare short tag, optionally followed by an element number
        let caps = DIRECT_CODE_SHAPE.captures(&code)?;
        Some(Classification {
            segment_id: SegmentId::new(&caps[1]),
            layer: RuleLayer::DirectCode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier_fixture() -> SegmentRegistry {
        SegmentRegistry::load_embedded().unwrap()
    }

    #[test]
    fn test_numbered_prefix_classification() {
        let registry = classifier_fixture();
        let c = SegmentClassifier::new(&registry);

        let r = c.classify("NM109").unwrap();
        assert_eq!(r.segment_id.as_str(), "NM1");
        assert_eq!(r.layer, RuleLayer::Numbered);

        let r = c.classify("SV202-3").unwrap();
        assert_eq!(r.segment_id.as_str(), "SV2");

        let r = c.classify("HI01-2").unwrap();
        assert_eq!(r.segment_id.as_str(), "HI");

        let r = c.classify("ISA06").unwrap();
        assert_eq!(r.segment_id.as_str(), "ISA");
    }

    #[test]
    fn test_numbered_set_two_digit_suffixes() {
        // Every numbered tag followed by exactly 2 digits yields that tag
        let registry = classifier_fixture();
        let c = SegmentClassifier::new(&registry);

        for tag in registry.numbered_segments() {
            let token = format!("{tag}01");
            let r = c.classify(&token).unwrap();
            assert_eq!(r.segment_id.as_str(), tag.as_str(), "token {token}");
            assert_eq!(r.layer, RuleLayer::Numbered, "token {token}");
        }
    }

    #[test]
    fn test_plain_substring_classification() {
        let registry = classifier_fixture();
        let c = SegmentClassifier::new(&registry);

        let r = c.classify("CLM05").unwrap();
        assert_eq!(r.segment_id.as_str(), "CLM");
        assert_eq!(r.layer, RuleLayer::Plain);

        let r = c.classify("BHT03").unwrap();
        assert_eq!(r.segment_id.as_str(), "BHT");

        // Loop prefix left in the token still matches
        let r = c.classify("2300CLM05").unwrap();
        assert_eq!(r.segment_id.as_str(), "CLM");
    }

    #[test]
    fn test_two_letter_requires_following_digit() {
        let registry = classifier_fixture();
        let c = SegmentClassifier::new(&registry);

        let r = c.classify("N301").unwrap();
        assert_eq!(r.segment_id.as_str(), "N3");
        assert_eq!(r.layer, RuleLayer::TwoLetter);

        // N4 with no digit after it must not fire layer 3
        assert!(c.classify("N4").is_none() || c.classify("N4").unwrap().layer != RuleLayer::TwoLetter);
    }

    #[test]
    fn test_generic_shape_classification() {
        let registry = classifier_fixture();
        let c = SegmentClassifier::new(&registry);

        // Unknown but segment-shaped token
        let r = c.classify("XYZ12").unwrap();
        assert_eq!(r.segment_id.as_str(), "XYZ");
        assert_eq!(r.layer, RuleLayer::Generic);

        let r = c.classify("AB12-3").unwrap();
        assert_eq!(r.segment_id.as_str(), "AB");
    }

    #[test]
    fn test_embedded_digit_tag() {
        let registry = classifier_fixture();
        let c = SegmentClassifier::new(&registry);

        // Tags with a digit inside (N1) resolve through the registry
        let r = c.classify("N101").unwrap();
        assert_eq!(r.segment_id.as_str(), "N1");

        // Q9 is not a known tag; single leading letter also fails the
        // generic shape, so classification fails outright
        assert!(c.classify("Q901").is_none());
    }

    #[test]
    fn test_unclassifiable_token() {
        let registry = classifier_fixture();
        let c = SegmentClassifier::new(&registry);

        assert!(c.classify("12345").is_none());
        assert!(c.classify("???").is_none());
    }

    #[test]
    fn test_direct_code_classification() {
        let registry = classifier_fixture();
        let c = SegmentClassifier::new(&registry);

        let r = c.classify_direct("BHT03").unwrap();
        assert_eq!(r.segment_id.as_str(), "BHT");
        assert_eq!(r.layer, RuleLayer::DirectCode);

        let r = c.classify_direct("nm109").unwrap();
        assert_eq!(r.segment_id.as_str(), "NM1");

        // Unknown short tag still splits
        let r = c.classify_direct("ZZ01").unwrap();
        assert_eq!(r.segment_id.as_str(), "ZZ");
    }

    #[test]
    fn test_fallback_uses_original_reference() {
        let registry = classifier_fixture();
        let c = SegmentClassifier::new(&registry);

        // A token that fails layers 1-5 falls back to the original
        let r = c.classify_with_fallback("-", "BHT03").unwrap();
        assert_eq!(r.segment_id.as_str(), "BHT");
        assert_eq!(r.layer, RuleLayer::DirectCode);
    }
}
