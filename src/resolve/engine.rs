use serde::Serialize;
use thiserror::Error;

use crate::classify::SegmentClassifier;
use crate::core::pattern::SearchPattern;
use crate::core::reference::NormalizedReference;
use crate::core::types::{Confidence, RuleLayer, SegmentId};
use crate::normalize::{NormalizeError, ReferenceNormalizer};
use crate::registry::SegmentRegistry;
use crate::resolve::qualifier::QualifierResolver;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error(transparent)]
    Empty(#[from] NormalizeError),

    #[error("No classification rule matched reference '{0}'")]
    UnclassifiableSegment(String),
}

/// Outcome of resolving one field reference
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    /// Canonical segment tag
    pub segment_id: SegmentId,

    /// Disambiguated search pattern for the document viewer
    pub pattern: SearchPattern,

    /// How trustworthy the classification and disambiguation are
    pub confidence: Confidence,

    /// The rule layer that classified the token
    pub layer: RuleLayer,

    /// The normalized reference the result was derived from
    pub normalized: NormalizedReference,
}

/// The full resolution pipeline: normalize, classify, disambiguate.
///
/// Each reference resolves independently against the read-only
/// registry; there is no shared mutable state, so one engine can serve
/// any number of sequential or concurrent callers.
pub struct ResolverEngine<'a> {
    normalizer: ReferenceNormalizer<'a>,
    classifier: SegmentClassifier<'a>,
    qualifier: QualifierResolver<'a>,
}

impl<'a> ResolverEngine<'a> {
    pub fn new(registry: &'a SegmentRegistry) -> Self {
        Self {
            normalizer: ReferenceNormalizer::new(registry),
            classifier: SegmentClassifier::new(registry),
            qualifier: QualifierResolver::new(registry),
        }
    }

    /// Resolve one raw field reference to a segment id and search
    /// pattern.
    ///
    /// # Errors
    ///
    /// `ResolveError::Empty` if the reference reduces to nothing, or
    /// `ResolveError::UnclassifiableSegment` if no rule layer matches.
    /// Both are row-local conditions; batch callers record them and
    /// continue.
    pub fn resolve(&self, raw: &str) -> Result<Resolution, ResolveError> {
        let normalized = self.normalizer.normalize(raw)?;

        let classification = self
            .classifier
            .classify_with_fallback(&normalized.core_token, raw)
            .ok_or_else(|| ResolveError::UnclassifiableSegment(raw.trim().to_string()))?;

        let resolved = self
            .qualifier
            .resolve(&classification.segment_id, &normalized);

        let confidence =
            Confidence::from_layer(classification.layer, resolved.context_resolved);

        Ok(Resolution {
            segment_id: classification.segment_id,
            pattern: resolved.pattern,
            confidence,
            layer: classification.layer,
            normalized,
        })
    }
}
