use tracing::warn;

use crate::core::pattern::SearchPattern;
use crate::core::reference::NormalizedReference;
use crate::core::types::SegmentId;
use crate::registry::SegmentRegistry;

/// Builds the final disambiguated search pattern for a classified
/// segment from its loop and qualifier context.
///
/// Dispatch is a finite per-segment table: exactly one rule applies per
/// segment id. Tags like `NM1` are reused across dozens of loop roles,
/// and the loop/qualifier context is the only signal separating
/// "billing provider name" from "subscriber name", so each context-
/// sensitive segment gets its own explicit rule; everything else
/// resolves to the bare `<tag>*` pattern.
pub struct QualifierResolver<'a> {
    registry: &'a SegmentRegistry,
}

/// A resolved pattern plus whether loop/qualifier context refined it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPattern {
    pub pattern: SearchPattern,
    /// True when the registry table or a qualifier rule produced a
    /// narrower pattern than the bare tag
    pub context_resolved: bool,
}

impl ResolvedPattern {
    fn bare(segment: &SegmentId) -> Self {
        Self {
            pattern: SearchPattern::bare(segment),
            context_resolved: false,
        }
    }

    fn refined(pattern: SearchPattern) -> Self {
        Self {
            pattern,
            context_resolved: true,
        }
    }
}

impl<'a> QualifierResolver<'a> {
    pub fn new(registry: &'a SegmentRegistry) -> Self {
        Self { registry }
    }

    /// Resolve the search pattern for `segment` given the normalized
    /// reference's loop and qualifier context.
    ///
    /// A qualifier that matches no dispatch rule degrades to the bare
    /// pattern; that is never an error (the batch must not stop), but
    /// it is logged for operator review.
    #[must_use]
    pub fn resolve(
        &self,
        segment: &SegmentId,
        normalized: &NormalizedReference,
    ) -> ResolvedPattern {
        match segment.as_str() {
            // Loop-table segments: the loop id selects the qualifier
            "NM1" | "REF" => self.loop_table_pattern(segment, normalized),
            "HI" => hi_pattern(segment, normalized),
            "DTP" => dtp_pattern(segment, normalized),
            "LIN" => lin_pattern(segment, normalized),
            _ => {
                if let Some(qualifier) = &normalized.qualifier {
                    warn!(
                        segment = %segment,
                        qualifier,
                        "no dispatch rule consumes this qualifier; using bare pattern"
                    );
                }
                ResolvedPattern::bare(segment)
            }
        }
    }

    fn loop_table_pattern(
        &self,
        segment: &SegmentId,
        normalized: &NormalizedReference,
    ) -> ResolvedPattern {
        let Some(loop_id) = &normalized.loop_id else {
            return ResolvedPattern::bare(segment);
        };

        match self.registry.loop_qualifier(segment.as_str(), loop_id) {
            Some(Some(code)) => {
                ResolvedPattern::refined(SearchPattern::with_suffix(segment, &format!("{code}*")))
            }
            // Wildcard entry: loop recognized, but any qualifier matches
            Some(None) => ResolvedPattern {
                pattern: SearchPattern::bare(segment),
                context_resolved: true,
            },
            None => {
                warn!(
                    segment = %segment,
                    loop_id,
                    "loop id has no registry entry; using bare pattern"
                );
                ResolvedPattern::bare(segment)
            }
        }
    }
}

/// `HI`: the diagnosis-code qualifier narrows the pattern. A
/// `/`-separated list keeps the last code (the one the document uses).
fn hi_pattern(segment: &SegmentId, normalized: &NormalizedReference) -> ResolvedPattern {
    match &normalized.qualifier {
        Some(qualifier) => {
            let code = qualifier.rsplit('/').next().unwrap_or(qualifier.as_str());
            ResolvedPattern::refined(SearchPattern::with_suffix(segment, code))
        }
        None => ResolvedPattern::bare(segment),
    }
}

/// `DTP`: date qualifiers are numeric date-type codes, optionally with
/// an `RD8` range-format marker (`DTP*300*RD8`).
fn dtp_pattern(segment: &SegmentId, normalized: &NormalizedReference) -> ResolvedPattern {
    let Some(qualifier) = &normalized.qualifier else {
        return ResolvedPattern::bare(segment);
    };

    let digits: String = qualifier
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();

    if qualifier.contains("RD8") {
        return ResolvedPattern::refined(SearchPattern::with_suffix(
            segment,
            &format!("{digits}*RD8"),
        ));
    }

    if digits.is_empty() {
        warn!(
            segment = %segment,
            qualifier,
            "DTP qualifier has no date-type digits; using bare pattern"
        );
        return ResolvedPattern::bare(segment);
    }

    ResolvedPattern::refined(SearchPattern::with_suffix(segment, &format!("{digits}*")))
}

/// `LIN`: drug identification lines carry the `N4` qualifier in the
/// second element (`LIN**N4*`).
fn lin_pattern(segment: &SegmentId, normalized: &NormalizedReference) -> ResolvedPattern {
    match &normalized.qualifier {
        Some(qualifier) if qualifier.contains("N4") => {
            ResolvedPattern::refined(SearchPattern::with_suffix(segment, "*N4*"))
        }
        Some(qualifier) => {
            warn!(
                segment = %segment,
                qualifier,
                "unrecognized LIN qualifier; using bare pattern"
            );
            ResolvedPattern::bare(segment)
        }
        None => ResolvedPattern::bare(segment),
    }
}
