//! Batch resolution over a table of field references.
//!
//! The driver walks `(display_name, reference)` rows, runs the
//! resolution pipeline on each, optionally verifies presence against a
//! document, and collects the outcomes. Every failure is row-local:
//! blank rows are skipped, references that reduce to nothing,
//! classify nowhere, or are absent from the document land on the
//! not-found list, and the batch always runs to completion.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::core::types::{Confidence, SegmentId};
use crate::resolve::engine::{Resolution, ResolveError, ResolverEngine};
use crate::registry::SegmentRegistry;
use crate::verify::Document;

/// One input row from the reference table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowInput {
    /// Output artifact label (the original tool named screenshots
    /// after this column)
    pub display_name: String,
    /// Raw field reference as authored
    pub reference: String,
}

/// Why a row ended up unresolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedKind {
    /// Reference reduced to nothing after cleanup
    Empty,
    /// No classification rule layer matched
    Unclassifiable,
    /// Classified, but the segment never starts in the document
    AbsentFromDocument,
}

/// A successfully resolved row
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedRow {
    pub display_name: String,
    pub reference: String,
    pub segment_id: SegmentId,
    pub pattern: String,
    pub confidence: Confidence,
    /// Presence verdict; `None` when no document was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found: Option<bool>,
}

/// A row that could not be resolved (or verified)
#[derive(Debug, Clone, Serialize)]
pub struct UnresolvedRow {
    pub display_name: String,
    pub reference: String,
    pub kind: UnresolvedKind,
}

impl UnresolvedRow {
    /// Operator-facing label: `display_name (reference)`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.display_name, self.reference)
    }
}

/// Aggregate outcome of a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub resolved: Vec<ResolvedRow>,
    pub unresolved: Vec<UnresolvedRow>,
    /// Rows skipped because display name or reference was blank
    pub skipped: usize,
}

impl BatchReport {
    #[must_use]
    pub fn found_count(&self) -> usize {
        self.resolved.len()
    }

    #[must_use]
    pub fn not_found_count(&self) -> usize {
        self.unresolved.len()
    }
}

/// Iterates rows and feeds each through the resolution pipeline.
pub struct BatchDriver<'a> {
    engine: ResolverEngine<'a>,
}

impl<'a> BatchDriver<'a> {
    pub fn new(registry: &'a SegmentRegistry) -> Self {
        Self {
            engine: ResolverEngine::new(registry),
        }
    }

    /// Process all rows, optionally verifying each resolved segment
    /// against `document`. Never fails: all errors are recorded
    /// per-row.
    #[must_use]
    pub fn run(&self, rows: &[RowInput], document: Option<&Document>) -> BatchReport {
        let mut report = BatchReport::default();

        for row in rows {
            let display_name = row.display_name.trim();
            let reference = row.reference.trim();
            if display_name.is_empty() || reference.is_empty() {
                report.skipped += 1;
                continue;
            }

            match self.engine.resolve(reference) {
                Ok(resolution) => {
                    self.record(&mut report, row, resolution, document);
                }
                Err(ResolveError::Empty(_)) => {
                    // Non-blank cell whose reference reduced to nothing
                    // after cleanup, e.g. a bare parenthetical
                    report.unresolved.push(UnresolvedRow {
                        display_name: display_name.to_string(),
                        reference: reference.to_string(),
                        kind: UnresolvedKind::Empty,
                    });
                }
                Err(ResolveError::UnclassifiableSegment(_)) => {
                    debug!(reference, "no rule layer matched");
                    report.unresolved.push(UnresolvedRow {
                        display_name: display_name.to_string(),
                        reference: reference.to_string(),
                        kind: UnresolvedKind::Unclassifiable,
                    });
                }
            }
        }

        report
    }

    fn record(
        &self,
        report: &mut BatchReport,
        row: &RowInput,
        resolution: Resolution,
        document: Option<&Document>,
    ) {
        let found = document.map(|doc| doc.contains_segment(&resolution.segment_id));

        // A segment the document never starts is a not-found outcome,
        // with the reference retained for the operator report
        if found == Some(false) {
            report.unresolved.push(UnresolvedRow {
                display_name: row.display_name.trim().to_string(),
                reference: row.reference.trim().to_string(),
                kind: UnresolvedKind::AbsentFromDocument,
            });
            return;
        }

        report.resolved.push(ResolvedRow {
            display_name: row.display_name.trim().to_string(),
            reference: row.reference.trim().to_string(),
            segment_id: resolution.segment_id,
            pattern: resolution.pattern.as_str().to_string(),
            confidence: resolution.confidence,
            found,
        });
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowRangeError {
    #[error("Invalid range format: '{0}'. Expected 'start-end', 'start-', '-end', or a row number")]
    InvalidFormat(String),
}

/// A 1-based inclusive row range filter (`1-10`, `5-`, `-20`, `7`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    start: Option<usize>,
    end: Option<usize>,
}

impl FromStr for RowRange {
    type Err = RowRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RowRangeError::InvalidFormat(s.to_string()));
        }

        if let Some((start, end)) = s.split_once('-') {
            let parse = |part: &str| -> Result<Option<usize>, RowRangeError> {
                if part.is_empty() {
                    Ok(None)
                } else {
                    part.parse()
                        .map(Some)
                        .map_err(|_| RowRangeError::InvalidFormat(s.to_string()))
                }
            };
            Ok(Self {
                start: parse(start)?,
                end: parse(end)?,
            })
        } else {
            let row: usize = s
                .parse()
                .map_err(|_| RowRangeError::InvalidFormat(s.to_string()))?;
            Ok(Self {
                start: Some(row),
                end: Some(row),
            })
        }
    }
}

impl RowRange {
    /// Select the rows the range covers. An inverted or out-of-bounds
    /// range degrades to the full slice rather than failing the batch.
    #[must_use]
    pub fn apply<'r>(&self, rows: &'r [RowInput]) -> &'r [RowInput] {
        let start = self.start.unwrap_or(1).saturating_sub(1);
        let end = self.end.unwrap_or(rows.len()).min(rows.len());

        if start >= end {
            tracing::warn!(?self, "invalid row range; processing all rows");
            return rows;
        }
        &rows[start..end]
    }
}
