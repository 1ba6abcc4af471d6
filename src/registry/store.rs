use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to read registry: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse registry: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Registry version for compatibility checking
pub const REGISTRY_VERSION: &str = "1.0.0";

/// One `(segment, loop prefix) -> qualifier` entry.
///
/// A `None` qualifier is a wildcard: the loop is recognized but the
/// segment resolves to its bare pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopQualifier {
    pub segment: String,
    pub loop_prefix: String,
    pub qualifier: Option<String>,

    /// Human-readable role of the loop (e.g. "Billing provider name")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Serializable registry format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryData {
    pub version: String,
    pub created_at: String,
    pub transaction_set: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub numbered_segments: Vec<String>,
    pub plain_segments: Vec<String>,
    pub two_letter_segments: Vec<String>,
    pub loop_qualifiers: Vec<LoopQualifier>,
}

/// The read-only segment registry for one X12 transaction set.
///
/// Holds the known-segment sets the classifier layers draw from, plus
/// the loop-to-qualifier table the resolver uses to disambiguate tags
/// that are reused across transaction loops. Built once at startup;
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SegmentRegistry {
    /// Transaction set this registry describes (e.g. `837P`)
    pub transaction_set: String,

    /// Registry description, if any
    pub description: Option<String>,

    /// Tags whose own spelling ends in a digit context, longest first
    /// (`NM1`, `SV1`..`SV5`, `ISA`, ...). Tried as prefixes before any
    /// generic letter split so the digit in the tag is not mis-split.
    numbered: Vec<String>,

    /// Plain three-letter tags, matched anywhere within a token
    plain: Vec<String>,

    /// Two-letter tags, matched only when followed by a digit
    two_letter: Vec<String>,

    /// All loop qualifier entries, preserved for export and listing
    loop_qualifiers: Vec<LoopQualifier>,

    /// Index: segment tag -> its loop entries, longest prefix first
    loop_index: HashMap<String, Vec<LoopQualifier>>,
}

impl SegmentRegistry {
    /// Load the embedded default registry (837 Professional)
    pub fn load_embedded() -> Result<Self, RegistryError> {
        // Embedded at compile time; validated by build.rs
        const EMBEDDED_REGISTRY: &str = include_str!("../../registries/x12_837p.json");
        Self::from_json(EMBEDDED_REGISTRY)
    }

    /// Load a registry from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a registry from a JSON string
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let data: RegistryData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != REGISTRY_VERSION {
            eprintln!(
                "Warning: Registry version mismatch (expected {}, found {})",
                REGISTRY_VERSION, data.version
            );
        }

        Ok(Self::from_data(data))
    }

    /// Build a registry from already-parsed data
    pub fn from_data(data: RegistryData) -> Self {
        let mut numbered = data.numbered_segments;
        let mut plain = data.plain_segments;
        let mut two_letter = data.two_letter_segments;

        // Longest tags first so prefix/substring scans prefer ISA over IS
        numbered.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        plain.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        two_letter.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let mut loop_index: HashMap<String, Vec<LoopQualifier>> = HashMap::new();
        for entry in &data.loop_qualifiers {
            loop_index
                .entry(entry.segment.clone())
                .or_default()
                .push(entry.clone());
        }
        // Longest prefix first so 2010AA wins over a hypothetical 2010
        for entries in loop_index.values_mut() {
            entries.sort_by(|a, b| b.loop_prefix.len().cmp(&a.loop_prefix.len()));
        }

        Self {
            transaction_set: data.transaction_set,
            description: data.description,
            numbered,
            plain,
            two_letter,
            loop_qualifiers: data.loop_qualifiers,
            loop_index,
        }
    }

    /// Numbered-segment tags, longest first
    #[must_use]
    pub fn numbered_segments(&self) -> &[String] {
        &self.numbered
    }

    /// Plain three-letter tags, longest first
    #[must_use]
    pub fn plain_segments(&self) -> &[String] {
        &self.plain
    }

    /// Two-letter tags
    #[must_use]
    pub fn two_letter_segments(&self) -> &[String] {
        &self.two_letter
    }

    /// All loop qualifier entries
    #[must_use]
    pub fn loop_qualifiers(&self) -> &[LoopQualifier] {
        &self.loop_qualifiers
    }

    /// Whether a tag appears in any known-segment set
    #[must_use]
    pub fn is_known(&self, tag: &str) -> bool {
        self.numbered.iter().any(|s| s == tag)
            || self.plain.iter().any(|s| s == tag)
            || self.two_letter.iter().any(|s| s == tag)
    }

    /// The longest known tag that prefixes `token`, if any.
    ///
    /// Used by the normalizer to decide where a loop-id prefix ends and
    /// the segment tag begins.
    #[must_use]
    pub fn known_prefix(&self, token: &str) -> Option<&str> {
        let mut best: Option<&str> = None;
        for set in [&self.numbered, &self.plain, &self.two_letter] {
            for tag in set.iter() {
                if token.starts_with(tag.as_str()) && best.map_or(true, |b| tag.len() > b.len()) {
                    best = Some(tag);
                }
            }
        }
        best
    }

    /// Look up the qualifier for a segment in a given loop.
    ///
    /// Returns `None` when no table entry matches the loop; `Some(None)`
    /// for a wildcard entry (loop recognized, bare pattern); and
    /// `Some(Some(code))` for a concrete qualifier. Matching is by
    /// longest loop prefix, so loop `2420A` hits the `2420` entry.
    #[must_use]
    pub fn loop_qualifier(&self, segment: &str, loop_id: &str) -> Option<Option<&str>> {
        let entries = self.loop_index.get(segment)?;
        entries
            .iter()
            .find(|e| loop_id.starts_with(e.loop_prefix.as_str()))
            .map(|e| e.qualifier.as_deref())
    }

    /// Export the registry to JSON
    pub fn to_json(&self) -> Result<String, RegistryError> {
        let data = RegistryData {
            version: REGISTRY_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            transaction_set: self.transaction_set.clone(),
            description: self.description.clone(),
            numbered_segments: self.numbered.clone(),
            plain_segments: self.plain.clone(),
            two_letter_segments: self.two_letter.clone(),
            loop_qualifiers: self.loop_qualifiers.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Total number of distinct known segment tags
    #[must_use]
    pub fn segment_count(&self) -> usize {
        let mut tags: Vec<&str> = self
            .numbered
            .iter()
            .chain(self.plain.iter())
            .chain(self.two_letter.iter())
            .map(String::as_str)
            .collect();
        tags.sort_unstable();
        tags.dedup();
        tags.len()
    }
}
