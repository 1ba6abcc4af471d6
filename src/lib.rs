//! # edi-resolver
//!
//! A library for resolving human-authored EDI field references to canonical
//! segment identifiers and search patterns.
//!
//! Field mapping documents for X12 837P claims refer to fields in loose,
//! inconsistent shorthand: "`2010AANM109`", "`2300HI01-2 -- BK/ABK`",
//! "`BHT03`". The segment tag is buried inside loop prefixes, element
//! suffixes, and qualifier annotations, and the same tag (NM1, REF, DTP)
//! plays a dozen different roles depending on its transaction loop.
//!
//! `edi-resolver` solves this by normalizing the reference, classifying the
//! embedded segment tag against a registry of known segments, and using
//! loop/qualifier context to produce a search pattern precise enough to
//! locate the right occurrence in a raw EDI document.
//!
//! ## Features
//!
//! - **Reference normalization**: Strips loop prefixes, element suffixes,
//!   parentheticals, and qualifier annotations in any of their common shapes
//! - **Layered classification**: Six ordered rule layers, from exact
//!   numbered-segment prefixes down to a direct-code fallback
//! - **Loop disambiguation**: Maps loop context to the qualifier that
//!   separates a billing provider (`NM1*85*`) from a subscriber (`NM1*IL*`)
//! - **Document verification**: Anchored segment search that never matches
//!   mid-segment text
//! - **Batch mode**: Resolve a whole mapping table at once, with per-row
//!   error isolation
//!
//! ## Example
//!
//! ```rust,no_run
//! use edi_resolver::{ResolverEngine, SegmentRegistry};
//!
//! // Load the embedded 837P registry
//! let registry = SegmentRegistry::load_embedded().unwrap();
//!
//! // Resolve a reference with loop context
//! let engine = ResolverEngine::new(&registry);
//! let r = engine.resolve("2010AANM109").unwrap();
//!
//! assert_eq!(r.segment_id.as_str(), "NM1");
//! assert_eq!(r.pattern.as_str(), "NM1*85*");
//! println!("{} -> {} ({})", "2010AANM109", r.pattern, r.confidence);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core data types for segments, references, and patterns
//! - [`registry`]: Segment registry storage and loop-qualifier indexing
//! - [`normalize`]: Reference normalization
//! - [`classify`]: Layered segment classification
//! - [`resolve`]: Resolution engine and qualifier/loop dispatch
//! - [`verify`]: Anchored document verification
//! - [`batch`]: Batch driver for reference tables
//! - [`parsing`]: Parsers for reference table files
//! - [`cli`]: Command-line interface implementation

pub mod batch;
pub mod classify;
pub mod cli;
pub mod core;
pub mod normalize;
pub mod parsing;
pub mod registry;
pub mod resolve;
pub mod verify;

// Re-export commonly used types for convenience
pub use batch::{BatchDriver, BatchReport, RowInput};
pub use classify::SegmentClassifier;
pub use core::pattern::SearchPattern;
pub use core::reference::NormalizedReference;
pub use core::types::*;
pub use normalize::ReferenceNormalizer;
pub use registry::store::SegmentRegistry;
pub use resolve::engine::{Resolution, ResolverEngine};
pub use verify::Document;
