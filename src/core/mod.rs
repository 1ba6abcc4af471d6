//! Core data types for EDI field-reference resolution.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`SegmentId`](types::SegmentId): A canonical segment tag (`NM1`, `HI`, `DTP`)
//! - [`NormalizedReference`](reference::NormalizedReference): A raw reference after noise stripping
//! - [`SearchPattern`](pattern::SearchPattern): The final delimiter-anchored search string
//! - [`Confidence`](types::Confidence), [`RuleLayer`](types::RuleLayer): Result classification types
//!
//! ## Reference anatomy
//!
//! A human-authored field reference mixes several notations:
//!
//! | Example | Loop | Token | Qualifier |
//! |---------|------|-------|-----------|
//! | `BHT03` | — | `BHT03` | — |
//! | `2010AANM109` | `2010AA` | `NM109` | — |
//! | `2300HI01-2 -- BE` | `2300` | `HI01-2` | `BE` |
//! | `2400SV202-3` | `2400` | `SV202-3` | — |
//!
//! Loop ids are syntactic prefixes, never segments; qualifiers narrow the
//! meaning of a tag that is reused across loops.

pub mod pattern;
pub mod reference;
pub mod types;
