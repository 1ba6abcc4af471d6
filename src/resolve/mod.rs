//! Reference resolution engine and qualifier/loop disambiguation.
//!
//! This module ties the pipeline together:
//!
//! - [`ResolverEngine`](engine::ResolverEngine): normalize, classify,
//!   and disambiguate one reference
//! - [`QualifierResolver`](qualifier::QualifierResolver): the finite
//!   per-segment dispatch from loop/qualifier context to the final
//!   search pattern
//!
//! ## Example
//!
//! ```rust,no_run
//! use edi_resolver::{ResolverEngine, SegmentRegistry};
//!
//! let registry = SegmentRegistry::load_embedded().unwrap();
//! let engine = ResolverEngine::new(&registry);
//!
//! let r = engine.resolve("2010AANM109").unwrap();
//! assert_eq!(r.segment_id.as_str(), "NM1");
//! assert_eq!(r.pattern.as_str(), "NM1*85*");
//! ```

pub mod engine;
pub mod qualifier;

pub use engine::{Resolution, ResolveError, ResolverEngine};
