//! Segment registry storage and lookup.
//!
//! The registry encodes the domain knowledge for one X12 transaction
//! set: which segment tags exist (split into the sets the classifier
//! layers need) and which transaction loop maps to which qualifier
//! code. An 837 Professional registry is compiled into the binary, but
//! custom registries can be loaded from JSON files.
//!
//! ## Example
//!
//! ```rust,no_run
//! use edi_resolver::SegmentRegistry;
//!
//! // Load the embedded 837P registry
//! let registry = SegmentRegistry::load_embedded().unwrap();
//!
//! // Billing provider loop selects entity qualifier 85
//! assert_eq!(registry.loop_qualifier("NM1", "2010AA"), Some(Some("85")));
//! ```
//!
//! ## Custom registries
//!
//! Export the embedded registry, edit it for another transaction set,
//! and load it back:
//!
//! ```rust,no_run
//! use edi_resolver::SegmentRegistry;
//! use std::path::Path;
//!
//! let registry = SegmentRegistry::load_embedded().unwrap();
//! let json = registry.to_json().unwrap();
//!
//! let custom = SegmentRegistry::load_from_file(Path::new("x12_835.json")).unwrap();
//! ```

pub mod store;

pub use store::{LoopQualifier, RegistryData, RegistryError, SegmentRegistry};
