//! Command-line interface for edi-resolver.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **resolve**: Resolve a single field reference to a search pattern
//! - **batch**: Resolve a table of references and verify them against a document
//! - **registry**: List, show, or export the segment registry
//!
//! ## Usage
//!
//! ```text
//! # Resolve one reference
//! edi-resolver resolve "2010AANM109"
//!
//! # Resolve and verify against an EDI file
//! edi-resolver resolve "2300HI01-2 -- BK/ABK" --document claim.edi
//!
//! # Batch mode over a TSV table
//! edi-resolver batch fields.tsv --document claim.edi
//!
//! # JSON output for scripting
//! edi-resolver batch fields.tsv --document claim.edi --format json
//!
//! # Inspect the loop-qualifier table
//! edi-resolver registry loops
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod batch;
pub mod registry;
pub mod resolve;

#[derive(Parser)]
#[command(name = "edi-resolver")]
#[command(version)]
#[command(about = "Resolve EDI field references to canonical segment search patterns")]
#[command(
    long_about = "edi-resolver translates human-authored EDI field references (e.g. '2010AANM109', \
'2300HI01-2 -- BK/ABK', 'BHT03') into canonical segment identifiers and search patterns precise \
enough to locate the right occurrence in a raw EDI document.\n\nSegments like NM1 are reused \
across dozens of transaction-loop roles; the loop and qualifier context is what separates a \
billing provider from a subscriber, and the registry encodes exactly that."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Path to a custom registry file (defaults to the embedded 837P registry)
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a single field reference
    Resolve(resolve::ResolveArgs),

    /// Resolve a table of references, with optional document verification
    Batch(batch::BatchArgs),

    /// Manage the segment registry
    Registry(registry::RegistryArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load the registry from `--registry` or fall back to the embedded one
pub(crate) fn load_registry(
    path: Option<&PathBuf>,
) -> Result<crate::registry::SegmentRegistry, crate::registry::RegistryError> {
    match path {
        Some(path) => crate::registry::SegmentRegistry::load_from_file(path),
        None => crate::registry::SegmentRegistry::load_embedded(),
    }
}
