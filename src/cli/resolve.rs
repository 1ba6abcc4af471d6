use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::resolve::engine::{Resolution, ResolverEngine};
use crate::verify::Document;

#[derive(Args)]
pub struct ResolveArgs {
    /// The field reference to resolve (e.g. "2010AANM109", "BHT03")
    #[arg(required = true)]
    pub reference: String,

    /// EDI document to verify the segment against
    #[arg(short, long)]
    pub document: Option<PathBuf>,
}

/// Execute the resolve subcommand
///
/// # Errors
///
/// Returns an error if the reference cannot be resolved, the document
/// cannot be read, or the registry cannot be loaded.
pub fn run(
    args: &ResolveArgs,
    registry_path: Option<&PathBuf>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let registry = super::load_registry(registry_path)?;

    if verbose {
        eprintln!(
            "Loaded {} registry with {} segment tags",
            registry.transaction_set,
            registry.segment_count()
        );
    }

    let engine = ResolverEngine::new(&registry);
    let resolution = engine
        .resolve(&args.reference)
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let found = match &args.document {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let document = Document::new(text);
            Some(document.contains_segment(&resolution.segment_id))
        }
        None => None,
    };

    match format {
        OutputFormat::Text => print_text(&args.reference, &resolution, found),
        OutputFormat::Json => print_json(&args.reference, &resolution, found)?,
        OutputFormat::Tsv => print_tsv(&args.reference, &resolution, found),
    }

    if found == Some(false) {
        anyhow::bail!(
            "Segment '{}' not found in document",
            resolution.segment_id
        );
    }

    Ok(())
}

fn print_text(reference: &str, resolution: &Resolution, found: Option<bool>) {
    println!("Reference:  {reference}");
    println!("Segment:    {}", resolution.segment_id);
    println!("Pattern:    {}", resolution.pattern);
    println!("Confidence: {}", resolution.confidence);

    if let Some(loop_id) = &resolution.normalized.loop_id {
        println!("Loop:       {loop_id}");
    }
    if let Some(qualifier) = &resolution.normalized.qualifier {
        println!("Qualifier:  {qualifier}");
    }
    if !resolution.normalized.alternates.is_empty() {
        println!(
            "Alternates: {} (ignored)",
            resolution.normalized.alternates.join(", ")
        );
    }

    match found {
        Some(true) => println!("Document:   FOUND"),
        Some(false) => println!("Document:   NOT FOUND"),
        None => {}
    }
}

fn print_json(
    reference: &str,
    resolution: &Resolution,
    found: Option<bool>,
) -> anyhow::Result<()> {
    let mut json = serde_json::json!({
        "reference": reference,
        "segment_id": resolution.segment_id,
        "pattern": resolution.pattern,
        "confidence": resolution.confidence,
        "layer": resolution.layer,
        "normalized": resolution.normalized,
    });
    if let Some(found) = found {
        json["found"] = serde_json::json!(found);
    }

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn print_tsv(reference: &str, resolution: &Resolution, found: Option<bool>) {
    println!("reference\tsegment_id\tpattern\tconfidence\tfound");
    println!(
        "{reference}\t{}\t{}\t{}\t{}",
        resolution.segment_id,
        resolution.pattern,
        resolution.confidence,
        found.map_or_else(|| "-".to_string(), |f| f.to_string()),
    );
}
