use std::path::{Path, PathBuf};

use clap::Args;

use crate::batch::{BatchDriver, BatchReport, RowRange};
use crate::cli::OutputFormat;
use crate::parsing;
use crate::verify::Document;

#[derive(Args)]
pub struct BatchArgs {
    /// Reference table (TSV or CSV with display_name and reference columns)
    #[arg(required = true)]
    pub table: PathBuf,

    /// EDI document to verify resolved segments against
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Rows to process, 1-based inclusive (e.g. "1-10", "5-", "-20", "7")
    #[arg(short, long)]
    pub rows: Option<String>,
}

/// Execute the batch subcommand
///
/// # Errors
///
/// Returns an error if the table or document cannot be read or parsed;
/// per-row resolution failures never abort the batch.
pub fn run(
    args: &BatchArgs,
    registry_path: Option<&PathBuf>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let registry = super::load_registry(registry_path)?;

    let delimiter = detect_delimiter(&args.table);
    let all_rows = parsing::parse_table_file(&args.table, delimiter)?;

    let rows = match &args.rows {
        Some(range) => {
            let range: RowRange = range.parse()?;
            range.apply(&all_rows)
        }
        None => &all_rows[..],
    };

    if verbose {
        eprintln!(
            "Loaded {} rows from {} ({} selected)",
            all_rows.len(),
            args.table.display(),
            rows.len()
        );
    }

    let document = match &args.document {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Some(Document::new(text))
        }
        None => None,
    };

    let driver = BatchDriver::new(&registry);
    let report = driver.run(rows, document.as_ref());

    match format {
        OutputFormat::Text => print_text_report(&report),
        OutputFormat::Json => print_json_report(&report)?,
        OutputFormat::Tsv => print_tsv_report(&report),
    }

    Ok(())
}

/// Pick the field delimiter from the table's extension
fn detect_delimiter(path: &Path) -> char {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("csv") => ',',
        _ => '\t',
    }
}

fn print_text_report(report: &BatchReport) {
    println!("{}", "=".repeat(60));
    println!("BATCH RESOLUTION RESULTS");
    println!("{}", "=".repeat(60));

    for row in &report.resolved {
        let verdict = match row.found {
            Some(true) => " [found]",
            Some(false) => " [not found]",
            None => "",
        };
        println!(
            "  {} -> {} ({}){verdict}",
            row.display_name, row.pattern, row.confidence
        );
    }

    println!();
    println!("Resolved:   {}", report.found_count());
    println!("Unresolved: {}", report.not_found_count());
    if report.skipped > 0 {
        println!("Skipped:    {} (blank rows)", report.skipped);
    }

    if !report.unresolved.is_empty() {
        println!();
        println!("NOT FOUND:");
        for row in &report.unresolved {
            println!("  - {}", row.label());
        }
    }
}

fn print_json_report(report: &BatchReport) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn print_tsv_report(report: &BatchReport) {
    println!("display_name\treference\tsegment_id\tpattern\tconfidence\tfound");
    for row in &report.resolved {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            row.display_name,
            row.reference,
            row.segment_id,
            row.pattern,
            row.confidence,
            row.found.map_or_else(|| "-".to_string(), |f| f.to_string()),
        );
    }
    for row in &report.unresolved {
        println!(
            "{}\t{}\t-\t-\t-\t{:?}",
            row.display_name, row.reference, row.kind
        );
    }
}
