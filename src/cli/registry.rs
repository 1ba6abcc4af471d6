use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::OutputFormat;
use crate::registry::SegmentRegistry;

#[derive(Args)]
pub struct RegistryArgs {
    #[command(subcommand)]
    pub command: RegistryCommands,
}

#[derive(Subcommand)]
pub enum RegistryCommands {
    /// List all known segment tags
    List,

    /// List the loop-to-qualifier disambiguation table
    Loops {
        /// Only show entries for this segment (e.g. "NM1")
        #[arg(long)]
        segment: Option<String>,
    },

    /// Export the registry to a JSON file
    Export {
        /// Output file path
        #[arg(required = true)]
        output: PathBuf,
    },
}

/// Execute the registry subcommand
///
/// # Errors
///
/// Returns an error if the registry cannot be loaded or the export
/// file cannot be written.
pub fn run(
    args: &RegistryArgs,
    registry_path: Option<&PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let registry = super::load_registry(registry_path)?;

    match &args.command {
        RegistryCommands::List => list_segments(&registry, format)?,
        RegistryCommands::Loops { segment } => list_loops(&registry, segment.as_deref(), format)?,
        RegistryCommands::Export { output } => {
            let json = registry.to_json()?;
            std::fs::write(output, json)?;
            println!("Exported registry to {}", output.display());
        }
    }

    Ok(())
}

fn list_segments(registry: &SegmentRegistry, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Registry: {} ({} tags)", registry.transaction_set, registry.segment_count());
            if let Some(description) = &registry.description {
                println!("{description}");
            }
            println!();
            println!("Numbered:   {}", registry.numbered_segments().join(", "));
            println!("Plain:      {}", registry.plain_segments().join(", "));
            println!("Two-letter: {}", registry.two_letter_segments().join(", "));
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "transaction_set": registry.transaction_set,
                "numbered_segments": registry.numbered_segments(),
                "plain_segments": registry.plain_segments(),
                "two_letter_segments": registry.two_letter_segments(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Tsv => {
            println!("set\ttag");
            for tag in registry.numbered_segments() {
                println!("numbered\t{tag}");
            }
            for tag in registry.plain_segments() {
                println!("plain\t{tag}");
            }
            for tag in registry.two_letter_segments() {
                println!("two_letter\t{tag}");
            }
        }
    }
    Ok(())
}

fn list_loops(
    registry: &SegmentRegistry,
    segment: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let entries: Vec<_> = registry
        .loop_qualifiers()
        .iter()
        .filter(|e| segment.map_or(true, |s| e.segment.eq_ignore_ascii_case(s)))
        .collect();

    match format {
        OutputFormat::Text => {
            for entry in &entries {
                let qualifier = entry.qualifier.as_deref().unwrap_or("(any)");
                let role = entry.role.as_deref().unwrap_or("");
                println!(
                    "{:4} {:8} -> {:5} {role}",
                    entry.segment, entry.loop_prefix, qualifier
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Tsv => {
            println!("segment\tloop_prefix\tqualifier\trole");
            for entry in &entries {
                println!(
                    "{}\t{}\t{}\t{}",
                    entry.segment,
                    entry.loop_prefix,
                    entry.qualifier.as_deref().unwrap_or("-"),
                    entry.role.as_deref().unwrap_or("-"),
                );
            }
        }
    }
    Ok(())
}
