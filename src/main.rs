use clap::Parser;
use tracing_subscriber::EnvFilter;

mod batch;
mod classify;
mod cli;
mod core;
mod normalize;
mod parsing;
mod registry;
mod resolve;
mod verify;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("edi_resolver=debug,info")
    } else {
        EnvFilter::new("edi_resolver=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match &cli.command {
        cli::Commands::Resolve(args) => {
            cli::resolve::run(args, cli.registry.as_ref(), cli.format, cli.verbose)?;
        }
        cli::Commands::Batch(args) => {
            cli::batch::run(args, cli.registry.as_ref(), cli.format, cli.verbose)?;
        }
        cli::Commands::Registry(args) => {
            cli::registry::run(args, cli.registry.as_ref(), cli.format)?;
        }
    }

    Ok(())
}
