mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Merge(args) => {
            commands::merge::handle(&args, &Config::load()?)?;
        }

        Commands::Inspect { input, name } => {
            commands::inspect::handle(input.as_deref(), name.as_deref(), &Config::load()?)?;
        }

        Commands::Configure {
            data_dir,
            output,
            show,
        } => {
            commands::configure::handle(data_dir, output, show)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "wfmerge=debug" } else { "wfmerge=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
