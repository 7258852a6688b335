//! tvsort CLI
//!
//! Queues new TV episodes from a feed and files finished downloads into the
//! show library.

use clap::Parser;
use std::path::Path;
use tvsort::cli::{
    args::{Cli, Commands},
    commands::{apply_library_args, postqueue, prequeue, rename},
};
use tvsort::models::config::load_config;

// One invocation handles one feed or one download, strictly in order.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log.as_deref())?;

    run(cli).await?;

    Ok(())
}

/// Merge configuration and run the selected command.
async fn run(cli: Cli) -> tvsort::Result<()> {
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Prequeue {
            feed,
            library,
            get_all,
            no_pilots,
            no_upload,
            pilot_rule,
        } => {
            apply_library_args(&mut config, &library);
            if feed.is_some() {
                config.prequeue.feed = feed;
            }
            config.prequeue.get_all |= get_all;
            config.prequeue.no_pilots |= no_pilots;
            config.prequeue.no_upload |= no_upload;
            if let Some(rule) = pilot_rule {
                config.prequeue.pilot_rule = rule;
            }
            config.validate()?;

            prequeue::prequeue(&config).await?;
        }

        Commands::Postqueue { path, library } => {
            apply_library_args(&mut config, &library);
            config.validate()?;

            postqueue::postqueue(&config, path.as_deref()).await?;
        }

        Commands::Rename { dir, yes } => {
            rename::rename(&dir, yes).await?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool, log: Option<&Path>) -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("tvsort=debug")
    } else {
        EnvFilter::new("tvsort=info")
    };

    match log {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(std::sync::Mutex::new(file)),
                )
                .with(filter)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(false)
                        .without_time()
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    }

    Ok(())
}
