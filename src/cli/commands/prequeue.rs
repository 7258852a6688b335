//! Prequeue command implementation.
//!
//! Fetches the feed, decides which items to download and submits them to the
//! configured download client.

use crate::core::prequeue::{self, PrequeueOptions};
use crate::core::session::Session;
use crate::models::config::Config;
use crate::services::client::DownloadClient;
use crate::services::feed;
use crate::utils::fs::ensure_directory;
use crate::Result;
use colored::Colorize;

/// Run the prequeue command.
pub async fn prequeue(config: &Config) -> Result<()> {
    tracing::info!("Running in prequeue (episodes) mode");

    let feed_url = config
        .prequeue
        .feed
        .as_deref()
        .ok_or_else(|| crate::Error::Config("no feed URL given".to_string()))?;

    if let Some(primary) = config.library.tv_shows.first() {
        ensure_directory(primary)?;
    }

    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.client.timeout))
        .build()?;
    let items = feed::fetch_feed(&http, feed_url).await?;

    let client = DownloadClient::from_config(&config.client)?;
    let options = PrequeueOptions::from_config(&config.prequeue, &config.client.category);
    let mut session = Session::new(config.library.tv_shows.clone(), config.library.threshold);

    let report = prequeue::run(&mut session, &items, &client, &options).await;

    println!();
    println!("{}", "[Prequeue Summary]".bold().green());
    println!("  {} {}", "Feed items:".bold(), report.items.len());
    println!("  {} {}", "Uploaded:".bold(), report.submitted());
    println!("  {} {}", "Skipped:".bold(), report.skipped());
    if options.no_upload {
        println!("  {} {}", "Would upload:".bold(), report.dry_run());
    }
    if report.failed() > 0 {
        println!("  {} {}", "Failed:".bold(), report.failed().to_string().red());
    }

    Ok(())
}
