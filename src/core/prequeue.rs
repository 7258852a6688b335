//! Feed decision engine.
//!
//! Decides, item by item, whether a feed entry should be downloaded and hands
//! the ones that should to the download client.
//!
//! Rules, applied in order (later rules override earlier ones):
//! - skip by default
//! - fetch if the show already has a library folder
//! - fetch pilots, unless pilots are disabled
//! - fetch everything with `get_all`
//! - skip anything already queued or on disk
//! - skip everything with `no_upload`

use crate::core::oracle;
use crate::core::parser::parse_episode;
use crate::core::session::Session;
use crate::models::config::{PilotRule, PrequeueConfig};
use crate::models::episode::Episode;
use crate::services::client::{JobSink, QueueSource};
use crate::services::feed::FeedItem;
use std::fmt;

/// Options for a prequeue run.
#[derive(Debug, Clone, Default)]
pub struct PrequeueOptions {
    /// Fetch items even when the show is not in the library.
    pub get_all: bool,
    /// Do not fetch pilots automatically.
    pub no_pilots: bool,
    /// Decide but never submit.
    pub no_upload: bool,
    /// Pilot definition.
    pub pilot_rule: PilotRule,
    /// Destination hint handed to the download client.
    pub category: String,
}

impl PrequeueOptions {
    /// Build options from configuration.
    pub fn from_config(config: &PrequeueConfig, category: &str) -> Self {
        Self {
            get_all: config.get_all,
            no_pilots: config.no_pilots,
            no_upload: config.no_upload,
            pilot_rule: config.pilot_rule,
            category: category.to_string(),
        }
    }

    fn is_pilot(&self, episode: &Episode) -> bool {
        match self.pilot_rule {
            PilotRule::SeasonPremiere => episode.is_season_premiere(),
            PilotRule::SeriesPremiere => episode.is_series_premiere(),
        }
    }
}

/// Why an item was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The title is not an episode release name.
    NotAnEpisode,
    /// The show is not in the library and no rule enabled it.
    UnknownShow,
    /// The episode is already queued or on disk.
    AlreadyPresent,
    /// Uploads are disabled for this run.
    NoUpload,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotAnEpisode => write!(f, "not an episode"),
            SkipReason::UnknownShow => write!(f, "show not in library"),
            SkipReason::AlreadyPresent => write!(f, "already present"),
            SkipReason::NoUpload => write!(f, "uploads disabled"),
        }
    }
}

/// Outcome of deciding a single feed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Fetch,
    Skip(SkipReason),
}

/// Result of processing one feed item.
#[derive(Debug, Clone)]
pub struct ItemReport {
    /// Feed title.
    pub title: String,
    /// What was decided.
    pub decision: Decision,
    /// Submission error, if the client rejected a fetched item.
    pub error: Option<String>,
}

/// Result of a prequeue run.
#[derive(Debug, Clone, Default)]
pub struct PrequeueReport {
    /// Per-item results in feed order.
    pub items: Vec<ItemReport>,
}

impl PrequeueReport {
    /// Items handed to the download client successfully.
    pub fn submitted(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.decision == Decision::Fetch && i.error.is_none())
            .count()
    }

    /// Items the download client rejected.
    pub fn failed(&self) -> usize {
        self.items.iter().filter(|i| i.error.is_some()).count()
    }

    /// Items skipped, for any reason.
    pub fn skipped(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.decision, Decision::Skip(_)))
            .count()
    }

    /// Items skipped only because uploads were disabled.
    pub fn dry_run(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.decision == Decision::Skip(SkipReason::NoUpload))
            .count()
    }
}

/// Decide whether `episode` should be fetched.
///
/// A fetch decision records the episode in the session immediately, so a
/// later item for the same broadcast in the same run is skipped.
pub async fn decide<Q: QueueSource>(
    session: &mut Session,
    episode: &Episode,
    queue: Option<&Q>,
    options: &PrequeueOptions,
) -> Decision {
    let mut decision = Decision::Skip(SkipReason::UnknownShow);

    if session.resolve(&episode.title).is_some() {
        decision = Decision::Fetch;
    }
    if !options.no_pilots && options.is_pilot(episode) {
        decision = Decision::Fetch;
    }
    if options.get_all {
        decision = Decision::Fetch;
    }

    // Existence only matters when something enabled the item.
    if decision == Decision::Fetch && oracle::exists(session, episode, queue).await {
        decision = Decision::Skip(SkipReason::AlreadyPresent);
    }
    if decision == Decision::Fetch && options.no_upload {
        decision = Decision::Skip(SkipReason::NoUpload);
    }

    if decision == Decision::Fetch {
        session.record(episode.clone());
    }
    decision
}

/// Process a feed.
///
/// Items that fail to parse are skipped quietly. A rejected submission is
/// reported on its item and does not stop the run.
pub async fn run<C: JobSink + QueueSource>(
    session: &mut Session,
    items: &[FeedItem],
    client: &C,
    options: &PrequeueOptions,
) -> PrequeueReport {
    let mut report = PrequeueReport::default();

    for item in items {
        let episode = match parse_episode(&item.title) {
            Some(episode) => episode,
            None => {
                tracing::debug!("Not an episode: {}", item.title);
                report.items.push(ItemReport {
                    title: item.title.clone(),
                    decision: Decision::Skip(SkipReason::NotAnEpisode),
                    error: None,
                });
                continue;
            }
        };

        let decision = decide(session, &episode, Some(client), options).await;
        let mut error = None;

        match decision {
            Decision::Skip(SkipReason::NoUpload) => {
                tracing::info!("Would upload \"{}\" (uploads disabled)", episode);
            }
            Decision::Skip(reason) => {
                tracing::info!("Skipping \"{}\": {}", episode, reason);
            }
            Decision::Fetch => {
                tracing::info!("Uploading \"{}\"", episode);
                if let Err(e) = client
                    .submit(&item.title, &item.link, &options.category)
                    .await
                {
                    tracing::error!("Failed to upload \"{}\": {}", item.title, e);
                    error = Some(e.to_string());
                }
            }
        }

        report.items.push(ItemReport {
            title: item.title.clone(),
            decision,
            error,
        });
    }

    report
}
