//! Download client abstraction.
//!
//! The engine talks to a download client through two narrow traits: a sink
//! that accepts jobs and a source that lists what is queued or finished.
//! [`DownloadClient`] picks the concrete client from configuration.

use crate::models::config::{ClientConfig, ClientKind};
use crate::services::sabnzbd::SabnzbdClient;
use crate::services::transmission::TransmissionClient;
use crate::Result;

/// A job known to the download client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    /// Release name of the job.
    pub name: String,
}

/// Accepts download jobs.
#[allow(async_fn_in_trait)]
pub trait JobSink {
    /// Submit `locator` for download under `name`, with a destination hint
    /// such as a category.
    async fn submit(&self, name: &str, locator: &str, hint: &str) -> Result<()>;
}

/// Lists jobs the download client already knows about.
#[allow(async_fn_in_trait)]
pub trait QueueSource {
    /// Jobs that are queued or downloading.
    async fn list_active(&self) -> Result<Vec<QueueEntry>>;

    /// Jobs that have finished.
    async fn list_history(&self) -> Result<Vec<QueueEntry>>;
}

/// A queue source that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoQueue;

impl QueueSource for NoQueue {
    async fn list_active(&self) -> Result<Vec<QueueEntry>> {
        Ok(Vec::new())
    }

    async fn list_history(&self) -> Result<Vec<QueueEntry>> {
        Ok(Vec::new())
    }
}

/// Configured download client.
pub enum DownloadClient {
    Sabnzbd(SabnzbdClient),
    Transmission(TransmissionClient),
}

impl DownloadClient {
    /// Create the client selected by `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(match config.kind {
            ClientKind::Sabnzbd => DownloadClient::Sabnzbd(SabnzbdClient::from_config(config)?),
            ClientKind::Transmission => {
                DownloadClient::Transmission(TransmissionClient::from_config(config)?)
            }
        })
    }
}

impl JobSink for DownloadClient {
    async fn submit(&self, name: &str, locator: &str, hint: &str) -> Result<()> {
        match self {
            DownloadClient::Sabnzbd(c) => c.submit(name, locator, hint).await,
            DownloadClient::Transmission(c) => c.submit(name, locator, hint).await,
        }
    }
}

impl QueueSource for DownloadClient {
    async fn list_active(&self) -> Result<Vec<QueueEntry>> {
        match self {
            DownloadClient::Sabnzbd(c) => c.list_active().await,
            DownloadClient::Transmission(c) => c.list_active().await,
        }
    }

    async fn list_history(&self) -> Result<Vec<QueueEntry>> {
        match self {
            DownloadClient::Sabnzbd(c) => c.list_history().await,
            DownloadClient::Transmission(c) => c.list_history().await,
        }
    }
}
