//! SABnzbd API client.
//!
//! Uses the `api` endpoint in JSON mode:
//! - `mode=addurl` to submit an NZB by URL
//! - `mode=queue` and `mode=history` to list known jobs

use crate::models::config::ClientConfig;
use crate::services::client::{JobSink, QueueEntry, QueueSource};
use crate::Result;
use serde::Deserialize;

/// SABnzbd client.
pub struct SabnzbdClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

/// Response to `addurl`.
#[derive(Debug, Deserialize)]
struct AddResponse {
    status: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Response to `queue`.
#[derive(Debug, Deserialize)]
struct QueueResponse {
    queue: QueueSlots,
}

#[derive(Debug, Deserialize)]
struct QueueSlots {
    #[serde(default)]
    slots: Vec<QueueSlot>,
}

#[derive(Debug, Deserialize)]
struct QueueSlot {
    filename: String,
}

/// Response to `history`.
#[derive(Debug, Deserialize)]
struct HistoryResponse {
    history: HistorySlots,
}

#[derive(Debug, Deserialize)]
struct HistorySlots {
    #[serde(default)]
    slots: Vec<HistorySlot>,
}

#[derive(Debug, Deserialize)]
struct HistorySlot {
    name: String,
}

impl SabnzbdClient {
    /// Create a client from configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().unwrap_or_default(),
            client,
        })
    }

    /// Issue an API call and decode the JSON response.
    async fn call<T: serde::de::DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/api", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str()), ("output", "json")])
            .send()
            .await?
            .error_for_status()?;

        Ok(resp.json().await?)
    }
}

impl JobSink for SabnzbdClient {
    async fn submit(&self, name: &str, locator: &str, hint: &str) -> Result<()> {
        let mut params = vec![("mode", "addurl"), ("name", locator), ("nzbname", name)];
        if !hint.is_empty() {
            params.push(("cat", hint));
        }

        let resp: AddResponse = self.call(&params).await?;
        if !resp.status {
            return Err(crate::Error::Submission {
                name: name.to_string(),
                reason: resp.error.unwrap_or_else(|| "status false".to_string()),
            });
        }

        tracing::debug!("SABnzbd accepted {}", name);
        Ok(())
    }
}

impl QueueSource for SabnzbdClient {
    async fn list_active(&self) -> Result<Vec<QueueEntry>> {
        let resp: QueueResponse = self.call(&[("mode", "queue")]).await?;
        Ok(resp
            .queue
            .slots
            .into_iter()
            .map(|slot| QueueEntry { name: slot.filename })
            .collect())
    }

    async fn list_history(&self) -> Result<Vec<QueueEntry>> {
        let resp: HistoryResponse = self.call(&[("mode", "history")]).await?;
        Ok(resp
            .history
            .slots
            .into_iter()
            .map(|slot| QueueEntry { name: slot.name })
            .collect())
    }
}
