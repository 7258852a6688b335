//! Transmission RPC client.
//!
//! Transmission guards its RPC endpoint with a session id: the first request
//! is answered with `409 Conflict` and an `X-Transmission-Session-Id` header
//! that must be echoed on every following request.

use crate::models::config::ClientConfig;
use crate::services::client::{JobSink, QueueEntry, QueueSource};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Mutex;

const SESSION_HEADER: &str = "X-Transmission-Session-Id";

/// Transmission client.
pub struct TransmissionClient {
    url: String,
    username: Option<String>,
    password: Option<String>,
    session_id: Mutex<Option<String>>,
    client: reqwest::Client,
}

/// RPC request payload.
#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    method: &'a str,
    arguments: Value,
}

/// RPC response payload.
#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: String,
    #[serde(default)]
    arguments: Value,
}

/// `torrent-get` arguments.
#[derive(Debug, Deserialize)]
struct TorrentList {
    #[serde(default)]
    torrents: Vec<Torrent>,
}

#[derive(Debug, Deserialize)]
struct Torrent {
    name: String,
}

impl TransmissionClient {
    /// Create a client from configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            url: format!("{}/transmission/rpc", config.url.trim_end_matches('/')),
            username: config.username.clone(),
            password: config.password.clone(),
            session_id: Mutex::new(None),
            client,
        })
    }

    fn current_session(&self) -> Option<String> {
        self.session_id.lock().ok().and_then(|guard| guard.clone())
    }

    fn store_session(&self, id: String) {
        if let Ok(mut guard) = self.session_id.lock() {
            *guard = Some(id);
        }
    }

    async fn send(&self, request: &RpcRequest<'_>) -> Result<reqwest::Response> {
        let mut builder = self.client.post(&self.url).json(request);
        if let Some(ref user) = self.username {
            builder = builder.basic_auth(user, self.password.as_ref());
        }
        if let Some(id) = self.current_session() {
            builder = builder.header(SESSION_HEADER, id);
        }
        Ok(builder.send().await?)
    }

    /// Call an RPC method, renewing the session id once if asked to.
    async fn call(&self, method: &str, arguments: Value) -> Result<Value> {
        let request = RpcRequest { method, arguments };

        let mut resp = self.send(&request).await?;
        if resp.status() == reqwest::StatusCode::CONFLICT {
            let id = resp
                .headers()
                .get(SESSION_HEADER)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| crate::Error::Rpc("409 without a session id".to_string()))?
                .to_string();
            tracing::debug!("Renewed Transmission session id");
            self.store_session(id);
            resp = self.send(&request).await?;
        }

        let body: RpcResponse = resp.error_for_status()?.json().await?;
        if body.result != "success" {
            return Err(crate::Error::Rpc(format!("{}: {}", method, body.result)));
        }
        Ok(body.arguments)
    }
}

impl JobSink for TransmissionClient {
    async fn submit(&self, name: &str, locator: &str, hint: &str) -> Result<()> {
        let mut arguments = json!({ "filename": locator });
        if !hint.is_empty() {
            arguments["labels"] = json!([hint]);
        }

        let added = self.call("torrent-add", arguments).await.map_err(|e| match e {
            crate::Error::Rpc(reason) => crate::Error::Submission {
                name: name.to_string(),
                reason,
            },
            other => other,
        })?;

        if added.get("torrent-duplicate").is_some() {
            tracing::info!("Transmission already has {}", name);
        }
        Ok(())
    }
}

impl QueueSource for TransmissionClient {
    async fn list_active(&self) -> Result<Vec<QueueEntry>> {
        let arguments = self.call("torrent-get", json!({ "fields": ["name"] })).await?;
        let list: TorrentList = serde_json::from_value(arguments)?;
        Ok(list
            .torrents
            .into_iter()
            .map(|t| QueueEntry { name: t.name })
            .collect())
    }

    /// Finished torrents stay in the torrent list, so there is no separate history.
    async fn list_history(&self) -> Result<Vec<QueueEntry>> {
        Ok(Vec::new())
    }
}
