//! Best-effort cloud mirror.
//!
//! A fire-and-forget upsert/fetch pair over HTTP, last-write-wins, no
//! conflict resolution. The local store stays authoritative: the core
//! works fully with the remote absent or failing, and callers treat a
//! failed push as a logged warning, not an error.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::session::FocusSession;
use crate::storage::Config;
use crate::tasks::Task;

/// Everything the mirror holds for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncPayload {
    pub tasks: Vec<Task>,
    pub focus_history: Vec<FocusSession>,
    pub app_state: Config,
}

#[derive(Serialize)]
struct PushBody<'a> {
    payload: &'a SyncPayload,
    updated_at: String,
}

#[derive(Deserialize)]
struct PullBody {
    payload: SyncPayload,
}

/// HTTP client for the mirror endpoint. One record per user at
/// `{endpoint}/user-sync/{user_id}`.
pub struct SyncClient {
    endpoint: String,
    user_id: String,
    http: reqwest::Client,
}

impl SyncClient {
    pub fn new(endpoint: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            user_id: user_id.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Build a client from config, if the mirror is configured at all.
    pub fn from_config(config: &Config) -> Option<Self> {
        match (&config.sync.endpoint, &config.sync.user_id) {
            (Some(endpoint), Some(user_id)) => Some(Self::new(endpoint, user_id)),
            _ => None,
        }
    }

    fn record_url(&self) -> String {
        format!(
            "{}/user-sync/{}",
            self.endpoint.trim_end_matches('/'),
            self.user_id
        )
    }

    /// Upsert the full payload. Last write wins on the remote side.
    ///
    /// # Errors
    /// Returns the transport or status failure; callers log and move on.
    pub async fn push(&self, payload: &SyncPayload) -> Result<(), SyncError> {
        let body = PushBody {
            payload,
            updated_at: Utc::now().to_rfc3339(),
        };
        let response = self.http.put(self.record_url()).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(SyncError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    /// Fetch the remote payload, `None` when the user has no record yet.
    ///
    /// # Errors
    /// Returns transport, status, or decode failures.
    pub async fn pull(&self) -> Result<Option<SyncPayload>, SyncError> {
        let response = self.http.get(self.record_url()).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(SyncError::Status(response.status().as_u16()));
        }
        let body: PullBody = response
            .json()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))?;
        Ok(Some(body.payload))
    }

    /// Push, logging any failure instead of returning it. The
    /// fire-and-forget entry point the CLI uses after local writes.
    pub async fn push_best_effort(&self, payload: &SyncPayload) {
        if let Err(err) = self.push(payload).await {
            tracing::warn!(error = %err, "cloud mirror push failed; local data unaffected");
        }
    }
}
