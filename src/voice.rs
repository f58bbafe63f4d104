use crate::error::CallError;
use crate::ultravox_types::{CallConfig, NewSession, SessionState, TranscriptMessage, TranscriptPage};

use async_trait::async_trait;
use tracing::debug;

pub const ULTRAVOX_API_URL: &str = "https://api.ultravox.ai/api/calls";

/// Seam over the remote voice-AI service so the orchestrator can be driven by
/// deterministic fakes in tests.
#[async_trait]
pub trait VoiceSessionProvider {
    /// Creates a remote, billable conversation session.
    async fn create_session(&self, config: &CallConfig) -> Result<NewSession, CallError>;

    /// One status check; cheap and safe to retry.
    async fn session_state(&self, session_id: &str) -> Result<SessionState, CallError>;

    /// Turn-by-turn messages of a completed session, in conversational order.
    async fn transcript(&self, session_id: &str) -> Result<Vec<TranscriptMessage>, CallError>;
}

pub struct UltravoxClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl UltravoxClient {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self {
            http,
            api_key,
            base_url: ULTRAVOX_API_URL.to_string(),
        }
    }
}

#[async_trait]
impl VoiceSessionProvider for UltravoxClient {
    async fn create_session(&self, config: &CallConfig) -> Result<NewSession, CallError> {
        let resp = self
            .http
            .post(&self.base_url)
            .header("X-API-Key", &self.api_key)
            .json(config)
            .send()
            .await?;
        if resp.status().is_client_error() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CallError::Configuration(format!(
                "voice session rejected ({status}): {body}"
            )));
        }
        let session = resp.error_for_status()?.json::<NewSession>().await?;
        debug!(session=?session, "created voice session");
        Ok(session)
    }

    async fn session_state(&self, session_id: &str) -> Result<SessionState, CallError> {
        let url = format!("{}/{}", self.base_url, session_id);
        let state = self
            .http
            .get(url)
            .header("X-API-Key", &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json::<SessionState>()
            .await?;
        Ok(state)
    }

    async fn transcript(&self, session_id: &str) -> Result<Vec<TranscriptMessage>, CallError> {
        let url = format!("{}/{}/messages", self.base_url, session_id);
        let page = self
            .http
            .get(url)
            .header("X-API-Key", &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json::<TranscriptPage>()
            .await?;
        debug!(session=%session_id, turns = page.results.len(), "fetched transcript");
        Ok(page.results)
    }
}
