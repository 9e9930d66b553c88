use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::error::Result;

/// One chat message as supplied by the caller. `content` is forwarded
/// verbatim, so both plain strings and structured parts survive the hop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Value,
}

/// Failure of a single pool-entry attempt. These never cross the system
/// boundary on their own; the dispatcher records the last one and moves on.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("upstream rejected ({status}): {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("transport fault: {0}")]
    Transport(String),
}

impl AttemptError {
    /// The text kept as the failure record: the response body for a
    /// rejection, the fault message for a transport error.
    pub fn detail(&self) -> &str {
        match self {
            AttemptError::Rejected { body, .. } => body,
            AttemptError::Transport(message) => message,
        }
    }
}

/// Client for the fixed upstream chat-completion endpoint. One instance per
/// process; the request timeout is applied here so an unresponsive upstream
/// cannot stall the whole failover chain.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Issue one chat-completion call with the given credential. The entry's
    /// system prompt is prepended to the caller's messages; the upstream
    /// model id is fixed and never caller-controlled.
    pub async fn chat_completions(
        &self,
        api_key: &str,
        system_prompt: &str,
        messages: &[ChatMessage],
        temperature: f64,
        max_tokens: u32,
    ) -> std::result::Result<Value, AttemptError> {
        let mut payload_messages = Vec::with_capacity(messages.len() + 1);
        payload_messages.push(json!({ "role": "system", "content": system_prompt }));
        for message in messages {
            payload_messages.push(json!({ "role": &message.role, "content": &message.content }));
        }

        let body = json!({
            "model": self.model,
            "messages": payload_messages,
            "temperature": temperature,
            "max_tokens": max_tokens,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<Value>()
                .await
                .map_err(|e| AttemptError::Transport(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(AttemptError::Rejected { status, body })
        }
    }
}
