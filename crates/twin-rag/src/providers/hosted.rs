//! Hosted assistant backend (LangGraph deployment)
//!
//! Each audience maps to its own assistant on the deployment. Runs are
//! created with `POST {base}/runs/wait`, which blocks until the graph
//! finishes and returns its final state.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::{AssistantConfig, AudienceAssistants};
use crate::error::{Error, Result};
use crate::types::Audience;

use super::assistant::AnswerBackend;

#[derive(Serialize)]
struct RunRequest<'a> {
    assistant_id: &'a str,
    input: RunInput<'a>,
}

#[derive(Serialize)]
struct RunInput<'a> {
    question: &'a str,
}

/// Client for a LangGraph deployment
pub struct HostedAssistant {
    client: Client,
    base_url: String,
    api_key: String,
    assistants: AudienceAssistants,
}

impl HostedAssistant {
    /// Create a client; `None` when the deployment is not configured
    pub fn from_config(config: &AssistantConfig) -> Result<Option<Self>> {
        let (Some(base_url), Some(api_key)) = (&config.base_url, &config.api_key) else {
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Some(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.clone(),
            assistants: config.assistants.clone(),
        }))
    }

    /// Assistant id used for an audience
    pub fn assistant_id(&self, audience: Audience) -> &str {
        self.assistants.for_audience(audience)
    }
}

#[async_trait]
impl AnswerBackend for HostedAssistant {
    async fn answer(&self, question: &str, audience: Audience) -> Result<String> {
        let request = RunRequest {
            assistant_id: self.assistant_id(audience),
            input: RunInput { question },
        };

        tracing::debug!(
            "Running hosted assistant {} for audience {}",
            request.assistant_id,
            audience
        );

        let response = self
            .client
            .post(format!("{}/runs/wait", self.base_url))
            .header("x-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::upstream(format!("Hosted assistant request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(format!(
                "Hosted assistant returned HTTP {}: {}",
                status, body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::upstream(format!("Invalid hosted assistant response: {}", e)))?;

        extract_answer(&body)
            .ok_or_else(|| Error::upstream("Hosted assistant returned no answer"))
    }

    fn name(&self) -> &str {
        "hosted"
    }
}

/// Pull the answer text out of a run's final state
///
/// Looks at `final_answer`, `answer`, `output`, then the last message's
/// `content`. Blank strings do not count.
pub fn extract_answer(value: &Value) -> Option<String> {
    let non_blank = |v: &Value| {
        v.as_str()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    };

    if let Some(text) = non_blank(value) {
        return Some(text);
    }

    for key in ["final_answer", "answer"] {
        if let Some(text) = value.get(key).and_then(non_blank) {
            return Some(text);
        }
    }

    if let Some(text) = value.get("output").and_then(extract_answer) {
        return Some(text);
    }

    value
        .get("messages")
        .and_then(Value::as_array)
        .and_then(|messages| messages.last())
        .and_then(|message| message.get("content"))
        .and_then(non_blank)
}
