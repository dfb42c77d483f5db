use super::logging::{debug_payload_enabled, emit_debug_payload};
use crate::config::Config;
use crate::error::SessionError;
use crate::types::ConversationMessage;
use crate::util::is_local_endpoint_url;
use anyhow::{anyhow, Result};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::StatusCode;
use serde_json::json;
use std::pin::Pin;
#[cfg(test)]
use std::sync::Arc;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

const SYSTEM_PROMPT: &str = "You are a code editing assistant.\n\
The user works on a single source snippet and asks you to lint, refactor, debug, or otherwise revise it.\n\
Always return the complete revised snippet in one fenced code block; keep commentary outside the fence.\n\
Do not omit unchanged sections or abbreviate the snippet with placeholders.";

#[cfg(test)]
pub trait MockStreamProducer: Send + Sync {
    fn create_mock_stream(&self, messages: &[ConversationMessage]) -> Result<ByteStream>;
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    api_url: String,
    anthropic_version: String,
    preview_token: Option<String>,
    #[cfg(test)]
    mock_stream_producer: Option<Arc<dyn MockStreamProducer>>,
}

impl ApiClient {
    pub fn new(config: &Config, preview_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            api_url: config.api_url.clone(),
            anthropic_version: config.anthropic_version.clone(),
            preview_token,
            #[cfg(test)]
            mock_stream_producer: None,
        }
    }

    #[cfg(test)]
    pub fn new_mock(mock_producer: Arc<dyn MockStreamProducer>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: None,
            model: "mock-model".to_string(),
            api_url: "http://localhost:8000/v1/messages".to_string(),
            anthropic_version: "2023-06-01".to_string(),
            preview_token: None,
            #[cfg(test)]
            mock_stream_producer: Some(mock_producer),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn create_stream(&self, messages: &[ConversationMessage]) -> Result<ByteStream> {
        #[cfg(test)]
        {
            if let Some(producer) = &self.mock_stream_producer {
                return producer.create_mock_stream(messages);
            }
        }

        let max_tokens = resolve_max_tokens(&self.api_url);
        let mut payload = json!({
            "model": self.model,
            "max_tokens": max_tokens,
            "stream": true,
            "system": SYSTEM_PROMPT,
            "messages": messages,
        });
        if let (Some(token), Some(body)) = (&self.preview_token, payload.as_object_mut()) {
            body.insert("preview_token".to_string(), json!(token));
        }

        if debug_payload_enabled() {
            emit_debug_payload(&self.api_url, &payload);
        }

        let mut request = self
            .http
            .post(&self.api_url)
            .header("content-type", "application/json")
            .json(&payload);
        if let Some(api_key) = &self.api_key {
            request = request.header("x-api-key", api_key);
        }
        if !self.anthropic_version.trim().is_empty() {
            request = request.header("anthropic-version", &self.anthropic_version);
        }

        let response = request
            .send()
            .await
            .map_err(|error| map_api_request_error(error, &self.api_url))?
            .error_for_status()
            .map_err(|error| map_api_request_error(error, &self.api_url))?;

        let request_url = self.api_url.clone();
        let stream = response
            .bytes_stream()
            .map(move |item| item.map_err(|error| map_api_request_error(error, &request_url)));
        Ok(Box::pin(stream))
    }
}

/// HTTP 401 is the one failure the session layer handles specially; the
/// rest collapse into user-readable connection/timeout/status notices.
fn map_api_request_error(error: reqwest::Error, request_url: &str) -> anyhow::Error {
    if error.status() == Some(StatusCode::UNAUTHORIZED) {
        return anyhow::Error::new(SessionError::Unauthorized);
    }

    if error.is_connect() {
        return if is_local_endpoint_url(request_url) {
            anyhow!(
                "local endpoint '{request_url}' is not responding: {error}. \
                 Start the local server or point CODEMEND_API_URL elsewhere."
            )
        } else {
            anyhow!("could not connect to '{request_url}': {error}")
        };
    }
    if error.is_timeout() {
        return anyhow!("request to '{request_url}' timed out: {error}");
    }
    if let Some(status) = error.status() {
        return anyhow!("'{request_url}' answered HTTP {status}: {error}");
    }
    anyhow!("request to '{request_url}' failed: {error}")
}

const MAX_TOKENS_FLOOR: u32 = 128;
const MAX_TOKENS_CEILING: u32 = 8192;

fn resolve_max_tokens(api_url: &str) -> u32 {
    let override_value = std::env::var("CODEMEND_MAX_TOKENS")
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok());
    if let Some(value) = override_value {
        return value.clamp(MAX_TOKENS_FLOOR, MAX_TOKENS_CEILING);
    }

    if is_local_endpoint_url(api_url) {
        1024
    } else {
        4096
    }
}
