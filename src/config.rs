use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::util::{is_local_endpoint_url, parse_bool};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_url: String,
    pub anthropic_version: String,
    pub theme: Theme,
    /// Preview deployments authenticate with a stored token instead of an
    /// API key. Injected into the session at construction; nothing in the
    /// core reads the environment.
    pub preview: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        let api_url = std::env::var("CODEMEND_API_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com/v1/messages".to_string());
        let api_key = std::env::var("CODEMEND_API_KEY").ok().and_then(|v| {
            if v.trim().is_empty() {
                None
            } else {
                Some(v)
            }
        });
        let model = std::env::var("CODEMEND_MODEL")
            .unwrap_or_else(|_| "claude-sonnet-4-5-20250929".to_string());
        let anthropic_version =
            std::env::var("CODEMEND_ANTHROPIC_VERSION").unwrap_or_else(|_| "2023-06-01".to_string());
        let theme = std::env::var("CODEMEND_THEME")
            .ok()
            .as_deref()
            .and_then(Theme::parse)
            .unwrap_or(Theme::Dark);
        let preview = std::env::var("CODEMEND_PREVIEW")
            .ok()
            .and_then(|v| parse_bool(&v))
            .unwrap_or(false);

        Ok(Self {
            api_key,
            model,
            api_url,
            anthropic_version,
            theme,
            preview,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            bail!(
                "Invalid CODEMEND_API_URL '{}': expected http:// or https:// URL",
                self.api_url
            );
        }

        let local_endpoint = is_local_endpoint_url(&self.api_url);
        if !local_endpoint && self.api_key.is_none() && !self.preview {
            bail!(
                "CODEMEND_API_KEY must be set for non-local endpoints (url: '{}')",
                self.api_url
            );
        }

        if !local_endpoint && !self.model.starts_with("claude-") {
            bail!(
                "Invalid model name: '{}'. Expected a model starting with 'claude-'",
                self.model
            );
        }

        Ok(())
    }
}
