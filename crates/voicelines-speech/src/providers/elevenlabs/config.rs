//! Configuration for the ElevenLabs provider

use super::models::ElevenLabsModel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary environment variable holding the API key
pub const ENV_API_KEY: &str = "ELEVENLABS_API_KEY";
/// Secondary name accepted for the API key
pub const ENV_API_KEY_FALLBACK: &str = "ELEVEN_API_KEY";
/// Overrides the API base URL
pub const ENV_BASE_URL: &str = "ELEVENLABS_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";

/// Configuration for the ElevenLabs provider
#[derive(Clone, Serialize, Deserialize)]
pub struct ElevenLabsConfig {
    /// API key sent as `xi-api-key`
    #[serde(default)]
    pub api_key: Option<String>,

    /// API root, without the `/v1` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used when a request does not name one
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    ElevenLabsModel::default().id().to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

impl ElevenLabsConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overlay values found in the process environment
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(key) = api_key_from_env() {
            self.api_key = Some(key);
        }
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                self.base_url = url;
            }
        }
        self
    }

    /// API key if one is configured and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            default_model: default_model(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl fmt::Debug for ElevenLabsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElevenLabsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Read the API key from `ELEVENLABS_API_KEY`, falling back to `ELEVEN_API_KEY`
pub fn api_key_from_env() -> Option<String> {
    std::env::var(ENV_API_KEY)
        .or_else(|_| std::env::var(ENV_API_KEY_FALLBACK))
        .ok()
        .filter(|k| !k.trim().is_empty())
}
