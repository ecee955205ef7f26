//! Error types for the ElevenLabs provider

use super::config::{ENV_API_KEY, ENV_API_KEY_FALLBACK};
use thiserror::Error;

/// ElevenLabs specific errors
#[derive(Error, Debug)]
pub enum ElevenLabsError {
    /// No API key was configured
    #[error(
        "ElevenLabs API key missing\nSuggestion: Set {} (or {})",
        ENV_API_KEY,
        ENV_API_KEY_FALLBACK
    )]
    MissingApiKey,

    /// HTTP client failure (connect, timeout, body read)
    #[error("ElevenLabs HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the API
    #[error("ElevenLabs API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Request rejected before it was sent
    #[error("Invalid ElevenLabs request: {0}")]
    InvalidRequest(String),
}

/// Result type for ElevenLabs operations
pub type Result<T> = std::result::Result<T, ElevenLabsError>;

impl From<ElevenLabsError> for crate::TTSError {
    fn from(err: ElevenLabsError) -> Self {
        match err {
            ElevenLabsError::MissingApiKey => crate::TTSError::MissingApiKey(format!(
                "{ENV_API_KEY} or {ENV_API_KEY_FALLBACK}"
            )),
            ElevenLabsError::Http(e) => crate::TTSError::Transport(e.to_string()),
            ElevenLabsError::Api { status, body } => crate::TTSError::RequestRejected {
                provider: "elevenlabs".to_string(),
                status,
                body,
            },
            ElevenLabsError::InvalidRequest(msg) => {
                crate::TTSError::ProviderError(msg, "elevenlabs".to_string())
            }
        }
    }
}
