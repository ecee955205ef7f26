use thiserror::Error;

/// TTS-related errors
#[derive(Error, Debug)]
pub enum TTSError {
    /// Provider-specific error
    #[error("TTS provider error: {0}\nProvider: {1}")]
    ProviderError(String, String),

    /// The provider answered with a non-success status
    #[error("TTS request rejected with HTTP {status}\nProvider: {provider}\nResponse: {body}")]
    RequestRejected {
        provider: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response
    #[error(
        "TTS transport error: {0}\nSuggestion: Check network connectivity and the configured base URL"
    )]
    Transport(String),

    /// Unknown provider output format
    #[error(
        "Invalid output format: '{0}'\nSuggestion: Use codec_samplerate[_bitrate], e.g. mp3_44100_128 or pcm_22050"
    )]
    InvalidFormat(String),

    /// No credential available
    #[error("API key not configured\nSuggestion: Set {0}")]
    MissingApiKey(String),

    /// Nothing to synthesize
    #[error("Speech request has empty text\nVoice: {0}")]
    EmptyText(String),

    /// IO error
    #[error("IO error during TTS operation: {0}\nOperation: {1}\nPath: {2}")]
    IoError(std::io::Error, String, String),

    /// Other errors
    #[error("TTS error: {0}\nContext: {1}")]
    Other(String, String),
}

/// Result type for TTS operations
pub type TTSResult<T> = Result<T, TTSError>;
