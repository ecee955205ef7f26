use std::path::PathBuf;

/// Errors that can occur while decoding, processing or encoding audio.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Invalid target configuration: sample_rate={sample_rate}, channels={channels}")]
    InvalidTargetConfig { sample_rate: u32, channels: usize },
    #[error(
        "Unsupported channel layout: input has {input} channel(s), target requires {target} channel(s)"
    )]
    UnsupportedChannelLayout { input: usize, target: usize },
    #[error("Unsupported target format: '{0}' (expected one of wav, ogg, mp3, flac)")]
    UnsupportedTargetFormat(String),
    #[error("WAV error: {0}")]
    WavError(#[from] hound::Error),
    #[error("Unsupported WAV format: {0}")]
    UnsupportedWavFormat(String),
    #[error("Failed to decode audio file: {0}")]
    AudioDecodeError(String),
    #[error("Decoded audio is empty: {}", .0.display())]
    EmptyAudio(PathBuf),
    #[error("Failed to run encoder '{program}': {source}")]
    EncoderLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Encoder '{program}' failed with {status}: {stderr}")]
    EncoderFailed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tempfile::PersistError> for AudioError {
    fn from(err: tempfile::PersistError) -> Self {
        AudioError::Io(err.error)
    }
}

pub type AudioResult<T> = Result<T, AudioError>;
