use std::path::PathBuf;
use thiserror::Error;
use voicelines_audio::AudioError;
use voicelines_speech::TTSError;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Speech error: {0}")]
    SpeechError(#[from] TTSError),

    #[error("Audio error: {0}")]
    AudioError(#[from] AudioError),

    #[error("Unsupported input file {0}: expected a .json or .csv file")]
    UnsupportedInput(PathBuf),

    #[error("Row {row}: missing required field {field}")]
    MissingField { row: usize, field: &'static str },

    #[error("Row {row}: invalid value for {field}: {value}")]
    InvalidValue {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("Row {row}: generate format {format} cannot be used: {reason}")]
    UnsupportedFormat {
        row: usize,
        format: String,
        reason: &'static str,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Row {row} ({key}) failed")]
    ItemFailed {
        row: usize,
        key: String,
        #[source]
        source: Box<BatchError>,
    },
}

impl From<tempfile::PersistError> for BatchError {
    fn from(err: tempfile::PersistError) -> Self {
        BatchError::IoError(err.error)
    }
}

pub type Result<T> = std::result::Result<T, BatchError>;
