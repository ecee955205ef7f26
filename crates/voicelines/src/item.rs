use crate::error::{BatchError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use voicelines_audio::{ConvertSettings, TargetFormat};
use voicelines_speech::{OutputFormat, SpeechRequest};

pub const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";
pub const DEFAULT_CONVERT_FORMAT: TargetFormat = TargetFormat::Ogg;
pub const DEFAULT_SAMPLE_RATE: u32 = 22_000;
pub const DEFAULT_CHANNELS: usize = 1;

static UNSAFE_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\-]").unwrap());

/// Turn arbitrary text into a filename stem: unsafe characters become `_`,
/// the result is lower-cased and trailing underscores are dropped.
pub fn sanitize_filename(text: &str) -> String {
    UNSAFE_FILENAME_CHARS
        .replace_all(text, "_")
        .to_lowercase()
        .trim_end_matches('_')
        .to_string()
}

/// One speech line to synthesize and convert. Immutable once resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    /// 1-based position in the input
    pub row: usize,
    pub output_directory: String,
    pub filename: String,
    pub voice_id: String,
    pub text: String,
    pub previous_text: Option<String>,
    pub next_text: Option<String>,
    pub model_id: String,
    pub generate_format: OutputFormat,
    pub convert_format: TargetFormat,
    pub sample_rate: u32,
    pub channel_count: usize,
    pub normalize: bool,
    pub seed: Option<u32>,
}

impl WorkItem {
    pub fn speech_request(&self) -> SpeechRequest {
        SpeechRequest::new(self.text.clone(), self.voice_id.as_str())
            .with_model(self.model_id.clone())
            .with_output_format(self.generate_format.clone())
            .with_context(self.previous_text.clone(), self.next_text.clone())
            .with_seed(self.seed)
    }

    pub fn convert_settings(&self) -> ConvertSettings {
        ConvertSettings::new(self.convert_format, self.sample_rate, self.channel_count)
            .with_normalize(self.normalize)
    }
}

/// Unvalidated row as read from an input file. Every value is optional text;
/// [`RawItem::resolve`] applies presence checks and defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawItem {
    pub output_directory: Option<String>,
    pub filename: Option<String>,
    pub voice_id: Option<String>,
    pub text: Option<String>,
    pub previous_text: Option<String>,
    pub next_text: Option<String>,
    pub model_id: Option<String>,
    pub generate_format: Option<String>,
    pub convert_format: Option<String>,
    pub frame_rate: Option<String>,
    pub channels: Option<String>,
    pub normalize: Option<String>,
    pub seed: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required(value: &Option<String>, row: usize, field: &'static str) -> Result<String> {
    present(value)
        .map(str::to_string)
        .ok_or(BatchError::MissingField { row, field })
}

/// Canonical relative directory: `\` becomes `/`, empty and `.` segments are
/// dropped. `..` is rejected so a clip can never land outside the output root.
fn normalize_directory(raw: &str, row: usize) -> Result<String> {
    let mut segments = Vec::new();
    for segment in raw.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(BatchError::InvalidValue {
                    row,
                    field: "path",
                    value: raw.to_string(),
                });
            }
            other => segments.push(other),
        }
    }
    Ok(segments.join("/"))
}

fn parse_number<T: std::str::FromStr>(
    value: &Option<String>,
    row: usize,
    field: &'static str,
) -> Result<Option<T>> {
    match present(value) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| BatchError::InvalidValue {
                row,
                field,
                value: raw.to_string(),
            }),
    }
}

fn parse_bool(value: &Option<String>, row: usize, field: &'static str) -> Result<Option<bool>> {
    match present(value).map(str::to_ascii_lowercase).as_deref() {
        None => Ok(None),
        Some("true" | "1" | "yes") => Ok(Some(true)),
        Some("false" | "0" | "no") => Ok(Some(false)),
        Some(other) => Err(BatchError::InvalidValue {
            row,
            field,
            value: other.to_string(),
        }),
    }
}

impl RawItem {
    /// Validate presence of the required fields and fill in defaults.
    ///
    /// Missing or empty values take their default; `0` for the frame rate or the
    /// channel count also means default.
    pub fn resolve(&self, row: usize) -> Result<WorkItem> {
        let output_directory =
            normalize_directory(&required(&self.output_directory, row, "path")?, row)?;
        let voice_id = required(&self.voice_id, row, "voice_id")?;
        let text = required(&self.text, row, "text")?;

        let filename = sanitize_filename(present(&self.filename).unwrap_or(text.as_str()));
        if filename.is_empty() {
            return Err(BatchError::InvalidValue {
                row,
                field: "filename",
                value: self.filename.clone().unwrap_or_else(|| text.clone()),
            });
        }

        let generate_format = match present(&self.generate_format) {
            None => OutputFormat::default(),
            Some(raw) => raw.parse::<OutputFormat>().map_err(|_| BatchError::InvalidValue {
                row,
                field: "generate_format",
                value: raw.to_string(),
            })?,
        };

        let convert_format = match present(&self.convert_format) {
            None => DEFAULT_CONVERT_FORMAT,
            Some(raw) => TargetFormat::parse_name(raw).map_err(|_| BatchError::InvalidValue {
                row,
                field: "convert_format",
                value: raw.to_string(),
            })?,
        };

        let sample_rate = parse_number::<u32>(&self.frame_rate, row, "frame_rate")?
            .filter(|rate| *rate > 0)
            .unwrap_or(DEFAULT_SAMPLE_RATE);
        let channel_count = parse_number::<usize>(&self.channels, row, "channels")?
            .filter(|channels| *channels > 0)
            .unwrap_or(DEFAULT_CHANNELS);

        Ok(WorkItem {
            row,
            output_directory,
            filename,
            voice_id,
            text,
            previous_text: present(&self.previous_text).map(str::to_string),
            next_text: present(&self.next_text).map(str::to_string),
            model_id: present(&self.model_id)
                .unwrap_or(DEFAULT_MODEL_ID)
                .to_string(),
            generate_format,
            convert_format,
            sample_rate,
            channel_count,
            normalize: parse_bool(&self.normalize, row, "normalize")?.unwrap_or(true),
            seed: parse_number::<u32>(&self.seed, row, "seed")?,
        })
    }
}
