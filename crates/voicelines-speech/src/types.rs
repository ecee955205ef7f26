use crate::error::{TTSError, TTSResult};
use bytes::Bytes;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::pin::Pin;
use std::str::FromStr;

/// Model information
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier
    pub id: String,
    /// Model name
    pub name: String,
    /// Model description
    pub description: Option<String>,
    /// Supported languages
    pub languages: Vec<String>,
}

/// Codec of the audio payload returned by a provider
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    Mp3,
    Pcm,
    Ulaw,
    Alaw,
    Opus,
    Wav,
}

impl AudioCodec {
    /// File extension used when the payload is written to disk
    pub fn extension(&self) -> &'static str {
        match self {
            AudioCodec::Mp3 => "mp3",
            AudioCodec::Pcm => "pcm",
            AudioCodec::Ulaw => "ulaw",
            AudioCodec::Alaw => "alaw",
            AudioCodec::Opus => "opus",
            AudioCodec::Wav => "wav",
        }
    }
}

/// Provider output format in `codec_samplerate[_bitrate]` notation, e.g. `mp3_44100_128`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OutputFormat {
    pub codec: AudioCodec,
    pub sample_rate: u32,
    pub bitrate_kbps: Option<u32>,
}

impl OutputFormat {
    pub const DEFAULT: &'static str = "mp3_44100_128";

    pub fn new(codec: AudioCodec, sample_rate: u32, bitrate_kbps: Option<u32>) -> Self {
        Self {
            codec,
            sample_rate,
            bitrate_kbps,
        }
    }

    pub fn extension(&self) -> &'static str {
        self.codec.extension()
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(AudioCodec::Mp3, 44_100, Some(128))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.codec, self.sample_rate)?;
        if let Some(bitrate) = self.bitrate_kbps {
            write!(f, "_{bitrate}")?;
        }
        Ok(())
    }
}

impl FromStr for OutputFormat {
    type Err = TTSError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TTSError::InvalidFormat(s.to_string());
        let mut parts = s.trim().split('_');

        let codec = parts
            .next()
            .and_then(|c| c.parse::<AudioCodec>().ok())
            .ok_or_else(invalid)?;
        let sample_rate = parts
            .next()
            .and_then(|r| r.parse::<u32>().ok())
            .filter(|r| *r > 0)
            .ok_or_else(invalid)?;
        let bitrate_kbps = match parts.next() {
            Some(b) => Some(b.parse::<u32>().map_err(|_| invalid())?),
            None => None,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self::new(codec, sample_rate, bitrate_kbps))
    }
}

/// Voice identifier as known by the provider
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoiceIdentifier {
    /// Provider voice id (e.g. an ElevenLabs voice id)
    pub id: String,
}

impl VoiceIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl From<String> for VoiceIdentifier {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&str> for VoiceIdentifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Speech generation request
#[derive(Clone, Debug)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: VoiceIdentifier,
    /// Provider model id, `None` selects the provider default
    pub model_id: Option<String>,
    pub output_format: OutputFormat,
    /// Text spoken before this line, used for prosody continuity
    pub previous_text: Option<String>,
    /// Text spoken after this line
    pub next_text: Option<String>,
    pub seed: Option<u32>,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>, voice: impl Into<VoiceIdentifier>) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
            model_id: None,
            output_format: OutputFormat::default(),
            previous_text: None,
            next_text: None,
            seed: None,
        }
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_context(mut self, previous: Option<String>, next: Option<String>) -> Self {
        self.previous_text = previous;
        self.next_text = next;
        self
    }

    pub fn with_seed(mut self, seed: Option<u32>) -> Self {
        self.seed = seed;
        self
    }
}

/// Encoded audio as returned by the provider
#[derive(Clone, Debug)]
pub struct EncodedAudio {
    pub data: Bytes,
    pub format: OutputFormat,
}

/// Speech generation response
#[derive(Clone, Debug)]
pub struct SpeechResponse {
    pub audio: EncodedAudio,
    pub text: String,
    /// Wall time spent on the request
    pub elapsed_ms: u64,
}

/// Stream of encoded audio bytes forming one file
pub type AudioByteStream<'a> = Pin<Box<dyn Stream<Item = TTSResult<Bytes>> + Send + 'a>>;
