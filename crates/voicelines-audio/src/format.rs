use crate::error::{AudioError, AudioResult};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Target sample rates accepted by [`ConvertSettings::validate`]
pub const SAMPLE_RATE_RANGE: RangeInclusive<u32> = 8_000..=192_000;

/// Largest target channel count (7.1)
pub const MAX_CHANNELS: usize = 8;

/// Decoded audio with interleaved samples normalized to [-1.0, 1.0]
#[derive(Clone, Debug, PartialEq)]
pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

impl AudioData {
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1)
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }
}

/// How the bytes of a source file are laid out
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceEncoding {
    /// Self-describing file (mp3, wav, ogg, flac); the path extension guides probing
    Container,
    /// Headerless signed 16-bit little-endian mono samples
    Pcm16 { sample_rate: u32 },
    /// Headerless G.711 mu-law mono samples
    MuLaw { sample_rate: u32 },
    /// Headerless G.711 A-law mono samples
    ALaw { sample_rate: u32 },
}

/// Target file format of a conversion
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Wav,
    Ogg,
    Mp3,
    Flac,
}

impl TargetFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Wav => "wav",
            TargetFormat::Ogg => "ogg",
            TargetFormat::Mp3 => "mp3",
            TargetFormat::Flac => "flac",
        }
    }

    /// ffmpeg codec and muxer names, `None` for formats written natively
    pub(crate) fn ffmpeg_codec(&self) -> Option<(&'static str, &'static str)> {
        match self {
            TargetFormat::Wav => None,
            TargetFormat::Ogg => Some(("libvorbis", "ogg")),
            TargetFormat::Mp3 => Some(("libmp3lame", "mp3")),
            TargetFormat::Flac => Some(("flac", "flac")),
        }
    }

    /// Parse a user supplied format name
    pub fn parse_name(name: &str) -> AudioResult<Self> {
        Self::from_str(name.trim())
            .map_err(|_| AudioError::UnsupportedTargetFormat(name.to_string()))
    }
}

/// Parameters applied to every converted clip
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertSettings {
    pub format: TargetFormat,
    pub sample_rate: u32,
    pub channels: usize,
    pub normalize: bool,
}

impl ConvertSettings {
    pub fn new(format: TargetFormat, sample_rate: u32, channels: usize) -> Self {
        Self {
            format,
            sample_rate,
            channels,
            normalize: true,
        }
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn validate(&self) -> AudioResult<()> {
        if !SAMPLE_RATE_RANGE.contains(&self.sample_rate)
            || self.channels == 0
            || self.channels > MAX_CHANNELS
        {
            return Err(AudioError::InvalidTargetConfig {
                sample_rate: self.sample_rate,
                channels: self.channels,
            });
        }
        Ok(())
    }
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self::new(TargetFormat::Ogg, 22_000, 1)
    }
}
