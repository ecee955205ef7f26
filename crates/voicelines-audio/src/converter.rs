use crate::decode::read_audio;
use crate::encode::{encode_with_ffmpeg, write_wav};
use crate::error::{AudioError, AudioResult};
use crate::format::{AudioData, ConvertSettings, SourceEncoding, TargetFormat};
use crate::process::{DEFAULT_HEADROOM_DB, apply_target_config};
use serde::{Deserialize, Serialize};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Environment variable naming the ffmpeg executable
pub const ENV_FFMPEG: &str = "VOICELINES_FFMPEG";

/// Outcome of one conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    pub path: PathBuf,
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: usize,
    pub frames: usize,
}

/// Converts a source audio file into the target format and parameters.
pub trait AudioConverter: Send + Sync {
    /// Decode `source`, apply `settings` and write the result to `destination`,
    /// creating missing parent directories.
    fn convert(
        &self,
        source: &Path,
        encoding: SourceEncoding,
        settings: &ConvertSettings,
        destination: &Path,
    ) -> AudioResult<ConversionReport>;
}

/// Configuration for [`Transcoder`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscoderConfig {
    /// ffmpeg executable used for non-WAV targets
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: PathBuf,

    /// Normalization headroom in dB below full scale
    #[serde(default = "default_headroom_db")]
    pub headroom_db: f32,
}

fn default_ffmpeg() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_headroom_db() -> f32 {
    DEFAULT_HEADROOM_DB
}

impl TranscoderConfig {
    pub fn with_ffmpeg(mut self, ffmpeg: impl Into<PathBuf>) -> Self {
        self.ffmpeg = ffmpeg.into();
        self
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var(ENV_FFMPEG) {
            if !path.trim().is_empty() {
                self.ffmpeg = PathBuf::from(path);
            }
        }
        self
    }
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            headroom_db: default_headroom_db(),
        }
    }
}

/// Decodes in-process, writes WAV natively and hands other targets to ffmpeg.
///
/// The destination only ever appears complete: output is written to a temporary
/// file next to it and renamed into place.
#[derive(Debug, Clone, Default)]
pub struct Transcoder {
    config: TranscoderConfig,
}

impl Transcoder {
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranscoderConfig {
        &self.config
    }

    fn write_destination(
        &self,
        audio: &AudioData,
        format: TargetFormat,
        destination: &Path,
    ) -> AudioResult<()> {
        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let mut staged = tempfile::Builder::new()
            .prefix(".voicelines-")
            .suffix(&format!(".{}", format.extension()))
            .tempfile_in(&parent)?;

        match format {
            TargetFormat::Wav => {
                write_wav(BufWriter::new(staged.as_file_mut()), audio)?;
            }
            _ => {
                let mut wav = tempfile::Builder::new()
                    .prefix("voicelines-")
                    .suffix(".wav")
                    .tempfile()?;
                write_wav(BufWriter::new(wav.as_file_mut()), audio)?;
                encode_with_ffmpeg(&self.config.ffmpeg, wav.path(), staged.path(), format)?;
            }
        }

        staged.persist(destination)?;
        Ok(())
    }
}

impl AudioConverter for Transcoder {
    fn convert(
        &self,
        source: &Path,
        encoding: SourceEncoding,
        settings: &ConvertSettings,
        destination: &Path,
    ) -> AudioResult<ConversionReport> {
        settings.validate()?;

        let decoded = read_audio(source, encoding)?;
        if decoded.samples.is_empty() {
            return Err(AudioError::EmptyAudio(source.to_path_buf()));
        }
        log::debug!(
            "decoded {} ({} Hz, {} ch, {:.3}s)",
            source.display(),
            decoded.sample_rate,
            decoded.channels,
            decoded.duration_secs()
        );

        let processed = apply_target_config(decoded, settings, self.config.headroom_db)?;
        self.write_destination(&processed, settings.format, destination)?;

        Ok(ConversionReport {
            path: destination.to_path_buf(),
            duration_secs: processed.duration_secs(),
            sample_rate: processed.sample_rate,
            channels: processed.channels,
            frames: processed.frames(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TranscoderConfig::default();
        assert_eq!(config.ffmpeg, PathBuf::from("ffmpeg"));
        assert_eq!(config.headroom_db, DEFAULT_HEADROOM_DB);
    }

    #[test]
    fn test_empty_source_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("empty.pcm");
        std::fs::write(&source, b"").unwrap();

        let result = Transcoder::default().convert(
            &source,
            SourceEncoding::Pcm16 { sample_rate: 22_050 },
            &ConvertSettings::new(TargetFormat::Wav, 22_050, 1),
            &dir.path().join("out.wav"),
        );

        assert!(matches!(result, Err(AudioError::EmptyAudio(_))));
        assert!(!dir.path().join("out.wav").exists());
    }
}
