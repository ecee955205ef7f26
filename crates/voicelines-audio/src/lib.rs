//! # voicelines audio
//!
//! Converts generated speech into the clip format a project ships with:
//! decode the provider payload, remix channels, resample, optionally
//! peak-normalize, then encode. WAV is written natively; OGG, MP3 and FLAC go
//! through `ffmpeg`.
//!
//! ```no_run
//! use std::path::Path;
//! use voicelines_audio::{AudioConverter, ConvertSettings, SourceEncoding, TargetFormat, Transcoder};
//!
//! let report = Transcoder::default()
//!     .convert(
//!         Path::new("scratch/greet.mp3"),
//!         SourceEncoding::Container,
//!         &ConvertSettings::new(TargetFormat::Ogg, 22_000, 1),
//!         Path::new("output/npc1/greet.ogg"),
//!     )
//!     .unwrap();
//! println!("{:.3}s", report.duration_secs);
//! ```

mod converter;
pub mod decode;
pub mod encode;
pub mod error;
pub mod format;
pub mod process;

pub use converter::{AudioConverter, ConversionReport, ENV_FFMPEG, Transcoder, TranscoderConfig};
pub use error::{AudioError, AudioResult};
pub use format::{
    AudioData, ConvertSettings, MAX_CHANNELS, SAMPLE_RATE_RANGE, SourceEncoding, TargetFormat,
};
