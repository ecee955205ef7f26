//! # voicelines
//!
//! Idempotent batch generation of voice lines. Each input row names a voice, a
//! line of text and the clip format a project wants. A run skips rows whose
//! clip already exists (unless regeneration is requested), synthesizes the rest
//! through a [`TTSSpeechProvider`](voicelines_speech::TTSSpeechProvider), converts
//! each payload with an [`AudioConverter`](voicelines_audio::AudioConverter) and
//! merges `path,duration` rows into a cumulative report.
//!
//! ```no_run
//! use voicelines::{BatchRunner, RunOptions, read_input};
//! use voicelines_audio::Transcoder;
//! use voicelines_speech::providers::elevenlabs::{ElevenLabs, ElevenLabsConfig};
//!
//! # async fn run() -> voicelines::Result<()> {
//! let provider = ElevenLabs::new(ElevenLabsConfig::default().with_env_overrides())
//!     .map_err(voicelines_speech::TTSError::from)?;
//! let transcoder = Transcoder::default();
//! let rows = read_input("lines/npc1.json")?;
//!
//! let summary = BatchRunner::new(&provider, &transcoder, RunOptions::new("output"))
//!     .run(&rows)
//!     .await?;
//! println!("{} generated", summary.generated());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod item;
pub mod layout;
pub mod pipeline;
pub mod report;

pub use config::{OutputConfig, RunConfig};
pub use error::{BatchError, Result};
pub use input::read_input;
pub use item::{RawItem, WorkItem, sanitize_filename};
pub use layout::{ExistenceGate, GateDecision, OutputLayout};
pub use pipeline::{BatchRunner, FailureMode, ItemOutcome, RunOptions, RunSummary};
pub use report::Report;
