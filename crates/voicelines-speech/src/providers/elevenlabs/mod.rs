//! ElevenLabs provider
//!
//! # Examples
//!
//! ```no_run
//! use voicelines_speech::providers::elevenlabs::{ElevenLabs, ElevenLabsConfig};
//! use voicelines_speech::{SpeechRequest, TTSSpeechProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = ElevenLabs::new(ElevenLabsConfig::default().with_env_overrides())?;
//!
//!     let request = SpeechRequest::new("Hello there", "21m00Tcm4TlvDq8ikWAM");
//!     let response = provider.generate_speech(request).await?;
//!     std::fs::write("hello.mp3", &response.audio.data)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;

mod provider;

// Re-exports
pub use config::{ElevenLabsConfig, api_key_from_env};
pub use error::{ElevenLabsError, Result};
pub use models::ElevenLabsModel;
pub use provider::ElevenLabs;
