//! # voicelines speech
//!
//! Text-to-speech provider abstractions for the voicelines batch generator.
//!
//! Providers turn a [`SpeechRequest`] into encoded audio bytes in the requested
//! [`OutputFormat`]. The batch runner only depends on the traits, so the HTTP
//! provider can be swapped for a fake in tests.
//!
//! ## Architecture
//!
//! - `TTSProvider`: Marker trait combining all TTS capabilities
//! - `TTSSpeechProvider`: Speech generation, streamed or collected
//! - `TTSModelsProvider`: Model listing and the current model
//!
//! ## Providers
//!
//! Enable providers using feature flags:
//! - `elevenlabs` (default): ElevenLabs REST API
//!
//! ## Example
//!
//! ```no_run
//! use voicelines_speech::{SpeechRequest, TTSSpeechProvider};
//!
//! async fn generate(provider: &dyn TTSSpeechProvider) {
//!     let request = SpeechRequest::new("Hello there", "21m00Tcm4TlvDq8ikWAM")
//!         .with_output_format("mp3_44100_128".parse().unwrap());
//!
//!     let response = provider.generate_speech(request).await.unwrap();
//!     println!("Received {} bytes", response.audio.data.len());
//! }
//! ```

pub mod error;
mod provider;
pub mod types;

// Provider implementations
pub mod providers;

pub use error::{TTSError, TTSResult};
pub use provider::{TTSModelsProvider, TTSProvider, TTSSpeechProvider};
pub use types::{
    AudioByteStream, AudioCodec, EncodedAudio, ModelInfo, OutputFormat, SpeechRequest,
    SpeechResponse, VoiceIdentifier,
};
