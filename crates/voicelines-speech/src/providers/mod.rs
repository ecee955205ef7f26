//! Speech provider implementations
//!
//! Each provider is feature-gated and can be enabled individually.

#[cfg(feature = "elevenlabs")]
pub mod elevenlabs;
