use crate::{
    AudioByteStream, AudioCodec, EncodedAudio, ModelInfo, SpeechRequest, SpeechResponse,
    TTSResult,
};
use async_trait::async_trait;
use futures::StreamExt;
use std::time::Instant;

/// Marker Trait for TTS providers
///
/// This trait combines all TTS capabilities into a single provider interface.
/// Providers should implement this marker trait along with the specific capability traits.
pub trait TTSProvider: TTSSpeechProvider + TTSModelsProvider + Send + Sync {
    /// Short provider name used in logs and errors
    fn provider_name(&self) -> &str;
}

/// Trait for TTS speech generation capabilities
#[async_trait]
pub trait TTSSpeechProvider: Send + Sync {
    /// Generate speech as a stream of encoded byte chunks (required)
    ///
    /// # Arguments
    /// * `request` - Speech generation request with text, voice, model and format
    ///
    /// # Returns
    /// Stream of byte chunks which, concatenated, form one audio file in
    /// `request.output_format`
    async fn generate_speech_stream<'a>(
        &'a self,
        request: SpeechRequest,
    ) -> TTSResult<AudioByteStream<'a>>;

    /// Generate speech and collect the whole payload in memory
    async fn generate_speech(&self, request: SpeechRequest) -> TTSResult<SpeechResponse> {
        let started = Instant::now();
        let format = request.output_format.clone();
        let text = request.text.clone();

        let mut stream = self.generate_speech_stream(request).await?;
        let mut data = Vec::new();
        while let Some(chunk) = stream.next().await {
            data.extend_from_slice(&chunk?);
        }

        Ok(SpeechResponse {
            audio: EncodedAudio {
                data: data.into(),
                format,
            },
            text,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Get supported output codecs (default: MP3 only)
    fn supported_codecs(&self) -> Vec<AudioCodec> {
        vec![AudioCodec::Mp3]
    }
}

/// Trait for TTS model management capabilities
#[async_trait]
pub trait TTSModelsProvider: Send + Sync {
    /// List available models (optional)
    ///
    /// # Returns
    /// List of available model information
    async fn list_models(&self) -> TTSResult<Vec<ModelInfo>> {
        Ok(vec![])
    }

    /// Get current model information (required)
    fn get_current_model(&self) -> ModelInfo;
}
