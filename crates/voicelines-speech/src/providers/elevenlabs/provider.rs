//! ElevenLabs provider implementation
//!
//! Implements the TTS traits on top of the ElevenLabs REST API.

use super::config::ElevenLabsConfig;
use super::error::{ElevenLabsError, Result};
use super::models::{ApiModel, ElevenLabsModel};
use crate::{
    AudioByteStream, AudioCodec, ModelInfo, SpeechRequest, TTSError, TTSModelsProvider,
    TTSProvider, TTSResult, TTSSpeechProvider,
};
use async_trait::async_trait;
use futures::StreamExt;
use serde::Serialize;
use std::time::Duration;

const XI_API_KEY_HEADER: &str = "xi-api-key";

#[derive(Debug, Serialize)]
struct TextToSpeechBody<'a> {
    text: &'a str,
    model_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
}

/// ElevenLabs provider
pub struct ElevenLabs {
    client: reqwest::Client,
    config: ElevenLabsConfig,
    api_key: String,
}

impl ElevenLabs {
    /// Create a provider, failing when no API key is configured
    pub fn new(config: ElevenLabsConfig) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or(ElevenLabsError::MissingApiKey)?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &ElevenLabsConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn send_text_to_speech(&self, request: &SpeechRequest) -> Result<reqwest::Response> {
        if request.text.trim().is_empty() {
            return Err(ElevenLabsError::InvalidRequest(format!(
                "empty text for voice '{}'",
                request.voice.id()
            )));
        }
        if request.voice.id().trim().is_empty() {
            return Err(ElevenLabsError::InvalidRequest(
                "empty voice id".to_string(),
            ));
        }

        let body = TextToSpeechBody {
            text: &request.text,
            model_id: request
                .model_id
                .as_deref()
                .unwrap_or(&self.config.default_model),
            previous_text: request.previous_text.as_deref(),
            next_text: request.next_text.as_deref(),
            seed: request.seed,
        };

        let url = self.endpoint(&format!("v1/text-to-speech/{}", request.voice.id()));
        log::debug!(
            "POST {} (output_format={}, model={})",
            url,
            request.output_format,
            body.model_id
        );

        let resp = self
            .client
            .post(&url)
            .query(&[("output_format", request.output_format.to_string())])
            .header(XI_API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        check_status(resp).await
    }

    async fn fetch_models(&self) -> Result<Vec<ModelInfo>> {
        let url = self.endpoint("v1/models");
        log::debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .header(XI_API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        let models: Vec<ApiModel> = check_status(resp).await?.json().await?;

        Ok(models.into_iter().map(ApiModel::into_model_info).collect())
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ElevenLabsError::Api {
        status: status.as_u16(),
        body,
    })
}

impl TTSProvider for ElevenLabs {
    fn provider_name(&self) -> &str {
        "elevenlabs"
    }
}

#[async_trait]
impl TTSSpeechProvider for ElevenLabs {
    async fn generate_speech_stream<'a>(
        &'a self,
        request: SpeechRequest,
    ) -> TTSResult<AudioByteStream<'a>> {
        let resp = self
            .send_text_to_speech(&request)
            .await
            .map_err(TTSError::from)?;

        let stream = resp
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| TTSError::Transport(e.to_string())));
        Ok(Box::pin(stream))
    }

    fn supported_codecs(&self) -> Vec<AudioCodec> {
        vec![
            AudioCodec::Mp3,
            AudioCodec::Pcm,
            AudioCodec::Ulaw,
            AudioCodec::Alaw,
            AudioCodec::Opus,
        ]
    }
}

#[async_trait]
impl TTSModelsProvider for ElevenLabs {
    async fn list_models(&self) -> TTSResult<Vec<ModelInfo>> {
        self.fetch_models().await.map_err(TTSError::from)
    }

    fn get_current_model(&self) -> ModelInfo {
        let id = self.config.default_model.clone();
        let description = ElevenLabsModel::from_id(&id).map(|m| m.description().to_string());
        ModelInfo {
            name: id.clone(),
            id,
            description,
            languages: vec![],
        }
    }
}
