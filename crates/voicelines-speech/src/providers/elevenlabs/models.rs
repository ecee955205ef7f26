//! ElevenLabs model identifiers and the `/v1/models` response shape

use crate::ModelInfo;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known ElevenLabs speech models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ElevenLabsModel {
    #[default]
    #[serde(rename = "eleven_multilingual_v2")]
    MultilingualV2,
    #[serde(rename = "eleven_turbo_v2_5")]
    TurboV2_5,
    #[serde(rename = "eleven_flash_v2_5")]
    FlashV2_5,
    #[serde(rename = "eleven_monolingual_v1")]
    MonolingualV1,
}

impl ElevenLabsModel {
    pub fn all() -> &'static [ElevenLabsModel] {
        &[
            ElevenLabsModel::MultilingualV2,
            ElevenLabsModel::TurboV2_5,
            ElevenLabsModel::FlashV2_5,
            ElevenLabsModel::MonolingualV1,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            ElevenLabsModel::MultilingualV2 => "eleven_multilingual_v2",
            ElevenLabsModel::TurboV2_5 => "eleven_turbo_v2_5",
            ElevenLabsModel::FlashV2_5 => "eleven_flash_v2_5",
            ElevenLabsModel::MonolingualV1 => "eleven_monolingual_v1",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().iter().copied().find(|m| m.id() == id)
    }

    pub fn description(&self) -> &'static str {
        match self {
            ElevenLabsModel::MultilingualV2 => "Lifelike, consistent quality across 29 languages",
            ElevenLabsModel::TurboV2_5 => "Balanced quality and latency",
            ElevenLabsModel::FlashV2_5 => "Lowest latency",
            ElevenLabsModel::MonolingualV1 => "Legacy English-only model",
        }
    }
}

impl fmt::Display for ElevenLabsModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiLanguage {
    pub language_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiModel {
    pub model_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub languages: Vec<ApiLanguage>,
}

impl ApiModel {
    pub(crate) fn into_model_info(self) -> ModelInfo {
        ModelInfo {
            name: self.name.unwrap_or_else(|| self.model_id.clone()),
            id: self.model_id,
            description: self.description,
            languages: self
                .languages
                .into_iter()
                .map(|l| l.language_id)
                .collect(),
        }
    }
}
