//! Deepgram engine: streaming and batch.

use crate::config::{Config, DeepgramConfig};
use crate::engine::transcription::TranscriptionEngine;
use crate::engine::types::{EngineConfiguration, EngineType};
use crate::error::{PcmforgeError, Result};

pub const NAME: &str = "Deepgram";

const LANGUAGES: &[&str] = &[
    "en", "es", "fr", "de", "it", "pt", "nl", "hi", "ja", "zh", "ko", "pl", "ru", "sv", "tr",
    "uk", "da", "no",
];

const RECOMMENDED_BUFFER_MS: u32 = 100;

pub struct DeepgramEngine {
    settings: DeepgramConfig,
    sample_rate: u32,
    ready: bool,
}

impl DeepgramEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            settings: config.deepgram.clone(),
            sample_rate: config.audio.sample_rate,
            ready: false,
        }
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    pub fn language(&self) -> &str {
        &self.settings.language
    }
}

impl TranscriptionEngine for DeepgramEngine {
    fn name(&self) -> &str {
        NAME
    }

    fn supports_streaming_mode(&self) -> bool {
        true
    }

    fn supports_batch_mode(&self) -> bool {
        true
    }

    fn initialize(&mut self) -> Result<()> {
        if self.settings.api_key.trim().is_empty() {
            return Err(PcmforgeError::EngineInitialization {
                engine: NAME.to_string(),
                message: "deepgram.api_key is not set".to_string(),
            });
        }
        self.ready = true;
        tracing::debug!(
            model = %self.settings.model,
            language = %self.settings.language,
            punctuate = self.settings.punctuate,
            interim_results = self.settings.interim_results,
            "Deepgram engine initialized"
        );
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn configuration(&self) -> EngineConfiguration {
        EngineConfiguration {
            engine_type: EngineType::Deepgram,
            name: NAME.to_string(),
            supports_streaming: self.supports_streaming_mode(),
            supports_batch: self.supports_batch_mode(),
            required_config_keys: vec!["deepgram.api_key".to_string()],
            supported_languages: LANGUAGES.iter().map(|l| l.to_string()).collect(),
            recommended_buffer_ms: RECOMMENDED_BUFFER_MS,
            required_sample_rate: self.sample_rate,
        }
    }
}
