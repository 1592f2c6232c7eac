//! AssemblyAI engine: batch submission only.

use crate::config::{AssemblyAiConfig, Config};
use crate::engine::transcription::TranscriptionEngine;
use crate::engine::types::{EngineConfiguration, EngineType};
use crate::error::{PcmforgeError, Result};

pub const NAME: &str = "AssemblyAI";

const LANGUAGES: &[&str] = &[
    "en", "es", "fr", "de", "it", "pt", "nl", "hi", "ja", "zh", "fi", "ko", "pl", "ru", "tr",
    "uk", "vi",
];

/// Whole-file uploads work best with a few seconds of audio per request.
const RECOMMENDED_BUFFER_MS: u32 = 5000;

pub struct AssemblyAiEngine {
    settings: AssemblyAiConfig,
    sample_rate: u32,
    ready: bool,
}

impl AssemblyAiEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            settings: config.assemblyai.clone(),
            sample_rate: config.audio.sample_rate,
            ready: false,
        }
    }

    pub fn language_code(&self) -> &str {
        &self.settings.language_code
    }
}

impl TranscriptionEngine for AssemblyAiEngine {
    fn name(&self) -> &str {
        NAME
    }

    fn supports_streaming_mode(&self) -> bool {
        false
    }

    fn supports_batch_mode(&self) -> bool {
        true
    }

    fn initialize(&mut self) -> Result<()> {
        if self.settings.api_key.trim().is_empty() {
            return Err(PcmforgeError::EngineInitialization {
                engine: NAME.to_string(),
                message: "assemblyai.api_key is not set".to_string(),
            });
        }
        self.ready = true;
        tracing::debug!(language = %self.settings.language_code, "AssemblyAI engine initialized");
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn configuration(&self) -> EngineConfiguration {
        EngineConfiguration {
            engine_type: EngineType::AssemblyAi,
            name: NAME.to_string(),
            supports_streaming: self.supports_streaming_mode(),
            supports_batch: self.supports_batch_mode(),
            required_config_keys: vec!["assemblyai.api_key".to_string()],
            supported_languages: LANGUAGES.iter().map(|l| l.to_string()).collect(),
            recommended_buffer_ms: RECOMMENDED_BUFFER_MS,
            required_sample_rate: self.sample_rate,
        }
    }
}
