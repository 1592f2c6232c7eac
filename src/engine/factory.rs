//! Engine gate: construct, check the processing mode, then initialize.

use crate::config::Config;
use crate::engine::assemblyai::AssemblyAiEngine;
use crate::engine::deepgram::DeepgramEngine;
use crate::engine::transcription::TranscriptionEngine;
use crate::engine::types::{EngineConfiguration, EngineType};
use crate::error::{PcmforgeError, Result};
use std::collections::BTreeMap;

/// Validated, initialized engine.
pub type EngineHandle = Box<dyn TranscriptionEngine>;

/// Builds an engine from configuration without touching the network.
pub type EngineConstructor = Box<dyn Fn(&Config) -> EngineHandle + Send + Sync>;

pub struct EngineFactory {
    constructors: BTreeMap<EngineType, EngineConstructor>,
}

impl EngineFactory {
    /// Factory with the built-in engines registered.
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory.register(EngineType::AssemblyAi, |config| {
            Box::new(AssemblyAiEngine::new(config))
        });
        factory.register(EngineType::Deepgram, |config| {
            Box::new(DeepgramEngine::new(config))
        });
        factory
    }

    /// Factory with nothing registered.
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Register (or replace) the constructor for `engine_type`.
    pub fn register<F>(&mut self, engine_type: EngineType, constructor: F)
    where
        F: Fn(&Config) -> EngineHandle + Send + Sync + 'static,
    {
        self.constructors.insert(engine_type, Box::new(constructor));
    }

    pub fn is_registered(&self, engine_type: EngineType) -> bool {
        self.constructors.contains_key(&engine_type)
    }

    /// Build the configured engine for the configured processing mode.
    ///
    /// The mode is checked before `initialize` runs, so an engine that
    /// cannot serve the mode is never initialized.
    pub fn build_engine(&self, config: &Config) -> Result<EngineHandle> {
        let constructor =
            self.constructors
                .get(&config.engine)
                .ok_or(PcmforgeError::UnsupportedEngine {
                    engine: config.engine,
                })?;

        let mut engine = constructor(config);
        let mode = config.processing_mode;

        if !engine.supports_mode(mode) {
            return Err(PcmforgeError::ModeNotSupported {
                engine: engine.name().to_string(),
                mode,
            });
        }

        engine.initialize().map_err(|e| match e {
            PcmforgeError::EngineInitialization { .. } => e,
            other => PcmforgeError::EngineInitialization {
                engine: engine.name().to_string(),
                message: other.to_string(),
            },
        })?;

        tracing::info!(engine = engine.name(), mode = %mode, "Created transcription engine");
        Ok(engine)
    }

    /// Capabilities of every registered engine, read from throwaway
    /// instances built under the default configuration.
    pub fn supported_engines(&self) -> BTreeMap<EngineType, EngineConfiguration> {
        let defaults = Config::default();
        self.constructors
            .iter()
            .map(|(engine_type, constructor)| (*engine_type, constructor(&defaults).configuration()))
            .collect()
    }
}

impl Default for EngineFactory {
    fn default() -> Self {
        Self::new()
    }
}
