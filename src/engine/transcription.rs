use crate::engine::types::{EngineConfiguration, EngineType, ProcessingMode};
use crate::error::{PcmforgeError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for network speech-to-text engines.
///
/// Only the capability surface lives here: the gate needs the mode flags,
/// a display name and an initialization hook. Construction must not touch
/// the network.
pub trait TranscriptionEngine: Send + Sync {
    /// Display name used in logs and errors
    fn name(&self) -> &str;

    fn supports_streaming_mode(&self) -> bool;

    fn supports_batch_mode(&self) -> bool;

    /// Prepare the engine for use.
    ///
    /// Called exactly once by the factory, after the mode check passed.
    fn initialize(&mut self) -> Result<()>;

    /// Check if `initialize` has completed successfully
    fn is_ready(&self) -> bool;

    /// Capability descriptor
    fn configuration(&self) -> EngineConfiguration;

    fn supports_mode(&self, mode: ProcessingMode) -> bool {
        match mode {
            ProcessingMode::Streaming => self.supports_streaming_mode(),
            ProcessingMode::Batch => self.supports_batch_mode(),
        }
    }
}

/// Mock engine for testing
///
/// Counts `initialize` calls through a shared counter so callers can check
/// the hook was (or was not) run after the engine has been boxed.
#[derive(Debug, Clone)]
pub struct MockEngine {
    engine_type: EngineType,
    name: String,
    streaming: bool,
    batch: bool,
    should_fail: bool,
    ready: bool,
    init_calls: Arc<AtomicUsize>,
}

impl MockEngine {
    /// Create a mock supporting both modes
    pub fn new(engine_type: EngineType, name: &str) -> Self {
        Self {
            engine_type,
            name: name.to_string(),
            streaming: true,
            batch: true,
            should_fail: false,
            ready: false,
            init_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_streaming(mut self, supported: bool) -> Self {
        self.streaming = supported;
        self
    }

    pub fn with_batch(mut self, supported: bool) -> Self {
        self.batch = supported;
        self
    }

    /// Configure the mock to fail on initialize
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Share an external counter of `initialize` calls
    pub fn with_init_counter(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.init_calls = counter;
        self
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }
}

impl TranscriptionEngine for MockEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports_streaming_mode(&self) -> bool {
        self.streaming
    }

    fn supports_batch_mode(&self) -> bool {
        self.batch
    }

    fn initialize(&mut self) -> Result<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(PcmforgeError::EngineInitialization {
                engine: self.name.clone(),
                message: "mock initialization failure".to_string(),
            });
        }
        self.ready = true;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn configuration(&self) -> EngineConfiguration {
        EngineConfiguration {
            engine_type: self.engine_type,
            name: self.name.clone(),
            supports_streaming: self.streaming,
            supports_batch: self.batch,
            required_config_keys: Vec::new(),
            supported_languages: vec!["en".to_string()],
            recommended_buffer_ms: 100,
            required_sample_rate: 16000,
        }
    }
}
