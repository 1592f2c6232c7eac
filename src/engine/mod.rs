//! Transcription engines and the engine/mode gate.

pub mod assemblyai;
pub mod deepgram;
pub mod factory;
pub mod transcription;
pub mod types;

pub use assemblyai::AssemblyAiEngine;
pub use deepgram::DeepgramEngine;
pub use factory::{EngineConstructor, EngineFactory, EngineHandle};
pub use transcription::{MockEngine, TranscriptionEngine};
pub use types::{EngineConfiguration, EngineType, ProcessingMode};
