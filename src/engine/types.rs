//! Engine and processing-mode enumerations plus the capability descriptor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Network speech-to-text backend selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineType {
    AssemblyAi,
    Deepgram,
}

impl EngineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssemblyAi => "assemblyai",
            Self::Deepgram => "deepgram",
        }
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "assemblyai" | "assembly-ai" | "assembly_ai" => Ok(Self::AssemblyAi),
            "deepgram" => Ok(Self::Deepgram),
            other => Err(format!(
                "unknown engine '{}' (expected: assemblyai, deepgram)",
                other
            )),
        }
    }
}

/// How an engine consumes audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    /// Real-time, incremental audio.
    Streaming,
    /// Whole-file submission.
    Batch,
}

impl ProcessingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Streaming => "streaming",
            Self::Batch => "batch",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "streaming" | "stream" => Ok(Self::Streaming),
            "batch" => Ok(Self::Batch),
            other => Err(format!(
                "unknown processing mode '{}' (expected: streaming, batch)",
                other
            )),
        }
    }
}

/// Read-only capability descriptor an engine reports about itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfiguration {
    pub engine_type: EngineType,
    pub name: String,
    pub supports_streaming: bool,
    pub supports_batch: bool,
    /// Configuration keys that must be set before `initialize` succeeds.
    pub required_config_keys: Vec<String>,
    pub supported_languages: Vec<String>,
    pub recommended_buffer_ms: u32,
    pub required_sample_rate: u32,
}

impl EngineConfiguration {
    pub fn supports(&self, mode: ProcessingMode) -> bool {
        match mode {
            ProcessingMode::Streaming => self.supports_streaming,
            ProcessingMode::Batch => self.supports_batch,
        }
    }
}
