//! pcmforge - PCM transcoding with ordered backend fallback
//!
//! Converts raw 16-bit mono PCM into wav, au, aiff, mp3, ogg, flac, aac or
//! m4a by trying the native encoder, the transcoding library and an
//! external transcoder in that order. Also gates which transcription engine
//! may run in which processing mode before any engine is initialized.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod convert;
pub mod defaults;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod format;
#[cfg(feature = "cli")]
pub mod logging;
pub mod pcm;

// Conversion
pub use convert::{CommandExecutor, ConversionBackend, DebugDump, SystemCommandExecutor, Transcoder};
pub use format::{BackendKind, ConversionInfo, FormatTag, PerformanceInfo};
pub use pcm::PcmBuffer;

// Engine gate
pub use engine::{
    EngineConfiguration, EngineFactory, EngineHandle, EngineType, ProcessingMode,
    TranscriptionEngine,
};

// Error handling
pub use error::{PcmforgeError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
