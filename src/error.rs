//! Error types for pcmforge.

use crate::engine::types::{EngineType, ProcessingMode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PcmforgeError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Conversion errors
    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("{backend} backend failed: {message}")]
    BackendFailure { backend: String, message: String },

    #[error("{program} failed{}: {message}", exit_code_suffix(.exit_code))]
    SubprocessFailure {
        program: String,
        exit_code: Option<i32>,
        message: String,
    },

    #[error("Transcoder executable not found: {tool}")]
    ToolNotFound { tool: String },

    #[error("Conversion to {format} failed: {source}")]
    ConversionFailed {
        format: String,
        source: Box<PcmforgeError>,
    },

    #[error("WAV encoding failed: {0}")]
    WavEncoding(#[from] hound::Error),

    // Engine gate errors
    #[error("Unsupported transcription engine: {engine}")]
    UnsupportedEngine { engine: EngineType },

    #[error("Engine '{engine}' does not support {mode} mode")]
    ModeNotSupported {
        engine: String,
        mode: ProcessingMode,
    },

    #[error("Engine '{engine}' failed to initialize: {message}")]
    EngineInitialization { engine: String, message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PcmforgeError {
    /// Wrap a backend's error as the terminal failure for `format`.
    pub fn conversion_failed(format: &str, cause: PcmforgeError) -> Self {
        Self::ConversionFailed {
            format: format.to_string(),
            source: Box::new(cause),
        }
    }
}

fn exit_code_suffix(exit_code: &Option<i32>) -> String {
    exit_code
        .map(|code| format!(" with exit code {code}"))
        .unwrap_or_default()
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, PcmforgeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_file_not_found_display() {
        let error = PcmforgeError::ConfigFileNotFound {
            path: "/path/to/config.toml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found at /path/to/config.toml"
        );
    }

    #[test]
    fn test_config_invalid_value_display() {
        let error = PcmforgeError::ConfigInvalidValue {
            key: "audio.sample_rate".to_string(),
            message: "must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for audio.sample_rate: must be positive"
        );
    }

    #[test]
    fn test_unsupported_format_display() {
        let error = PcmforgeError::UnsupportedFormat {
            format: "xyz".to_string(),
        };
        assert_eq!(error.to_string(), "Unsupported audio format: xyz");
    }

    #[test]
    fn test_backend_failure_display() {
        let error = PcmforgeError::BackendFailure {
            backend: "library".to_string(),
            message: "output file not created".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "library backend failed: output file not created"
        );
    }

    #[test]
    fn test_subprocess_failure_with_exit_code() {
        let error = PcmforgeError::SubprocessFailure {
            program: "ffmpeg".to_string(),
            exit_code: Some(1),
            message: "Unknown encoder 'libvorbis'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "ffmpeg failed with exit code 1: Unknown encoder 'libvorbis'"
        );
    }

    #[test]
    fn test_subprocess_failure_without_exit_code() {
        let error = PcmforgeError::SubprocessFailure {
            program: "ffmpeg".to_string(),
            exit_code: None,
            message: "killed by signal".to_string(),
        };
        assert_eq!(error.to_string(), "ffmpeg failed: killed by signal");
    }

    #[test]
    fn test_conversion_failed_names_format_and_cause() {
        let cause = PcmforgeError::ToolNotFound {
            tool: "ffmpeg".to_string(),
        };
        let error = PcmforgeError::conversion_failed("mp3", cause);
        let message = error.to_string();
        assert!(message.contains("mp3"));
        assert!(message.contains("Transcoder executable not found: ffmpeg"));
    }

    #[test]
    fn test_conversion_failed_exposes_source() {
        let cause = PcmforgeError::ToolNotFound {
            tool: "ffmpeg".to_string(),
        };
        let error = PcmforgeError::conversion_failed("ogg", cause);
        let error_trait: &dyn std::error::Error = &error;
        let source = error_trait.source().unwrap();
        assert!(source.to_string().contains("ffmpeg"));
    }

    #[test]
    fn test_mode_not_supported_display() {
        let error = PcmforgeError::ModeNotSupported {
            engine: "AssemblyAI".to_string(),
            mode: ProcessingMode::Streaming,
        };
        assert_eq!(
            error.to_string(),
            "Engine 'AssemblyAI' does not support streaming mode"
        );
    }

    #[test]
    fn test_unsupported_engine_display() {
        let error = PcmforgeError::UnsupportedEngine {
            engine: EngineType::Deepgram,
        };
        assert_eq!(
            error.to_string(),
            "Unsupported transcription engine: deepgram"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: PcmforgeError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: PcmforgeError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_source_chain_io() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: PcmforgeError = io_error.into();

        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<PcmforgeError>();
        assert_sync::<PcmforgeError>();
    }
}
