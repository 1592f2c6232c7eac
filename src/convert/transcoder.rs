//! Multi-backend transcoder with ordered fallback.
//!
//! Backends are kept sorted by `BackendKind` priority: the native encoder
//! first, then the transcoding library, then the external process. A
//! conversion tries every backend that can produce the requested format in
//! that order and returns the first success. When all of them fail, only
//! the last error is surfaced (wrapped in `ConversionFailed`); the earlier
//! ones are logged.

use crate::config::ConversionConfig;
use crate::convert::backend::ConversionBackend;
use crate::convert::command::{CommandExecutor, SystemCommandExecutor};
use crate::convert::external::ExternalProcessBackend;
use crate::convert::library::{LibraryBackend, LibraryEncoder};
use crate::convert::native::{NativeEncoder, encode_wav};
use crate::error::{PcmforgeError, Result};
use crate::format::{BackendKind, ConversionInfo, FormatTag, PerformanceInfo};
use crate::pcm::PcmBuffer;
use std::sync::Arc;

pub struct Transcoder {
    backends: Vec<Box<dyn ConversionBackend>>,
}

impl Transcoder {
    /// Build from an explicit backend list; order is normalized by priority.
    pub fn new(mut backends: Vec<Box<dyn ConversionBackend>>) -> Self {
        backends.sort_by_key(|b| b.kind());
        Self { backends }
    }

    /// Native encoder only.
    pub fn native_only() -> Self {
        Self::new(vec![Box::new(NativeEncoder::new())])
    }

    /// Backends enabled by `config`, spawning real processes.
    pub fn from_config(config: &ConversionConfig) -> Self {
        Self::with_executor(config, Arc::new(SystemCommandExecutor::new()))
    }

    /// Backends enabled by `config`, sharing `executor` for subprocess work.
    pub fn with_executor<E>(config: &ConversionConfig, executor: Arc<E>) -> Self
    where
        E: CommandExecutor + 'static,
    {
        let mut backends: Vec<Box<dyn ConversionBackend>> = vec![Box::new(NativeEncoder::new())];

        if config.library_enabled {
            let mut library = LibraryBackend::new(LibraryEncoder::new(
                config.library_encoder_path.clone(),
                Arc::clone(&executor),
            ));
            if let Some(root) = &config.scratch_dir {
                library = library.with_scratch_root(root);
            }
            backends.push(Box::new(library));
        }

        if config.external_enabled {
            let mut external =
                ExternalProcessBackend::new(config.ffmpeg_path.clone(), Arc::clone(&executor));
            if let Some(root) = &config.scratch_dir {
                external = external.with_scratch_root(root);
            }
            backends.push(Box::new(external));
        }

        Self::new(backends)
    }

    /// Registered backends in dispatch order.
    pub fn available_backends(&self) -> Vec<BackendKind> {
        self.backends.iter().map(|b| b.kind()).collect()
    }

    /// Convert PCM to `format` (case-insensitive tag).
    pub fn convert(&self, pcm: &[u8], sample_rate: u32, format: &str) -> Result<Vec<u8>> {
        let tag: FormatTag = format.parse()?;
        self.convert_to(pcm, sample_rate, tag)
    }

    /// Convert PCM to an already-parsed format.
    pub fn convert_to(&self, pcm: &[u8], sample_rate: u32, format: FormatTag) -> Result<Vec<u8>> {
        let eligible: Vec<&dyn ConversionBackend> = self
            .backends
            .iter()
            .map(|b| b.as_ref())
            .filter(|b| b.supports(format))
            .collect();

        if eligible.is_empty() {
            return Err(PcmforgeError::UnsupportedFormat {
                format: format.to_string(),
            });
        }

        let buffer = PcmBuffer::new(pcm, sample_rate);
        if buffer.has_partial_frame() {
            tracing::debug!(
                bytes = pcm.len(),
                "Dropping trailing partial frame from PCM input"
            );
        }

        let mut last_error = None;
        for (attempt, backend) in eligible.iter().enumerate() {
            tracing::debug!(
                backend = backend.name(),
                format = %format,
                attempt = attempt + 1,
                of = eligible.len(),
                "Attempting conversion"
            );
            match backend.convert(buffer, format) {
                Ok(bytes) => {
                    tracing::debug!(
                        backend = backend.name(),
                        format = %format,
                        bytes = bytes.len(),
                        audio_ms = buffer.duration().as_millis() as u64,
                        "Conversion succeeded"
                    );
                    return Ok(bytes);
                }
                Err(e) => {
                    tracing::warn!(
                        backend = backend.name(),
                        format = %format,
                        error = %e,
                        "Conversion backend failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        let cause = last_error.unwrap_or_else(|| PcmforgeError::UnsupportedFormat {
            format: format.to_string(),
        });
        Err(PcmforgeError::conversion_failed(format.as_str(), cause))
    }

    /// Native WAV with no fallback, for hot paths.
    ///
    /// # Panics
    /// Panics if the WAV writer fails; writing into memory only fails on
    /// inputs larger than a WAV header can describe.
    pub fn convert_to_wav_fast(pcm: &[u8], sample_rate: u32) -> Vec<u8> {
        match encode_wav(PcmBuffer::new(pcm, sample_rate)) {
            Ok(wav) => wav,
            Err(e) => {
                tracing::error!(error = %e, "Fast WAV conversion failed");
                panic!("WAV conversion failed: {}", e);
            }
        }
    }

    /// Which conversion paths exist for `format`; no side effects.
    pub fn conversion_info(&self, format: &str) -> ConversionInfo {
        ConversionInfo::for_format(format)
    }

    pub fn performance_info(&self, format: &str) -> PerformanceInfo {
        PerformanceInfo::for_format(format)
    }

    /// True when `format` converts without anything outside this process.
    pub fn is_native_supported(&self, format: &str) -> bool {
        crate::format::is_native_supported(format)
    }
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::from_config(&ConversionConfig::default())
    }
}
