use crate::defaults;
use crate::engine::types::{EngineType, ProcessingMode};
use crate::error::{PcmforgeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub engine: EngineType,
    pub processing_mode: ProcessingMode,
    pub assemblyai: AssemblyAiConfig,
    pub deepgram: DeepgramConfig,
    pub audio: AudioConfig,
    pub chunk: ChunkConfig,
    pub vad: VadConfig,
    pub debug: DebugConfig,
    pub performance: PerformanceConfig,
    pub conversion: ConversionConfig,
}

/// AssemblyAI credentials and options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssemblyAiConfig {
    pub api_key: String,
    pub language_code: String,
}

/// Deepgram credentials and options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeepgramConfig {
    pub api_key: String,
    pub language: String,
    pub model: String,
    pub punctuate: bool,
    pub interim_results: bool,
}

/// Audio capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub buffer_size: usize,
    pub buffer_size_ms: u32,
}

/// Chunk duration policy (carried for the capture pipeline)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChunkConfig {
    pub max_duration_seconds: u32,
    pub min_duration_seconds: u32,
}

/// Voice activity detection settings (carried for the capture pipeline)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VadConfig {
    pub enabled: bool,
    pub threshold: f32,
    pub silence_duration_ms: u32,
}

/// Debug dump configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    pub enabled: bool,
    pub output_path: PathBuf,
}

/// Resource limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PerformanceConfig {
    pub max_chunk_size_kb: u32,
    pub max_buffer_size_mb: u32,
    pub processing_timeout_ms: u64,
}

/// Conversion backend selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConversionConfig {
    /// External transcoder executable.
    pub ffmpeg_path: String,
    /// Executable the transcoding library drives.
    pub library_encoder_path: String,
    pub library_enabled: bool,
    pub external_enabled: bool,
    /// Parent for per-attempt scratch directories; system temp dir if unset.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineType::AssemblyAi,
            processing_mode: ProcessingMode::Batch,
            assemblyai: AssemblyAiConfig::default(),
            deepgram: DeepgramConfig::default(),
            audio: AudioConfig::default(),
            chunk: ChunkConfig::default(),
            vad: VadConfig::default(),
            debug: DebugConfig::default(),
            performance: PerformanceConfig::default(),
            conversion: ConversionConfig::default(),
        }
    }
}

impl Default for AssemblyAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            language_code: defaults::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Default for DeepgramConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            model: defaults::DEEPGRAM_MODEL.to_string(),
            punctuate: true,
            interim_results: true,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
            buffer_size: defaults::BUFFER_SIZE,
            buffer_size_ms: defaults::BUFFER_SIZE_MS,
        }
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_duration_seconds: defaults::MAX_CHUNK_DURATION_SECONDS,
            min_duration_seconds: defaults::MIN_CHUNK_DURATION_SECONDS,
        }
    }
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: defaults::VAD_THRESHOLD,
            silence_duration_ms: defaults::SILENCE_DURATION_MS,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            output_path: PathBuf::from(defaults::DEBUG_OUTPUT_PATH),
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            max_chunk_size_kb: defaults::MAX_CHUNK_SIZE_KB,
            max_buffer_size_mb: defaults::MAX_BUFFER_SIZE_MB,
            processing_timeout_ms: defaults::PROCESSING_TIMEOUT_MS,
        }
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: defaults::FFMPEG.to_string(),
            library_encoder_path: defaults::FFMPEG.to_string(),
            library_enabled: true,
            external_enabled: true,
            scratch_dir: None,
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn invalid(key: &str, message: impl Into<String>) -> PcmforgeError {
    PcmforgeError::ConfigInvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values. A missing file is
    /// `ConfigFileNotFound`; malformed TOML is `Config`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PcmforgeError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                PcmforgeError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// # Panics
    /// Panics on invalid TOML or unreadable files; only a missing file
    /// falls back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(PcmforgeError::ConfigFileNotFound { .. }) => Self::default(),
            Err(e) => panic!("Failed to load config from {}: {}", path.display(), e),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables (empty values are ignored):
    /// - PCMFORGE_ENGINE → engine
    /// - PCMFORGE_PROCESSING_MODE → processing_mode
    /// - PCMFORGE_ASSEMBLYAI_API_KEY → assemblyai.api_key
    /// - PCMFORGE_DEEPGRAM_API_KEY → deepgram.api_key
    /// - PCMFORGE_FFMPEG → conversion.ffmpeg_path
    ///
    /// Unparseable engine or mode names are rejected.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(engine) = env_value("PCMFORGE_ENGINE") {
            self.engine = engine
                .parse()
                .map_err(|e: String| invalid("PCMFORGE_ENGINE", e))?;
        }

        if let Some(mode) = env_value("PCMFORGE_PROCESSING_MODE") {
            self.processing_mode = mode
                .parse()
                .map_err(|e: String| invalid("PCMFORGE_PROCESSING_MODE", e))?;
        }

        if let Some(key) = env_value("PCMFORGE_ASSEMBLYAI_API_KEY") {
            self.assemblyai.api_key = key;
        }

        if let Some(key) = env_value("PCMFORGE_DEEPGRAM_API_KEY") {
            self.deepgram.api_key = key;
        }

        if let Some(ffmpeg) = env_value("PCMFORGE_FFMPEG") {
            self.conversion.ffmpeg_path = ffmpeg;
        }

        Ok(self)
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate == 0 {
            return Err(invalid("audio.sample_rate", "must be greater than zero"));
        }
        if self.chunk.min_duration_seconds > self.chunk.max_duration_seconds {
            return Err(invalid(
                "chunk.min_duration_seconds",
                format!(
                    "{} exceeds chunk.max_duration_seconds ({})",
                    self.chunk.min_duration_seconds, self.chunk.max_duration_seconds
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.vad.threshold) {
            return Err(invalid(
                "vad.threshold",
                format!("{} is outside [0, 1]", self.vad.threshold),
            ));
        }
        if self.performance.processing_timeout_ms == 0 {
            return Err(invalid(
                "performance.processing_timeout_ms",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/pcmforge/config.toml on Linux, or `None` when the
    /// platform has no config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pcmforge").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // SAFETY: These helpers are only used in tests with ENV_LOCK held,
    // ensuring no concurrent access to environment variables.
    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) }
    }

    fn clear_pcmforge_env() {
        for key in [
            "PCMFORGE_ENGINE",
            "PCMFORGE_PROCESSING_MODE",
            "PCMFORGE_ASSEMBLYAI_API_KEY",
            "PCMFORGE_DEEPGRAM_API_KEY",
            "PCMFORGE_FFMPEG",
        ] {
            remove_env(key);
        }
    }

    fn write_config(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_default_config_has_correct_values() {
        let config = Config::default();

        assert_eq!(config.engine, EngineType::AssemblyAi);
        assert_eq!(config.processing_mode, ProcessingMode::Batch);
        assert_eq!(config.assemblyai.language_code, "en");
        assert_eq!(config.deepgram.model, "nova-2");
        assert!(config.deepgram.punctuate);
        assert_eq!(config.audio.sample_rate, 16000);
        assert_eq!(config.audio.buffer_size, 4096);
        assert_eq!(config.chunk.max_duration_seconds, 60);
        assert_eq!(config.vad.threshold, 0.3);
        assert!(!config.debug.enabled);
        assert_eq!(config.debug.output_path, PathBuf::from("./debug/audio"));
        assert_eq!(config.performance.processing_timeout_ms, 30_000);
        assert_eq!(config.conversion.ffmpeg_path, "ffmpeg");
        assert!(config.conversion.library_enabled);
        assert!(config.conversion.external_enabled);
        assert_eq!(config.conversion.scratch_dir, None);
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp_file = write_config(
            r#"
            engine = "deepgram"
            processing_mode = "streaming"

            [deepgram]
            api_key = "dg-key"
            model = "nova-3"
            interim_results = false

            [audio]
            sample_rate = 48000

            [debug]
            enabled = true
            output_path = "/var/tmp/dumps"

            [conversion]
            ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"
            library_enabled = false
            scratch_dir = "/var/tmp"
        "#,
        );

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.engine, EngineType::Deepgram);
        assert_eq!(config.processing_mode, ProcessingMode::Streaming);
        assert_eq!(config.deepgram.api_key, "dg-key");
        assert_eq!(config.deepgram.model, "nova-3");
        assert!(!config.deepgram.interim_results);
        assert_eq!(config.audio.sample_rate, 48000);
        assert!(config.debug.enabled);
        assert_eq!(config.debug.output_path, PathBuf::from("/var/tmp/dumps"));
        assert_eq!(config.conversion.ffmpeg_path, "/opt/ffmpeg/bin/ffmpeg");
        assert!(!config.conversion.library_enabled);
        assert_eq!(config.conversion.scratch_dir, Some(PathBuf::from("/var/tmp")));
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let temp_file = write_config(
            r#"
            [vad]
            threshold = 0.5
        "#,
        );

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.vad.threshold, 0.5);
        assert!(config.vad.enabled);
        assert_eq!(config.vad.silence_duration_ms, 1000);
        assert_eq!(config.engine, EngineType::AssemblyAi);
        assert_eq!(config.audio, AudioConfig::default());
        assert_eq!(config.conversion, ConversionConfig::default());
    }

    #[test]
    fn test_unknown_engine_in_file_is_error() {
        let temp_file = write_config(r#"engine = "whisper""#);
        assert!(matches!(
            Config::load(temp_file.path()),
            Err(PcmforgeError::Config(_))
        ));
    }

    #[test]
    fn test_env_override_engine_and_mode() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_pcmforge_env();

        set_env("PCMFORGE_ENGINE", "Deepgram");
        set_env("PCMFORGE_PROCESSING_MODE", "streaming");
        let config = Config::default().with_env_overrides().unwrap();

        assert_eq!(config.engine, EngineType::Deepgram);
        assert_eq!(config.processing_mode, ProcessingMode::Streaming);

        clear_pcmforge_env();
    }

    #[test]
    fn test_env_override_keys_and_ffmpeg() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_pcmforge_env();

        set_env("PCMFORGE_ASSEMBLYAI_API_KEY", "aai");
        set_env("PCMFORGE_DEEPGRAM_API_KEY", "dg");
        set_env("PCMFORGE_FFMPEG", "/usr/local/bin/ffmpeg");
        let config = Config::default().with_env_overrides().unwrap();

        assert_eq!(config.assemblyai.api_key, "aai");
        assert_eq!(config.deepgram.api_key, "dg");
        assert_eq!(config.conversion.ffmpeg_path, "/usr/local/bin/ffmpeg");
        assert_eq!(config.conversion.library_encoder_path, "ffmpeg"); // Not overridden

        clear_pcmforge_env();
    }

    #[test]
    fn test_env_override_empty_string_ignored() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_pcmforge_env();

        set_env("PCMFORGE_ENGINE", "");
        set_env("PCMFORGE_FFMPEG", "");
        let config = Config::default().with_env_overrides().unwrap();

        assert_eq!(config, Config::default());

        clear_pcmforge_env();
    }

    #[test]
    fn test_env_override_rejects_unknown_mode() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_pcmforge_env();

        set_env("PCMFORGE_PROCESSING_MODE", "realtime");
        let result = Config::default().with_env_overrides();

        match result {
            Err(PcmforgeError::ConfigInvalidValue { key, .. }) => {
                assert_eq!(key, "PCMFORGE_PROCESSING_MODE");
            }
            other => panic!("Expected ConfigInvalidValue, got {:?}", other),
        }

        clear_pcmforge_env();
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.audio.sample_rate = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.chunk.min_duration_seconds = 90;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chunk.min_duration_seconds"));

        let mut config = Config::default();
        config.vad.threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.vad.threshold = -0.1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.performance.processing_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let temp_file = write_config(
            r#"
            [audio
            sample_rate = "broken
        "#,
        );

        let result = Config::load(temp_file.path());

        assert!(matches!(result, Err(PcmforgeError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_config_file_not_found() {
        let result = Config::load(Path::new("/tmp/nonexistent_pcmforge_config_12345.toml"));
        assert!(matches!(
            result,
            Err(PcmforgeError::ConfigFileNotFound { .. })
        ));
    }

    #[test]
    fn test_default_path_ends_with_app_dir() {
        if let Some(path) = Config::default_path() {
            assert!(path.ends_with("pcmforge/config.toml"));
        }
    }

    #[test]
    fn test_load_or_default_returns_default_for_missing_file() {
        let missing_path = Path::new("/tmp/nonexistent_pcmforge_config_12345.toml");
        let config = Config::load_or_default(missing_path);

        assert_eq!(config, Config::default());
    }

    #[test]
    #[should_panic(expected = "Failed to load config")]
    fn test_load_or_default_panics_on_invalid_toml() {
        let temp_file = write_config(
            r#"
            [audio
            sample_rate = "broken
        "#,
        );

        // Should panic on invalid TOML, not return defaults
        Config::load_or_default(temp_file.path());
    }
}
