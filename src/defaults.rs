//! Default configuration constants for pcmforge.
//!
//! Shared between the configuration types and the conversion backends so
//! the encoder settings stay in one place.

/// Default capture sample rate in Hz.
///
/// 16kHz is the standard rate for speech recognition engines.
pub const SAMPLE_RATE: u32 = 16000;

/// Bits per sample for all PCM handled by this crate.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Mono only.
pub const CHANNELS: u16 = 1;

/// Bytes per frame (16-bit mono).
pub const FRAME_SIZE: usize = 2;

/// Default external transcoder executable.
pub const FFMPEG: &str = "ffmpeg";

/// MP3 bitrate in bits per second (64 kbps keeps speech small).
pub const MP3_BITRATE: u32 = 64_000;

/// Ogg Vorbis bitrate in bits per second.
pub const OGG_BITRATE: u32 = 128_000;

/// AAC/M4A bitrate in bits per second, only used by the external transcoder.
pub const AAC_BITRATE: u32 = 64_000;

/// Output sample rate of the debug MP3 dump.
pub const DEBUG_DUMP_SAMPLE_RATE: u32 = 16000;

/// Default directory for debug dumps.
pub const DEBUG_OUTPUT_PATH: &str = "./debug/audio";

/// Capture buffer size in bytes.
pub const BUFFER_SIZE: usize = 4096;

/// Capture buffer duration in milliseconds.
pub const BUFFER_SIZE_MS: u32 = 100;

/// Longest chunk handed to an engine, in seconds.
pub const MAX_CHUNK_DURATION_SECONDS: u32 = 60;

/// Shortest chunk handed to an engine, in seconds.
pub const MIN_CHUNK_DURATION_SECONDS: u32 = 2;

/// Voice activity threshold (0.0 to 1.0).
pub const VAD_THRESHOLD: f32 = 0.3;

/// Silence before a chunk is closed, in milliseconds.
pub const SILENCE_DURATION_MS: u32 = 1000;

pub const MAX_CHUNK_SIZE_KB: u32 = 1024;

pub const MAX_BUFFER_SIZE_MB: u32 = 10;

pub const PROCESSING_TIMEOUT_MS: u64 = 30_000;

/// Default language code for transcription engines.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default Deepgram model.
pub const DEEPGRAM_MODEL: &str = "nova-2";

/// Prefix for per-attempt scratch directories.
pub const SCRATCH_PREFIX: &str = "pcmforge-";
