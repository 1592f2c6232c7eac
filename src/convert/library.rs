//! Attribute-driven transcoding library backend for mp3, ogg and flac.
//!
//! The library cannot consume raw PCM: every attempt first writes a native
//! WAV intermediate into its own scratch directory, then asks the encoder
//! to re-encode that file according to an attribute set.

use crate::convert::backend::ConversionBackend;
use crate::convert::command::CommandExecutor;
use crate::convert::native::encode_wav;
use crate::convert::scratch::ScratchDir;
use crate::defaults::{CHANNELS, MP3_BITRATE, OGG_BITRATE};
use crate::error::{PcmforgeError, Result};
use crate::format::{BackendKind, FormatTag};
use crate::pcm::PcmBuffer;
use std::path::{Path, PathBuf};

/// Codec-level settings for the encoded audio stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAttributes {
    pub codec: String,
    /// Bits per second; `None` for lossless codecs.
    pub bit_rate: Option<u32>,
    pub channels: u16,
    pub sampling_rate: u32,
}

impl AudioAttributes {
    /// Attribute set for one of the library's formats, or `None` when the
    /// library has no codec for `format`.
    pub fn for_format(format: FormatTag, sampling_rate: u32) -> Option<Self> {
        let (codec, bit_rate) = match format {
            FormatTag::Mp3 => ("libmp3lame", Some(MP3_BITRATE)),
            FormatTag::Ogg => ("libvorbis", Some(OGG_BITRATE)),
            FormatTag::Flac => ("flac", None),
            _ => return None,
        };
        Some(Self {
            codec: codec.to_string(),
            bit_rate,
            channels: CHANNELS,
            sampling_rate,
        })
    }
}

/// Container-level settings plus the audio attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingAttributes {
    pub input_format: String,
    pub output_format: String,
    pub audio: AudioAttributes,
}

impl EncodingAttributes {
    pub fn from_wav(output_format: FormatTag, audio: AudioAttributes) -> Self {
        Self {
            input_format: FormatTag::Wav.as_str().to_string(),
            output_format: output_format.as_str().to_string(),
            audio,
        }
    }

    /// Encoder arguments for `source` → `target`.
    pub fn to_args(&self, source: &Path, target: &Path) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-f".to_string(),
            self.input_format.clone(),
            "-i".to_string(),
            source.display().to_string(),
            "-acodec".to_string(),
            self.audio.codec.clone(),
        ];
        if let Some(bit_rate) = self.audio.bit_rate {
            args.push("-ab".to_string());
            args.push(bit_rate.to_string());
        }
        args.extend([
            "-ac".to_string(),
            self.audio.channels.to_string(),
            "-ar".to_string(),
            self.audio.sampling_rate.to_string(),
            "-f".to_string(),
            self.output_format.clone(),
            target.display().to_string(),
        ]);
        args
    }
}

/// Drives the library's encoder executable from an attribute set.
pub struct LibraryEncoder<E: CommandExecutor> {
    executable: String,
    executor: E,
}

impl<E: CommandExecutor> LibraryEncoder<E> {
    pub fn new(executable: impl Into<String>, executor: E) -> Self {
        Self {
            executable: executable.into(),
            executor,
        }
    }

    /// Encode `source` into `target`; the target must exist afterwards.
    pub fn encode(&self, source: &Path, target: &Path, attrs: &EncodingAttributes) -> Result<()> {
        let args = attrs.to_args(source, target);
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.executor.execute(&self.executable, &arg_refs)?;

        if !target.exists() {
            return Err(PcmforgeError::BackendFailure {
                backend: "library".to_string(),
                message: "conversion finished but output file was not created".to_string(),
            });
        }
        Ok(())
    }
}

/// Library backend: WAV intermediate, then attribute-driven re-encode.
pub struct LibraryBackend<E: CommandExecutor> {
    encoder: LibraryEncoder<E>,
    scratch_root: Option<PathBuf>,
}

impl<E: CommandExecutor> LibraryBackend<E> {
    pub fn new(encoder: LibraryEncoder<E>) -> Self {
        Self {
            encoder,
            scratch_root: None,
        }
    }

    /// Create scratch directories under `root` instead of the system temp dir.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    fn encode_in(&self, dir: &Path, pcm: PcmBuffer<'_>, format: FormatTag) -> Result<Vec<u8>> {
        let attrs = AudioAttributes::for_format(format, pcm.sample_rate()).ok_or_else(|| {
            PcmforgeError::BackendFailure {
                backend: self.name().to_string(),
                message: format!("no codec for {}", format),
            }
        })?;

        let input_wav = dir.join("input.wav");
        let output = dir.join(format!("output.{}", format.extension()));

        std::fs::write(&input_wav, encode_wav(pcm)?)?;
        self.encoder.encode(
            &input_wav,
            &output,
            &EncodingAttributes::from_wav(format, attrs),
        )?;

        Ok(std::fs::read(&output)?)
    }
}

impl<E: CommandExecutor> ConversionBackend for LibraryBackend<E> {
    fn kind(&self) -> BackendKind {
        BackendKind::Library
    }

    fn name(&self) -> &str {
        "transcoding library"
    }

    fn convert(&self, pcm: PcmBuffer<'_>, format: FormatTag) -> Result<Vec<u8>> {
        let scratch = ScratchDir::create("library", self.scratch_root.as_deref())?;
        let result = self.encode_in(scratch.path(), pcm, format);
        scratch.release();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::command::fakes::FakeTranscoder;
    use crate::pcm::samples_to_le_bytes;
    use std::sync::Arc;

    fn backend(fake: &Arc<FakeTranscoder>, root: &Path) -> LibraryBackend<Arc<FakeTranscoder>> {
        LibraryBackend::new(LibraryEncoder::new("ffmpeg", Arc::clone(fake)))
            .with_scratch_root(root)
    }

    #[test]
    fn test_attributes_per_format() {
        let mp3 = AudioAttributes::for_format(FormatTag::Mp3, 16000).unwrap();
        assert_eq!(mp3.codec, "libmp3lame");
        assert_eq!(mp3.bit_rate, Some(64_000));
        assert_eq!(mp3.channels, 1);

        let ogg = AudioAttributes::for_format(FormatTag::Ogg, 16000).unwrap();
        assert_eq!(ogg.codec, "libvorbis");
        assert_eq!(ogg.bit_rate, Some(128_000));

        let flac = AudioAttributes::for_format(FormatTag::Flac, 16000).unwrap();
        assert_eq!(flac.codec, "flac");
        assert_eq!(flac.bit_rate, None);

        assert!(AudioAttributes::for_format(FormatTag::Wav, 16000).is_none());
        assert!(AudioAttributes::for_format(FormatTag::Aac, 16000).is_none());
    }

    #[test]
    fn test_args_omit_bitrate_for_lossless() {
        let attrs = EncodingAttributes::from_wav(
            FormatTag::Flac,
            AudioAttributes::for_format(FormatTag::Flac, 8000).unwrap(),
        );
        let args = attrs.to_args(Path::new("/s/in.wav"), Path::new("/s/out.flac"));
        assert!(!args.contains(&"-ab".to_string()));
        assert_eq!(
            args,
            vec![
                "-y", "-f", "wav", "-i", "/s/in.wav", "-acodec", "flac", "-ac", "1", "-ar",
                "8000", "-f", "flac", "/s/out.flac"
            ]
        );
    }

    #[test]
    fn test_args_include_bitrate_for_lossy() {
        let attrs = EncodingAttributes::from_wav(
            FormatTag::Mp3,
            AudioAttributes::for_format(FormatTag::Mp3, 16000).unwrap(),
        );
        let args = attrs.to_args(Path::new("in.wav"), Path::new("out.mp3"));
        let ab = args.iter().position(|a| a == "-ab").unwrap();
        assert_eq!(args[ab + 1], "64000");
        assert_eq!(args.last().unwrap(), "out.mp3");
    }

    #[test]
    fn test_convert_feeds_wav_intermediate_and_returns_output() {
        let root = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeTranscoder::new(b"fake-ogg"));
        let bytes = samples_to_le_bytes(&[1, 2, 3]);

        let out = backend(&fake, root.path())
            .convert(PcmBuffer::new(&bytes, 16000), FormatTag::Ogg)
            .unwrap();

        assert_eq!(out, b"fake-ogg");
        let calls = fake.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "ffmpeg");
        let args = &calls[0].1;
        assert!(args.iter().any(|a| a.ends_with("input.wav")));
        assert!(args.iter().any(|a| a == "libvorbis"));
    }

    #[test]
    fn test_scratch_dir_removed_after_success() {
        let root = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeTranscoder::new(b"x"));
        let bytes = samples_to_le_bytes(&[0; 16]);

        backend(&fake, root.path())
            .convert(PcmBuffer::new(&bytes, 16000), FormatTag::Mp3)
            .unwrap();

        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_scratch_dir_removed_after_failure() {
        let root = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeTranscoder::failing(1));
        let bytes = samples_to_le_bytes(&[0; 16]);

        let result = backend(&fake, root.path())
            .convert(PcmBuffer::new(&bytes, 16000), FormatTag::Flac);

        assert!(matches!(
            result,
            Err(PcmforgeError::SubprocessFailure { exit_code: Some(1), .. })
        ));
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_output_is_backend_failure() {
        let root = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeTranscoder::without_output());
        let bytes = samples_to_le_bytes(&[0; 4]);

        let result = backend(&fake, root.path())
            .convert(PcmBuffer::new(&bytes, 16000), FormatTag::Mp3);

        match result {
            Err(PcmforgeError::BackendFailure { message, .. }) => {
                assert!(message.contains("not created"));
            }
            other => panic!("Expected BackendFailure, got {:?}", other),
        }
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_unsupported_format_never_spawns() {
        let root = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeTranscoder::new(b"x"));

        let result = backend(&fake, root.path()).convert(PcmBuffer::new(&[], 16000), FormatTag::Aac);

        assert!(result.is_err());
        assert_eq!(fake.call_count(), 0);
    }
}
