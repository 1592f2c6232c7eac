//! External command-line transcoder backend (ffmpeg).
//!
//! Writes the raw PCM to a scratch file, runs the transcoder with the input
//! format pinned (`s16le`, sample rate, mono) and reads back the output.

use crate::convert::backend::ConversionBackend;
use crate::convert::command::CommandExecutor;
use crate::convert::scratch::ScratchDir;
use crate::defaults::{AAC_BITRATE, CHANNELS, MP3_BITRATE, OGG_BITRATE};
use crate::error::{PcmforgeError, Result};
use crate::format::{BackendKind, FormatTag};
use crate::pcm::PcmBuffer;
use std::path::{Path, PathBuf};

/// Raw sample layout handed to the transcoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInputFormat {
    S16Le,
    S16Be,
}

impl RawInputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S16Le => "s16le",
            Self::S16Be => "s16be",
        }
    }
}

fn kbps(bits_per_second: u32) -> String {
    format!("{}k", bits_per_second / 1000)
}

/// Input flags shared by every invocation: overwrite, raw format, rate, mono.
pub fn input_args(input: &Path, raw: RawInputFormat, sample_rate: u32) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-f".to_string(),
        raw.as_str().to_string(),
        "-ar".to_string(),
        sample_rate.to_string(),
        "-ac".to_string(),
        CHANNELS.to_string(),
        "-i".to_string(),
        input.display().to_string(),
    ]
}

/// Full argument list for converting raw little-endian PCM to `format`.
///
/// Returns `None` for formats the transcoder is not registered for.
pub fn build_args(
    input: &Path,
    output: &Path,
    sample_rate: u32,
    format: FormatTag,
) -> Option<Vec<String>> {
    let encode: Vec<String> = match format {
        FormatTag::Wav => vec!["-f".into(), "wav".into()],
        FormatTag::Mp3 => vec![
            "-codec:a".into(),
            "mp3".into(),
            "-b:a".into(),
            kbps(MP3_BITRATE),
        ],
        FormatTag::Flac => vec!["-codec:a".into(), "flac".into()],
        FormatTag::Ogg => vec![
            "-codec:a".into(),
            "libvorbis".into(),
            "-b:a".into(),
            kbps(OGG_BITRATE),
        ],
        FormatTag::Aac => vec![
            "-codec:a".into(),
            "aac".into(),
            "-b:a".into(),
            kbps(AAC_BITRATE),
            "-f".into(),
            "adts".into(),
        ],
        FormatTag::M4a => vec![
            "-codec:a".into(),
            "aac".into(),
            "-b:a".into(),
            kbps(AAC_BITRATE),
            "-f".into(),
            "ipod".into(),
        ],
        FormatTag::Au | FormatTag::Aiff => return None,
    };

    let mut args = input_args(input, RawInputFormat::S16Le, sample_rate);
    args.extend(encode);
    args.push(output.display().to_string());
    Some(args)
}

/// Run the transcoder and confirm it produced `output`.
pub(crate) fn run_transcoder<E: CommandExecutor>(
    executor: &E,
    program: &str,
    args: &[String],
    output: &Path,
) -> Result<()> {
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    executor.execute(program, &arg_refs)?;

    if !output.exists() {
        return Err(PcmforgeError::SubprocessFailure {
            program: program.to_string(),
            exit_code: Some(0),
            message: format!("output file {} was not created", output.display()),
        });
    }
    Ok(())
}

/// External-process backend.
pub struct ExternalProcessBackend<E: CommandExecutor> {
    program: String,
    executor: E,
    scratch_root: Option<PathBuf>,
}

impl<E: CommandExecutor> ExternalProcessBackend<E> {
    pub fn new(program: impl Into<String>, executor: E) -> Self {
        Self {
            program: program.into(),
            executor,
            scratch_root: None,
        }
    }

    /// Create scratch directories under `root` instead of the system temp dir.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    fn convert_in(&self, dir: &Path, pcm: PcmBuffer<'_>, format: FormatTag) -> Result<Vec<u8>> {
        let input = dir.join("input.pcm");
        let output = dir.join(format!("output.{}", format.extension()));

        let args = build_args(&input, &output, pcm.sample_rate(), format).ok_or_else(|| {
            PcmforgeError::BackendFailure {
                backend: self.name().to_string(),
                message: format!("no transcoder arguments for {}", format),
            }
        })?;

        std::fs::write(&input, pcm.whole_frames())?;
        run_transcoder(&self.executor, &self.program, &args, &output)?;

        Ok(std::fs::read(&output)?)
    }
}

impl<E: CommandExecutor> ConversionBackend for ExternalProcessBackend<E> {
    fn kind(&self) -> BackendKind {
        BackendKind::External
    }

    fn name(&self) -> &str {
        "external transcoder"
    }

    fn convert(&self, pcm: PcmBuffer<'_>, format: FormatTag) -> Result<Vec<u8>> {
        let scratch = ScratchDir::create("external", self.scratch_root.as_deref())?;
        let result = self.convert_in(scratch.path(), pcm, format);
        scratch.release();
        result
    }
}
