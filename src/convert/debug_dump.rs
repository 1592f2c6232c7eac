//! Debug MP3 dumps of captured audio.
//!
//! Unlike the transcoder, the dump keeps its output: the MP3 lands in the
//! configured debug directory under a timestamped name and its path is
//! returned. Only the raw intermediate and the staging directory are removed.

use crate::config::Config;
use crate::convert::command::{CommandExecutor, SystemCommandExecutor};
use crate::convert::external::{RawInputFormat, input_args, run_transcoder};
use crate::convert::scratch::ScratchDir;
use crate::defaults::{DEBUG_DUMP_SAMPLE_RATE, MP3_BITRATE};
use crate::error::{PcmforgeError, Result};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Writes MP3 dumps into a debug directory using the external transcoder.
pub struct DebugDump<E: CommandExecutor> {
    output_dir: PathBuf,
    sample_rate: u32,
    program: String,
    executor: E,
}

impl DebugDump<SystemCommandExecutor> {
    /// Dumper using the configured debug directory, capture rate and ffmpeg.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.debug.output_path,
            config.audio.sample_rate,
            config.conversion.ffmpeg_path.clone(),
            SystemCommandExecutor::new(),
        )
    }
}

impl<E: CommandExecutor> DebugDump<E> {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        sample_rate: u32,
        program: impl Into<String>,
        executor: E,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            sample_rate,
            program: program.into(),
            executor,
        }
    }

    /// Encode big-endian PCM to `{prefix}audio_{timestamp}.mp3`.
    ///
    /// A second dump in the same second gets `_1`, `_2`, ... appended
    /// instead of replacing the first.
    pub fn write_mp3(&self, pcm: &[u8], session_prefix: &str) -> Result<PathBuf> {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.write_mp3_at(pcm, session_prefix, &timestamp)
    }

    fn write_mp3_at(&self, pcm: &[u8], session_prefix: &str, timestamp: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        // Raw input and encoder output live in a private scratch directory,
        // so concurrent dumps never share an intermediate.
        let scratch = ScratchDir::create("dump", Some(&self.output_dir))?;
        let raw_file = scratch
            .path()
            .join(format!("{}temp_raw_{}.pcm", session_prefix, timestamp));
        let staged = scratch.path().join("audio.mp3");

        std::fs::write(&raw_file, pcm)?;

        let mut args = input_args(&raw_file, RawInputFormat::S16Be, self.sample_rate);
        args.extend([
            "-codec:a".to_string(),
            "mp3".to_string(),
            "-b:a".to_string(),
            format!("{}k", MP3_BITRATE / 1000),
            "-ar".to_string(),
            DEBUG_DUMP_SAMPLE_RATE.to_string(),
            staged.display().to_string(),
        ]);

        let result = run_transcoder(&self.executor, &self.program, &args, &staged)
            .and_then(|()| std::fs::read(&staged).map_err(PcmforgeError::from))
            .and_then(|mp3| self.publish(&mp3, session_prefix, timestamp));

        scratch.release();

        let mp3_file = result?;
        tracing::debug!(path = %mp3_file.display(), bytes = pcm.len(), "Wrote debug MP3 dump");
        Ok(mp3_file)
    }

    /// Write `mp3` under the first free `{prefix}audio_{timestamp}[_N].mp3`.
    ///
    /// `create_new` makes claiming a name atomic, so an existing dump is
    /// never overwritten.
    fn publish(&self, mp3: &[u8], session_prefix: &str, timestamp: &str) -> Result<PathBuf> {
        for n in 0u32.. {
            let name = if n == 0 {
                format!("{}audio_{}.mp3", session_prefix, timestamp)
            } else {
                format!("{}audio_{}_{}.mp3", session_prefix, timestamp, n)
            };
            let path = self.output_dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(mp3)?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(PcmforgeError::BackendFailure {
            backend: "debug dump".to_string(),
            message: format!("no free dump name for {}audio_{}", session_prefix, timestamp),
        })
    }
}
