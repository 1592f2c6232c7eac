#![allow(dead_code)]

use pcmforge::{CommandExecutor, PcmforgeError, Result};
use std::path::Path;
use std::sync::Mutex;

/// Stand-in for an ffmpeg-style executable.
///
/// Each program name gets its own behavior, so a test can make the library
/// encoder fail while the external transcoder succeeds even when both are
/// configured with different executables.
pub struct ScriptedTranscoder {
    calls: Mutex<Vec<(String, Vec<String>)>>,
    scripts: Vec<(String, Behavior)>,
}

#[derive(Clone)]
pub enum Behavior {
    /// Exit 0 and write these bytes to the output path (last argument).
    Write(Vec<u8>),
    /// Exit with this code.
    Fail(i32),
    /// Executable does not exist.
    Missing,
}

impl ScriptedTranscoder {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            scripts: Vec::new(),
        }
    }

    pub fn on(mut self, program: &str, behavior: Behavior) -> Self {
        self.scripts.push((program.to_string(), behavior));
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn programs_called(&self) -> Vec<String> {
        self.calls().into_iter().map(|(program, _)| program).collect()
    }
}

impl CommandExecutor for ScriptedTranscoder {
    fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
        self.calls.lock().unwrap().push((
            command.to_string(),
            args.iter().map(|s| s.to_string()).collect(),
        ));

        let behavior = self
            .scripts
            .iter()
            .find(|(program, _)| program == command)
            .map(|(_, behavior)| behavior.clone())
            .unwrap_or(Behavior::Missing);

        match behavior {
            Behavior::Write(bytes) => {
                if let Some(out) = args.last() {
                    std::fs::write(Path::new(out), bytes)?;
                }
                Ok(String::new())
            }
            Behavior::Fail(code) => Err(PcmforgeError::SubprocessFailure {
                program: command.to_string(),
                exit_code: Some(code),
                message: "scripted failure".to_string(),
            }),
            Behavior::Missing => Err(PcmforgeError::ToolNotFound {
                tool: command.to_string(),
            }),
        }
    }
}

/// Little-endian bytes of a short ramp.
pub fn ramp_pcm(samples: usize) -> Vec<u8> {
    (0..samples)
        .flat_map(|i| ((i as i16).wrapping_mul(97)).to_le_bytes())
        .collect()
}

/// Entries left in a directory.
pub fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
