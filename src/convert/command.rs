//! Subprocess execution behind a testable seam.
//!
//! Both subprocess-driven backends (the transcoding library and the external
//! transcoder) go through `CommandExecutor`, so tests can stand in a fake
//! transcoder that writes canned output instead of spawning `ffmpeg`.

use crate::error::{PcmforgeError, Result};
use std::process::Command;
use std::sync::Arc;

/// Number of trailing stderr lines kept in a failure message.
const STDERR_TAIL_LINES: usize = 3;

/// Trait for executing system commands.
///
/// Object-safe, Send + Sync for use in concurrent contexts.
pub trait CommandExecutor: Send + Sync {
    /// Run `command` with `args` to completion, blocking the caller.
    ///
    /// Returns stdout on a zero exit status. A missing executable maps to
    /// `ToolNotFound`; anything else, including a non-zero exit, to
    /// `SubprocessFailure`.
    fn execute(&self, command: &str, args: &[&str]) -> Result<String>;
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for Arc<T> {
    fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
        (**self).execute(command, args)
    }
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for Box<T> {
    fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
        (**self).execute(command, args)
    }
}

/// Production command executor using std::process::Command.
///
/// No timeout is applied; a caller needing bounded latency must run the
/// conversion somewhere it can abandon.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandExecutor;

impl SystemCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
        tracing::debug!(command, ?args, "Spawning transcoder");

        let output = Command::new(command).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PcmforgeError::ToolNotFound {
                    tool: command.to_string(),
                }
            } else {
                PcmforgeError::SubprocessFailure {
                    program: command.to_string(),
                    exit_code: None,
                    message: format!("failed to spawn: {}", e),
                }
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PcmforgeError::SubprocessFailure {
                program: command.to_string(),
                exit_code: output.status.code(),
                message: stderr_tail(&stderr),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Last few non-empty stderr lines; ffmpeg puts its banner first and the
/// actual error last.
fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return "no diagnostic output".to_string();
    }
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("; ")
}
