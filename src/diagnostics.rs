//! Environment diagnostics for the `check` subcommand.
//!
//! Verifies that the configured transcoder executables run and that the
//! configured engine passes the engine/mode gate.

use crate::config::Config;
use crate::engine::factory::EngineFactory;
use std::process::Command;

/// Result of a dependency check.
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Tool is installed and working
    Ok,
    /// Tool is not found
    NotFound,
    /// Tool is found but has issues
    Warning(String),
    /// Check is not applicable (backend disabled in config)
    Disabled,
}

/// One line of the diagnostics report.
#[derive(Debug)]
pub struct Check {
    pub label: String,
    pub result: CheckResult,
}

/// Check whether an ffmpeg-style executable runs (`-version` exits 0).
pub fn check_transcoder(command: &str) -> CheckResult {
    match Command::new(command).arg("-version").output() {
        Ok(output) if output.status.success() => CheckResult::Ok,
        Ok(output) => CheckResult::Warning(format!(
            "'{}' found but -version exited with {}",
            command, output.status
        )),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => CheckResult::NotFound,
        Err(e) => CheckResult::Warning(format!("Error checking '{}': {}", command, e)),
    }
}

/// Run the configured engine through the gate.
pub fn check_engine(config: &Config, factory: &EngineFactory) -> CheckResult {
    match factory.build_engine(config) {
        Ok(_) => CheckResult::Ok,
        Err(e) => CheckResult::Warning(e.to_string()),
    }
}

/// Every check `pcmforge check` reports, in display order.
pub fn run_checks(config: &Config) -> Vec<Check> {
    let conversion = &config.conversion;
    let library = if conversion.library_enabled {
        check_transcoder(&conversion.library_encoder_path)
    } else {
        CheckResult::Disabled
    };
    let external = if conversion.external_enabled {
        check_transcoder(&conversion.ffmpeg_path)
    } else {
        CheckResult::Disabled
    };

    vec![
        Check {
            label: "native encoder (wav, au, aiff)".to_string(),
            result: CheckResult::Ok,
        },
        Check {
            label: format!(
                "transcoding library: {} (mp3, ogg, flac)",
                conversion.library_encoder_path
            ),
            result: library,
        },
        Check {
            label: format!("external transcoder: {}", conversion.ffmpeg_path),
            result: external,
        },
        Check {
            label: format!(
                "engine: {} in {} mode",
                config.engine, config.processing_mode
            ),
            result: check_engine(config, &EngineFactory::new()),
        },
    ]
}
