//! Command-line interface for pcmforge
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Convert raw PCM audio and validate transcription engine settings
#[derive(Parser, Debug)]
#[command(
    name = "pcmforge",
    version,
    about = "Convert raw PCM audio with ordered backend fallback"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging (-v: debug for pcmforge, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a raw s16le mono PCM file
    Convert {
        /// Raw PCM input file
        input: PathBuf,

        /// Output file
        output: PathBuf,

        /// Target format (default: output file extension)
        #[arg(long, short = 'f', value_name = "FORMAT")]
        format: Option<String>,

        /// Input sample rate in Hz (default: audio.sample_rate from config)
        #[arg(long, short = 'r', value_name = "HZ")]
        sample_rate: Option<u32>,
    },

    /// List target formats with their backends and cost
    Formats {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List transcription engines and their capabilities
    Engines {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Validate the configured engine and check transcoder executables
    Check,

    /// Write a debug MP3 dump of a raw s16be PCM file
    Dump {
        /// Raw PCM input file (big-endian samples)
        input: PathBuf,

        /// Session prefix for the dump file names
        #[arg(long, short = 'p', value_name = "PREFIX", default_value = "")]
        prefix: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}
