use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;
use pcmforge::cli::{Cli, Commands};
use pcmforge::config::Config;
use pcmforge::diagnostics::{CheckResult, run_checks};
use pcmforge::engine::EngineFactory;
use pcmforge::format::{ConversionInfo, FormatTag, PerformanceInfo};
use pcmforge::logging::init_logging;
use pcmforge::{DebugDump, Transcoder};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet, cli.log_json);
    tracing::debug!(version = %pcmforge::version_string(), "Starting pcmforge");

    match cli.command {
        Commands::Convert {
            input,
            output,
            format,
            sample_rate,
        } => {
            let config = load_config(cli.config.as_deref())?;
            run_convert(&config, &input, &output, format, sample_rate)?;
        }
        Commands::Formats { json } => {
            print_formats(json)?;
        }
        Commands::Engines { json } => {
            print_engines(json)?;
        }
        Commands::Check => {
            let config = load_config(cli.config.as_deref())?;
            print_checks(&config);
        }
        Commands::Dump { input, prefix } => {
            let config = load_config(cli.config.as_deref())?;
            let pcm = std::fs::read(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let path = DebugDump::from_config(&config).write_mp3(&pcm, &prefix)?;
            if !cli.quiet {
                println!("{}", path.display());
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pcmforge", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/pcmforge/config.toml)
/// 3. Built-in defaults
///
/// Environment variable overrides apply on top, then the result is validated.
fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        match Config::default_path() {
            Some(path) => Config::load_or_default(&path),
            None => Config::default(),
        }
    };

    let config = config.with_env_overrides()?;
    config.validate()?;
    Ok(config)
}

/// Target format for `convert`: explicit flag, else the output extension.
fn resolve_format(explicit: Option<String>, output: &Path) -> Result<String> {
    if let Some(format) = explicit {
        return Ok(format);
    }
    match output.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => Ok(ext.to_string()),
        None => bail!(
            "Cannot infer format from {}; pass --format",
            output.display()
        ),
    }
}

fn run_convert(
    config: &Config,
    input: &Path,
    output: &Path,
    format: Option<String>,
    sample_rate: Option<u32>,
) -> Result<()> {
    let format = resolve_format(format, output)?;
    let sample_rate = sample_rate.unwrap_or(config.audio.sample_rate);
    let pcm =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let transcoder = Transcoder::from_config(&config.conversion);
    let encoded = transcoder.convert(&pcm, sample_rate, &format)?;

    std::fs::write(output, &encoded)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!(
        output = %output.display(),
        format = %format,
        bytes = encoded.len(),
        "Conversion complete"
    );
    Ok(())
}

#[derive(Serialize)]
struct FormatRow {
    #[serde(flatten)]
    info: ConversionInfo,
    native: bool,
    preferred: &'static str,
    performance: PerformanceInfo,
}

fn print_formats(json: bool) -> Result<()> {
    let rows: Vec<FormatRow> = FormatTag::ALL
        .iter()
        .map(|tag| {
            let info = ConversionInfo::for_format(tag.as_str());
            FormatRow {
                native: pcmforge::format::is_native_supported(tag.as_str()),
                preferred: info.preferred_method(),
                performance: PerformanceInfo::for_format(tag.as_str()),
                info,
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let mut out = std::io::stdout().lock();
    writeln!(
        out,
        "{:<6} {:<8} {:<9} {:<38} {:<8} {}",
        "FORMAT", "LIBRARY", "EXTERNAL", "PREFERRED", "SPEED", "DEPENDENCIES"
    )?;
    for row in &rows {
        writeln!(
            out,
            "{:<6} {:<8} {:<9} {:<38} {:<8} {}",
            row.info.format,
            yes_no(row.info.library_supported),
            yes_no(row.info.external_supported),
            row.preferred,
            row.performance.speed,
            row.performance.dependencies
        )?;
    }
    Ok(())
}

fn print_engines(json: bool) -> Result<()> {
    let engines = EngineFactory::new().supported_engines();

    if json {
        println!("{}", serde_json::to_string_pretty(&engines)?);
        return Ok(());
    }

    for (engine_type, caps) in &engines {
        println!("{} ({})", caps.name.bold(), engine_type);
        println!("  {}  {}", "Streaming:".dimmed(), yes_no(caps.supports_streaming));
        println!("  {}      {}", "Batch:".dimmed(), yes_no(caps.supports_batch));
        println!(
            "  {}   {}",
            "Requires:".dimmed(),
            caps.required_config_keys.join(", ")
        );
        println!(
            "  {}  {}",
            "Languages:".dimmed(),
            caps.supported_languages.join(", ")
        );
        println!(
            "  {}     {} ms at {} Hz",
            "Buffer:".dimmed(),
            caps.recommended_buffer_ms,
            caps.required_sample_rate
        );
    }
    Ok(())
}

fn print_checks(config: &Config) {
    println!("Checking pcmforge environment...\n");
    for check in run_checks(config) {
        match check.result {
            CheckResult::Ok => println!("{} {}", "✓".green(), check.label),
            CheckResult::NotFound => println!("{} {} (not found)", "✗".red(), check.label),
            CheckResult::Warning(message) => {
                println!("{} {}", "⚠".yellow(), check.label);
                println!("  {}", message);
            }
            CheckResult::Disabled => println!("{} {} (disabled)", "-".dimmed(), check.label),
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
