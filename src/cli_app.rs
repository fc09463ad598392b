//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use flubber_dashboard::core::config::{CliOverrides, Config};
use flubber_dashboard::core::errors::DashError;
use flubber_dashboard::provider::{FileProvider, HttpProvider, RecordSet, total_size};
use flubber_dashboard::tui::runtime::{DashboardRuntimeConfig, run_dashboard};
use flubber_dashboard::tui::theme::ColorMode;
use flubber_dashboard::tui::update::percent_of;

/// Flubber dashboard: live terminal view of a local file provider.
#[derive(Debug, Parser)]
#[command(
    name = "flubdash",
    author,
    version,
    about = "Flubber Dashboard - live view of a local file provider",
    long_about = None
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Provider endpoint (overrides config and environment).
    #[arg(long, global = true, value_name = "URL")]
    url: Option<String>,
    /// Refresh interval in milliseconds.
    #[arg(long, global = true, value_name = "MILLISECONDS")]
    refresh_ms: Option<u64>,
    /// Per-request provider timeout in milliseconds.
    #[arg(long, global = true, value_name = "MILLISECONDS")]
    timeout_ms: Option<u64>,
    /// Append JSONL activity events to this file.
    #[arg(long, global = true, value_name = "PATH")]
    activity_log: Option<PathBuf>,
    /// Subcommand to execute; defaults to `dashboard`.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Run the live dashboard (default).
    Dashboard,
    /// Fetch the provider's file list once and print it.
    Files,
    /// Inspect the effective configuration.
    Config(ConfigArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct ConfigArgs {
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration and its stable hash (default).
    Show,
    /// Print the config file path in use.
    Path,
    /// Load and validate, printing nothing on success in human mode.
    Validate,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type. Every variant exits with status 1.
#[derive(Debug, Error)]
pub enum CliError {
    /// Failure from the dashboard library.
    #[error(transparent)]
    Dash(#[from] DashError),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    let color = ColorMode::from_environment(cli.no_color);
    if color.no_color() {
        control::set_override(false);
    }

    match cli.command.as_ref().unwrap_or(&Command::Dashboard) {
        Command::Dashboard => {
            let config = effective_config(cli)?;
            let runtime = DashboardRuntimeConfig::from_config(&config, color)?;
            run_dashboard(&runtime)?;
            Ok(())
        }
        Command::Files => run_files(cli),
        Command::Config(args) => run_config(cli, args),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

fn overrides(cli: &Cli) -> CliOverrides {
    CliOverrides {
        url: cli.url.clone(),
        refresh_ms: cli.refresh_ms,
        timeout_ms: cli.timeout_ms,
        activity_log: cli.activity_log.clone(),
    }
}

fn effective_config(cli: &Cli) -> Result<Config, CliError> {
    Config::load(cli.config.as_deref(), &overrides(cli)).map_err(CliError::from)
}

fn run_files(cli: &Cli) -> Result<(), CliError> {
    let config = effective_config(cli)?;
    let provider = HttpProvider::new(config.provider.url.clone(), config.provider.timeout());
    let records = provider.try_fetch()?;

    match output_mode(cli) {
        OutputMode::Human => print_files_human(provider.endpoint(), &records)?,
        OutputMode::Json => write_json_line(&files_payload(provider.endpoint(), &records))?,
    }
    Ok(())
}

fn files_payload(url: &str, records: &RecordSet) -> Value {
    let total = total_size(records);
    let rows: Vec<Value> = records
        .iter()
        .map(|r| json!({ "id": r.id, "size": r.size, "label": r.label() }))
        .collect();
    json!({
        "command": "files",
        "url": url,
        "count": records.len(),
        "total_size": total,
        "percent": percent_of(total),
        "records": rows,
    })
}

fn print_files_human(url: &str, records: &RecordSet) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{} {}", "Files from".bold(), url.cyan())?;
    if records.is_empty() {
        writeln!(stdout, "  {}", "(no records)".dimmed())?;
    }
    for record in records {
        writeln!(stdout, "  {}", record.label().yellow())?;
    }
    let total = total_size(records);
    writeln!(
        stdout,
        "{} {} bytes in {} records ({}%)",
        "Total:".bold(),
        total,
        records.len(),
        percent_of(total)
    )?;
    Ok(())
}

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match args.command.unwrap_or(ConfigCommand::Show) {
        ConfigCommand::Path => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            let exists = path.exists();
            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{}", path.display());
                    if !exists {
                        println!("  (file does not exist; defaults will be used)");
                    }
                }
                OutputMode::Json => write_json_line(&json!({
                    "command": "config path",
                    "path": path.to_string_lossy(),
                    "exists": exists,
                }))?,
            }
            Ok(())
        }
        ConfigCommand::Show => {
            let config = effective_config(cli)?;
            let hash = config.stable_hash()?;
            match output_mode(cli) {
                OutputMode::Human => {
                    print!("{}", config.to_toml()?);
                    println!("# stable_hash = {hash}");
                }
                OutputMode::Json => write_json_line(&json!({
                    "command": "config show",
                    "config": serde_json::to_value(&config)?,
                    "stable_hash": hash,
                }))?,
            }
            Ok(())
        }
        ConfigCommand::Validate => {
            let config = effective_config(cli)?;
            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{} {}", "valid:".green(), config.paths.config_file.display());
                }
                OutputMode::Json => write_json_line(&json!({
                    "command": "config validate",
                    "valid": true,
                    "path": config.paths.config_file.to_string_lossy(),
                }))?,
            }
            Ok(())
        }
    }
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("FLUBDASH_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}
