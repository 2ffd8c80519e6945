//! CLI command definitions, routing, and tracing setup.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use questform_core::{PatternTable, parse_model_output, prepare_submission, validate_and_fix_with};
use questform_shared::{
    AppConfig, QuestformError, TransformConfig, ValidationResult, init_config, load_config,
};
use serde_json::Value;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Questform: turn extracted questionnaire JSON into a valid form definition.
#[derive(Parser)]
#[command(
    name = "questform",
    version,
    about = "Validate and repair model-extracted questionnaire JSON into a form definition.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Validate and repair model output; print `{valid, errors, fixedJson}`.
    Check {
        /// Model output file, or `-` for stdin.
        input: String,

        /// Exit with an error when the repaired form is still invalid.
        #[arg(long)]
        strict: bool,
    },

    /// Validate, repair, and print the create-form request body.
    Payload {
        /// Model output file, or `-` for stdin.
        input: String,

        /// Override the form title.
        #[arg(short, long)]
        title: Option<String>,

        /// Write the payload to this file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List the semantic pattern table, or resolve a single title.
    Patterns {
        /// Show the pattern a question title resolves to.
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs are written to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "questform=info",
        1 => "questform=debug",
        _ => "questform=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Check { input, strict } => cmd_check(&input, strict),
        Command::Payload { input, title, out } => {
            cmd_payload(&input, title.as_deref(), out.as_deref())
        }
        Command::Patterns { title } => cmd_patterns(title.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_check(input: &str, strict: bool) -> Result<()> {
    let result = transform(input)?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if strict && !result.valid {
        return Err(eyre!(
            "form is invalid after repair: {}",
            critical_messages(&result)
        ));
    }
    Ok(())
}

fn cmd_payload(input: &str, title: Option<&str>, out: Option<&Path>) -> Result<()> {
    let result = transform(input)?;
    if !result.valid {
        warn!(problems = %critical_messages(&result), "submitting a form with critical repairs");
    }

    let payload = prepare_submission(&result, title)?;
    let json = serde_json::to_string_pretty(&payload)?;

    match out {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .map_err(|e| QuestformError::io(path, e))?;
            info!(path = %path.display(), fields = payload.fields.len(), "payload written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_patterns(title: Option<&str>) -> Result<()> {
    let table = PatternTable::builtin();

    let Some(title) = title else {
        for (i, pattern) in table.patterns().iter().enumerate() {
            println!(
                "{:>3}  {:<48} {}",
                i + 1,
                pattern.canonical_key,
                pattern.keywords.join(", ")
            );
        }
        return Ok(());
    };

    match table.find(title) {
        Some(pattern) => {
            println!("  Key:      {}", pattern.canonical_key);
            println!("  Base:     {}", pattern.base_key());
            println!("  Keywords: {}", pattern.keywords.join(", "));
            if let Some(helper) = pattern.helper_text {
                println!("  Helper:   {helper}");
            }
        }
        None => println!("  No pattern matches; a positional ref will be assigned."),
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read, decode, and repair one model output.
fn transform(input: &str) -> Result<ValidationResult> {
    let config = TransformConfig::from(&load_config()?);
    let value: Value = parse_model_output(&read_input(input)?)?;
    Ok(validate_and_fix_with(&value, &config, &PatternTable::builtin()))
}

/// Read a file, or stdin when `input` is `-`.
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| QuestformError::io("<stdin>", e))?;
        return Ok(text);
    }
    let text = std::fs::read_to_string(input).map_err(|e| QuestformError::io(input, e))?;
    Ok(text)
}

fn critical_messages(result: &ValidationResult) -> String {
    result
        .diagnostics
        .iter()
        .filter(|d| d.is_critical())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
