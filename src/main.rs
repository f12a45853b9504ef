use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use rulelex::{
    presets::{C_LIKE, NUMBER_LITERALS},
    render_error_with, EncodingPolicy, InvalidRuleError, RuleFile, RuleTable, ScanConfig, ScanEvent,
    Scanner,
};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    Number,
    CLike,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Splits a file into tokens using a table of lexical rules.
#[derive(Parser, Debug)]
#[command(name = "rulelex", version)]
struct Cli {
    /// File to scan
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// JSON rule file; overrides --preset
    #[arg(short, long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Built-in rule set used when no rule file is given
    #[arg(short, long, value_enum, default_value_t = Preset::Number)]
    preset: Preset,

    /// Print every stream element: skippable tokens and errors included
    #[arg(long)]
    raw: bool,

    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Stop at the first invalid UTF-8 sequence
    #[arg(long)]
    fatal_encoding: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("cannot parse rule file {path}: {source}")]
    RuleFile { path: PathBuf, source: serde_json::Error },
    #[error(transparent)]
    InvalidRule(#[from] InvalidRuleError),
    #[error(transparent)]
    Output(#[from] serde_json::Error),
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read(path: &PathBuf) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })
}

fn load_table(cli: &Cli) -> Result<(RuleTable, ScanConfig), CliError> {
    let Some(path) = &cli.rules else {
        debug!(preset = ?cli.preset, "Using built-in rules");
        let table = match cli.preset {
            Preset::Number => NUMBER_LITERALS.clone(),
            Preset::CLike => C_LIKE.clone(),
        };
        return Ok((table, ScanConfig::default()));
    };

    let text = read(path)?;
    let file: RuleFile = serde_json::from_slice(&text).map_err(|source| CliError::RuleFile {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), rules = file.rules.len(), "Loaded rule file");

    Ok(file.build()?)
}

fn run(cli: &Cli) -> Result<usize, CliError> {
    let (table, mut config) = load_table(cli)?;
    if cli.fatal_encoding {
        config = config.with_encoding(EncodingPolicy::Fatal);
    }

    let input = read(&cli.input)?;
    let name = cli.input.display().to_string();

    let mut errors = 0;
    for event in Scanner::from_bytes(&table, &input, &config) {
        match &event {
            ScanEvent::Token(token) if token.skippable && !cli.raw => continue,
            ScanEvent::Error(error) => {
                errors += 1;
                eprint!("{}", render_error_with(&input, &name, error, &config));
                if !cli.raw {
                    continue;
                }
            }
            ScanEvent::Token(_) => {}
        }

        match cli.format {
            Format::Text => match &event {
                ScanEvent::Token(token) => println!("{}", token),
                ScanEvent::Error(error) => println!("{}", error),
            },
            Format::Json => println!("{}", serde_json::to_string(&event)?),
        }
    }

    Ok(errors)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(errors) => {
            eprintln!("{} error(s) recorded", errors);
            ExitCode::FAILURE
        }
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::from(2)
        }
    }
}
