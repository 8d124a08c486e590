//! Command-line argument parsing.

use ose_core::AbilityMethod;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Unknown option for {command}: {option}")]
    UnknownOption {
        command: &'static str,
        option: String,
    },
    #[error("{0} requires a value")]
    MissingValue(String),
    #[error("Invalid value for {flag}: {value}")]
    InvalidValue { flag: &'static str, value: String },
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate(GenerateArgs),
    Validate { path: PathBuf },
    Classes,
    Roll { notation: String },
    Upload(UploadArgs),
    Health,
    Help,
}

/// Options for `ose generate`.
///
/// Name and class stay raw so the generator reports them missing or unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateArgs {
    pub name: Option<String>,
    pub class: Option<String>,
    pub method: AbilityMethod,
    pub adjust: bool,
    pub seed: Option<u64>,
    pub json: bool,
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadArgs {
    pub name: Option<String>,
    pub class: Option<String>,
    pub session: i64,
    pub seed: Option<u64>,
}

/// Parse `std::env::args()`; `args[0]` is the program name.
pub fn parse_args(args: &[String]) -> Result<Command, CliError> {
    if args.iter().skip(1).any(|a| a == "--help" || a == "-h") {
        return Ok(Command::Help);
    }

    let Some(command) = args.get(1) else {
        return Ok(Command::Help);
    };
    let rest = &args[2..];

    match command.as_str() {
        "generate" => parse_generate(rest).map(Command::Generate),
        "validate" => {
            let path = rest.first().ok_or(CliError::MissingArgument("PATH"))?;
            Ok(Command::Validate {
                path: PathBuf::from(path),
            })
        }
        "classes" => Ok(Command::Classes),
        "roll" => {
            let notation = rest.first().ok_or(CliError::MissingArgument("NOTATION"))?;
            Ok(Command::Roll {
                notation: notation.clone(),
            })
        }
        "upload" => parse_upload(rest).map(Command::Upload),
        "health" => Ok(Command::Health),
        "help" => Ok(Command::Help),
        other => Err(CliError::UnknownCommand(other.to_string())),
    }
}

fn parse_generate(args: &[String]) -> Result<GenerateArgs, CliError> {
    let mut parsed = GenerateArgs::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--name" => {
                parsed.name = Some(value_of(args, i)?.to_string());
                i += 1;
            }
            "--class" => {
                parsed.class = Some(value_of(args, i)?.to_string());
                i += 1;
            }
            "--method" => {
                let value = value_of(args, i)?;
                parsed.method = value.parse().map_err(|_| CliError::InvalidValue {
                    flag: "--method",
                    value: value.to_string(),
                })?;
                i += 1;
            }
            "--seed" => {
                parsed.seed = Some(parse_number(args, i, "--seed")?);
                i += 1;
            }
            "--out" => {
                parsed.out = Some(PathBuf::from(value_of(args, i)?));
                i += 1;
            }
            "--adjust" => parsed.adjust = true,
            "--json" => parsed.json = true,
            other => {
                return Err(CliError::UnknownOption {
                    command: "generate",
                    option: other.to_string(),
                })
            }
        }
        i += 1;
    }

    Ok(parsed)
}

fn parse_upload(args: &[String]) -> Result<UploadArgs, CliError> {
    let mut parsed = UploadArgs::default();
    let mut session = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--name" => {
                parsed.name = Some(value_of(args, i)?.to_string());
                i += 1;
            }
            "--class" => {
                parsed.class = Some(value_of(args, i)?.to_string());
                i += 1;
            }
            "--session" => {
                session = Some(parse_number(args, i, "--session")?);
                i += 1;
            }
            "--seed" => {
                parsed.seed = Some(parse_number(args, i, "--seed")?);
                i += 1;
            }
            other => {
                return Err(CliError::UnknownOption {
                    command: "upload",
                    option: other.to_string(),
                })
            }
        }
        i += 1;
    }

    parsed.session = session.ok_or(CliError::MissingArgument("--session"))?;
    Ok(parsed)
}

/// The value following the flag at `i`.
fn value_of(args: &[String], i: usize) -> Result<&str, CliError> {
    args.get(i + 1)
        .map(String::as_str)
        .filter(|value| !value.starts_with("--"))
        .ok_or_else(|| CliError::MissingValue(args[i].clone()))
}

fn parse_number<T: std::str::FromStr>(
    args: &[String],
    i: usize,
    flag: &'static str,
) -> Result<T, CliError> {
    let value = value_of(args, i)?;
    value.parse().map_err(|_| CliError::InvalidValue {
        flag,
        value: value.to_string(),
    })
}
