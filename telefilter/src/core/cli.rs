use clap::{Parser, Subcommand};

use std::path::PathBuf;

use crate::domain::filtering::Predicate;
use crate::domain::telemetry::TelemetryKind;

use super::config::MalformedPolicy;
use super::constants::{ENV_CONFIG, ENV_INPUT, ENV_ON_MALFORMED, ENV_TELEMETRY_TYPE};

#[derive(Parser)]
#[command(name = "telefilter")]
#[command(version, about = "Filter telemetry records with declarative rules", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Telemetry document type (request, dependency, exception, event, trace, metric)
    #[arg(long = "type", short = 't', global = true, env = ENV_TELEMETRY_TYPE, value_parser = parse_telemetry_kind)]
    pub telemetry_type: Option<TelemetryKind>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Read JSON-lines records and print those matching the rule (default command)
    Check {
        /// Field to filter on, e.g. ResponseCode
        #[arg(long, short = 'f')]
        field: Option<String>,

        /// Predicate, e.g. Equal, greater-than, does_not_contain
        #[arg(long, short = 'p', value_parser = parse_predicate)]
        predicate: Option<Predicate>,

        /// Comparand text, parsed according to the field type
        #[arg(long, short = 'v', allow_hyphen_values = true)]
        comparand: Option<String>,

        /// JSON-lines input file (reads stdin when omitted)
        #[arg(long, short = 'i', env = ENV_INPUT)]
        input: Option<PathBuf>,

        /// What to do with records whose field value cannot be interpreted (fail, skip, keep)
        #[arg(long, env = ENV_ON_MALFORMED, value_parser = parse_malformed_policy)]
        on_malformed: Option<MalformedPolicy>,
    },
    /// List the fields of a telemetry type and the predicates they accept
    Fields,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub telemetry_type: Option<TelemetryKind>,
    pub field: Option<String>,
    pub predicate: Option<Predicate>,
    pub comparand: Option<String>,
    pub input: Option<PathBuf>,
    pub on_malformed: Option<MalformedPolicy>,
}

/// Parse telemetry document type from CLI/env string
fn parse_telemetry_kind(s: &str) -> Result<TelemetryKind, String> {
    let lower = s.to_lowercase();
    TelemetryKind::ALL
        .into_iter()
        .find(|kind| kind.as_str() == lower)
        .ok_or_else(|| {
            let valid: Vec<&str> = TelemetryKind::ALL.iter().map(|k| k.as_str()).collect();
            format!(
                "Invalid telemetry type '{}'. Valid options: {}",
                s,
                valid.join(", ")
            )
        })
}

/// Parse predicate from CLI string, ignoring case, '-' and '_'
fn parse_predicate(s: &str) -> Result<Predicate, String> {
    let normalized: String = s
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect::<String>()
        .to_lowercase();
    Predicate::ALL
        .into_iter()
        .find(|p| p.as_str().to_lowercase() == normalized)
        .ok_or_else(|| {
            let valid: Vec<&str> = Predicate::ALL.iter().map(|p| p.as_str()).collect();
            format!("Invalid predicate '{}'. Valid options: {}", s, valid.join(", "))
        })
}

/// Parse malformed value policy from CLI/env string
fn parse_malformed_policy(s: &str) -> Result<MalformedPolicy, String> {
    match s.to_lowercase().as_str() {
        "fail" => Ok(MalformedPolicy::Fail),
        "skip" => Ok(MalformedPolicy::Skip),
        "keep" => Ok(MalformedPolicy::Keep),
        _ => Err(format!(
            "Invalid malformed policy '{}'. Valid options: fail, skip, keep",
            s
        )),
    }
}

/// Parse CLI arguments into the command to run and its configuration
pub fn parse() -> (CliConfig, Commands) {
    from_cli(Cli::parse())
}

fn from_cli(cli: Cli) -> (CliConfig, Commands) {
    let mut config = CliConfig {
        config: cli.config,
        telemetry_type: cli.telemetry_type,
        ..Default::default()
    };

    let command = cli.command.unwrap_or(Commands::Check {
        field: None,
        predicate: None,
        comparand: None,
        input: None,
        on_malformed: None,
    });

    if let Commands::Check {
        field,
        predicate,
        comparand,
        input,
        on_malformed,
    } = &command
    {
        config.field = field.clone();
        config.predicate = *predicate;
        config.comparand = comparand.clone();
        config.input = input.clone();
        config.on_malformed = *on_malformed;
    }

    (config, command)
}
