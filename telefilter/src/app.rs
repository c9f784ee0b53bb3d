//! Core application

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};

use anyhow::{Context, Result};

use crate::core::cli::{self, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::domain::pipeline;
use crate::domain::telemetry::TelemetryKind;

pub struct App;

impl App {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let config = AppConfig::load(&cli_config)?;

        match command {
            Commands::Fields => Self::print_fields(config.telemetry_type()?),
            Commands::Check { .. } => Self::check(&config),
        }
    }

    fn init_logging() {
        let default_filter = format!("warn,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        // stdout carries matched records, so logs go to stderr
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(false)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    fn print_fields(kind: TelemetryKind) -> Result<()> {
        println!("{} ({})", kind.record_type(), kind);
        for field in kind.describe_fields() {
            println!("  {}", field);
        }
        Ok(())
    }

    fn check(config: &AppConfig) -> Result<()> {
        let kind = config.telemetry_type()?;
        let info = config.filter_info()?;
        tracing::debug!(kind = %kind, rule = %info, policy = %config.on_malformed, "Checking records");

        let input: Box<dyn BufRead> = match &config.input {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open input file: {}", path.display()))?;
                Box::new(BufReader::new(file))
            }
            None => Box::new(io::stdin().lock()),
        };
        let output = BufWriter::new(io::stdout().lock());

        let summary = pipeline::filter_records(kind, &info, input, output, config.on_malformed)?;
        tracing::info!(
            total = summary.total,
            matched = summary.matched,
            malformed = summary.malformed,
            "Done"
        );
        Ok(())
    }
}
