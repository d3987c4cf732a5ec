//! Command-line interface for the xmi2django utility
//!
//! Reads an XMI 2.1 class diagram and writes Django model and view stubs
//! below an output directory.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use xmi2django::core::logging::init_logging;
use xmi2django::plugins::Orchestrator;
use xmi2django::{GenerationReport, GeneratorConfig, DEFAULT_TAG_PREFIX};

/// xmi2django - Generate Django models and views from XMI class diagrams
#[derive(Parser)]
#[command(name = "xmi2django")]
#[command(about = "Generate Django model and view stubs from an XMI 2.1 UML class diagram")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    /// XMI file to read (use - for stdin)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory to generate into; created if missing
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Prefix marking tagged values that become field options
    #[arg(long, value_name = "PREFIX", default_value = DEFAULT_TAG_PREFIX)]
    pub tag_prefix: String,

    /// Print the generation report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

impl Cli {
    /// Explicit `--log-level`, else `debug` when verbose; `None` defers to the environment
    pub fn effective_log_level(&self) -> Option<&'static str> {
        self.log_level
            .map(|level| level.as_str())
            .or(self.verbose.then_some("debug"))
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig::new().with_tag_prefix(self.tag_prefix.as_str())
    }
}

/// Main CLI application
#[derive(Default)]
pub struct Xmi2DjangoApp {
    orchestrator: Orchestrator,
}

impl Xmi2DjangoApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<GenerationReport> {
        if let Err(e) = init_logging(
            cli.effective_log_level(),
            cli.log_format.map(|format| format.as_str()),
        ) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("xmi2django v{}", env!("CARGO_PKG_VERSION"));
        }

        self.orchestrator = Orchestrator::with_config(cli.generator_config());
        self.read_input(&cli.input)?;

        if cli.verbose {
            eprintln!(
                "Parsed {} classes from {}",
                self.orchestrator.database().class_count(),
                cli.input.display()
            );
        }

        let report = self.orchestrator.generate(&cli.output)?;
        self.print_report(&report, cli.json)?;
        Ok(report)
    }

    /// Parse input from a file or stdin
    pub fn read_input(&mut self, input: &Path) -> Result<()> {
        if input.to_string_lossy() == "-" {
            return self
                .orchestrator
                .parse_file(io::stdin().lock())
                .context("Failed to process XMI from stdin");
        }

        info!(input = %input.display(), "Reading XMI input");
        let file = File::open(input)
            .with_context(|| format!("Failed to read input file '{}'", input.display()))?;
        self.orchestrator
            .parse_file(BufReader::new(file))
            .with_context(|| format!("Failed to process '{}'", input.display()))
    }

    /// Print generated files and skipped classes to stdout
    pub fn print_report(&self, report: &GenerationReport, json: bool) -> Result<()> {
        let mut stdout = io::stdout().lock();
        if json {
            writeln!(stdout, "{}", serde_json::to_string_pretty(report)?)?;
        } else {
            for file in &report.files {
                writeln!(stdout, "generated {}", file.display())?;
            }
            for skipped in &report.skipped {
                writeln!(stdout, "skipped {} ({})", skipped.name, skipped.reason)?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    /// Get a reference to the orchestrator (for testing)
    #[cfg(test)]
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }
}
