//! Plugin orchestrator for the generation pipeline
//!
//! The orchestrator manages the flow of data through the plugins:
//! XML tree → Parser → Database → Emitter

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, span, Level};

use crate::core::{Emitter, GeneratorConfig, Parser, XmiDocument};
use crate::plugins::django::{DjangoDatabase, DjangoEmitter, DjangoParser, GenerationReport};

/// Plugin orchestrator that coordinates the entire pipeline
///
/// Holds the class database between parsing and generation, so a caller can
/// inspect what was parsed before anything touches the filesystem.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    config: GeneratorConfig,
    parser: DjangoParser,
    emitter: DjangoEmitter,
    database: DjangoDatabase,
}

impl Orchestrator {
    /// Create an orchestrator with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an orchestrator whose parser and emitter share `config`
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            parser: DjangoParser::with_config(config.clone()),
            emitter: DjangoEmitter::with_config(config.clone()),
            database: DjangoDatabase::new(),
            config,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Classes parsed by the last successful `parse_*` call
    pub fn database(&self) -> &DjangoDatabase {
        &self.database
    }

    /// Read a whole XMI document and parse it
    pub fn parse_file<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let mut input = String::new();
        reader
            .read_to_string(&mut input)
            .context("Failed to read XMI input")?;
        self.parse_str(&input)
    }

    /// Parse XMI text, replacing anything parsed before
    pub fn parse_str(&mut self, input: &str) -> Result<()> {
        let parse_span = span!(Level::INFO, "pipeline_parse", input_len = input.len());
        let _enter = parse_span.enter();

        let document = XmiDocument::parse_str(input)?;

        let mut database = DjangoDatabase::new();
        self.parser.parse(&document, &mut database)?;
        debug!(
            parser = self.parser.name(),
            version = self.parser.version(),
            classes = database.class_count(),
            "Parsing completed"
        );

        self.database = database;
        Ok(())
    }

    /// Write the parsed classes below `target_root`
    pub fn generate(&self, target_root: impl AsRef<Path>) -> Result<GenerationReport> {
        let target_root = target_root.as_ref();
        let generate_span = span!(Level::INFO, "pipeline_generate", root = %target_root.display());
        let _enter = generate_span.enter();

        let report = self.emitter.emit(&self.database, target_root).with_context(|| {
            format!("Failed to generate sources in {}", target_root.display())
        })?;
        info!(
            emitter = self.emitter.name(),
            format = self.emitter.format(),
            files = report.files.len(),
            "Pipeline completed successfully"
        );
        Ok(report)
    }

    /// Parse `input` and generate in one step
    pub fn process(&mut self, input: &str, target_root: impl AsRef<Path>) -> Result<GenerationReport> {
        self.parse_str(input)?;
        self.generate(target_root)
    }
}
