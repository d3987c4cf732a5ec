//! xmi2django - Generate Django models and views from UML class diagrams
//!
//! Reads a UML class diagram exported as XMI 2.1 and writes Django source
//! stubs: one `models.py_gen` / `views.py_gen` per application.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xmi2django::generate;
//!
//! let input = std::fs::read_to_string("shop.xmi").unwrap();
//! let report = generate(&input, "generated").unwrap();
//! for file in &report.files {
//!     println!("{}", file.display());
//! }
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use xmi2django::prelude::*;
//!
//! let input = r#"<xmi:XMI xmi:version="2.1"
//!     xmlns:xmi="http://schema.omg.org/spec/XMI/2.1"
//!     xmlns:uml="http://schema.omg.org/spec/UML/2.0">
//!   <uml:Model xmi:id="m" name="Shop"/>
//! </xmi:XMI>"#;
//!
//! // Parse into a database
//! let document = XmiDocument::parse_str(input).unwrap();
//! let parser = DjangoParser::new();
//! let mut database = DjangoDatabase::new();
//! parser.parse(&document, &mut database).unwrap();
//!
//! // Inspect the parsed classes
//! assert_eq!(database.class_count(), 0);
//! ```

pub mod core;
pub mod plugins;

use std::path::Path;

pub use core::*;
pub use plugins::django::GenerationReport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Emitter, GeneratorConfig, Parser, Registry, XmiDocument, XmiError, XmlElement,
    };
    pub use crate::plugins::django::{
        ClassKind, DjangoClass, DjangoDatabase, DjangoEmitter, DjangoParser, GenerationReport,
    };
    pub use crate::plugins::orchestrator::Orchestrator;
}

/// Generate Django sources from XMI text into `target_root`
///
/// This is the simplest way to run the whole pipeline with the default
/// configuration.
///
/// # Returns
/// * `Ok(GenerationReport)` - Files written and classes skipped
/// * `Err` - On the first fatal parse or filesystem error; nothing is written
///   when parsing fails
pub fn generate(input: &str, target_root: impl AsRef<Path>) -> anyhow::Result<GenerationReport> {
    generate_with_config(input, target_root, GeneratorConfig::default())
}

/// Generate Django sources with a specific configuration
///
/// # Example
/// ```rust,no_run
/// use xmi2django::{generate_with_config, GeneratorConfig};
///
/// let input = std::fs::read_to_string("shop.xmi").unwrap();
/// let config = GeneratorConfig::new().with_tag_prefix("dj_");
/// generate_with_config(&input, "generated", config).unwrap();
/// ```
pub fn generate_with_config(
    input: &str,
    target_root: impl AsRef<Path>,
    config: GeneratorConfig,
) -> anyhow::Result<GenerationReport> {
    let mut orchestrator = plugins::orchestrator::Orchestrator::with_config(config);
    orchestrator.process(input, target_root)
}

/// Parse XMI text into a database without writing anything
///
/// # Example
/// ```rust
/// use xmi2django::parse;
///
/// let db = parse(r#"<xmi:XMI xmi:version="2.1"
///     xmlns:xmi="http://schema.omg.org/spec/XMI/2.1"
///     xmlns:uml="http://schema.omg.org/spec/UML/2.0">
///   <uml:Model xmi:id="m" name="Empty"/>
/// </xmi:XMI>"#).unwrap();
/// assert_eq!(db.class_count(), 0);
/// ```
pub fn parse(input: &str) -> anyhow::Result<plugins::django::DjangoDatabase> {
    let document = XmiDocument::parse_str(input)?;
    let parser = plugins::django::DjangoParser::new();
    let mut database = plugins::django::DjangoDatabase::new();
    parser.parse(&document, &mut database)?;
    Ok(database)
}
