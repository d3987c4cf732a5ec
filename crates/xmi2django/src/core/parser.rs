//! Core parser trait for XMI documents
//!
//! A parser walks an [`XmiDocument`] and fills a target-specific database.
//! Each generation target has its own parser implementation.

use super::document::XmiDocument;
use super::error::Result;

/// Core trait for XMI parsers
///
/// # Example
/// ```
/// use xmi2django::core::{Parser, XmiDocument};
/// use xmi2django::plugins::django::{DjangoDatabase, DjangoParser};
///
/// let xmi = r#"<xmi:XMI xmi:version="2.1"
///     xmlns:xmi="http://schema.omg.org/spec/XMI/2.1"
///     xmlns:uml="http://schema.omg.org/spec/UML/2.0">
///   <uml:Model name="Empty"/>
/// </xmi:XMI>"#;
///
/// let document = XmiDocument::parse_str(xmi).unwrap();
/// let mut database = DjangoDatabase::new();
/// DjangoParser::new().parse(&document, &mut database).unwrap();
/// assert_eq!(database.class_count(), 0);
/// ```
pub trait Parser<D>: Send + Sync {
    /// Parse the document into the provided database
    fn parse(&self, document: &XmiDocument, database: &mut D) -> Result<()>;

    /// Get the name of this parser
    fn name(&self) -> &'static str;

    /// Get the version of this parser
    fn version(&self) -> &'static str;
}
