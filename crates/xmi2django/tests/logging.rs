//! Tests for logging functionality
//!
//! These tests verify that logging initialization works correctly
//! with different configurations.

use std::str::FromStr;

use tempfile::tempdir;
use xmi2django::core::logging::{init_logging, LogFormat};
use xmi2django::generate;

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
    assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
    assert!(LogFormat::from_str("xml").is_err());
}

#[test]
fn test_log_format_variants() {
    let variants = LogFormat::variants();
    assert_eq!(variants, &["compact", "pretty", "json"]);
}

#[test]
fn test_init_logging_with_levels() {
    // Only the first call can install the global subscriber; the rest must not panic
    let _ = init_logging(Some("trace"), Some("compact"));
    let _ = init_logging(Some("debug"), Some("pretty"));
    let _ = init_logging(Some("xmi2django=debug,warn"), Some("json"));
    let _ = init_logging(Some("off"), Some("compact"));
    let _ = init_logging(None, None);
}

#[test]
fn test_init_logging_invalid_format() {
    let result = init_logging(Some("info"), Some("yaml"));
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("yaml"));
}

#[test]
fn test_generation_with_logging_enabled() {
    let _ = init_logging(Some("trace"), Some("compact"));

    let dir = tempdir().unwrap();
    let input = r#"<xmi:XMI xmi:version="2.1" xmlns:xmi="http://schema.omg.org/spec/XMI/2.1" xmlns:uml="http://schema.omg.org/spec/UML/2.0">
  <uml:Model xmi:id="m" name="Logged">
    <ownedMember xmi:type="uml:Stereotype" xmi:id="ST_model" name="DjangoModel"/>
    <ownedMember xmi:type="uml:Class" xmi:id="c1" name="Base" isAbstract="true">
      <xmi:Extension><appliedStereotype xmi:value="ST_model"/></xmi:Extension>
    </ownedMember>
    <ownedMember xmi:type="uml:Class" xmi:id="c2" name="Entry" isAbstract="false">
      <xmi:Extension><appliedStereotype xmi:value="ST_model"/></xmi:Extension>
    </ownedMember>
  </uml:Model>
</xmi:XMI>"#;

    let report = generate(input, dir.path()).unwrap();
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.skipped.len(), 1);
}
