//! Core error types for XMI processing
//!
//! Every variant here is fatal: the whole transformation aborts on the first one.
//! Skipped classes are not errors, they end up in the generation report instead.

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T, E = XmiError> = std::result::Result<T, E>;

/// Core error types for the XMI to Django pipeline
#[derive(Error, Debug)]
pub enum XmiError {
    #[error("XML error: {message}")]
    Xml { message: String },

    #[error("Unsupported XMI version: '{found}' (only 2.1 is supported)")]
    UnsupportedVersion { found: String },

    #[error("Malformed document: {message}")]
    MalformedDocument { message: String },

    #[error("Unresolved {kind} reference: '{id}'")]
    UnresolvedReference { kind: &'static str, id: String },

    #[error("Unmapped datatype: '{type_name}' has no Django field")]
    UnmappedType { type_name: String },

    #[error("Invalid value '{value}' for attribute '{attribute}'")]
    InvalidAttributeValue { attribute: String, value: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl XmiError {
    /// Create a new XML error
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml {
            message: message.into(),
        }
    }

    /// Create a new unsupported version error
    pub fn unsupported_version(found: impl Into<String>) -> Self {
        Self::UnsupportedVersion {
            found: found.into(),
        }
    }

    /// Create a new malformed document error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }

    /// Create a new unresolved reference error
    pub fn unresolved(kind: &'static str, id: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            kind,
            id: id.into(),
        }
    }

    /// Create a new unmapped type error
    pub fn unmapped_type(type_name: impl Into<String>) -> Self {
        Self::UnmappedType {
            type_name: type_name.into(),
        }
    }

    /// Create a new invalid attribute value error
    pub fn invalid_attribute(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidAttributeValue {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_version() {
        let error = XmiError::unsupported_version("2.0");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Unsupported XMI version"));
        assert!(error_msg.contains("'2.0'"));
    }

    #[test]
    fn test_malformed_document() {
        let error = XmiError::malformed("no uml:Model element");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Malformed document"));
        assert!(error_msg.contains("uml:Model"));
    }

    #[test]
    fn test_unresolved_reference() {
        let error = XmiError::unresolved("datatype", "DT_42");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Unresolved datatype reference"));
        assert!(error_msg.contains("DT_42"));
    }

    #[test]
    fn test_unmapped_type() {
        let error = XmiError::unmapped_type("blob");
        assert!(format!("{}", error).contains("'blob'"));
    }

    #[test]
    fn test_invalid_attribute() {
        let error = XmiError::invalid_attribute("isAbstract", "maybe");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("isAbstract"));
        assert!(error_msg.contains("maybe"));
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: XmiError = io_err.into();
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("File not found"));
    }
}
