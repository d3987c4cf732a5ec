//! Django field declarations
//!
//! Maps UML primitive datatypes onto `django.db.models` field constructors and
//! renders attribute declarations with their keyword options.

use indexmap::IndexMap;

use crate::core::{Result, XmiError};

/// Closed mapping from UML primitives to Django field constructors
pub const FIELD_TYPES: &[(&str, &str)] = &[
    ("boolean", "models.BooleanField"),
    ("char", "models.CharField"),
    ("double", "models.DecimalField"),
    ("float", "models.FloatField"),
    ("string", "models.TextField"),
    ("int", "models.IntegerField"),
    ("long", "models.BigIntegerField"),
    ("date", "models.DateField"),
    ("datetime", "models.DateTimeField"),
    ("time", "models.TimeField"),
];

/// Look up the field constructor for a primitive datatype name
pub fn field_constructor(primitive: &str) -> Result<&'static str> {
    FIELD_TYPES
        .iter()
        .find(|(name, _)| *name == primitive)
        .map(|(_, constructor)| *constructor)
        .ok_or_else(|| XmiError::unmapped_type(primitive))
}

/// One `name = models.XField(...)` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub constructor: &'static str,
    /// Keyword options in the order they were first set
    pub options: IndexMap<String, String>,
}

impl Field {
    pub fn new(name: impl Into<String>, constructor: &'static str) -> Self {
        Self {
            name: name.into(),
            constructor,
            options: IndexMap::new(),
        }
    }

    /// Set an option; overriding keeps the original position
    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.options.insert(key.into(), value.into());
    }

    pub fn remove_option(&mut self, key: &str) {
        self.options.shift_remove(key);
    }

    /// Set the option, or drop it when the value is empty
    pub fn set_or_remove_option(&mut self, key: impl Into<String>, value: &str) {
        let key = key.into();
        if value.is_empty() {
            self.remove_option(&key);
        } else {
            self.set_option(key, value);
        }
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn render(&self) -> String {
        let options = self
            .options
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} = {}({})", self.name, self.constructor, options)
    }
}

/// Quote text as a Python string literal
///
/// Follows `repr()`: single quotes unless the text contains a single quote and
/// no double quote.
pub fn python_string_literal(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut literal = String::with_capacity(text.len() + 2);
    literal.push(quote);
    for c in text.chars() {
        match c {
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            c if c == quote => {
                literal.push('\\');
                literal.push(c);
            }
            c if (c as u32) < 0x20 || c == '\x7f' => {
                literal.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => literal.push(c),
        }
    }
    literal.push(quote);
    literal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_primitive_maps() {
        for (primitive, constructor) in FIELD_TYPES {
            assert_eq!(field_constructor(primitive).unwrap(), *constructor);
        }
        assert_eq!(field_constructor("string").unwrap(), "models.TextField");
        assert_eq!(field_constructor("long").unwrap(), "models.BigIntegerField");
    }

    #[test]
    fn test_unmapped_primitive() {
        match field_constructor("void") {
            Err(XmiError::UnmappedType { type_name }) => assert_eq!(type_name, "void"),
            other => panic!("Expected UnmappedType, got {:?}", other),
        }
        assert!(field_constructor("String").is_err());
    }

    #[test]
    fn test_render_keeps_option_order() {
        let mut field = Field::new("title", "models.CharField");
        field.set_option("unique", "True");
        field.set_option("max_length", "200");
        field.set_option("default", "'x'");
        assert_eq!(
            field.render(),
            "title = models.CharField(unique=True, max_length=200, default='x')"
        );
    }

    #[test]
    fn test_override_keeps_position() {
        let mut field = Field::new("n", "models.IntegerField");
        field.set_option("unique", "True");
        field.set_option("default", "1");
        field.set_option("unique", "False");
        assert_eq!(field.render(), "n = models.IntegerField(unique=False, default=1)");
    }

    #[test]
    fn test_set_or_remove() {
        let mut field = Field::new("n", "models.IntegerField");
        field.set_option("unique", "True");
        field.set_or_remove_option("null", "True");
        field.set_or_remove_option("unique", "");
        assert_eq!(field.option("unique"), None);
        assert_eq!(field.render(), "n = models.IntegerField(null=True)");
    }

    #[test]
    fn test_render_without_options() {
        let field = Field::new("flag", "models.BooleanField");
        assert_eq!(field.render(), "flag = models.BooleanField()");
    }

    #[test]
    fn test_python_literal_plain() {
        assert_eq!(python_string_literal("Customer name"), "'Customer name'");
        assert_eq!(python_string_literal(""), "''");
    }

    #[test]
    fn test_python_literal_quotes() {
        assert_eq!(python_string_literal("it's"), "\"it's\"");
        assert_eq!(python_string_literal("say \"hi\""), "'say \"hi\"'");
        assert_eq!(python_string_literal("it's \"x\""), "'it\\'s \"x\"'");
    }

    #[test]
    fn test_python_literal_escapes() {
        assert_eq!(python_string_literal("a\nb"), "'a\\nb'");
        assert_eq!(python_string_literal("a\\b"), "'a\\\\b'");
        assert_eq!(python_string_literal("tab\there"), "'tab\\there'");
        assert_eq!(python_string_literal("\u{1}"), "'\\x01'");
        assert_eq!(python_string_literal("zażółć"), "'zażółć'");
    }
}
