//! Generator configuration
//!
//! Knobs that are fixed conventions in a stock Django project but may differ
//! between modeling tools or team setups.

/// Default prefix that marks a tagged value as a Django field option
pub const DEFAULT_TAG_PREFIX: &str = "django_";

/// Default artifact for model classes
pub const DEFAULT_MODEL_FILE: &str = "models.py_gen";

/// Default artifact for view classes
pub const DEFAULT_VIEW_FILE: &str = "views.py_gen";

/// Default package marker written into every application directory
pub const DEFAULT_PACKAGE_MARKER: &str = "__init__.py";

/// Configuration shared by the parser and the emitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Tagged values whose name starts with this prefix become field options
    pub tag_prefix: String,
    /// File name for `DjangoModel` classes
    pub model_file_name: String,
    /// File name for `DjangoView` classes
    pub view_file_name: String,
    /// Package marker created in each application directory
    pub package_marker: String,
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tag_prefix = prefix.into();
        self
    }

    pub fn with_model_file_name(mut self, name: impl Into<String>) -> Self {
        self.model_file_name = name.into();
        self
    }

    pub fn with_view_file_name(mut self, name: impl Into<String>) -> Self {
        self.view_file_name = name.into();
        self
    }

    pub fn with_package_marker(mut self, name: impl Into<String>) -> Self {
        self.package_marker = name.into();
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            tag_prefix: DEFAULT_TAG_PREFIX.to_string(),
            model_file_name: DEFAULT_MODEL_FILE.to_string(),
            view_file_name: DEFAULT_VIEW_FILE.to_string(),
            package_marker: DEFAULT_PACKAGE_MARKER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.tag_prefix, "django_");
        assert_eq!(config.model_file_name, "models.py_gen");
        assert_eq!(config.view_file_name, "views.py_gen");
        assert_eq!(config.package_marker, "__init__.py");
    }

    #[test]
    fn test_builder_overrides() {
        let config = GeneratorConfig::new()
            .with_tag_prefix("dj_")
            .with_model_file_name("models.py")
            .with_view_file_name("views.py");
        assert_eq!(config.tag_prefix, "dj_");
        assert_eq!(config.model_file_name, "models.py");
        assert_eq!(config.view_file_name, "views.py");
        assert_eq!(config.package_marker, "__init__.py");
    }
}
