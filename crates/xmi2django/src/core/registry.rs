//! Datatype and stereotype registries
//!
//! Both map diagram-local `xmi:id`s to names. They are filled during the first
//! parsing phase and only read afterwards.

use std::collections::HashMap;

use tracing::{trace, warn};

use super::error::{Result, XmiError};

/// Lookup tables for primitive datatypes and stereotypes
#[derive(Debug, Clone, Default)]
pub struct Registry {
    datatypes: HashMap<String, String>,
    stereotypes: HashMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a primitive datatype; an id that is already known keeps its first name
    pub fn register_datatype(&mut self, id: impl Into<String>, name: impl Into<String>) {
        register(&mut self.datatypes, "datatype", id.into(), name.into());
    }

    /// Register a stereotype; an id that is already known keeps its first name
    pub fn register_stereotype(&mut self, id: impl Into<String>, name: impl Into<String>) {
        register(&mut self.stereotypes, "stereotype", id.into(), name.into());
    }

    pub fn resolve_datatype(&self, id: &str) -> Result<&str> {
        self.datatypes
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| XmiError::unresolved("datatype", id))
    }

    pub fn resolve_stereotype(&self, id: &str) -> Result<&str> {
        self.stereotypes
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| XmiError::unresolved("stereotype", id))
    }

    pub fn datatype_count(&self) -> usize {
        self.datatypes.len()
    }

    pub fn stereotype_count(&self) -> usize {
        self.stereotypes.len()
    }
}

fn register(table: &mut HashMap<String, String>, kind: &'static str, id: String, name: String) {
    match table.get(&id) {
        Some(existing) if *existing != name => {
            warn!(kind, id = %id, existing = %existing, ignored = %name, "Duplicate id, keeping first registration");
        }
        Some(_) => {}
        None => {
            trace!(kind, id = %id, name = %name, "Registered");
            table.insert(id, name);
        }
    }
}
