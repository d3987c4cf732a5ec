//! Django class database
//!
//! Stores the registries and every class destined for generation, keyed by
//! `xmi:id` in document order.

use indexmap::IndexMap;
use tracing::warn;

use super::association::Relationship;
use super::fields::Field;
use super::operation::Operation;
use crate::core::Registry;

/// Stereotype marking a class as a persistence model
pub const MODEL_STEREOTYPE: &str = "DjangoModel";

/// Stereotype marking a class as a view module
pub const VIEW_STEREOTYPE: &str = "DjangoView";

/// Stereotype marking a package as a Django application
pub const APPLICATION_STEREOTYPE: &str = "DjangoApplication";

/// What a class generates into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Model,
    View,
}

impl ClassKind {
    pub fn from_stereotype(name: &str) -> Option<Self> {
        match name {
            MODEL_STEREOTYPE => Some(ClassKind::Model),
            VIEW_STEREOTYPE => Some(ClassKind::View),
            _ => None,
        }
    }

    pub fn stereotype(self) -> &'static str {
        match self {
            ClassKind::Model => MODEL_STEREOTYPE,
            ClassKind::View => VIEW_STEREOTYPE,
        }
    }

    /// Implicit first parameter of every generated function
    pub fn receiver(self) -> &'static str {
        match self {
            ClassKind::Model => "self",
            ClassKind::View => "request",
        }
    }

    /// Indentation of members: models nest them in a class, views are module level
    pub fn indent(self) -> &'static str {
        match self {
            ClassKind::Model => "    ",
            ClassKind::View => "",
        }
    }
}

/// A UML class on its way to becoming Django code
#[derive(Debug, Clone, PartialEq)]
pub struct DjangoClass {
    pub xmi_id: String,
    pub name: String,
    /// First applied stereotype, resolved to its name
    pub stereotype: Option<String>,
    pub is_abstract: bool,
    /// Set when the enclosing package is a `DjangoApplication`
    pub application: Option<String>,
    pub fields: Vec<Field>,
    pub relationships: Vec<Relationship>,
    pub operations: Vec<Operation>,
}

impl DjangoClass {
    pub fn new(xmi_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            xmi_id: xmi_id.into(),
            name: name.into(),
            stereotype: None,
            is_abstract: false,
            application: None,
            fields: Vec::new(),
            relationships: Vec::new(),
            operations: Vec::new(),
        }
    }

    pub fn with_stereotype(mut self, stereotype: impl Into<String>) -> Self {
        self.stereotype = Some(stereotype.into());
        self
    }

    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.application = Some(application.into());
        self
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn kind(&self) -> Option<ClassKind> {
        self.stereotype.as_deref().and_then(ClassKind::from_stereotype)
    }

    /// Views are always valid; models need a name to declare a class
    pub fn is_valid(&self) -> bool {
        match self.kind() {
            Some(ClassKind::Model) => !self.name.is_empty(),
            Some(ClassKind::View) => true,
            None => false,
        }
    }

    /// `app.Name` when the class lives in an application, else `Name`
    pub fn full_name(&self) -> String {
        match &self.application {
            Some(app) => format!("{}.{}", app, self.name),
            None => self.name.clone(),
        }
    }

    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }

    pub fn add_operation(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// No fields, relationships or operations
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.relationships.is_empty() && self.operations.is_empty()
    }
}

/// Registries plus the class table
#[derive(Debug, Clone, Default)]
pub struct DjangoDatabase {
    registry: Registry,
    classes: IndexMap<String, DjangoClass>,
}

impl DjangoDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Insert a class; a repeated `xmi:id` replaces the earlier class in place
    pub fn add_class(&mut self, class: DjangoClass) {
        let id = class.xmi_id.clone();
        if let Some(previous) = self.classes.insert(id, class) {
            warn!(id = %previous.xmi_id, name = %previous.name, "Duplicate class id, replacing");
        }
    }

    pub fn get_class(&self, id: &str) -> Option<&DjangoClass> {
        self.classes.get(id)
    }

    pub fn get_class_mut(&mut self, id: &str) -> Option<&mut DjangoClass> {
        self.classes.get_mut(id)
    }

    /// Classes in document order
    pub fn classes(&self) -> impl Iterator<Item = &DjangoClass> {
        self.classes.values()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.classes.values().map(|c| c.relationships.len()).sum()
    }

    pub fn clear(&mut self) {
        self.registry = Registry::new();
        self.classes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_stereotype() {
        assert_eq!(ClassKind::from_stereotype("DjangoModel"), Some(ClassKind::Model));
        assert_eq!(ClassKind::from_stereotype("DjangoView"), Some(ClassKind::View));
        assert_eq!(ClassKind::from_stereotype("DjangoApplication"), None);
        assert_eq!(ClassKind::from_stereotype("djangomodel"), None);
    }

    #[test]
    fn test_validity() {
        let model = DjangoClass::new("c1", "Order").with_stereotype("DjangoModel");
        assert!(model.is_valid());

        let unnamed_model = DjangoClass::new("c2", "").with_stereotype("DjangoModel");
        assert!(!unnamed_model.is_valid());

        let unnamed_view = DjangoClass::new("c3", "").with_stereotype("DjangoView");
        assert!(unnamed_view.is_valid());

        let plain = DjangoClass::new("c4", "Helper");
        assert!(!plain.is_valid());

        let other = DjangoClass::new("c5", "Entity").with_stereotype("Entity");
        assert!(!other.is_valid());
    }

    #[test]
    fn test_abstract_classes_stay_valid() {
        let class = DjangoClass::new("c1", "Base")
            .with_stereotype("DjangoModel")
            .with_abstract(true);
        assert!(class.is_valid());
        assert!(class.is_abstract);
    }

    #[test]
    fn test_full_name() {
        let plain = DjangoClass::new("c1", "Order");
        assert_eq!(plain.full_name(), "Order");

        let in_app = DjangoClass::new("c2", "Order").with_application("shop");
        assert_eq!(in_app.full_name(), "shop.Order");
    }

    #[test]
    fn test_database_preserves_insertion_order() {
        let mut db = DjangoDatabase::new();
        db.add_class(DjangoClass::new("z", "Zebra"));
        db.add_class(DjangoClass::new("a", "Ant"));
        db.add_class(DjangoClass::new("m", "Moose"));

        let names: Vec<_> = db.classes().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Zebra", "Ant", "Moose"]);
    }

    #[test]
    fn test_duplicate_id_replaces_in_place() {
        let mut db = DjangoDatabase::new();
        db.add_class(DjangoClass::new("c1", "First"));
        db.add_class(DjangoClass::new("c2", "Other"));
        db.add_class(DjangoClass::new("c1", "Second"));

        assert_eq!(db.class_count(), 2);
        let names: Vec<_> = db.classes().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Second", "Other"]);
    }

    #[test]
    fn test_clear() {
        let mut db = DjangoDatabase::new();
        db.registry_mut().register_datatype("DT_1", "int");
        db.add_class(DjangoClass::new("c1", "Order"));
        db.clear();

        assert_eq!(db.class_count(), 0);
        assert_eq!(db.registry().datatype_count(), 0);
    }
}
