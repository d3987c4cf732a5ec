//! XMI document parser for Django generation
//!
//! Parsing runs in three explicit phases over the UML model:
//!
//! 1. every `ownedMember` is classified; datatypes and stereotypes go straight
//!    into the registry, classes and associations are deferred;
//! 2. deferred classes are built (they can now resolve any stereotype or
//!    datatype) and the valid ones enter the class table;
//! 3. deferred associations are resolved (every class they may point at is now
//!    in the table).

use tracing::{debug, info, span, trace, Level};

use super::association::AssociationResolver;
use super::database::{ClassKind, DjangoClass, DjangoDatabase, APPLICATION_STEREOTYPE};
use super::fields::{field_constructor, python_string_literal, Field};
use super::operation::{FinalStatement, Operation};
use crate::core::{
    GeneratorConfig, Parser, Registry, Result, XmiDocument, XmiError, XmlElement, UML_NS, XMI_NS,
};

/// The only XMI version accepted
pub const SUPPORTED_XMI_VERSION: &str = "2.1";

/// Element names that hold model members
const MEMBER_TAGS: &[&str] = &["ownedMember", "packagedElement"];

/// A class waiting for phase 2, with the element that contains it
struct DeferredClass<'a> {
    element: &'a XmlElement,
    container: &'a XmlElement,
}

/// Parses XMI 2.1 documents into a [`DjangoDatabase`]
#[derive(Debug, Clone, Default)]
pub struct DjangoParser {
    config: GeneratorConfig,
    resolver: AssociationResolver,
}

impl DjangoParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            resolver: AssociationResolver::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Check the XMI header and find the UML model element
    pub fn locate_model<'a>(&self, document: &'a XmiDocument) -> Result<&'a XmlElement> {
        let xmi = document
            .xmi_element()
            .ok_or_else(|| XmiError::malformed(format!("no XMI element in namespace {}", XMI_NS)))?;

        let version = xmi.attr_ns(XMI_NS, "version").unwrap_or_default();
        if version != SUPPORTED_XMI_VERSION {
            return Err(XmiError::unsupported_version(version));
        }

        xmi.descendants()
            .find(|e| e.is(UML_NS, "Model"))
            .ok_or_else(|| XmiError::malformed(format!("no Model element in namespace {}", UML_NS)))
    }

    /// Build one class and resolve all of its members, generated or not
    pub fn parse_class(
        &self,
        element: &XmlElement,
        container: Option<&XmlElement>,
        registry: &Registry,
    ) -> Result<DjangoClass> {
        let id = element.xmi_id().unwrap_or_default();
        let name = element.attr("name").unwrap_or_default();
        let class_span = span!(Level::DEBUG, "parse_class", id, name);
        let _enter = class_span.enter();

        let mut class = DjangoClass::new(id, name).with_abstract(parse_flag(element, "isAbstract")?);
        class.application = application_of(container, registry)?;
        class.stereotype = applied_stereotype(element, registry)?.map(str::to_string);

        let kind = class.kind();
        for attribute in element.children_named("ownedAttribute") {
            class.add_field(self.parse_attribute(attribute, registry)?);
        }
        for operation in element.children_named("ownedOperation") {
            class.add_operation(self.parse_operation(operation, kind, registry)?);
        }

        debug!(
            kind = kind.map(ClassKind::stereotype).unwrap_or_default(),
            fields = class.fields.len(),
            operations = class.operations.len(),
            "Parsed class"
        );
        Ok(class)
    }

    /// Build a field declaration from an `ownedAttribute`
    pub fn parse_attribute(&self, element: &XmlElement, registry: &Registry) -> Result<Field> {
        let name = element.attr("name").unwrap_or_default();
        let primitive = registry.resolve_datatype(element.attr("type").unwrap_or_default())?;
        let mut field = Field::new(name, field_constructor(primitive)?);
        field.set_option("unique", "True");

        for default in element.children_named("defaultValue") {
            field.set_or_remove_option("default", default.attr("value").unwrap_or_default());
        }

        for comment in element.children_named("ownedComment") {
            if let Some(body) = comment_body(comment) {
                field.set_option("help_text", python_string_literal(body));
            }
        }

        for extension in element.descendants().filter(|d| d.is(XMI_NS, "Extension")) {
            for unique in extension.descendants_named("unique") {
                if unique.xmi_value() != Some("true") {
                    field.remove_option("unique");
                }
            }
            for tagged in extension.descendants_named("taggedValue") {
                if tagged.xmi_type() != Some("uml:TaggedValue") {
                    continue;
                }
                let Some(option) = tagged
                    .attr("tag")
                    .and_then(|tag| tag.strip_prefix(self.config.tag_prefix.as_str()))
                else {
                    continue;
                };
                field.set_or_remove_option(option, tagged.attr("value").unwrap_or_default());
            }
        }

        trace!(field = %field.render(), "Parsed attribute");
        Ok(field)
    }

    /// Build a function stub from an `ownedOperation`; `kind` picks the receiver
    pub fn parse_operation(
        &self,
        element: &XmlElement,
        kind: Option<ClassKind>,
        registry: &Registry,
    ) -> Result<Operation> {
        let mut operation = Operation::new(element.attr("name").unwrap_or_default());
        if let Some(kind) = kind {
            operation.add_parameter(kind.receiver());
        }

        for parameter in element.children_named("ownedParameter") {
            if parameter.attr("kind") == Some("return") {
                let returns_value = match parameter.attr("type").filter(|t| !t.is_empty()) {
                    None => true,
                    Some(type_id) => registry.resolve_datatype(type_id)? != "void",
                };
                if returns_value {
                    operation.final_statement = FinalStatement::ReturnNone;
                }
                continue;
            }

            let name = parameter.attr("name").unwrap_or_default();
            match parameter.children_named("defaultValue").next() {
                Some(default) => operation.add_parameter(format!(
                    "{}={}",
                    name,
                    default.attr("value").unwrap_or_default()
                )),
                None => operation.add_parameter(name),
            }
        }

        for comment in element.children_named("ownedComment") {
            if let Some(body) = comment_body(comment) {
                operation.add_docstring(body);
            }
        }

        trace!(name = %operation.name, params = operation.parameters.len(), "Parsed operation");
        Ok(operation)
    }
}

impl Parser<DjangoDatabase> for DjangoParser {
    fn parse(&self, document: &XmiDocument, database: &mut DjangoDatabase) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_xmi");
        let _enter = parse_span.enter();

        let model = self.locate_model(document)?;
        trace!(model = model.attr("name").unwrap_or_default(), "Found UML model");

        // Phase 1: registries, deferring classes and associations
        let mut classes = Vec::new();
        let mut associations = Vec::new();
        collect_members(model, database.registry_mut(), &mut classes, &mut associations);
        debug!(
            datatypes = database.registry().datatype_count(),
            stereotypes = database.registry().stereotype_count(),
            classes = classes.len(),
            associations = associations.len(),
            "Registries populated"
        );

        // Phase 2: classes
        for DeferredClass { element, container } in classes {
            let class = self.parse_class(element, Some(container), database.registry())?;
            if class.is_valid() {
                database.add_class(class);
            } else {
                debug!(id = %class.xmi_id, name = %class.name, "Dropping class not meant for generation");
            }
        }

        // Phase 3: associations
        for association in associations {
            self.resolver.resolve(association, database)?;
        }

        info!(
            classes = database.class_count(),
            relationships = database.relationship_count(),
            "Parsing completed"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "django"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}

/// Depth-first walk over every member element below `parent`, in document order
fn collect_members<'a>(
    parent: &'a XmlElement,
    registry: &mut Registry,
    classes: &mut Vec<DeferredClass<'a>>,
    associations: &mut Vec<&'a XmlElement>,
) {
    for child in &parent.children {
        if MEMBER_TAGS.contains(&child.local_name.as_str()) {
            let id = child.xmi_id().unwrap_or_default();
            let name = child.attr("name").unwrap_or_default();
            match child.xmi_type() {
                Some("uml:DataType") => registry.register_datatype(id, name),
                Some("uml:Stereotype") => registry.register_stereotype(id, name),
                Some("uml:Class") => classes.push(DeferredClass {
                    element: child,
                    container: parent,
                }),
                Some("uml:Association") => associations.push(child),
                other => trace!(id, xmi_type = ?other, "Not a generation member"),
            }
        }
        collect_members(child, registry, classes, associations);
    }
}

/// First stereotype applied through the element's own `xmi:Extension`s
fn applied_stereotype<'r>(element: &XmlElement, registry: &'r Registry) -> Result<Option<&'r str>> {
    let applied = element
        .extensions()
        .find_map(|extension| extension.first_descendant("appliedStereotype"));

    match applied {
        Some(applied) => registry
            .resolve_stereotype(applied.xmi_value().unwrap_or_default())
            .map(Some),
        None => Ok(None),
    }
}

/// Name of the enclosing package when it is stereotyped as an application
fn application_of(container: Option<&XmlElement>, registry: &Registry) -> Result<Option<String>> {
    let Some(package) = container.filter(|c| c.xmi_type() == Some("uml:Package")) else {
        return Ok(None);
    };

    match applied_stereotype(package, registry)? {
        Some(APPLICATION_STEREOTYPE) => Ok(Some(package.attr("name").unwrap_or_default().to_string())),
        _ => Ok(None),
    }
}

/// Body text of an `ownedComment`, from a `body` element or attribute
fn comment_body(comment: &XmlElement) -> Option<&str> {
    comment
        .first_descendant("body")
        .map(|body| body.text.as_str())
        .or_else(|| comment.attr("body"))
}

/// A `true`/`false` attribute
///
/// An absent attribute reads as `false`, the UML default for `isAbstract`.
/// Any other value is an [`XmiError::InvalidAttributeValue`].
fn parse_flag(element: &XmlElement, attribute: &str) -> Result<bool> {
    match element.attr(attribute) {
        None | Some("false") => Ok(false),
        Some("true") => Ok(true),
        Some(other) => Err(XmiError::invalid_attribute(attribute, other)),
    }
}
