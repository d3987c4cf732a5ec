//! Association resolution
//!
//! Turns a binary UML association into a single relationship field on one of
//! its two classes. Which class owns the field, and which Django relationship
//! it becomes, depends only on the multiplicities of the two ends.

use tracing::{debug, span, warn, Level};

use super::database::DjangoDatabase;
use crate::core::{Result, XmlElement, XmiError};

/// Cardinality class of one association end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    One,
    Multi,
}

impl Multiplicity {
    /// Classify from the raw `lowerValue`/`upperValue` strings
    ///
    /// Equal bounds, or a lower bound without an upper one, are `One`. An end
    /// with no multiplicity data at all also counts as `One`.
    pub fn from_bounds(lower: Option<&str>, upper: Option<&str>) -> Self {
        match (lower, upper) {
            (Some(_), None) => Multiplicity::One,
            (Some(lower), Some(upper)) if lower == upper => Multiplicity::One,
            (None, None) => Multiplicity::One,
            _ => Multiplicity::Multi,
        }
    }
}

/// Django relationship flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    OneToOne,
    OneToMany,
    ManyToMany,
}

impl RelationshipKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipKind::OneToOne => "onetoone",
            RelationshipKind::OneToMany => "onetomany",
            RelationshipKind::ManyToMany => "manytomany",
        }
    }

    pub fn constructor(self) -> &'static str {
        match self {
            RelationshipKind::OneToOne => "models.OneToOne",
            RelationshipKind::OneToMany => "models.ForeignKey",
            RelationshipKind::ManyToMany => "models.ManyToMany",
        }
    }
}

/// Which end of a binary association owns the field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredEnd {
    First,
    Second,
}

/// The decision table, evaluated in order:
///
/// | end 0 | end 1 | owner  | kind       |
/// |-------|-------|--------|------------|
/// | one   | one   | end 0  | onetoone   |
/// | one   | multi | end 0  | onetomany  |
/// | multi | one   | end 1  | onetomany  |
/// | multi | multi | end 1  | manytomany |
pub fn decide(first: Multiplicity, second: Multiplicity) -> (PreferredEnd, RelationshipKind) {
    use Multiplicity::*;
    match (first, second) {
        (One, One) => (PreferredEnd::First, RelationshipKind::OneToOne),
        (One, Multi) => (PreferredEnd::First, RelationshipKind::OneToMany),
        (Multi, One) => (PreferredEnd::Second, RelationshipKind::OneToMany),
        (Multi, Multi) => (PreferredEnd::Second, RelationshipKind::ManyToMany),
    }
}

/// A relationship field declared on the owning class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Role name of the owning end, used as the field name
    pub name: String,
    pub kind: RelationshipKind,
    /// Full name of the related class (`app.Name` or `Name`)
    pub target: String,
    /// Role name of the foreign end
    pub related_name: Option<String>,
}

impl Relationship {
    pub fn new(name: impl Into<String>, kind: RelationshipKind, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            target: target.into(),
            related_name: None,
        }
    }

    /// Empty reverse names are dropped
    pub fn with_related_name(mut self, related_name: impl Into<String>) -> Self {
        let related_name = related_name.into();
        self.related_name = (!related_name.is_empty()).then_some(related_name);
        self
    }

    pub fn render(&self) -> String {
        match &self.related_name {
            Some(related) => format!(
                "{} = {}('{}', related_name='{}')",
                self.name,
                self.kind.constructor(),
                self.target,
                related
            ),
            None => format!("{} = {}('{}')", self.name, self.kind.constructor(), self.target),
        }
    }
}

/// One `ownedEnd` of an association
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationEnd {
    pub role: String,
    /// `xmi:id` of the class at this end
    pub class_id: String,
    pub multiplicity: Multiplicity,
}

impl AssociationEnd {
    /// Read an end; its `type` must name a class already in the table
    pub fn from_element(element: &XmlElement, database: &DjangoDatabase) -> Result<Self> {
        let class_id = element.attr("type").unwrap_or_default();
        if database.get_class(class_id).is_none() {
            return Err(XmiError::unresolved("class", class_id));
        }

        let bound = |name: &str| {
            element
                .first_descendant(name)
                .map(|value| value.attr("value").unwrap_or_default())
        };

        Ok(Self {
            role: element.attr("name").unwrap_or_default().to_string(),
            class_id: class_id.to_string(),
            multiplicity: Multiplicity::from_bounds(bound("lowerValue"), bound("upperValue")),
        })
    }
}

/// Resolves `uml:Association` members against the class table
#[derive(Debug, Clone, Copy, Default)]
pub struct AssociationResolver;

impl AssociationResolver {
    pub fn new() -> Self {
        Self
    }

    /// Attach the association's relationship field to its owning class
    ///
    /// Only the first two `ownedEnd`s are used. An association with fewer ends
    /// is skipped with a warning.
    pub fn resolve(&self, element: &XmlElement, database: &mut DjangoDatabase) -> Result<()> {
        let id = element.xmi_id().unwrap_or_default();
        let resolve_span = span!(Level::DEBUG, "resolve_association", id);
        let _enter = resolve_span.enter();

        let end_elements: Vec<_> = element.descendants_named("ownedEnd").take(2).collect();
        let [first, second] = end_elements.as_slice() else {
            warn!(id, ends = end_elements.len(), "Association needs two ends, skipping");
            return Ok(());
        };

        let first = AssociationEnd::from_element(first, database)?;
        let second = AssociationEnd::from_element(second, database)?;

        let (preferred, kind) = decide(first.multiplicity, second.multiplicity);
        let (owner, foreign) = match preferred {
            PreferredEnd::First => (first, second),
            PreferredEnd::Second => (second, first),
        };

        let target = database
            .get_class(&foreign.class_id)
            .map(|c| c.full_name())
            .ok_or_else(|| XmiError::unresolved("class", foreign.class_id.as_str()))?;

        let relationship =
            Relationship::new(owner.role, kind, target).with_related_name(foreign.role);
        debug!(
            owner = %owner.class_id,
            kind = kind.as_str(),
            field = %relationship.render(),
            "Resolved association"
        );

        database
            .get_class_mut(&owner.class_id)
            .ok_or_else(|| XmiError::unresolved("class", owner.class_id.as_str()))?
            .add_relationship(relationship);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplicity_from_bounds() {
        assert_eq!(Multiplicity::from_bounds(Some("1"), Some("1")), Multiplicity::One);
        assert_eq!(Multiplicity::from_bounds(Some("0"), Some("0")), Multiplicity::One);
        assert_eq!(Multiplicity::from_bounds(Some("1"), None), Multiplicity::One);
        assert_eq!(Multiplicity::from_bounds(Some("0"), Some("*")), Multiplicity::Multi);
        assert_eq!(Multiplicity::from_bounds(Some("0"), Some("1")), Multiplicity::Multi);
        assert_eq!(Multiplicity::from_bounds(None, Some("*")), Multiplicity::Multi);
        assert_eq!(Multiplicity::from_bounds(None, Some("1")), Multiplicity::Multi);
        assert_eq!(Multiplicity::from_bounds(None, None), Multiplicity::One);
    }

    #[test]
    fn test_decision_table() {
        use Multiplicity::*;
        assert_eq!(decide(One, One), (PreferredEnd::First, RelationshipKind::OneToOne));
        assert_eq!(decide(One, Multi), (PreferredEnd::First, RelationshipKind::OneToMany));
        assert_eq!(decide(Multi, One), (PreferredEnd::Second, RelationshipKind::OneToMany));
        assert_eq!(decide(Multi, Multi), (PreferredEnd::Second, RelationshipKind::ManyToMany));
    }

    #[test]
    fn test_relationship_render() {
        let rel = Relationship::new("customer", RelationshipKind::OneToMany, "shop.Customer")
            .with_related_name("orders");
        assert_eq!(
            rel.render(),
            "customer = models.ForeignKey('shop.Customer', related_name='orders')"
        );

        let rel = Relationship::new("tags", RelationshipKind::ManyToMany, "Tag").with_related_name("");
        assert_eq!(rel.related_name, None);
        assert_eq!(rel.render(), "tags = models.ManyToMany('Tag')");

        let rel = Relationship::new("profile", RelationshipKind::OneToOne, "Profile");
        assert_eq!(rel.render(), "profile = models.OneToOne('Profile')");
    }
}
