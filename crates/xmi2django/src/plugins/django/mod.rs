//! Django generation plugin
//!
//! Parses XMI class diagrams into Django classes and emits models and views.

mod association;
mod database;
mod emitter;
mod fields;
mod operation;
mod parser;

pub use association::{
    decide, AssociationEnd, AssociationResolver, Multiplicity, PreferredEnd, Relationship,
    RelationshipKind,
};
pub use database::{
    ClassKind, DjangoClass, DjangoDatabase, APPLICATION_STEREOTYPE, MODEL_STEREOTYPE,
    VIEW_STEREOTYPE,
};
pub use emitter::{
    header, render_class, DjangoEmitter, GenerationReport, SkippedClass, MODEL_HEADER,
    VIEW_HEADER,
};
pub use fields::{field_constructor, python_string_literal, Field, FIELD_TYPES};
pub use operation::{split_lines, FinalStatement, Operation};
pub use parser::{DjangoParser, SUPPORTED_XMI_VERSION};
