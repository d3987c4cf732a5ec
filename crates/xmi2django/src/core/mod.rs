//! Core abstractions for XMI processing
//!
//! The XML tree, the id registries, errors and the traits every generation
//! target implements.

mod config;
mod document;
mod emitter;
mod error;
pub mod logging;
mod parser;
mod registry;

pub use config::*;
pub use document::*;
pub use emitter::*;
pub use error::*;
pub use logging::*;
pub use parser::*;
pub use registry::*;
