//! Core emitter trait for generated sources
//!
//! An emitter turns a filled database into artifacts under a target root.

use std::path::Path;

use super::error::Result;

/// Core trait for code emitters
pub trait Emitter<D>: Send + Sync {
    /// Summary of what was produced
    type Output;

    /// Write the database's artifacts below `target_root`
    fn emit(&self, database: &D, target_root: &Path) -> Result<Self::Output>;

    /// Get the name of this emitter
    fn name(&self) -> &'static str;

    /// Get the target language or framework
    fn format(&self) -> &'static str;
}
