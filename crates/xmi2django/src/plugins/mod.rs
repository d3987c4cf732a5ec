//! Plugin implementations for generation targets
//!
//! Each plugin implements the core traits for its target framework.

pub mod django;
pub mod orchestrator;

pub use django::*;
pub use orchestrator::*;
