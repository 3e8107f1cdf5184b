//! Dependency graph engine.
//!
//! This module provides:
//! - Quoted include scanning of sources and headers
//! - Compilation unit declaration with identity checks
//! - Transitive closure over object identifiers, cycle-safe
//! - Cycle and unresolved-dependency reporting

mod resolver;
mod scanner;
mod types;

pub use resolver::{DependencyGraph, UnitTable, referenced_objects};
pub use scanner::{normalize, parse_includes, scan_includes};
pub use types::{CompilationUnit, GraphReport};
