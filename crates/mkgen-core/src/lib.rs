//! Core engine for mkgen, a Makefile generator for C module trees.
//!
//! This crate provides:
//! - Path mapping from sources to object, header and test identities
//! - Quoted include scanning
//! - Dependency graph construction and cycle-safe transitive closure
//! - Rule synthesis and Makefile assembly with atomic output

pub mod config;
pub mod discover;
pub mod error;
pub mod generator;
pub mod graph;
pub mod paths;
pub mod rules;

pub use config::{GeneratorConfig, Layout, Toolchain};
pub use discover::discover_sources;
pub use error::{Error, Result};
pub use generator::{Generated, build_graph, generate};
pub use graph::{CompilationUnit, DependencyGraph, GraphReport, UnitTable};
pub use paths::PathMapper;
pub use rules::{Manifest, Rule};
