//! End-to-end generation pipeline.
//!
//! discover sources → declare units → resolve closures → assemble → write

use std::path::PathBuf;

use crate::config::GeneratorConfig;
use crate::discover::discover_sources;
use crate::error::{Error, Result};
use crate::graph::{CompilationUnit, DependencyGraph, UnitTable, referenced_objects};
use crate::paths::PathMapper;
use crate::rules::Manifest;

/// Scan the project and resolve every unit's dependencies.
pub fn build_graph(config: &GeneratorConfig) -> Result<DependencyGraph> {
    let mapper = PathMapper::new(&config.layout);
    let mut table = UnitTable::new();

    for source in discover_sources(config)? {
        let direct_deps = referenced_objects(&config.project_root, &mapper, &source)?;
        table.declare(CompilationUnit::declare(&mapper, source, direct_deps)?)?;
    }

    let graph = table.resolve();

    for unit in graph.units() {
        for dep in unit.direct_deps.iter().filter(|dep| !graph.is_known(dep)) {
            if config.strict {
                return Err(Error::UnresolvedDependency {
                    source_path: unit.source_path.clone(),
                    object: dep.clone(),
                });
            }
            tracing::debug!(
                "{} references {}, which no source produces; treating it as external",
                unit.source_path.display(),
                dep.display()
            );
        }
    }

    for cycle in graph.cycles() {
        tracing::debug!(
            "include cycle: {}",
            cycle
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(" → ")
        );
    }

    Ok(graph)
}

/// Result of a generation run.
pub struct Generated {
    pub graph: DependencyGraph,
    pub manifest: Manifest,
}

impl Generated {
    /// Number of test executables the manifest links.
    pub fn test_count(&self) -> usize {
        self.manifest.link_rules.len()
    }

    /// Write the manifest to the configured output, returning its path.
    pub fn write(&self, config: &GeneratorConfig) -> Result<PathBuf> {
        let path = config.output_path();
        self.manifest.write(&path)?;
        Ok(path)
    }
}

/// Build the graph and assemble the manifest without writing it.
pub fn generate(config: &GeneratorConfig) -> Result<Generated> {
    let graph = build_graph(config)?;
    let manifest = Manifest::assemble(config, &graph);

    tracing::info!(
        "Generated {} object rules and {} link rules",
        manifest.object_rules.len(),
        manifest.link_rules.len()
    );

    Ok(Generated { graph, manifest })
}
