//! Types for the dependency graph.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::paths::PathMapper;

/// One source file and the build identities derived from it.
///
/// Dependency sets hold object paths. They are ordered so that anything
/// rendered from them is reproducible across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilationUnit {
    /// Source file, relative to the project root. Unique key.
    pub source_path: PathBuf,
    /// Object file compiled from the source. Unique across units.
    pub object_path: PathBuf,
    /// Public header paired with the source; may not exist.
    pub header_path: PathBuf,
    /// Objects referenced by includes in the source or its header.
    pub direct_deps: BTreeSet<PathBuf>,
    /// Objects reachable from `direct_deps`. Filled once by
    /// [`UnitTable::resolve`](super::UnitTable::resolve).
    pub transitive_deps: BTreeSet<PathBuf>,
    /// Test executable, present iff the source is a test source.
    pub test_target: Option<PathBuf>,
}

impl CompilationUnit {
    /// Declare a unit from its source path and the objects its includes
    /// reference. A reference to the unit's own object is dropped.
    ///
    /// Fails for a test source whose name is only the test marker, since
    /// its executable would be the test root itself.
    pub fn declare(
        mapper: &PathMapper<'_>,
        source_path: impl Into<PathBuf>,
        mut direct_deps: BTreeSet<PathBuf>,
    ) -> Result<Self> {
        let source_path = source_path.into();
        let test_target = mapper.test_target(&source_path);
        if test_target.is_none() && mapper.is_test_source(&source_path) {
            return Err(Error::EmptyTestName(source_path));
        }

        let object_path = mapper.object_path(&source_path);
        direct_deps.remove(&object_path);

        Ok(Self {
            header_path: mapper.header_path(&source_path),
            test_target,
            source_path,
            object_path,
            direct_deps,
            transitive_deps: BTreeSet::new(),
        })
    }

    /// Whether this unit links a test executable.
    pub fn is_test(&self) -> bool {
        self.test_target.is_some()
    }

    /// Whether `object` is reachable from this unit.
    pub fn depends_on(&self, object: &Path) -> bool {
        self.transitive_deps.contains(object)
    }
}

/// Summary of a resolved graph, used for inspection output.
#[derive(Debug, Clone, Serialize)]
pub struct GraphReport {
    /// Units ordered by object path.
    pub units: Vec<CompilationUnit>,
    /// Referenced objects that no source produces.
    pub unresolved: BTreeSet<PathBuf>,
    /// Groups of objects whose includes reference each other.
    pub cycles: Vec<Vec<PathBuf>>,
}

impl GraphReport {
    /// Pretty-printed JSON form of the report.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
