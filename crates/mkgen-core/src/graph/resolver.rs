//! Dependency resolution.
//!
//! Resolution is two-phase. Every unit is first declared into a
//! [`UnitTable`] with its direct dependencies. Once the table is complete
//! it is consumed by [`UnitTable::resolve`], which computes each unit's
//! transitive closure against the finished table and returns an
//! immutable [`DependencyGraph`].

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};

use super::scanner::scan_includes;
use super::types::{CompilationUnit, GraphReport};
use crate::error::{Error, Result};
use crate::paths::PathMapper;

/// Objects referenced by includes in `source` or its public header.
///
/// Headers are scanned relative to `project_root`; a missing header
/// contributes nothing. References to unknown objects are kept.
pub fn referenced_objects(
    project_root: &Path,
    mapper: &PathMapper<'_>,
    source: &Path,
) -> Result<BTreeSet<PathBuf>> {
    let mut headers = scan_includes(project_root, source)?;
    headers.extend(scan_includes(project_root, &mapper.header_path(source))?);

    Ok(headers
        .iter()
        .map(|header| mapper.object_path_from_header(header))
        .collect())
}

/// Units declared so far, keyed by object path (first phase).
#[derive(Debug, Default)]
pub struct UnitTable {
    units: FxHashMap<PathBuf, CompilationUnit>,
    /// Test target to the source that claimed it.
    test_targets: BTreeMap<PathBuf, PathBuf>,
}

impl UnitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit to the table.
    ///
    /// Fails if another source already derived the same object path, or a
    /// test target equal to this one or nested with it (`test/a` next to
    /// `test/a/b` would need `test/a` to be both a file and a directory).
    pub fn declare(&mut self, unit: CompilationUnit) -> Result<()> {
        if let Some(existing) = self.units.get(&unit.object_path) {
            return Err(Error::IdentityCollision {
                kind: "object",
                identity: unit.object_path.clone(),
                first: existing.source_path.clone(),
                second: unit.source_path,
            });
        }

        if let Some(target) = &unit.test_target {
            let clash = self
                .test_targets
                .iter()
                .find(|(existing, _)| existing.starts_with(target) || target.starts_with(existing));
            if let Some((existing, first)) = clash {
                let (kind, identity) = if existing == target {
                    ("test target", target)
                } else if target.starts_with(existing) {
                    ("test target directory", existing)
                } else {
                    ("test target directory", target)
                };
                return Err(Error::IdentityCollision {
                    kind,
                    identity: identity.clone(),
                    first: first.clone(),
                    second: unit.source_path,
                });
            }
            self.test_targets
                .insert(target.clone(), unit.source_path.clone());
        }

        tracing::debug!(
            "declared {} -> {} ({} direct deps)",
            unit.source_path.display(),
            unit.object_path.display(),
            unit.direct_deps.len()
        );
        self.units.insert(unit.object_path.clone(), unit);
        Ok(())
    }

    /// Compute every unit's transitive closure (second phase).
    pub fn resolve(self) -> DependencyGraph {
        let units: BTreeMap<PathBuf, CompilationUnit> = self.units.into_iter().collect();

        // Nodes are object identifiers, known or not; edges run from a
        // unit to each object it references.
        let mut graph = DiGraph::new();
        let mut node_indices = FxHashMap::default();
        for object in units.keys() {
            let idx = graph.add_node(object.clone());
            node_indices.insert(object.clone(), idx);
        }
        for unit in units.values() {
            let from = node_indices[&unit.object_path];
            for dep in &unit.direct_deps {
                let to = *node_indices
                    .entry(dep.clone())
                    .or_insert_with(|| graph.add_node(dep.clone()));
                graph.add_edge(from, to, ());
            }
        }

        let mut resolved = DependencyGraph {
            graph,
            node_indices,
            units,
        };

        let closures: Vec<(PathBuf, BTreeSet<PathBuf>)> = resolved
            .units
            .keys()
            .map(|object| (object.clone(), resolved.transitive_closure(object)))
            .collect();
        for (object, closure) in closures {
            if let Some(unit) = resolved.units.get_mut(&object) {
                unit.transitive_deps = closure;
            }
        }

        resolved
    }
}

/// Resolved dependency graph over object identifiers.
pub struct DependencyGraph {
    /// Edges go from a unit to the objects it references.
    graph: DiGraph<PathBuf, ()>,
    /// Object identifier to node index mapping
    node_indices: FxHashMap<PathBuf, NodeIndex>,
    /// Units by object path, ordered
    units: BTreeMap<PathBuf, CompilationUnit>,
}

impl DependencyGraph {
    /// Objects reachable from `object`, excluding `object` itself.
    ///
    /// Traversal uses an explicit worklist guarded by a visited set, so
    /// include cycles terminate. Objects with no known unit are added as
    /// leaves and never expanded.
    pub fn transitive_closure(&self, object: &Path) -> BTreeSet<PathBuf> {
        let mut closure = BTreeSet::new();
        let Some(&start) = self.node_indices.get(object) else {
            return closure;
        };

        let mut visited = FxHashSet::default();
        visited.insert(start);
        let mut queue: VecDeque<NodeIndex> = self
            .graph
            .neighbors(start)
            .filter(|idx| visited.insert(*idx))
            .collect();

        while let Some(idx) = queue.pop_front() {
            let dep = &self.graph[idx];
            closure.insert(dep.clone());

            if !self.units.contains_key(dep) {
                continue;
            }
            for next in self.graph.neighbors(idx) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        closure
    }

    /// Get a unit by object path.
    pub fn get(&self, object: &Path) -> Option<&CompilationUnit> {
        self.units.get(object)
    }

    /// All units, ordered by object path.
    pub fn units(&self) -> impl Iterator<Item = &CompilationUnit> {
        self.units.values()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Whether `object` is produced by a known unit.
    pub fn is_known(&self, object: &Path) -> bool {
        self.units.contains_key(object)
    }

    /// Referenced objects that no unit produces.
    pub fn unresolved(&self) -> BTreeSet<PathBuf> {
        self.units
            .values()
            .flat_map(|unit| unit.direct_deps.iter())
            .filter(|dep| !self.is_known(dep))
            .cloned()
            .collect()
    }

    /// Groups of units that reach each other through their includes.
    ///
    /// Cycles are tolerated by resolution; this is for reporting only.
    pub fn cycles(&self) -> Vec<Vec<PathBuf>> {
        use petgraph::algo::kosaraju_scc;

        let mut cycles: Vec<Vec<PathBuf>> = kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut members: Vec<PathBuf> =
                    scc.into_iter().map(|idx| self.graph[idx].clone()).collect();
                members.sort();
                members
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Snapshot of the graph for display or serialization.
    pub fn report(&self) -> GraphReport {
        GraphReport {
            units: self.units.values().cloned().collect(),
            unresolved: self.unresolved(),
            cycles: self.cycles(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Layout;

    fn obj(name: &str) -> PathBuf {
        PathBuf::from(format!("bin/{name}.o"))
    }

    fn make_unit(mapper: &PathMapper<'_>, source: &str, deps: &[&str]) -> CompilationUnit {
        let deps = deps.iter().map(|d| obj(d)).collect();
        CompilationUnit::declare(mapper, format!("src/{source}"), deps).unwrap()
    }

    fn resolve(units: &[(&str, &[&str])]) -> DependencyGraph {
        let layout = Layout::default();
        let mapper = PathMapper::new(&layout);
        let mut table = UnitTable::new();
        for (source, deps) in units {
            table.declare(make_unit(&mapper, source, deps)).unwrap();
        }
        table.resolve()
    }

    fn closure_of(graph: &DependencyGraph, name: &str) -> BTreeSet<PathBuf> {
        graph.get(&obj(name)).unwrap().transitive_deps.clone()
    }

    #[test]
    fn test_empty_table() {
        let graph = UnitTable::new().resolve();
        assert!(graph.is_empty());
        assert!(graph.unresolved().is_empty());
        assert!(graph.cycles().is_empty());
    }

    #[test]
    fn test_linear_closure() {
        let graph = resolve(&[("a.c", &["b"]), ("b.c", &["c"]), ("c.c", &[])]);
        assert_eq!(closure_of(&graph, "a"), BTreeSet::from([obj("b"), obj("c")]));
        assert_eq!(closure_of(&graph, "b"), BTreeSet::from([obj("c")]));
        assert!(closure_of(&graph, "c").is_empty());
    }

    #[test]
    fn test_diamond_closure() {
        let graph = resolve(&[
            ("top.c", &["left", "right"]),
            ("left.c", &["base"]),
            ("right.c", &["base"]),
            ("base.c", &[]),
        ]);
        assert_eq!(
            closure_of(&graph, "top"),
            BTreeSet::from([obj("base"), obj("left"), obj("right")])
        );
    }

    #[test]
    fn test_mutual_include_terminates() {
        let graph = resolve(&[("a.c", &["b"]), ("b.c", &["a"])]);
        assert_eq!(closure_of(&graph, "a"), BTreeSet::from([obj("b")]));
        assert_eq!(closure_of(&graph, "b"), BTreeSet::from([obj("a")]));
        assert_eq!(graph.cycles(), vec![vec![obj("a"), obj("b")]]);
    }

    #[test]
    fn test_longer_cycle_excludes_self() {
        let graph = resolve(&[("a.c", &["b"]), ("b.c", &["c"]), ("c.c", &["a"])]);
        for name in ["a", "b", "c"] {
            let closure = closure_of(&graph, name);
            assert_eq!(closure.len(), 2);
            assert!(!closure.contains(&obj(name)));
        }
    }

    #[test]
    fn test_unknown_objects_are_leaves() {
        let graph = resolve(&[("a.c", &["b", "header_only"]), ("b.c", &["vendor"])]);
        assert_eq!(
            closure_of(&graph, "a"),
            BTreeSet::from([obj("b"), obj("header_only"), obj("vendor")])
        );
        assert_eq!(
            graph.unresolved(),
            BTreeSet::from([obj("header_only"), obj("vendor")])
        );
        assert!(graph.get(&obj("header_only")).is_none());
    }

    #[test]
    fn test_closure_is_complete() {
        let graph = resolve(&[
            ("a.c", &["b"]),
            ("b.c", &["c", "d"]),
            ("c.c", &["a"]),
            ("d.c", &["ext"]),
        ]);
        for unit in graph.units() {
            assert!(unit.direct_deps.is_subset(&unit.transitive_deps));
            assert!(!unit.depends_on(&unit.object_path));
            for dep in &unit.transitive_deps {
                if let Some(dep_unit) = graph.get(dep) {
                    for next in &dep_unit.direct_deps {
                        assert!(
                            next == &unit.object_path || unit.depends_on(next),
                            "{} missing {} via {}",
                            unit.object_path.display(),
                            next.display(),
                            dep.display()
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_object_collision() {
        let layout = Layout::default();
        let mapper = PathMapper::new(&layout);
        let mut table = UnitTable::new();
        table
            .declare(make_unit(&mapper, "a/b.c", &[]))
            .unwrap();

        let result = table.declare(make_unit(&mapper, "a__b.c", &[]));
        assert!(matches!(
            result,
            Err(Error::IdentityCollision { kind: "object", .. })
        ));
        assert_eq!(table.resolve().len(), 1);
    }

    #[test]
    fn test_test_target_collision() {
        let layout = Layout::default();
        let mapper = PathMapper::new(&layout);
        let mut table = UnitTable::new();

        let first = make_unit(&mapper, "x.test.c", &[]);
        let mut second = make_unit(&mapper, "y.test.c", &[]);
        second.test_target = first.test_target.clone();

        table.declare(first).unwrap();
        let result = table.declare(second);
        assert!(matches!(
            result,
            Err(Error::IdentityCollision { kind: "test target", .. })
        ));
    }

    #[test]
    fn test_nested_test_target_collision() {
        let layout = Layout::default();
        let mapper = PathMapper::new(&layout);

        for (first, second) in [("a.test.c", "a/b.test.c"), ("a/b.test.c", "a.test.c")] {
            let mut table = UnitTable::new();
            table.declare(make_unit(&mapper, first, &[])).unwrap();

            match table.declare(make_unit(&mapper, second, &[])) {
                Err(Error::IdentityCollision { kind, identity, .. }) => {
                    assert_eq!(kind, "test target directory");
                    assert_eq!(identity, PathBuf::from("test/a"));
                }
                other => panic!("expected collision, got {:?}", other.err()),
            }
        }
    }

    #[test]
    fn test_sibling_test_targets_coexist() {
        let graph = resolve(&[("ab.test.c", &[]), ("a/b.test.c", &[]), ("a/c.test.c", &[])]);
        assert_eq!(graph.units().filter(|unit| unit.is_test()).count(), 3);
    }
}
