//! Per-unit rule synthesis.

use std::fmt::Write as _;
use std::path::Path;

use crate::graph::{CompilationUnit, DependencyGraph};

/// Variable names declared in the manifest preamble.
pub const CC_VAR: &str = "$(CC)";
pub const CFLAGS_VAR: &str = "$(CFLAGS)";
pub const TARGET_VAR: &str = "$(TARGET)";

/// A single `target: prerequisites` block with its recipe lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub target: String,
    pub prerequisites: Vec<String>,
    pub actions: Vec<String>,
}

impl Rule {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            prerequisites: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites
            .extend(prerequisites.into_iter().map(Into::into));
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    /// Render in make syntax. Recipe lines are tab-indented.
    pub fn render(&self, out: &mut String) {
        out.push_str(&self.target);
        out.push(':');
        for prerequisite in &self.prerequisites {
            out.push(' ');
            out.push_str(prerequisite);
        }
        out.push('\n');
        for action in &self.actions {
            let _ = writeln!(out, "\t{action}");
        }
    }
}

pub(crate) fn path_str(path: &Path) -> String {
    path.display().to_string()
}

/// Compile rule: the object depends on its source only.
///
/// Header changes are not tracked, so no include prerequisites appear here.
pub fn object_rule(unit: &CompilationUnit) -> Rule {
    let object = path_str(&unit.object_path);
    let source = path_str(&unit.source_path);

    Rule::new(object.clone())
        .with_prerequisites([source.clone()])
        .with_action(format!("{CC_VAR} -o {object} -c {source}"))
}

/// Link rule for a test unit: its own object plus its full closure.
pub fn link_rule(unit: &CompilationUnit) -> Option<Rule> {
    let target = path_str(unit.test_target.as_ref()?);
    let inputs: Vec<String> = std::iter::once(&unit.object_path)
        .chain(unit.transitive_deps.iter())
        .map(|p| path_str(p))
        .collect();

    let action = format!("{CC_VAR} {CFLAGS_VAR} {} -o {target}", inputs.join(" "));
    Some(Rule::new(target).with_prerequisites(inputs).with_action(action))
}

/// Rules synthesized from every unit of a graph.
#[derive(Debug, Clone, Default)]
pub struct UnitRules {
    /// One per unit, ordered by object path.
    pub object_rules: Vec<Rule>,
    /// One per test unit, ordered by test target.
    pub link_rules: Vec<Rule>,
}

/// Synthesize object and link rules for every unit.
pub fn synthesize(graph: &DependencyGraph) -> UnitRules {
    let object_rules: Vec<Rule> = graph.units().map(object_rule).collect();
    let mut link_rules: Vec<Rule> = graph.units().filter_map(link_rule).collect();
    link_rules.sort_by(|a, b| a.target.cmp(&b.target));

    UnitRules {
        object_rules,
        link_rules,
    }
}
