//! Manifest assembly and output.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::synth::{Rule, TARGET_VAR, UnitRules, path_str, synthesize};
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::graph::DependencyGraph;

/// A complete Makefile, ready to render.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// `NAME= value` declarations, in order.
    pub variables: Vec<(String, String)>,
    /// Aggregate `all` rule.
    pub all: Rule,
    /// Archive of every non-test object.
    pub archive: Rule,
    pub link_rules: Vec<Rule>,
    pub object_rules: Vec<Rule>,
    pub clean: Rule,
}

impl Manifest {
    /// Assemble the manifest for a resolved graph.
    pub fn assemble(config: &GeneratorConfig, graph: &DependencyGraph) -> Self {
        let UnitRules {
            object_rules,
            link_rules,
        } = synthesize(graph);

        let toolchain = &config.toolchain;
        let variables = vec![
            ("CC".to_string(), toolchain.cc.clone()),
            ("CFLAGS".to_string(), toolchain.cflags.clone()),
            ("TARGET".to_string(), toolchain.archive.clone()),
        ];

        let archived: Vec<String> = graph
            .units()
            .filter(|unit| !unit.is_test())
            .map(|unit| path_str(&unit.object_path))
            .collect();
        let archive = Rule::new(TARGET_VAR)
            .with_prerequisites(archived.iter().cloned())
            .with_action(format!("ar -r {TARGET_VAR} {}", archived.join(" ")).trim_end().to_string());

        let all = Rule::new("all").with_prerequisites(
            object_rules
                .iter()
                .chain(link_rules.iter())
                .map(|rule| rule.target.clone())
                .chain(std::iter::once(TARGET_VAR.to_string())),
        );

        let clean = Rule::new("clean").with_action(format!(
            "rm -rf {}/* {}/*",
            path_str(&config.layout.bin_root),
            path_str(&config.layout.test_root)
        ));

        Self {
            variables,
            all,
            archive,
            link_rules,
            object_rules,
            clean,
        }
    }

    /// Every rule in output order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        std::iter::once(&self.all)
            .chain(std::iter::once(&self.archive))
            .chain(self.link_rules.iter())
            .chain(self.object_rules.iter())
            .chain(std::iter::once(&self.clean))
    }

    /// Render the manifest: preamble, then one block per rule.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.variables {
            out.push_str(name);
            out.push_str("= ");
            out.push_str(value);
            out.push('\n');
        }
        for rule in self.rules() {
            out.push('\n');
            rule.render(&mut out);
        }
        out
    }

    /// Write the rendered manifest, replacing any previous file.
    ///
    /// Uses atomic write (write to temp file, then rename) so a failed run
    /// never leaves a truncated manifest behind.
    pub fn write(&self, path: &Path) -> Result<()> {
        let contents = self.render();
        write_atomic(path, contents.as_bytes())?;

        tracing::debug!(
            "Wrote manifest: {} rules, {} bytes to {}",
            self.rules().count(),
            contents.len(),
            path.display()
        );
        Ok(())
    }
}

/// Write through a uniquely named sibling temp file renamed over `path`.
/// The temp file is removed when dropped unpersisted.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
