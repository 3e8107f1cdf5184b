//! Graph command implementation for mkgen CLI.
//!
//! Prints the resolved dependency graph without writing a manifest.

use std::path::Path;

use mkgen_core::{GeneratorConfig, GraphReport, build_graph};

use crate::colors;

/// Execute the graph command.
pub fn execute(root: &Path, json: bool) -> anyhow::Result<()> {
    if !root.is_dir() {
        anyhow::bail!("Project directory not found: {}", root.display());
    }

    let graph = build_graph(&GeneratorConfig::for_project(root))?;
    let report = graph.report();

    if json {
        println!("{}", report.to_json()?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &GraphReport) {
    for unit in &report.units {
        println!(
            "{}{}{} ({})",
            colors::CYAN,
            unit.object_path.display(),
            colors::RESET,
            unit.source_path.display()
        );
        if let Some(target) = &unit.test_target {
            println!("  test:       {}", target.display());
        }
        println!("  direct:     {}", join(&unit.direct_deps));
        println!("  transitive: {}", join(&unit.transitive_deps));
    }

    if !report.unresolved.is_empty() {
        println!();
        println!("{}External objects:{}", colors::YELLOW, colors::RESET);
        for object in &report.unresolved {
            println!("  {}", object.display());
        }
    }

    if !report.cycles.is_empty() {
        println!();
        println!("{}Include cycles:{}", colors::YELLOW, colors::RESET);
        for cycle in &report.cycles {
            println!("  {}", join(cycle));
        }
    }
}

fn join<'a>(paths: impl IntoIterator<Item = &'a std::path::PathBuf>) -> String {
    let joined = paths
        .into_iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}
