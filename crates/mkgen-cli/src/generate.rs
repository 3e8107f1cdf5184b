//! Generate command implementation for mkgen CLI.
//!
//! Scans the project and writes the Makefile.

use std::path::PathBuf;
use std::time::Instant;

use mkgen_core::{GeneratorConfig, Toolchain, generate};

use crate::colors;

/// Options collected from the command line.
pub struct Options {
    pub root: PathBuf,
    pub output: PathBuf,
    pub cc: Option<String>,
    pub cflags: Option<String>,
    pub target: Option<String>,
    pub strict: bool,
    pub stdout: bool,
}

impl Options {
    fn config(&self) -> GeneratorConfig {
        let defaults = Toolchain::default();
        let toolchain = Toolchain {
            cc: self.cc.clone().unwrap_or(defaults.cc),
            cflags: self.cflags.clone().unwrap_or(defaults.cflags),
            archive: self.target.clone().unwrap_or(defaults.archive),
        };

        GeneratorConfig::for_project(&self.root)
            .with_output(&self.output)
            .with_toolchain(toolchain)
            .with_strict(self.strict)
    }
}

/// Execute the generate command.
pub fn execute(options: Options) -> anyhow::Result<()> {
    if !options.root.is_dir() {
        anyhow::bail!("Project directory not found: {}", options.root.display());
    }

    let start = Instant::now();
    let config = options.config();
    let generated = generate(&config)?;

    if options.stdout {
        print!("{}", generated.manifest.render());
        return Ok(());
    }

    let path = generated.write(&config)?;
    let unresolved = generated.graph.unresolved();

    println!(
        "{}mkgen{} - {} units, {} tests",
        colors::BOLD,
        colors::RESET,
        generated.graph.len(),
        generated.test_count()
    );
    if !unresolved.is_empty() {
        println!(
            "{}External:{} {} objects with no source",
            colors::YELLOW,
            colors::RESET,
            unresolved.len()
        );
    }
    println!(
        "{}Wrote:{} {}",
        colors::GREEN,
        colors::RESET,
        path.display()
    );
    println!(
        "{}Time:{} {:.2}ms",
        colors::DIM,
        colors::RESET,
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}
