//! mkgen CLI - Makefile generator for C module trees.

mod colors;
mod generate;
mod graph;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mkgen")]
#[command(about = "Generate a Makefile from the #include graph of a C source tree")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the source tree and write the Makefile
    Generate {
        /// Project directory containing src/ and include/
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Manifest path, relative to the project directory
        #[arg(short, long, default_value = "Makefile")]
        output: PathBuf,

        /// Compiler executable (CC)
        #[arg(long)]
        cc: Option<String>,

        /// Compiler and linker flags (CFLAGS)
        #[arg(long, allow_hyphen_values = true)]
        cflags: Option<String>,

        /// Archive name (TARGET)
        #[arg(long)]
        target: Option<String>,

        /// Fail when an include resolves to no known source
        #[arg(long)]
        strict: bool,

        /// Print the manifest instead of writing it
        #[arg(long)]
        stdout: bool,
    },

    /// Show each unit's dependencies, unresolved objects and include cycles
    Graph {
        /// Project directory containing src/ and include/
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Helper to format mkgen-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(core_err) = err.downcast_ref::<mkgen_core::Error>() {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else {
            err
        }
    };

    match cli.command {
        Commands::Generate {
            root,
            output,
            cc,
            cflags,
            target,
            strict,
            stdout,
        } => {
            let options = generate::Options {
                root,
                output,
                cc,
                cflags,
                target,
                strict,
                stdout,
            };
            generate::execute(options).map_err(format_error)?;
        }

        Commands::Graph { root, json } => {
            graph::execute(&root, json).map_err(format_error)?;
        }
    }

    Ok(())
}
