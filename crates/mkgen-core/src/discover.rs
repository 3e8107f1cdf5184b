//! Source discovery.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};

/// Find every implementation file under the source root, recursively.
///
/// Returned paths are relative to the project root and sorted, so the
/// result does not depend on directory enumeration order.
pub fn discover_sources(config: &GeneratorConfig) -> Result<Vec<PathBuf>> {
    let src_root = config.resolve(&config.layout.src_root);
    if !src_root.is_dir() {
        return Err(Error::SourceRootMissing(src_root));
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(&src_root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || !has_extension(entry.path(), &config.layout.source_ext) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(&config.project_root)
            .unwrap_or(entry.path());
        sources.push(relative.to_path_buf());
    }

    sources.sort();
    tracing::debug!(
        "discovered {} sources under {}",
        sources.len(),
        src_root.display()
    );
    Ok(sources)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}
