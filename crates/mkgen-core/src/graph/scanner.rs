//! Quoted include extraction.
//!
//! Only project-local includes participate in the dependency graph:
//! a line must start with `#include "..."`. Angle-bracket includes and
//! indented or commented directives are ignored.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;

static INCLUDE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^#include "(?P<header_path>.*)""#).expect("include pattern is valid")
});

/// Scan a file for quoted includes, resolved against the file's directory.
///
/// `path` is relative to `project_root`, and so are the returned headers.
/// A missing file yields an empty set.
pub fn scan_includes(project_root: &Path, path: &Path) -> Result<BTreeSet<PathBuf>> {
    let source = match fs::read(project_root.join(path)) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(e) => return Err(e.into()),
    };

    let dir = path.parent().unwrap_or(Path::new(""));
    Ok(parse_includes(&source, dir))
}

/// Extract quoted includes from source text, resolved against `dir`.
pub fn parse_includes(source: &str, dir: &Path) -> BTreeSet<PathBuf> {
    source
        .lines()
        .filter_map(|line| INCLUDE_PATTERN.captures(line))
        .filter_map(|caps| caps.name("header_path"))
        .map(|m| normalize(&dir.join(m.as_str())))
        .collect()
}

/// Lexically collapse `.` and `..` segments.
///
/// Does not consult the filesystem, so symlinks are not resolved. A `..`
/// that would climb above a relative path's start is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
