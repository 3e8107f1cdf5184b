//! Build identity derivation.
//!
//! Every source file maps to a flattened object path under the bin root
//! and a flattened header path under the include root:
//!
//! ```text
//! src/stack.c            -> bin/stack.o            include/stack.h
//! src/dict/probe.c       -> bin/dict__probe.o      include/dict__probe.h
//! src/stack.test.c       -> bin/stack.test.o       test/stack
//! ```
//!
//! The mapping is pure: no function here touches the filesystem.

use std::path::{Component, Path, PathBuf};

use crate::config::Layout;

/// Derives object, header and test-target paths from the layout.
#[derive(Debug, Clone, Copy)]
pub struct PathMapper<'a> {
    layout: &'a Layout,
}

impl<'a> PathMapper<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    /// Object file produced from a source file.
    pub fn object_path(&self, source: &Path) -> PathBuf {
        self.flatten(source, &self.layout.src_root, &self.layout.bin_root, "o")
    }

    /// Public header paired with a source file. May not exist on disk.
    pub fn header_path(&self, source: &Path) -> PathBuf {
        self.flatten(
            source,
            &self.layout.src_root,
            &self.layout.include_root,
            &self.layout.header_ext,
        )
    }

    /// Object file whose public header is `header`.
    ///
    /// Headers outside the include root keep their whole path in the
    /// flattened name, so `src/local.h` maps to `bin/src__local.o`.
    pub fn object_path_from_header(&self, header: &Path) -> PathBuf {
        self.flatten(header, &self.layout.include_root, &self.layout.bin_root, "o")
    }

    /// Whether the file name carries the test marker before the extension.
    pub fn is_test_source(&self, source: &Path) -> bool {
        source
            .file_name()
            .map(|name| name.to_string_lossy().ends_with(&self.layout.test_suffix()))
            .unwrap_or(false)
    }

    /// Test executable built from a test source, `None` for regular sources
    /// and for a test source with nothing before the marker.
    ///
    /// Directories below the source root are kept, only the marker and
    /// extension are dropped: `src/dict/probe.test.c` -> `test/dict/probe`.
    pub fn test_target(&self, source: &Path) -> Option<PathBuf> {
        if !self.is_test_source(source) {
            return None;
        }
        let file_name = source.file_name()?.to_string_lossy();
        let name = file_name.strip_suffix(&self.layout.test_suffix())?;
        if name.is_empty() {
            return None;
        }

        let relative = source.strip_prefix(&self.layout.src_root).unwrap_or(source);
        let target = match relative.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        };
        Some(self.layout.test_root.join(target))
    }

    fn flatten(&self, path: &Path, root: &Path, out_root: &Path, ext: &str) -> PathBuf {
        let relative = path.strip_prefix(root).unwrap_or(path).with_extension("");
        let name = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy()),
                Component::ParentDir => Some("..".into()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(self.layout.joiner.as_str());

        out_root.join(format!("{name}.{ext}"))
    }
}
