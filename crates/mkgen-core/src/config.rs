//! Generator configuration.
//!
//! Everything that the generator treats as fixed (directory layout,
//! toolchain names, flags) lives in one immutable struct that is passed
//! by reference into every component.

use std::path::{Path, PathBuf};

/// Directory layout convention of a project.
///
/// ```text
/// project/
/// ├── src/      # Implementation files (*.c, *.test.c)
/// ├── include/  # Public headers, flattened names
/// ├── lib/      # External headers and static libraries (reserved)
/// ├── bin/      # Object files
/// └── test/     # Test executables
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Root of the implementation files.
    pub src_root: PathBuf,
    /// Root of the internal public headers.
    pub include_root: PathBuf,
    /// Root of external headers and libraries. Not consulted yet.
    pub lib_root: PathBuf,
    /// Output directory for object files.
    pub bin_root: PathBuf,
    /// Output directory for test executables.
    pub test_root: PathBuf,
    /// Replaces directory separators when a relative path is flattened.
    pub joiner: String,
    /// Extension of implementation files, without the dot.
    pub source_ext: String,
    /// Extension of header files, without the dot.
    pub header_ext: String,
    /// Marker placed before the source extension to flag a test source.
    pub test_marker: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            src_root: PathBuf::from("src"),
            include_root: PathBuf::from("include"),
            lib_root: PathBuf::from("lib"),
            bin_root: PathBuf::from("bin"),
            test_root: PathBuf::from("test"),
            joiner: "__".to_string(),
            source_ext: "c".to_string(),
            header_ext: "h".to_string(),
            test_marker: ".test".to_string(),
        }
    }
}

impl Layout {
    /// File name suffix identifying a test source (e.g. `.test.c`).
    pub fn test_suffix(&self) -> String {
        format!("{}.{}", self.test_marker, self.source_ext)
    }
}

/// Toolchain declarations written into the manifest preamble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Compiler executable (`CC`).
    pub cc: String,
    /// Compiler and linker flags (`CFLAGS`).
    pub cflags: String,
    /// Archive output name (`TARGET`).
    pub archive: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            cc: "egcc".to_string(),
            // -Wall shows all warnings, -lpthread links pthread
            cflags: "-Wall -lpthread".to_string(),
            archive: "data_structures.a".to_string(),
        }
    }
}

/// Configuration for one generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Directory the layout is resolved against. Identifiers in the
    /// manifest are relative to it.
    pub project_root: PathBuf,

    /// Manifest location, relative to `project_root` unless absolute.
    pub output: PathBuf,

    /// Compiler, flags and archive name.
    pub toolchain: Toolchain,

    /// Directory layout convention.
    pub layout: Layout,

    /// Fail on includes that resolve to no known source instead of
    /// treating them as externally satisfied objects.
    pub strict: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            output: PathBuf::from("Makefile"),
            toolchain: Toolchain::default(),
            layout: Layout::default(),
            strict: false,
        }
    }
}

impl GeneratorConfig {
    /// Create a config rooted at a project directory.
    pub fn for_project(root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Absolute (or cwd-relative) location of the manifest.
    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output)
    }

    /// Resolve a project-relative identifier to a filesystem path.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}
