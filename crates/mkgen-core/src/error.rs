//! Error types for mkgen-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for mkgen-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating a manifest.
#[derive(Debug, Error)]
pub enum Error {
    /// Two distinct sources derived the same build identity.
    #[error("identity collision: {kind} {identity} is derived from both {first} and {second}")]
    IdentityCollision {
        kind: &'static str,
        identity: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    /// A test source with nothing before the test marker.
    #[error("test source {0} has an empty name")]
    EmptyTestName(PathBuf),

    /// An include resolved to an object no source produces (strict mode only).
    #[error("unresolved dependency: {source_path} depends on {object}, but no source produces it")]
    UnresolvedDependency { source_path: PathBuf, object: PathBuf },

    /// The configured source root does not exist.
    #[error("source root not found: {0}")]
    SourceRootMissing(PathBuf),

    /// Directory traversal failed.
    #[error("failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Render the error with a short recovery hint, if one applies.
    pub fn with_hint(&self) -> String {
        let hint = match self {
            Error::IdentityCollision { .. } => Some(
                "rename one of the sources; `a/b.c` and `a__b.c` flatten to the same \
                 object, and `a.test.c` cannot sit beside a test directory `a/`",
            ),
            Error::EmptyTestName(_) => Some("give the test source a name before `.test.c`"),
            Error::UnresolvedDependency { .. } => {
                Some("add the missing source or drop --strict to treat it as an external object")
            }
            Error::SourceRootMissing(_) => {
                Some("run from the project directory or pass --root <DIR>")
            }
            _ => None,
        };

        match hint {
            Some(hint) => format!("{self}\n  hint: {hint}"),
            None => self.to_string(),
        }
    }
}
