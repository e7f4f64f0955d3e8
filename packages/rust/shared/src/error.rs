//! Error types for rulemerge.
//!
//! Library crates use [`RuleMergeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all fatal, run-aborting conditions.
///
/// Per-item problems (an unreadable source file, a single failed write) are
/// not errors at this level; they are reported and recorded by the stage
/// that owns them.
#[derive(Debug, thiserror::Error)]
pub enum RuleMergeError {
    /// Configuration loading or shape validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Target resolution produced an empty list.
    #[error("no formats to output")]
    NoTargets,

    /// The source directory held no usable Markdown files.
    #[error("no sources found in {dir:?}")]
    NoSources { dir: PathBuf },

    /// An output directory path is occupied by something that is not a directory.
    #[error("cannot create directory {path:?}: a non-directory entry exists at that path")]
    NotADirectory { path: PathBuf },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RuleMergeError>;

impl RuleMergeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = RuleMergeError::config("`formats` must be an array");
        assert_eq!(err.to_string(), "config error: `formats` must be an array");

        assert_eq!(RuleMergeError::NoTargets.to_string(), "no formats to output");

        let err = RuleMergeError::NoSources {
            dir: PathBuf::from("rules"),
        };
        assert!(err.to_string().contains("no sources"));
        assert!(err.to_string().contains("rules"));
    }

    #[test]
    fn io_error_keeps_path() {
        let err = RuleMergeError::io(
            "/tmp/missing.md",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing.md"));
        assert!(msg.contains("gone"));
    }
}
