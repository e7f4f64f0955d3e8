//! Core domain types for a single merge-and-fan-out run.
//!
//! Every value here lives for one run only; nothing is persisted or cached.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// A Markdown file found in the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Full path to the file.
    pub path: PathBuf,
    /// File name without any directory component (e.g. `a.md`).
    pub basename: String,
}

/// Why a source file did not contribute to the merged document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The file was empty after trimming surrounding whitespace.
    Empty,
    /// The file could not be read; carries the underlying cause.
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "file is empty"),
            Self::Unreadable(cause) => write!(f, "failed to read: {cause}"),
        }
    }
}

/// A source file left out of the merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    pub basename: String,
    pub reason: SkipReason,
}

/// The concatenation of every non-empty source, with provenance markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedDocument {
    /// Final text; always ends with exactly one trailing newline.
    pub text: String,
    /// Basenames that contributed an entry, in merge order.
    pub sources: Vec<String>,
    /// Files that were skipped, in the order they were encountered.
    pub skipped: Vec<SkippedSource>,
}

impl MergedDocument {
    /// Whether at least one source file contributed content.
    pub fn has_content(&self) -> bool {
        !self.sources.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// Declarative description of one output target, read from configuration.
///
/// `filename` takes absolute precedence; `subpath`/`file_name` are only
/// consulted when it is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDefinition {
    /// Path relative to the destination root, may include subdirectories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Subdirectory under the destination root (fallback layout).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subpath: Option<String>,
    /// File name inside `subpath`; defaults to `<target-name>.md`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Text inserted before the merged document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepend: Option<String>,
}

/// How the merged text is turned into a target's final content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentTransform {
    /// Write the merged text unchanged.
    Identity,
    /// Write the (already trimmed) prefix, a blank line, then the merged text.
    Prepend(String),
}

impl ContentTransform {
    /// Produce the final file content for `merged`.
    pub fn apply(&self, merged: &str) -> String {
        match self {
            Self::Identity => merged.to_string(),
            Self::Prepend(prefix) => format!("{prefix}\n\n{merged}"),
        }
    }
}

/// A target ready to be written: where it goes and how its content is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub name: String,
    pub output_directory: PathBuf,
    pub output_path: PathBuf,
    pub transform: ContentTransform,
}

// ---------------------------------------------------------------------------
// RunSummary
// ---------------------------------------------------------------------------

/// Terminal result of one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of targets that survived resolution.
    pub targets_requested: usize,
    pub files_written: usize,
    /// Existing destinations left untouched because overwrite was declined.
    pub files_skipped: usize,
    pub files_failed: usize,
}

impl RunSummary {
    /// A run succeeds only if it wrote at least one file.
    pub fn is_success(&self) -> bool {
        self.files_written > 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} of {} output(s)",
            self.files_written, self.targets_requested
        )?;
        if self.files_skipped > 0 {
            write!(f, ", {} skipped", self.files_skipped)?;
        }
        if self.files_failed > 0 {
            write!(f, ", {} failed", self.files_failed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_returns_input() {
        assert_eq!(ContentTransform::Identity.apply("body\n"), "body\n");
    }

    #[test]
    fn prepend_transform_inserts_blank_line() {
        let t = ContentTransform::Prepend("---\nx: 1\n---".into());
        assert_eq!(t.apply("body\n"), "---\nx: 1\n---\n\nbody\n");
    }

    #[test]
    fn summary_success_requires_a_write() {
        let mut summary = RunSummary {
            targets_requested: 2,
            ..Default::default()
        };
        assert!(!summary.is_success());
        summary.files_written = 1;
        assert!(summary.is_success());
    }

    #[test]
    fn summary_display() {
        let summary = RunSummary {
            targets_requested: 3,
            files_written: 1,
            files_skipped: 1,
            files_failed: 1,
        };
        assert_eq!(
            summary.to_string(),
            "Wrote 1 of 3 output(s), 1 skipped, 1 failed"
        );

        let clean = RunSummary {
            targets_requested: 2,
            files_written: 2,
            ..Default::default()
        };
        assert_eq!(clean.to_string(), "Wrote 2 of 2 output(s)");
    }

    #[test]
    fn target_definition_deserializes_partial() {
        let def: TargetDefinition =
            serde_json::from_str(r#"{"filename": ".cursor/rules/a.mdc"}"#).unwrap();
        assert_eq!(def.filename.as_deref(), Some(".cursor/rules/a.mdc"));
        assert!(def.subpath.is_none());
        assert!(def.prepend.is_none());
    }
}
