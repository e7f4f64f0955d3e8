//! Merge engine: folds source files into one document with provenance markers.
//!
//! Output layout:
//! ```text
//! <!-- source: a.md -->
//!
//! <trimmed a.md>
//!
//! <!-- source: b.md -->
//!
//! <trimmed b.md>
//! ```
//! followed by exactly one trailing newline.

use tracing::{debug, instrument};

use rulemerge_shared::{MergedDocument, SkipReason, SkippedSource, SourceFile};

use crate::report::Reporter;

/// Provenance marker placed before each merged entry.
pub fn provenance_marker(basename: &str) -> String {
    format!("<!-- source: {basename} -->")
}

/// Merge `sources` in the order given.
///
/// Unreadable and empty (after trimming) files are skipped with a warning;
/// neither aborts the merge nor changes the order of later entries. Each
/// file is read exactly once.
#[instrument(level = "debug", skip_all, fields(sources = sources.len()))]
pub fn merge_sources(sources: &[SourceFile], reporter: &dyn Reporter) -> MergedDocument {
    let mut entries: Vec<String> = Vec::with_capacity(sources.len());
    let mut merged = MergedDocument::default();

    for source in sources {
        let trimmed = match std::fs::read_to_string(&source.path) {
            Ok(content) if content.trim().is_empty() => Err(SkipReason::Empty),
            Ok(content) => Ok(content.trim().to_string()),
            Err(e) => Err(SkipReason::Unreadable(e.to_string())),
        };

        match trimmed {
            Ok(body) => {
                entries.push(format!("{}\n\n{body}", provenance_marker(&source.basename)));
                merged.sources.push(source.basename.clone());
            }
            Err(reason) => {
                reporter.warn(&format!("Skipping {}: {reason}", source.basename));
                merged.skipped.push(SkippedSource {
                    basename: source.basename.clone(),
                    reason,
                });
            }
        }
    }

    let mut text = entries.join("\n\n");
    text.push('\n');
    merged.text = text;

    debug!(
        merged = merged.sources.len(),
        skipped = merged.skipped.len(),
        len = merged.text.len(),
        "merge complete"
    );

    merged
}
