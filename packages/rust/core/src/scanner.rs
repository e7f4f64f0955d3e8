//! Source scanner: lists the Markdown files of a directory in merge order.

use std::cmp::Ordering;
use std::path::Path;

use tracing::{debug, instrument};

use rulemerge_shared::{Result, RuleMergeError, SourceFile};

/// List `*.md` files (case-insensitive extension) directly inside `dir`.
///
/// A missing directory yields an empty list; the caller decides whether
/// that is fatal. Any other filesystem error is returned.
///
/// Files are ordered by [`compare_basenames`], never by enumeration order.
#[instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
pub fn scan_sources(dir: &Path) -> Result<Vec<SourceFile>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("source directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(RuleMergeError::io(dir, e)),
    };

    let mut sources = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RuleMergeError::io(dir, e))?;
        let path = entry.path();
        let basename = entry.file_name().to_string_lossy().into_owned();

        if !is_markdown(&basename) || !path.is_file() {
            continue;
        }

        sources.push(SourceFile { path, basename });
    }

    sources.sort_by(|a, b| compare_basenames(&a.basename, &b.basename));

    debug!(count = sources.len(), "scanned sources");
    Ok(sources)
}

/// Alphabetical order that ignores case, with byte order as the tie-breaker.
///
/// Deterministic and independent of the process locale.
pub fn compare_basenames(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn is_markdown(name: &str) -> bool {
    name.len() >= 3
        && name
            .get(name.len() - 3..)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(".md"))
}
