//! Write executor: materializes planned targets on disk.
//!
//! Existing files are only replaced in force mode or after an explicit "yes"
//! from the injected [`Confirm`]. Each file is written to a sibling temp file
//! and renamed into place, so a destination is either fully replaced or
//! untouched.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use rulemerge_shared::{ResolvedTarget, Result, RuleMergeError};

use crate::confirm::Confirm;
use crate::report::Reporter;

/// Run-wide write settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Replace existing files without asking.
    pub force: bool,
}

/// What happened to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Content was written to the destination.
    Written,
    /// The destination existed and overwrite was declined.
    Skipped,
    /// Writing failed; carries the cause.
    Failed(String),
}

/// Ensure `dir` exists as a directory, creating it and its parents.
///
/// Fails with [`RuleMergeError::NotADirectory`] when `dir` or one of its
/// ancestors is an existing non-directory.
pub fn ensure_directory(dir: &Path) -> Result<()> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => {
            return Err(RuleMergeError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }
        Err(_) => {}
    }

    if let Some(path) = blocking_ancestor(dir) {
        return Err(RuleMergeError::NotADirectory { path });
    }

    std::fs::create_dir_all(dir).map_err(|e| RuleMergeError::io(dir, e))?;

    debug!(path = %dir.display(), "directory created");
    Ok(())
}

/// Write one target's content.
///
/// Directory problems are fatal and returned as `Err`. Everything else is
/// reported and folded into the [`WriteOutcome`] so later targets still run.
#[instrument(level = "debug", skip_all, fields(target = %target.name, path = %target.output_path.display()))]
pub fn write_target(
    target: &ResolvedTarget,
    content: &str,
    options: WriteOptions,
    confirm: &dyn Confirm,
    reporter: &dyn Reporter,
) -> Result<WriteOutcome> {
    ensure_directory(&target.output_directory)?;

    let path = &target.output_path;
    if entry_exists(path) && !options.force {
        let question = format!("{} already exists. Overwrite?", path.display());
        if !confirm.confirm(&question) {
            reporter.info(&format!(
                "Skipped {}: {} already exists",
                target.name,
                path.display()
            ));
            return Ok(WriteOutcome::Skipped);
        }
    }

    match replace_file(&write_destination(path), content) {
        Ok(()) => {
            reporter.info(&format!("Wrote {} -> {}", target.name, path.display()));
            Ok(WriteOutcome::Written)
        }
        Err(e) => {
            reporter.warn(&format!("Failed to write {}: {e}", target.name));
            Ok(WriteOutcome::Failed(e.to_string()))
        }
    }
}

/// Replace `path` with `content` via a temp file and rename.
fn replace_file(path: &Path, content: &str) -> Result<()> {
    let temp = temp_path(path);

    std::fs::write(&temp, content).map_err(|e| RuleMergeError::io(&temp, e))?;

    if let Err(e) = std::fs::rename(&temp, path) {
        let _ = std::fs::remove_file(&temp);
        return Err(RuleMergeError::io(path, e));
    }

    debug!(path = %path.display(), size = content.len(), "wrote file");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.rulemerge.tmp"))
}

/// Whether anything occupies `path`, including a dangling symlink.
fn entry_exists(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

/// The file actually written for `path`.
///
/// A symlink is written through so the link survives; a dangling link
/// resolves to the file it names.
fn write_destination(path: &Path) -> PathBuf {
    let is_link = std::fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink());
    if !is_link {
        return path.to_path_buf();
    }
    if let Ok(real) = std::fs::canonicalize(path) {
        return real;
    }
    match (std::fs::read_link(path), path.parent()) {
        (Ok(link), Some(parent)) => parent.join(link),
        _ => path.to_path_buf(),
    }
}

/// First existing ancestor of `dir` (including itself) that is not a directory.
fn blocking_ancestor(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .find(|p| std::fs::metadata(p).is_ok_and(|m| !m.is_dir()))
        .map(Path::to_path_buf)
}
