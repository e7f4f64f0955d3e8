//! End-to-end run: resolve targets → scan → merge → plan → write.

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info, instrument};

use rulemerge_shared::{AppConfig, Result, RuleMergeError, RunSummary};

use crate::confirm::Confirm;
use crate::merge::merge_sources;
use crate::planner::plan_targets;
use crate::report::Reporter;
use crate::resolver::resolve_targets;
use crate::scanner::scan_sources;
use crate::writer::{WriteOptions, WriteOutcome, write_target};

/// Inputs for one run, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Directory holding the Markdown sources.
    pub source_dir: PathBuf,
    /// Root under which every target is written.
    pub dest_dir: PathBuf,
    /// Comma-separated target names replacing the configured defaults.
    pub formats: Option<String>,
    /// Force-overwrite requested on the command line.
    pub overwrite: bool,
}

/// Stages of a run. A fatal error in any stage moves straight to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Idle,
    ConfigResolved,
    TargetsResolved,
    SourcesScanned,
    Merged,
    Writing,
    Done,
    Failed,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ConfigResolved => "config resolved",
            Self::TargetsResolved => "targets resolved",
            Self::SourcesScanned => "sources scanned",
            Self::Merged => "merged",
            Self::Writing => "writing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks the current stage and logs transitions.
struct StageTracker {
    stage: RunStage,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            stage: RunStage::Idle,
        }
    }

    fn advance(&mut self, next: RunStage) {
        debug!(from = %self.stage, to = %next, "stage transition");
        self.stage = next;
    }

    /// Move to `Failed`, report the error, and hand it back.
    fn fail(&mut self, err: RuleMergeError, reporter: &dyn Reporter) -> RuleMergeError {
        debug!(from = %self.stage, "run failed");
        self.stage = RunStage::Failed;
        reporter.error(&err.to_string());
        err
    }
}

/// Run the full pipeline for one invocation.
///
/// 1. Resolve targets from the override or the configured defaults
/// 2. Scan the source directory
/// 3. Merge sources into one document
/// 4. Plan every target's location and content
/// 5. Write each target, independently
///
/// Returns `Err` for fatal conditions (no targets, no usable sources,
/// directory collisions, scan failures). Per-target failures are counted in
/// the summary; callers treat `files_written == 0` as a failed run.
#[instrument(level = "debug", skip_all, fields(src = %options.source_dir.display(), dest = %options.dest_dir.display()))]
pub fn run(
    config: &AppConfig,
    options: &RunOptions,
    reporter: &dyn Reporter,
    confirm: &dyn Confirm,
) -> Result<RunSummary> {
    let mut tracker = StageTracker::new();
    tracker.advance(RunStage::ConfigResolved);

    // --- Targets ---
    let selected = resolve_targets(
        &config.formats,
        &config.formats_dict,
        options.formats.as_deref(),
        reporter,
    )
    .map_err(|e| tracker.fail(e, reporter))?;
    tracker.advance(RunStage::TargetsResolved);

    // --- Sources ---
    let sources = scan_sources(&options.source_dir).map_err(|e| tracker.fail(e, reporter))?;
    if sources.is_empty() {
        return Err(tracker.fail(
            RuleMergeError::NoSources {
                dir: options.source_dir.clone(),
            },
            reporter,
        ));
    }
    tracker.advance(RunStage::SourcesScanned);

    // --- Merge ---
    let merged = merge_sources(&sources, reporter);
    if !merged.has_content() {
        return Err(tracker.fail(
            RuleMergeError::NoSources {
                dir: options.source_dir.clone(),
            },
            reporter,
        ));
    }
    tracker.advance(RunStage::Merged);

    info!(
        targets = selected.len(),
        sources = merged.sources.len(),
        skipped = merged.skipped.len(),
        "merged sources"
    );

    // --- Write ---
    tracker.advance(RunStage::Writing);
    let write_options = WriteOptions {
        force: options.overwrite || config.overwrite,
    };
    let planned = plan_targets(&options.dest_dir, &selected);

    let mut summary = RunSummary {
        targets_requested: planned.len(),
        ..Default::default()
    };

    for target in &planned {
        let content = target.transform.apply(&merged.text);
        let outcome = write_target(target, &content, write_options, confirm, reporter)
            .map_err(|e| tracker.fail(e, reporter))?;
        match outcome {
            WriteOutcome::Written => summary.files_written += 1,
            WriteOutcome::Skipped => summary.files_skipped += 1,
            WriteOutcome::Failed(_) => summary.files_failed += 1,
        }
    }

    tracker.advance(RunStage::Done);
    debug!(?summary, "run complete");
    Ok(summary)
}
