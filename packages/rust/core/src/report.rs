//! User-visible reporting capability.
//!
//! Every skip, drop, or warning in a run produces exactly one human-readable
//! line through a [`Reporter`]. Components receive the reporter explicitly;
//! there is no global logging switch.

use std::sync::Mutex;

/// Severity of a reported line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Sink for user-visible status lines.
pub trait Reporter: Send + Sync {
    /// Expected, noteworthy events (e.g. an existing file left in place).
    fn info(&self, message: &str);
    /// Recoverable anomalies (e.g. an unknown target name was dropped).
    fn warn(&self, message: &str);
    /// Run-aborting failures.
    fn error(&self, message: &str);
}

/// No-op reporter for headless/test usage.
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Forwards every line to `tracing` at the matching level.
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Keeps every reported line in memory.
#[derive(Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<(Level, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded lines, in order.
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Recorded messages at `level`.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn push(&self, level: Level, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, message.to_string()));
        }
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_reporter_keeps_order_and_level() {
        let reporter = RecordingReporter::new();
        reporter.info("one");
        reporter.warn("two");
        reporter.error("three");
        reporter.warn("four");

        assert_eq!(reporter.lines().len(), 4);
        assert_eq!(reporter.messages(Level::Warn), vec!["two", "four"]);
        assert_eq!(reporter.messages(Level::Error), vec!["three"]);
    }
}
