//! Yes/no confirmation capability used before overwriting a file.
//!
//! The default answer is always "no": an environment that cannot ask never
//! causes a silent overwrite.

use std::collections::VecDeque;
use std::sync::Mutex;

/// Asks a yes/no question.
pub trait Confirm: Send + Sync {
    /// Returns `true` only on an explicit "yes".
    fn confirm(&self, question: &str) -> bool;
}

/// Declines every question. Used for non-interactive execution.
pub struct Decline;

impl Confirm for Decline {
    fn confirm(&self, _question: &str) -> bool {
        false
    }
}

/// Answers from a fixed script, then declines once the script runs out.
#[derive(Default)]
pub struct ScriptedConfirm {
    answers: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Questions asked so far.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, question: &str) -> bool {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(question.to_string());
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .unwrap_or(false)
    }
}
