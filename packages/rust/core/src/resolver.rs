//! Target resolver: decides which configured targets a run emits.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use tracing::{debug, instrument};

use rulemerge_shared::{Result, RuleMergeError, TargetDefinition};

use crate::report::Reporter;

/// Where a candidate target name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOrigin {
    /// The `--formats` override list.
    Override,
    /// The configuration's default `formats` list.
    Config,
}

impl fmt::Display for TargetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Override => write!(f, "--formats"),
            Self::Config => write!(f, "config formats"),
        }
    }
}

/// A target that passed resolution, borrowed from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedTarget<'a> {
    pub name: &'a str,
    pub definition: &'a TargetDefinition,
}

/// Split a comma-separated override into trimmed, non-empty names.
///
/// Returns `None` when the override is absent or blank.
pub fn parse_override(raw: Option<&str>) -> Option<Vec<String>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
    )
}

/// Resolve the active targets.
///
/// Candidates come from the override when it is present and non-blank,
/// otherwise from `defaults`. Names without a definition are dropped with a
/// warning; repeats are dropped silently. The result is always sorted by
/// name. An empty result is [`RuleMergeError::NoTargets`].
#[instrument(level = "debug", skip_all, fields(override_list = override_list.unwrap_or("")))]
pub fn resolve_targets<'a>(
    defaults: &[String],
    definitions: &'a BTreeMap<String, TargetDefinition>,
    override_list: Option<&str>,
    reporter: &dyn Reporter,
) -> Result<Vec<SelectedTarget<'a>>> {
    let (candidates, origin) = match parse_override(override_list) {
        Some(names) => (names, TargetOrigin::Override),
        None => (defaults.to_vec(), TargetOrigin::Config),
    };

    let mut seen = HashSet::new();
    let mut selected = Vec::with_capacity(candidates.len());

    for name in &candidates {
        let Some((key, definition)) = definitions.get_key_value(name) else {
            reporter.warn(&format!(
                "Unknown format '{name}' in {origin}; skipping"
            ));
            continue;
        };
        if !seen.insert(key.as_str()) {
            debug!(name = %key, "duplicate format ignored");
            continue;
        }
        selected.push(SelectedTarget {
            name: key.as_str(),
            definition,
        });
    }

    if selected.is_empty() {
        return Err(RuleMergeError::NoTargets);
    }

    selected.sort_by(|a, b| a.name.cmp(b.name));

    debug!(
        ?origin,
        targets = ?selected.iter().map(|t| t.name).collect::<Vec<_>>(),
        "targets resolved"
    );
    Ok(selected)
}
