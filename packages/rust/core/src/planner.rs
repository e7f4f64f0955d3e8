//! Output planner: where each target is written and how its content is built.
//!
//! Pure; never touches the filesystem.

use std::path::{Component, Path, PathBuf};

use rulemerge_shared::{ContentTransform, ResolvedTarget, TargetDefinition};

use crate::resolver::SelectedTarget;

/// Destination directory and file for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    pub directory: PathBuf,
    pub path: PathBuf,
}

/// Compute the output location of target `name` under `root`.
///
/// `filename` wins outright when set: `subpath`/`file_name` are not looked
/// at. Otherwise the file is `root/subpath/file_name`, with `file_name`
/// defaulting to `<name>.md`.
pub fn plan_location(root: &Path, name: &str, definition: &TargetDefinition) -> OutputLocation {
    if let Some(filename) = non_empty(definition.filename.as_deref()) {
        let path = join_relative(root, filename);
        let directory = match path.parent() {
            Some(parent) if parent.starts_with(root) => parent.to_path_buf(),
            _ => root.to_path_buf(),
        };
        return OutputLocation { directory, path };
    }

    let directory = match non_empty(definition.subpath.as_deref()) {
        Some(subpath) => join_relative(root, subpath),
        None => root.to_path_buf(),
    };
    let path = match non_empty(definition.file_name.as_deref()) {
        Some(file_name) => join_relative(&directory, file_name),
        None => directory.join(format!("{name}.md")),
    };
    OutputLocation { directory, path }
}

/// Build the content transform for a definition.
///
/// A `prepend` that is missing, empty, or whitespace-only means no change.
pub fn content_transform(definition: &TargetDefinition) -> ContentTransform {
    match definition.prepend.as_deref().map(str::trim) {
        Some(prefix) if !prefix.is_empty() => ContentTransform::Prepend(prefix.to_string()),
        _ => ContentTransform::Identity,
    }
}

/// Plan a single resolved target.
pub fn plan_target(root: &Path, target: &SelectedTarget<'_>) -> ResolvedTarget {
    let location = plan_location(root, target.name, target.definition);
    ResolvedTarget {
        name: target.name.to_string(),
        output_directory: location.directory,
        output_path: location.path,
        transform: content_transform(target.definition),
    }
}

/// Plan every target, preserving order.
pub fn plan_targets(root: &Path, targets: &[SelectedTarget<'_>]) -> Vec<ResolvedTarget> {
    targets.iter().map(|t| plan_target(root, t)).collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Append `relative` to `base` component by component.
///
/// Leading root or drive prefixes are dropped, so a configured path such as
/// `/rules.md` still lands inside `base`.
fn join_relative(base: &Path, relative: &str) -> PathBuf {
    let mut out = base.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::ParentDir => out.push(".."),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def() -> TargetDefinition {
        TargetDefinition::default()
    }

    #[test]
    fn filename_with_subdirectories() {
        let d = TargetDefinition {
            filename: Some(".cursor/rules/copy-agent-rule.mdc".into()),
            ..def()
        };
        let loc = plan_location(Path::new("/dest"), "cursor", &d);
        assert_eq!(loc.path, PathBuf::from("/dest/.cursor/rules/copy-agent-rule.mdc"));
        assert_eq!(loc.directory, PathBuf::from("/dest/.cursor/rules"));
    }

    #[test]
    fn bare_filename_uses_root_directory() {
        let d = TargetDefinition {
            filename: Some("codex.md".into()),
            ..def()
        };
        let loc = plan_location(Path::new("/dest"), "codex", &d);
        assert_eq!(loc.path, PathBuf::from("/dest/codex.md"));
        assert_eq!(loc.directory, PathBuf::from("/dest"));
    }

    #[test]
    fn filename_ignores_subpath_and_file_name() {
        let d = TargetDefinition {
            filename: Some("AGENTS.md".into()),
            subpath: Some("nested".into()),
            file_name: Some("other.md".into()),
            ..def()
        };
        let loc = plan_location(Path::new("/dest"), "agents", &d);
        assert_eq!(loc.path, PathBuf::from("/dest/AGENTS.md"));
        assert_eq!(loc.directory, PathBuf::from("/dest"));
    }

    #[test]
    fn subpath_and_file_name() {
        let d = TargetDefinition {
            subpath: Some(".codex".into()),
            file_name: Some("AGENTS.md".into()),
            ..def()
        };
        let loc = plan_location(Path::new("/dest"), "codex", &d);
        assert_eq!(loc.directory, PathBuf::from("/dest/.codex"));
        assert_eq!(loc.path, PathBuf::from("/dest/.codex/AGENTS.md"));
    }

    #[test]
    fn default_file_name_from_target_name() {
        let loc = plan_location(Path::new("/dest"), "codex", &def());
        assert_eq!(loc.directory, PathBuf::from("/dest"));
        assert_eq!(loc.path, PathBuf::from("/dest/codex.md"));

        let d = TargetDefinition {
            subpath: Some(".windsurf/rules".into()),
            ..def()
        };
        let loc = plan_location(Path::new("/dest"), "windsurf", &d);
        assert_eq!(loc.path, PathBuf::from("/dest/.windsurf/rules/windsurf.md"));
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let d = TargetDefinition {
            filename: Some(String::new()),
            subpath: Some(String::new()),
            file_name: Some(String::new()),
            ..def()
        };
        let loc = plan_location(Path::new("/dest"), "codex", &d);
        assert_eq!(loc.directory, PathBuf::from("/dest"));
        assert_eq!(loc.path, PathBuf::from("/dest/codex.md"));
    }

    #[test]
    fn absolute_filename_stays_under_root() {
        let d = TargetDefinition {
            filename: Some("/rules.md".into()),
            ..def()
        };
        let loc = plan_location(Path::new("/dest"), "x", &d);
        assert_eq!(loc.path, PathBuf::from("/dest/rules.md"));
    }

    #[test]
    fn prepend_is_trimmed() {
        let d = TargetDefinition {
            prepend: Some("\n---\nalwaysApply: true\n---\n\n".into()),
            ..def()
        };
        assert_eq!(
            content_transform(&d),
            ContentTransform::Prepend("---\nalwaysApply: true\n---".into())
        );
        assert_eq!(
            content_transform(&d).apply("body\n"),
            "---\nalwaysApply: true\n---\n\nbody\n"
        );
    }

    #[test]
    fn blank_prepend_is_identity() {
        for prepend in [None, Some(String::new()), Some("  \n\t ".to_string())] {
            let d = TargetDefinition { prepend, ..def() };
            assert_eq!(content_transform(&d), ContentTransform::Identity);
            assert_eq!(content_transform(&d).apply("body\n"), "body\n");
        }
    }

    #[test]
    fn plan_target_combines_location_and_transform() {
        let d = TargetDefinition {
            filename: Some("codex.md".into()),
            prepend: Some("# Header".into()),
            ..def()
        };
        let selected = SelectedTarget {
            name: "codex",
            definition: &d,
        };
        let planned = plan_target(Path::new("/dest"), &selected);
        assert_eq!(planned.name, "codex");
        assert_eq!(planned.output_path, PathBuf::from("/dest/codex.md"));
        assert_eq!(planned.transform, ContentTransform::Prepend("# Header".into()));
    }
}
