//! Application configuration for rulemerge.
//!
//! The configuration names the known output targets (`formats_dict`), the
//! default target order (`formats`) and the run-wide `overwrite` default.
//! It is loaded from one well-defined source, shape-checked, and then handed
//! to the pipeline as an immutable value.
//!
//! Lookup order: explicit `--config` path, `./rulemerge.toml`,
//! `~/.rulemerge/rulemerge.toml`, then the embedded defaults.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, RuleMergeError};
use crate::types::TargetDefinition;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "rulemerge.toml";

/// Config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".rulemerge";

/// Configuration compiled into the binary, used when no file is found.
const EMBEDDED_CONFIG: &str = include_str!("default_config.toml");

const TARGET_FIELDS: [&str; 4] = ["filename", "subpath", "file_name", "prepend"];

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Top-level application config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Overwrite existing outputs without asking.
    #[serde(default)]
    pub overwrite: bool,

    /// Default target names, in configured order.
    pub formats: Vec<String>,

    /// Every known target, keyed by name.
    pub formats_dict: BTreeMap<String, TargetDefinition>,
}

impl AppConfig {
    /// The configuration shipped with the binary.
    pub fn embedded() -> Result<Self> {
        parse_config(EMBEDDED_CONFIG, ConfigFormat::Toml, "<embedded>")
    }

    /// Known target names, sorted.
    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.formats_dict.keys().map(String::as_str)
    }

    /// Whether `name` is part of the default target list.
    pub fn is_default(&self, name: &str) -> bool {
        self.formats.iter().any(|f| f == name)
    }
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Passed with `--config`.
    Explicit(PathBuf),
    /// `rulemerge.toml` in the working directory.
    WorkingDir(PathBuf),
    /// `~/.rulemerge/rulemerge.toml`.
    User(PathBuf),
    /// Compiled-in defaults.
    Embedded,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) | Self::WorkingDir(p) | Self::User(p) => {
                write!(f, "{}", p.display())
            }
            Self::Embedded => write!(f, "built-in defaults"),
        }
    }
}

/// A validated configuration together with its origin.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub source: ConfigSource,
}

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// `.json` files are JSON; everything else is read as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the user config directory (`~/.rulemerge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| RuleMergeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Resolve and load the active configuration.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let cwd = std::env::current_dir().map_err(|e| RuleMergeError::io(".", e))?;
    let user_dir = config_dir().ok();
    load_config_in(explicit, &cwd, user_dir.as_deref())
}

/// Resolve the configuration relative to explicit working and user directories.
pub fn load_config_in(
    explicit: Option<&Path>,
    cwd: &Path,
    user_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(RuleMergeError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        return Ok(LoadedConfig {
            config: load_config_from(path)?,
            source: ConfigSource::Explicit(path.to_path_buf()),
        });
    }

    let local = cwd.join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Ok(LoadedConfig {
            config: load_config_from(&local)?,
            source: ConfigSource::WorkingDir(local),
        });
    }

    if let Some(dir) = user_dir {
        let user = dir.join(CONFIG_FILE_NAME);
        if user.is_file() {
            return Ok(LoadedConfig {
                config: load_config_from(&user)?,
                source: ConfigSource::User(user),
            });
        }
    }

    tracing::debug!("no config file found, using built-in defaults");
    Ok(LoadedConfig {
        config: AppConfig::embedded()?,
        source: ConfigSource::Embedded,
    })
}

/// Load and validate the configuration from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| RuleMergeError::io(path, e))?;
    let origin = path.display().to_string();
    let config = parse_config(&content, ConfigFormat::from_path(path), &origin)?;
    tracing::debug!(path = %origin, targets = config.formats_dict.len(), "loaded config");
    Ok(config)
}

/// Parse configuration text, check its shape, and deserialize it.
pub fn parse_config(content: &str, format: ConfigFormat, origin: &str) -> Result<AppConfig> {
    let value: Value = match format {
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| {
            RuleMergeError::config(format!("failed to parse {origin}: {e}"))
        })?,
        ConfigFormat::Toml => {
            let table: toml::Value = toml::from_str(content).map_err(|e| {
                RuleMergeError::config(format!("failed to parse {origin}: {e}"))
            })?;
            serde_json::to_value(table).map_err(|e| {
                RuleMergeError::config(format!("failed to read {origin}: {e}"))
            })?
        }
    };

    validate_shape(&value, origin)?;

    serde_json::from_value(value)
        .map_err(|e| RuleMergeError::config(format!("invalid configuration in {origin}: {e}")))
}

/// Check the raw configuration against the expected shape.
///
/// `formats` must be an array of strings and `formats_dict` a mapping of
/// target names to mappings with optional string fields.
pub fn validate_shape(value: &Value, origin: &str) -> Result<()> {
    let invalid = |msg: String| RuleMergeError::config(format!("{origin}: {msg}"));

    let root = value
        .as_object()
        .ok_or_else(|| invalid("configuration must be a mapping".into()))?;

    if let Some(overwrite) = root.get("overwrite") {
        if !overwrite.is_boolean() {
            return Err(invalid("`overwrite` must be a boolean".into()));
        }
    }

    let formats = root
        .get("formats")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("`formats` must be an array".into()))?;
    if let Some(pos) = formats.iter().position(|f| !f.is_string()) {
        return Err(invalid(format!("`formats[{pos}]` must be a string")));
    }

    let dict = root
        .get("formats_dict")
        .and_then(Value::as_object)
        .ok_or_else(|| invalid("`formats_dict` must be a mapping".into()))?;

    for (name, def) in dict {
        let fields = def
            .as_object()
            .ok_or_else(|| invalid(format!("`formats_dict.{name}` must be a mapping")))?;
        for field in TARGET_FIELDS {
            if let Some(v) = fields.get(field) {
                if !v.is_string() {
                    return Err(invalid(format!(
                        "`formats_dict.{name}.{field}` must be a string"
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "rm-config-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn embedded_config_is_valid() {
        let config = AppConfig::embedded().expect("embedded config parses");
        assert!(!config.formats.is_empty());
        for name in &config.formats {
            assert!(
                config.formats_dict.contains_key(name),
                "default format {name} has no definition"
            );
        }
        assert!(!config.overwrite);
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::embedded().unwrap();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed = parse_config(&toml_str, ConfigFormat::Toml, "roundtrip").expect("parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn parses_toml_targets() {
        let toml_str = r#"
formats = ["codex", "cursor"]

[formats_dict.codex]
filename = "codex.md"

[formats_dict.cursor]
filename = ".cursor/rules/copy-agent-rule.mdc"
prepend = "---\nalwaysApply: true\n---"
"#;
        let config = parse_config(toml_str, ConfigFormat::Toml, "test").expect("parse");
        assert_eq!(config.formats, vec!["codex", "cursor"]);
        assert!(!config.overwrite);
        assert_eq!(
            config.formats_dict["cursor"].filename.as_deref(),
            Some(".cursor/rules/copy-agent-rule.mdc")
        );
        assert!(config.is_default("codex"));
        assert!(!config.is_default("claude"));
    }

    #[test]
    fn parses_json_targets() {
        let json = r#"{
            "overwrite": true,
            "formats": ["codex"],
            "formats_dict": { "codex": { "subpath": "out", "file_name": "AGENTS.md" } }
        }"#;
        let config = parse_config(json, ConfigFormat::Json, "test.json").expect("parse");
        assert!(config.overwrite);
        assert_eq!(config.formats_dict["codex"].subpath.as_deref(), Some("out"));
    }

    #[test]
    fn formats_must_be_array() {
        let toml_str = r#"
formats = "codex"
[formats_dict.codex]
filename = "codex.md"
"#;
        let err = parse_config(toml_str, ConfigFormat::Toml, "bad.toml").unwrap_err();
        assert!(err.to_string().contains("`formats` must be an array"));
    }

    #[test]
    fn formats_required() {
        let err = parse_config(r#"{"formats_dict": {}}"#, ConfigFormat::Json, "x").unwrap_err();
        assert!(err.to_string().contains("`formats` must be an array"));
    }

    #[test]
    fn formats_dict_must_be_mapping() {
        let err = parse_config(
            r#"{"formats": [], "formats_dict": ["codex"]}"#,
            ConfigFormat::Json,
            "x",
        )
        .unwrap_err();
        assert!(err.to_string().contains("`formats_dict` must be a mapping"));
    }

    #[test]
    fn target_fields_must_be_strings() {
        let err = parse_config(
            r#"{"formats": [], "formats_dict": {"codex": {"prepend": 5}}}"#,
            ConfigFormat::Json,
            "x",
        )
        .unwrap_err();
        assert!(err.to_string().contains("`formats_dict.codex.prepend` must be a string"));
    }

    #[test]
    fn overwrite_must_be_boolean() {
        let err = parse_config(
            r#"{"overwrite": "yes", "formats": [], "formats_dict": {}}"#,
            ConfigFormat::Json,
            "x",
        )
        .unwrap_err();
        assert!(err.to_string().contains("`overwrite` must be a boolean"));
    }

    #[test]
    fn format_detected_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.JSON")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("rulemerge")), ConfigFormat::Toml);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = temp_dir();
        let missing = tmp.join("nope.toml");
        let err = load_config_in(Some(&missing), &tmp, None).unwrap_err();
        assert!(err.to_string().contains("config file not found"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn lookup_prefers_working_dir_over_user_dir() {
        let tmp = temp_dir();
        let cwd = tmp.join("cwd");
        let user = tmp.join("user");
        std::fs::create_dir_all(&cwd).unwrap();
        std::fs::create_dir_all(&user).unwrap();
        std::fs::write(
            cwd.join(CONFIG_FILE_NAME),
            "formats = [\"local\"]\n[formats_dict.local]\n",
        )
        .unwrap();
        std::fs::write(
            user.join(CONFIG_FILE_NAME),
            "formats = [\"user\"]\n[formats_dict.user]\n",
        )
        .unwrap();

        let loaded = load_config_in(None, &cwd, Some(&user)).unwrap();
        assert_eq!(loaded.config.formats, vec!["local"]);
        assert!(matches!(loaded.source, ConfigSource::WorkingDir(_)));

        std::fs::remove_file(cwd.join(CONFIG_FILE_NAME)).unwrap();
        let loaded = load_config_in(None, &cwd, Some(&user)).unwrap();
        assert_eq!(loaded.config.formats, vec!["user"]);
        assert!(matches!(loaded.source, ConfigSource::User(_)));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn lookup_falls_back_to_embedded() {
        let tmp = temp_dir();
        let loaded = load_config_in(None, &tmp, None).unwrap();
        assert_eq!(loaded.source, ConfigSource::Embedded);
        assert_eq!(loaded.config, AppConfig::embedded().unwrap());

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
