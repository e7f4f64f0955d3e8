//! Shared types, error model, and configuration for rulemerge.
//!
//! This crate is the foundation depended on by the other rulemerge crates.
//! It provides:
//! - [`RuleMergeError`]: the unified error type
//! - Domain types ([`SourceFile`], [`MergedDocument`], [`TargetDefinition`],
//!   [`ResolvedTarget`], [`RunSummary`])
//! - Configuration ([`AppConfig`], config loading and shape validation)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, ConfigFormat, ConfigSource, LoadedConfig, config_dir,
    load_config, load_config_from, load_config_in, parse_config, validate_shape,
};
pub use error::{Result, RuleMergeError};
pub use types::{
    ContentTransform, MergedDocument, ResolvedTarget, RunSummary, SkipReason, SkippedSource,
    SourceFile, TargetDefinition,
};
