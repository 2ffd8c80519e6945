//! Shared types, error model, and configuration for questform.
//!
//! This crate is the foundation depended on by the other questform crates.
//! It provides:
//! - [`QuestformError`]: the unified error type
//! - Wire types ([`FormDefinition`], [`Field`], [`LogicRule`], [`ValidationResult`])
//! - Configuration ([`AppConfig`], [`TransformConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, SettingsConfig, TransformConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{QuestformError, Result};
pub use types::{
    Choice, Diagnostic, Field, FieldProperties, FieldValidations, FormDefinition, FormSettings,
    LogicRule, LogicVar, QuestionKind, Severity, TargetKind, ValidationResult,
};
