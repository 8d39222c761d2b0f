//! `asmodeus-config`: runtime configuration for the Asmodeus terminal.
//!
//! Provides:
//! - Typed config schema (server, storage, session, availability, pricing, logging)
//! - YAML read/write with atomic backup rotation
//! - `${ENV_VAR}` substitution and `ASMODEUS_*` overrides
//! - Default value application
//! - Validation with field paths

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{
    apply_env_overrides, apply_env_overrides_with, resolve_env_vars, resolve_env_vars_with,
    MissingEnvVarError,
};
pub use io::{config_dir, config_file_path, load_config, load_raw, write_config};
pub use schema::{AsmodeusConfig, StorageBackend};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Load, substitute env vars, apply overrides and defaults, then validate.
///
/// This is the main entry point for loading a config at runtime. Validation
/// errors abort; warnings are logged.
pub async fn load_and_prepare(path: &Path) -> Result<AsmodeusConfig> {
    prepare(path, &std::env::vars().collect()).await
}

/// `load_and_prepare` against an explicit environment.
pub async fn prepare(path: &Path, env: &HashMap<String, String>) -> Result<AsmodeusConfig> {
    let raw = load_raw(path).await?;
    let value = resolve_env_vars_with(&raw, env).context("Failed to resolve env vars in config")?;
    let config: AsmodeusConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides_with(config, env);
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let config = apply_all_defaults(config, base_dir);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.first() {
        bail!("{} config error(s); first: {first}", report.errors.len());
    }
    Ok(config)
}
