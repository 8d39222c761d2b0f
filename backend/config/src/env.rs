//! Environment handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` references inside string values, resolved at load time
//!   (`$${VAR}` stays literal as `${VAR}`);
//! - fixed `ASMODEUS_*` variables that override individual settings.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

use crate::schema::{AsmodeusConfig, LoggingConfig, ServerConfig, StorageBackend, StorageConfig};

/// `${NAME}` or the escaped form `$${NAME}`.
static ENV_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\$)?\{([A-Z_][A-Z0-9_]*)\}").expect("static regex"));

pub const ENV_BIND: &str = "ASMODEUS_BIND";
pub const ENV_PORT: &str = "ASMODEUS_PORT";
pub const ENV_DB: &str = "ASMODEUS_DB";
pub const ENV_LOG: &str = "ASMODEUS_LOG";

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config value tree using the process environment.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute env vars using a provided map.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    Ok(substitute_value(value, env, "")?)
}

fn substitute_value(
    value: &Value,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<Value, MissingEnvVarError> {
    Ok(match value {
        Value::String(s) => Value::String(substitute_string(s, env, path)?),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, child) in map {
                let child_path = if path.is_empty() { key.clone() } else { format!("{path}.{key}") };
                out.insert(key.clone(), substitute_value(child, env, &child_path)?);
            }
            Value::Object(out)
        }
        other => other.clone(),
    })
}

fn substitute_string(
    s: &str,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<String, MissingEnvVarError> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }
    let mut missing = None;
    let replaced = ENV_REFERENCE.replace_all(s, |caps: &Captures| {
        let name = &caps[2];
        if caps.get(1).is_some() {
            return format!("${{{name}}}");
        }
        match env.get(name).filter(|v| !v.is_empty()) {
            Some(value) => value.clone(),
            None => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });
    match missing {
        Some(err) => Err(err),
        None => Ok(replaced.into_owned()),
    }
}

/// Apply `ASMODEUS_*` overrides from the process environment.
pub fn apply_env_overrides(config: AsmodeusConfig) -> AsmodeusConfig {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply overrides from a provided map. Unparseable values are logged and skipped.
pub fn apply_env_overrides_with(
    mut config: AsmodeusConfig,
    env: &HashMap<String, String>,
) -> AsmodeusConfig {
    let get = |name: &str| env.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(bind) = get(ENV_BIND) {
        config.server.get_or_insert_with(ServerConfig::default).bind_address = Some(bind.to_string());
    }
    if let Some(port) = get(ENV_PORT) {
        match port.parse::<u16>() {
            Ok(port) => config.server.get_or_insert_with(ServerConfig::default).port = Some(port),
            Err(_) => warn!(var = ENV_PORT, value = port, "ignoring invalid port override"),
        }
    }
    if let Some(db) = get(ENV_DB) {
        let storage = config.storage.get_or_insert_with(StorageConfig::default);
        if db.eq_ignore_ascii_case(":memory:") {
            storage.backend = Some(StorageBackend::Memory);
            storage.db_path = None;
        } else {
            storage.backend = Some(StorageBackend::Sqlite);
            storage.db_path = Some(PathBuf::from(db));
        }
    }
    if let Some(level) = get(ENV_LOG) {
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level.to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_nested_var() {
        let v = json!({"storage": {"dbPath": "${DATA_DIR}/pnr.db"}});
        let result = resolve_env_vars_with(&v, &env(&[("DATA_DIR", "/srv")])).unwrap();
        assert_eq!(result["storage"]["dbPath"], "/srv/pnr.db");
    }

    #[test]
    fn missing_var_names_the_path() {
        let v = json!({"logging": {"dir": "${LOG_HOME}"}});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err().to_string();
        assert!(err.contains("LOG_HOME"));
        assert!(err.contains("logging.dir"));
    }

    #[test]
    fn escaped_reference_stays_literal() {
        let v = json!({"a": "$${HOME}"});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result["a"], "${HOME}");
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut cfg = AsmodeusConfig::default();
        cfg.server = Some(ServerConfig { bind_address: Some("127.0.0.1".into()), port: Some(3000) });
        let cfg = apply_env_overrides_with(
            cfg,
            &env(&[(ENV_PORT, "8080"), (ENV_BIND, "0.0.0.0"), (ENV_DB, ":memory:"), (ENV_LOG, "debug")]),
        );
        assert_eq!(cfg.port(), 8080);
        assert_eq!(cfg.bind_address(), "0.0.0.0");
        assert_eq!(cfg.storage_backend(), StorageBackend::Memory);
        assert_eq!(cfg.log_level(), "debug");
    }

    #[test]
    fn bad_port_override_is_ignored() {
        let cfg = apply_env_overrides_with(AsmodeusConfig::default(), &env(&[(ENV_PORT, "http")]));
        assert!(cfg.server.is_none());
    }
}
