//! Asmodeus runtime configuration schema.
//!
//! Every section and field is optional in the file; `apply_all_defaults`
//! fills the gaps and the accessors fall back to the same constants.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::defaults::*;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsmodeusConfig {
    /// HTTP listener
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// PNR and audit storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,

    /// Terminal session lifetime
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionConfig>,

    /// Availability display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<AvailabilityConfig>,

    /// Simulated fares and ticket numbering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<StorageBackend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Idle sessions are dropped after this many seconds; 0 keeps them forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_ttl_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reap_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_destination: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_percent: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_fare_min: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_fare_max: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_prefix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for rolling NDJSON logs; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

// ---------------------------------------------------------------------------
// Resolved accessors
// ---------------------------------------------------------------------------

impl AsmodeusConfig {
    pub fn bind_address(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.bind_address.as_deref())
            .unwrap_or(DEFAULT_BIND_ADDRESS)
    }

    pub fn port(&self) -> u16 {
        self.server.as_ref().and_then(|s| s.port).unwrap_or(DEFAULT_PORT)
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage.as_ref().and_then(|s| s.backend).unwrap_or_default()
    }

    /// Database file; `None` until defaults have been applied and no path was configured.
    pub fn db_path(&self) -> Option<&PathBuf> {
        self.storage.as_ref().and_then(|s| s.db_path.as_ref())
    }

    pub fn idle_ttl_secs(&self) -> u64 {
        self.session
            .as_ref()
            .and_then(|s| s.idle_ttl_secs)
            .unwrap_or(DEFAULT_IDLE_TTL_SECS)
    }

    pub fn reap_interval_secs(&self) -> u64 {
        self.session
            .as_ref()
            .and_then(|s| s.reap_interval_secs)
            .unwrap_or(DEFAULT_REAP_INTERVAL_SECS)
    }

    pub fn page_size(&self) -> usize {
        self.availability
            .as_ref()
            .and_then(|a| a.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn default_route(&self) -> (&str, &str) {
        let availability = self.availability.as_ref();
        (
            availability
                .and_then(|a| a.default_origin.as_deref())
                .unwrap_or(DEFAULT_ORIGIN),
            availability
                .and_then(|a| a.default_destination.as_deref())
                .unwrap_or(DEFAULT_DESTINATION),
        )
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&PathBuf> {
        self.logging.as_ref().and_then(|l| l.dir.as_ref())
    }

    pub fn log_json(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = "
server:
  bindAddress: 0.0.0.0
  port: 9090
storage:
  backend: memory
availability:
  pageSize: 4
pricing:
  taxPercent: 12
";
        let cfg: AsmodeusConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.bind_address(), "0.0.0.0");
        assert_eq!(cfg.port(), 9090);
        assert_eq!(cfg.storage_backend(), StorageBackend::Memory);
        assert_eq!(cfg.page_size(), 4);
        assert_eq!(cfg.pricing.unwrap().tax_percent, Some(12));
    }

    #[test]
    fn accessors_fall_back_to_defaults() {
        let cfg = AsmodeusConfig::default();
        assert_eq!(cfg.port(), DEFAULT_PORT);
        assert_eq!(cfg.default_route(), ("DEL", "DOH"));
        assert_eq!(cfg.storage_backend(), StorageBackend::Sqlite);
        assert!(!cfg.log_json());
    }
}
