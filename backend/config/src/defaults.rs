//! Config defaults: fills every unset field so the written file documents the effective values.

use std::path::Path;

use crate::schema::{
    AsmodeusConfig, AvailabilityConfig, LoggingConfig, PricingConfig, ServerConfig, SessionConfig,
    StorageBackend, StorageConfig,
};

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

/// Database file name inside the config directory.
pub const DEFAULT_DB_FILE: &str = "asmodeus.db";

/// Idle sessions are reaped after 30 minutes.
pub const DEFAULT_IDLE_TTL_SECS: u64 = 1800;
pub const DEFAULT_REAP_INTERVAL_SECS: u64 = 60;

pub const DEFAULT_PAGE_SIZE: usize = 6;
pub const DEFAULT_ORIGIN: &str = "DEL";
pub const DEFAULT_DESTINATION: &str = "DOH";

pub const DEFAULT_CURRENCY: &str = "INR";
pub const DEFAULT_TAX_PERCENT: u64 = 15;
pub const DEFAULT_BASE_FARE_MIN: u64 = 10_000;
pub const DEFAULT_BASE_FARE_MAX: u64 = 59_999;
pub const DEFAULT_TICKET_PREFIX: &str = "176";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: AsmodeusConfig, config_dir: &Path) -> AsmodeusConfig {
    let config = apply_server_defaults(config);
    let config = apply_storage_defaults(config, config_dir);
    let config = apply_session_defaults(config);
    let config = apply_availability_defaults(config);
    let config = apply_pricing_defaults(config);
    apply_logging_defaults(config)
}

fn apply_server_defaults(mut config: AsmodeusConfig) -> AsmodeusConfig {
    let server = config.server.get_or_insert_with(ServerConfig::default);
    server.bind_address.get_or_insert_with(|| DEFAULT_BIND_ADDRESS.to_string());
    server.port.get_or_insert(DEFAULT_PORT);
    config
}

/// SQLite databases default to a file next to the config.
fn apply_storage_defaults(mut config: AsmodeusConfig, config_dir: &Path) -> AsmodeusConfig {
    let storage = config.storage.get_or_insert_with(StorageConfig::default);
    let backend = *storage.backend.get_or_insert(StorageBackend::Sqlite);
    if backend == StorageBackend::Sqlite && storage.db_path.is_none() {
        storage.db_path = Some(config_dir.join(DEFAULT_DB_FILE));
    }
    config
}

fn apply_session_defaults(mut config: AsmodeusConfig) -> AsmodeusConfig {
    let session = config.session.get_or_insert_with(SessionConfig::default);
    session.idle_ttl_secs.get_or_insert(DEFAULT_IDLE_TTL_SECS);
    session.reap_interval_secs.get_or_insert(DEFAULT_REAP_INTERVAL_SECS);
    config
}

fn apply_availability_defaults(mut config: AsmodeusConfig) -> AsmodeusConfig {
    let availability = config.availability.get_or_insert_with(AvailabilityConfig::default);
    availability.page_size.get_or_insert(DEFAULT_PAGE_SIZE);
    availability.default_origin.get_or_insert_with(|| DEFAULT_ORIGIN.to_string());
    availability.default_destination.get_or_insert_with(|| DEFAULT_DESTINATION.to_string());
    config
}

fn apply_pricing_defaults(mut config: AsmodeusConfig) -> AsmodeusConfig {
    let pricing = config.pricing.get_or_insert_with(PricingConfig::default);
    pricing.currency.get_or_insert_with(|| DEFAULT_CURRENCY.to_string());
    pricing.tax_percent.get_or_insert(DEFAULT_TAX_PERCENT);
    pricing.base_fare_min.get_or_insert(DEFAULT_BASE_FARE_MIN);
    pricing.base_fare_max.get_or_insert(DEFAULT_BASE_FARE_MAX);
    pricing.ticket_prefix.get_or_insert_with(|| DEFAULT_TICKET_PREFIX.to_string());
    config
}

fn apply_logging_defaults(mut config: AsmodeusConfig) -> AsmodeusConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging.level.get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.json.get_or_insert(false);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_path_lands_in_config_dir() {
        let cfg = apply_all_defaults(AsmodeusConfig::default(), Path::new("/tmp/asm"));
        assert_eq!(cfg.db_path().unwrap(), &Path::new("/tmp/asm").join(DEFAULT_DB_FILE));
        assert_eq!(cfg.pricing.unwrap().ticket_prefix.unwrap(), DEFAULT_TICKET_PREFIX);
    }

    #[test]
    fn memory_backend_gets_no_db_path() {
        let mut cfg = AsmodeusConfig::default();
        cfg.storage = Some(StorageConfig { backend: Some(StorageBackend::Memory), db_path: None });
        let cfg = apply_all_defaults(cfg, Path::new("/tmp/asm"));
        assert!(cfg.db_path().is_none());
    }

    #[test]
    fn does_not_override_user_values() {
        let mut cfg = AsmodeusConfig::default();
        cfg.server = Some(ServerConfig { bind_address: None, port: Some(8088) });
        let cfg = apply_all_defaults(cfg, Path::new("."));
        assert_eq!(cfg.port(), 8088);
        assert_eq!(cfg.bind_address(), DEFAULT_BIND_ADDRESS);
    }
}
