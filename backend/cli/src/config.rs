//! Wiring from the loaded configuration to a ready command processor.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use asmodeus_availability::{AvailabilityOptions, AvailabilityService};
use asmodeus_commands::{CommandProcessor, PricingOptions};
use asmodeus_config::{AsmodeusConfig, StorageBackend};
use asmodeus_core::PersistenceGateway;
use asmodeus_store::{InMemoryPnrStore, SqlitePnrStore};
use tracing::info;

/// `--config` wins; otherwise `config.yaml` in the config directory.
pub fn config_path(cli_override: Option<&Path>) -> PathBuf {
    match cli_override {
        Some(path) => path.to_path_buf(),
        None => asmodeus_config::config_file_path(&asmodeus_config::config_dir()),
    }
}

pub async fn load(cli_override: Option<&Path>) -> Result<AsmodeusConfig> {
    let path = config_path(cli_override);
    asmodeus_config::load_and_prepare(&path)
        .await
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Open the configured store.
pub fn open_gateway(config: &AsmodeusConfig) -> Result<Arc<dyn PersistenceGateway>> {
    match (config.storage_backend(), config.db_path()) {
        (StorageBackend::Sqlite, Some(path)) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            Ok(Arc::new(SqlitePnrStore::open(path)?))
        }
        (StorageBackend::Sqlite, None) => anyhow::bail!("storage.dbPath is not set"),
        (StorageBackend::Memory, _) => {
            info!("Using in-memory PNR store");
            Ok(Arc::new(InMemoryPnrStore::new()))
        }
    }
}

pub fn build_processor(config: &AsmodeusConfig, gateway: Arc<dyn PersistenceGateway>) -> CommandProcessor {
    let (origin, destination) = config.default_route();
    let availability = AvailabilityService::new(AvailabilityOptions {
        page_size: config.page_size(),
        default_origin: origin.to_string(),
        default_destination: destination.to_string(),
    });

    let defaults = PricingOptions::default();
    let pricing = match &config.pricing {
        Some(p) => PricingOptions {
            currency: p.currency.clone().unwrap_or(defaults.currency),
            tax_percent: p.tax_percent.unwrap_or(defaults.tax_percent),
            base_fare_min: p.base_fare_min.unwrap_or(defaults.base_fare_min),
            base_fare_max: p.base_fare_max.unwrap_or(defaults.base_fare_max),
            ticket_prefix: p.ticket_prefix.clone().unwrap_or(defaults.ticket_prefix),
        },
        None => defaults,
    };

    CommandProcessor::new(gateway)
        .with_availability(availability)
        .with_pricing(pricing)
}
