//! Config validation: range and format checks with field paths.

use crate::schema::{AsmodeusConfig, StorageBackend};
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError { path: path.into(), message: message.into() });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError { path: path.into(), message: message.into() });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &AsmodeusConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_storage(config, &mut report);
    validate_session(config, &mut report);
    validate_availability(config, &mut report);
    validate_pricing(config, &mut report);
    report
}

fn is_code(value: &str, len: usize, pred: fn(char) -> bool) -> bool {
    value.chars().count() == len && value.chars().all(pred)
}

fn validate_server(config: &AsmodeusConfig, report: &mut ValidationReport) {
    if config.port() == 0 {
        report.error("server.port", "Port must be between 1 and 65535");
    }
    if config.bind_address().trim().is_empty() {
        report.error("server.bindAddress", "Bind address cannot be empty");
    }
}

fn validate_storage(config: &AsmodeusConfig, report: &mut ValidationReport) {
    match (config.storage_backend(), config.db_path()) {
        (StorageBackend::Sqlite, None) => {
            report.error("storage.dbPath", "SQLite storage needs a database path")
        }
        (StorageBackend::Memory, Some(_)) => {
            report.warn("storage.dbPath", "Ignored with the memory backend")
        }
        _ => {}
    }
    if config.storage_backend() == StorageBackend::Memory {
        report.warn("storage.backend", "PNRs will not survive a restart");
    }
}

fn validate_session(config: &AsmodeusConfig, report: &mut ValidationReport) {
    if config.idle_ttl_secs() == 0 {
        report.warn("session.idleTtlSecs", "Idle sessions are never reaped");
    } else if config.reap_interval_secs() == 0 {
        report.error("session.reapIntervalSecs", "Reap interval must be positive");
    }
}

fn validate_availability(config: &AsmodeusConfig, report: &mut ValidationReport) {
    if config.page_size() == 0 {
        report.error("availability.pageSize", "Page size must be at least 1");
    }
    let (origin, destination) = config.default_route();
    if !is_code(origin, 3, |c| c.is_ascii_uppercase()) {
        report.error("availability.defaultOrigin", "Expected a 3-letter uppercase code");
    }
    if !is_code(destination, 3, |c| c.is_ascii_uppercase()) {
        report.error("availability.defaultDestination", "Expected a 3-letter uppercase code");
    }
}

fn validate_pricing(config: &AsmodeusConfig, report: &mut ValidationReport) {
    let Some(pricing) = &config.pricing else { return };
    if let Some(currency) = &pricing.currency {
        if !is_code(currency, 3, |c| c.is_ascii_uppercase()) {
            report.error("pricing.currency", "Expected an ISO currency code such as INR");
        }
    }
    if let Some(prefix) = &pricing.ticket_prefix {
        if !is_code(prefix, 3, |c| c.is_ascii_digit()) {
            report.error("pricing.ticketPrefix", "Expected a 3-digit airline prefix");
        }
    }
    if let (Some(min), Some(max)) = (pricing.base_fare_min, pricing.base_fare_max) {
        if min > max {
            report.error("pricing.baseFareMin", "Minimum base fare exceeds the maximum");
        }
        if max == 0 {
            report.warn("pricing.baseFareMax", "All fares will be zero");
        }
    }
    if pricing.tax_percent.is_some_and(|t| t > 100) {
        report.warn("pricing.taxPercent", "Tax above 100% of the base fare");
    }
}
