//! Metrics and telemetry for metric admission
//!
//! Prometheus counters for validation outcomes and rejection kinds.

use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec, Encoder, TextEncoder};

use crate::error::{Error, Result, ValidationErrorKind};

lazy_static! {
    /// Validations by target (metric_name, dimensions) and outcome
    pub static ref VALIDATIONS_TOTAL: CounterVec = register_counter_vec!(
        "monapi_validations_total",
        "Total validations by target and outcome",
        &["target", "outcome"]
    ).unwrap();

    /// Rejections by error kind
    pub static ref REJECTIONS_TOTAL: CounterVec = register_counter_vec!(
        "monapi_rejections_total",
        "Total rejected submissions by error kind",
        &["kind"]
    ).unwrap();
}

/// Initialize metrics system
pub fn init() {
    lazy_static::initialize(&VALIDATIONS_TOTAL);
    lazy_static::initialize(&REJECTIONS_TOTAL);

    tracing::info!("Metrics system initialized");
}

/// Get metrics in Prometheus text format
pub fn gather_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| Error::Serialization(format!("Failed to encode metrics: {}", e)))?;

    String::from_utf8(buffer)
        .map_err(|e| Error::Serialization(format!("Metrics contain invalid UTF-8: {}", e)))
}

/// Record an accepted validation
#[inline]
pub fn record_accepted(target: &str) {
    VALIDATIONS_TOTAL
        .with_label_values(&[target, "accepted"])
        .inc();
}

/// Record a rejected validation
#[inline]
pub fn record_rejected(target: &str, kind: ValidationErrorKind) {
    VALIDATIONS_TOTAL
        .with_label_values(&[target, "rejected"])
        .inc();

    REJECTIONS_TOTAL.with_label_values(&[kind.name()]).inc();
}
