//! Monitoring API metric admission
//!
//! This library decides whether a client-submitted metric is admissible
//! before it is persisted or published:
//! - Whitespace normalization of metric names and dimensions
//! - Structural checks (required, length, character class)
//! - Service catalog checks for reserved namespaces
//! - Per-service dimension value rules

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod validation;

/// Prometheus metrics for validation outcomes
pub mod metrics;

/// Configuration management with TOML support
pub mod config;

/// Hyperlink hydration for REST resources
pub mod links;

/// Statistics returned for metric queries
pub mod statistics;

// Re-export main types
pub use config::Config;
pub use error::{Error, Field, Result, ValidationError, ValidationErrorKind};
pub use validation::{
    default_validator, normalize_dimensions, normalize_name, validate_dimensions, validate_name,
    AdmittedMetric, Dimensions, MetricName, MetricValidator, ServiceCatalog, StaticServiceCatalog,
};
