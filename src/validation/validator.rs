//! Metric admission
//!
//! `MetricValidator` bundles a service catalog with the dimension rule
//! registry and runs the full normalize-then-validate sequence for a
//! submitted metric.

use std::collections::BTreeMap;
use std::fmt;

use lazy_static::lazy_static;
use tracing::debug;

use super::catalog::{ServiceCatalog, StaticServiceCatalog};
use super::normalize::{normalize_dimensions, normalize_name, Dimensions};
use super::rules::RuleRegistry;
use super::{dimensions, metric_name};
use crate::config::CatalogConfig;
use crate::error::{Result, ValidationError};
use crate::metrics;

lazy_static! {
    static ref DEFAULT_VALIDATOR: MetricValidator = MetricValidator::builtin();
}

/// Process-wide validator over the built-in catalog and rules
pub fn default_validator() -> &'static MetricValidator {
    &DEFAULT_VALIDATOR
}

/// Metric name that passed validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricName(String);

impl MetricName {
    /// Borrow the name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take ownership of the name
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for MetricName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized metric that may be persisted or published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmittedMetric {
    /// Validated metric name
    pub name: MetricName,
    /// Validated dimensions
    pub dimensions: BTreeMap<String, String>,
    /// Service the metric was validated against
    pub service: Option<String>,
}

/// Validator for metric names and dimensions
///
/// Holds only read-only state, so a single instance can be shared by any
/// number of threads.
#[derive(Debug, Clone)]
pub struct MetricValidator<C = StaticServiceCatalog> {
    catalog: C,
    rules: RuleRegistry,
}

impl MetricValidator<StaticServiceCatalog> {
    /// Create a validator over the built-in catalog and rules
    pub fn builtin() -> Self {
        Self::new(StaticServiceCatalog::builtin(), RuleRegistry::builtin())
    }

    /// Create a validator from catalog configuration
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let catalog = StaticServiceCatalog::from_config(config);
        let rules = RuleRegistry::from_config(config)?;
        Ok(Self::new(catalog, rules))
    }
}

impl Default for MetricValidator<StaticServiceCatalog> {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<C: ServiceCatalog> MetricValidator<C> {
    /// Create a validator with a custom catalog and rule registry
    pub fn new(catalog: C, rules: RuleRegistry) -> Self {
        Self { catalog, rules }
    }

    /// Get the service catalog
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Get the dimension rule registry
    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    /// Validate a normalized metric name
    pub fn validate_name(
        &self,
        name: Option<&str>,
        service: Option<&str>,
    ) -> std::result::Result<(), ValidationError> {
        let result = metric_name::validate_name(name, service, &self.catalog);
        record("metric_name", service, &result);
        result
    }

    /// Validate normalized dimensions
    pub fn validate_dimensions(
        &self,
        dimensions: &Dimensions,
        service: Option<&str>,
    ) -> std::result::Result<(), ValidationError> {
        let result =
            dimensions::validate_dimensions(dimensions, service, &self.catalog, &self.rules);
        record("dimensions", service, &result);
        result
    }

    /// Normalize and validate a submitted metric
    ///
    /// The name is checked before the dimensions; the first violation
    /// rejects the whole metric. Missing dimensions are treated as empty.
    pub fn admit<I, K, V>(
        &self,
        raw_name: Option<&str>,
        raw_dimensions: Option<I>,
        service: Option<&str>,
    ) -> std::result::Result<AdmittedMetric, ValidationError>
    where
        I: IntoIterator<Item = (Option<K>, Option<V>)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let name = normalize_name(raw_name);
        let dimensions = normalize_dimensions(raw_dimensions).unwrap_or_default();

        self.validate_name(name.as_deref(), service)?;
        self.validate_dimensions(&dimensions, service)?;

        // Validation guarantees every key and value is present
        let dimensions = dimensions
            .into_iter()
            .filter_map(|(k, v)| Some((k?, v?)))
            .collect();

        Ok(AdmittedMetric {
            name: MetricName(name.unwrap_or_default()),
            dimensions,
            service: service.map(str::to_string),
        })
    }
}

fn record(
    target: &'static str,
    service: Option<&str>,
    result: &std::result::Result<(), ValidationError>,
) {
    match result {
        Ok(()) => metrics::record_accepted(target),
        Err(e) => {
            metrics::record_rejected(target, e.kind());
            debug!(
                target_kind = target,
                kind = e.kind().name(),
                field = e.field().label(),
                service = service.unwrap_or("-"),
                "Rejected metric: {}",
                e
            );
        },
    }
}

/// Validate a normalized metric name with the default validator
pub fn validate_name(
    name: Option<&str>,
    service: Option<&str>,
) -> std::result::Result<(), ValidationError> {
    default_validator().validate_name(name, service)
}

/// Validate normalized dimensions with the default validator
pub fn validate_dimensions(
    dimensions: &Dimensions,
    service: Option<&str>,
) -> std::result::Result<(), ValidationError> {
    default_validator().validate_dimensions(dimensions, service)
}
