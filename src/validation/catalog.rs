//! Service catalog lookups
//!
//! The catalog knows which services (namespaces) are reserved, which metric
//! and dimension names each of them allows, and which metric names are
//! system-defined. Lookups are total: unknown services simply answer `false`.

use std::collections::{HashMap, HashSet};

use crate::config::CatalogConfig;

/// Dimension that may be attached to a metric of any service
pub const SERVICE_DIMENSION: &str = "service";

/// Compute service identifier
pub const COMPUTE_SERVICE: &str = "compute";

/// Object store service identifier
pub const OBJECT_STORE_SERVICE: &str = "object-store";

/// Volume service identifier
pub const VOLUME_SERVICE: &str = "volume";

/// Read-only lookup surface used during validation
///
/// Implementations are shared between threads and must not fail.
pub trait ServiceCatalog: Send + Sync {
    /// Is `service` a known, reserved service
    fn is_reserved_service(&self, service: &str) -> bool;

    /// Is `name` a permitted dimension name for `service`
    fn is_valid_dimension_name(&self, service: &str, name: &str) -> bool;

    /// Is `name` a permitted metric name for `service`
    fn is_valid_metric_name(&self, service: &str, name: &str) -> bool;

    /// Is `name` a system-defined metric name exempt from the character rule
    fn is_reserved_metric_name(&self, name: &str) -> bool;
}

/// Metric and dimension names a single service allows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDefinition {
    /// Service identifier
    pub name: String,
    /// Allowed metric names
    pub metric_names: HashSet<String>,
    /// Allowed dimension names
    pub dimension_names: HashSet<String>,
}

impl ServiceDefinition {
    /// Create an empty definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metric_names: HashSet::new(),
            dimension_names: HashSet::new(),
        }
    }

    /// Allow the given metric names
    pub fn with_metric_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metric_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Allow the given dimension names
    pub fn with_dimension_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimension_names.extend(names.into_iter().map(Into::into));
        self
    }
}

/// In-memory catalog built once at start-up
#[derive(Debug, Clone, Default)]
pub struct StaticServiceCatalog {
    services: HashMap<String, ServiceDefinition>,
    reserved_metric_names: HashSet<String>,
}

impl StaticServiceCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of the built-in compute, object-store and volume services
    ///
    /// Service identifiers double as reserved metric names.
    pub fn builtin() -> Self {
        let compute = ServiceDefinition::new(COMPUTE_SERVICE)
            .with_metric_names([
                "cpu_time",
                "cpu_utilization",
                "disk_read_ops",
                "disk_write_ops",
                "disk_read_bytes",
                "disk_write_bytes",
                "net_in_bytes",
                "net_out_bytes",
                "net_in_packets",
                "net_out_packets",
                "net_in_dropped",
                "net_out_dropped",
                "net_in_errors",
                "net_out_errors",
            ])
            .with_dimension_names([
                "instance_id",
                "az",
                "disk",
                "device",
                "hostname",
                "region",
                "tenant_id",
            ]);

        let object_store = ServiceDefinition::new(OBJECT_STORE_SERVICE)
            .with_metric_names([
                "project_write_bytes",
                "project_read_bytes",
                "project_put_ops",
                "project_get_ops",
                "container_write_bytes",
                "container_read_bytes",
                "container_put_ops",
                "container_get_ops",
            ])
            .with_dimension_names(["container", "az", "hostname", "region", "tenant_id"]);

        let volume = ServiceDefinition::new(VOLUME_SERVICE)
            .with_metric_names([
                "volume_read_ops",
                "volume_write_ops",
                "volume_read_bytes",
                "volume_write_bytes",
                "volume_read_time",
                "volume_write_time",
                "volume_idle_time",
            ])
            .with_dimension_names([
                "instance_id",
                "az",
                "disk",
                "hostname",
                "region",
                "tenant_id",
            ]);

        Self::new()
            .with_service(compute)
            .with_service(object_store)
            .with_service(volume)
            .with_reserved_metric_names([COMPUTE_SERVICE, OBJECT_STORE_SERVICE, VOLUME_SERVICE])
    }

    /// Build a catalog from configuration
    pub fn from_config(config: &CatalogConfig) -> Self {
        let mut catalog =
            Self::new().with_reserved_metric_names(config.reserved_metric_names.iter().cloned());

        for service in &config.services {
            catalog = catalog.with_service(
                ServiceDefinition::new(service.name.clone())
                    .with_metric_names(service.metric_names.iter().cloned())
                    .with_dimension_names(service.dimension_names.iter().cloned()),
            );
        }

        catalog
    }

    /// Register a service, replacing any existing definition of the same name
    pub fn with_service(mut self, definition: ServiceDefinition) -> Self {
        self.services.insert(definition.name.clone(), definition);
        self
    }

    /// Mark metric names as system-defined
    pub fn with_reserved_metric_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_metric_names
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Get a service definition
    pub fn service(&self, name: &str) -> Option<&ServiceDefinition> {
        self.services.get(name)
    }

    /// Names of all registered services
    pub fn services(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }

    /// Get number of registered services
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl ServiceCatalog for StaticServiceCatalog {
    fn is_reserved_service(&self, service: &str) -> bool {
        self.services.contains_key(service)
    }

    fn is_valid_dimension_name(&self, service: &str, name: &str) -> bool {
        self.services
            .get(service)
            .is_some_and(|s| s.dimension_names.contains(name))
    }

    fn is_valid_metric_name(&self, service: &str, name: &str) -> bool {
        self.services
            .get(service)
            .is_some_and(|s| s.metric_names.contains(name))
    }

    fn is_reserved_metric_name(&self, name: &str) -> bool {
        self.reserved_metric_names.contains(name)
    }
}
