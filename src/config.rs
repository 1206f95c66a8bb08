//! Configuration management for the metric admission layer
//!
//! TOML configuration with environment variable overrides and defaults that
//! reproduce the built-in service catalog.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::validation::catalog::{COMPUTE_SERVICE, OBJECT_STORE_SERVICE, VOLUME_SERVICE};
use crate::validation::rules::DimensionRule;
use crate::validation::StaticServiceCatalog;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// API surface settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Monitoring and observability
    #[serde(default)]
    pub monitoring: MonitoringConfig,

    /// Service catalog and dimension rules
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// API surface configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Clients reach the API through an HTTPS terminating proxy
    #[serde(default)]
    pub accessed_via_https: bool,

    /// Topic accepted metrics are published to
    #[serde(default = "default_metrics_topic")]
    pub metrics_topic: String,

    /// Topic for events
    #[serde(default = "default_events_topic")]
    pub events_topic: String,

    /// Topic for alarm state transitions
    #[serde(default = "default_alarm_state_transitions_topic")]
    pub alarm_state_transitions_topic: String,
}

/// Monitoring configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitoringConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

/// Service catalog configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// System-defined metric names exempt from the character rule
    #[serde(default)]
    pub reserved_metric_names: Vec<String>,

    /// Reserved services
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
}

/// A reserved service and what it allows
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Service identifier
    pub name: String,

    /// Allowed metric names
    #[serde(default)]
    pub metric_names: Vec<String>,

    /// Allowed dimension names
    #[serde(default)]
    pub dimension_names: Vec<String>,

    /// Dimension name -> rule kind (uuid, integer, path_free)
    #[serde(default)]
    pub rules: BTreeMap<String, String>,
}

// Default value functions
fn default_metrics_topic() -> String { "metrics".to_string() }
fn default_events_topic() -> String { "events".to_string() }
fn default_alarm_state_transitions_topic() -> String { "alarm-state-transitions".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_true() -> bool { true }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            accessed_via_https: false,
            metrics_topic: default_metrics_topic(),
            events_topic: default_events_topic(),
            alarm_state_transitions_topic: default_alarm_state_transitions_topic(),
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            metrics_enabled: true,
        }
    }
}

impl Default for CatalogConfig {
    /// The built-in compute, object-store and volume services
    fn default() -> Self {
        let builtin = StaticServiceCatalog::builtin();
        let rules_for = |service: &str| -> BTreeMap<String, String> {
            match service {
                COMPUTE_SERVICE | VOLUME_SERVICE => BTreeMap::from([
                    ("instance_id".to_string(), "uuid".to_string()),
                    ("az".to_string(), "integer".to_string()),
                ]),
                OBJECT_STORE_SERVICE => {
                    BTreeMap::from([("container".to_string(), "path_free".to_string())])
                },
                _ => BTreeMap::new(),
            }
        };

        let mut services: Vec<ServiceConfig> = builtin
            .services()
            .into_iter()
            .filter_map(|name| builtin.service(name))
            .map(|definition| {
                let mut metric_names: Vec<String> =
                    definition.metric_names.iter().cloned().collect();
                metric_names.sort();
                let mut dimension_names: Vec<String> =
                    definition.dimension_names.iter().cloned().collect();
                dimension_names.sort();

                ServiceConfig {
                    name: definition.name.clone(),
                    metric_names,
                    dimension_names,
                    rules: rules_for(&definition.name),
                }
            })
            .collect();
        services.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            reserved_metric_names: vec![
                COMPUTE_SERVICE.to_string(),
                OBJECT_STORE_SERVICE.to_string(),
                VOLUME_SERVICE.to_string(),
            ],
            services,
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&contents).map_err(|e| {
            Error::Configuration(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load configuration with environment variable overrides
    pub fn from_file_with_env(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from environment variables only
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration from `MONAPI_CONFIG` if set, else defaults
    pub fn load() -> Result<Self> {
        match std::env::var("MONAPI_CONFIG") {
            Ok(path) => Self::from_file_with_env(path),
            Err(_) => Ok(Self::from_env()),
        }
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        // API
        if let Ok(https) = std::env::var("MONAPI_ACCESSED_VIA_HTTPS") {
            if let Ok(v) = https.parse() {
                self.api.accessed_via_https = v;
            }
        }
        if let Ok(topic) = std::env::var("MONAPI_METRICS_TOPIC") {
            self.api.metrics_topic = topic;
        }

        // Monitoring
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            self.monitoring.log_level = log_level;
        }
        if let Ok(enabled) = std::env::var("MONAPI_METRICS_ENABLED") {
            if let Ok(v) = enabled.parse() {
                self.monitoring.metrics_enabled = v;
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let topics = [
            ("metrics_topic", &self.api.metrics_topic),
            ("events_topic", &self.api.events_topic),
            (
                "alarm_state_transitions_topic",
                &self.api.alarm_state_transitions_topic,
            ),
        ];
        for (name, topic) in topics {
            if topic.trim().is_empty() {
                return Err(Error::Configuration(format!("{} cannot be empty", name)));
            }
        }

        let mut seen = HashSet::new();
        for service in &self.catalog.services {
            if service.name.trim().is_empty() {
                return Err(Error::Configuration(
                    "Service name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(service.name.as_str()) {
                return Err(Error::Configuration(format!(
                    "Duplicate service {}",
                    service.name
                )));
            }
            for (dimension, kind) in &service.rules {
                if DimensionRule::parse(kind).is_none() {
                    return Err(Error::Configuration(format!(
                        "Unknown rule '{}' for dimension {} of service {}",
                        kind, dimension, service.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Save configuration to TOML file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Serialization(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents).map_err(|e| {
            Error::Configuration(format!(
                "Failed to write config file {}: {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.metrics_topic, "metrics");
        assert_eq!(config.api.events_topic, "events");
        assert_eq!(
            config.api.alarm_state_transitions_topic,
            "alarm-state-transitions"
        );
        assert!(!config.api.accessed_via_https);
        assert!(config.monitoring.metrics_enabled);
        assert_eq!(config.catalog.services.len(), 3);
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_topic() {
        let mut config = Config::default();
        config.api.events_topic = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_service() {
        let mut config = Config::default();
        let first = config.catalog.services[0].clone();
        config.catalog.services.push(first);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_rule_kind() {
        let mut config = Config::default();
        config.catalog.services[0]
            .rules
            .insert("az".to_string(), "regex".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_override() {
        std::env::set_var("MONAPI_METRICS_TOPIC", "metrics-staging");
        let config = Config::from_env();
        assert_eq!(config.api.metrics_topic, "metrics-staging");
        std::env::remove_var("MONAPI_METRICS_TOPIC");
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
            [api]
            accessed_via_https = true

            [catalog]
            reserved_metric_names = ["heartbeat"]

            [[catalog.services]]
            name = "dns"
            metric_names = ["queries"]
            dimension_names = ["zone"]

            [catalog.services.rules]
            zone = "integer"
            "#,
        )
        .unwrap();

        assert!(config.api.accessed_via_https);
        assert_eq!(config.api.metrics_topic, "metrics");
        assert_eq!(config.catalog.services.len(), 1);
        assert_eq!(config.catalog.services[0].rules["zone"], "integer");
        assert!(config.validate().is_ok());
    }
}
