//! Per-service dimension value rules
//!
//! Each service may attach a rule to some of its dimension names. A dimension
//! without a rule is always accepted, so new dimension names can be sent
//! before any rule exists for them.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use super::catalog::{COMPUTE_SERVICE, OBJECT_STORE_SERVICE, VOLUME_SERVICE};
use super::char_len;
use crate::config::CatalogConfig;
use crate::error::{Error, Result};

/// Length of a canonical UUID string
const UUID_LENGTH: usize = 36;

/// Values of at least this many characters are checked for path separators
const PATH_CHECK_LENGTH: usize = 256;

lazy_static! {
    static ref UUID_SHAPE: Regex = Regex::new(
        r"^[A-Za-z0-9_]{8}-[A-Za-z0-9_]{4}-[A-Za-z0-9_]{4}-[A-Za-z0-9_]{4}-[A-Za-z0-9_]{12}$"
    )
    .expect("valid uuid pattern");
}

/// Predicate over a dimension value
#[derive(Debug, Clone, Copy)]
pub enum DimensionRule {
    /// 36-character values must be UUID shaped; other lengths pass
    UuidShaped,
    /// Value must parse as a 32-bit integer
    Integer,
    /// Values of 256 characters or more must not contain `/`
    PathFree,
    /// Caller supplied predicate
    Custom {
        /// Name used in configuration and logs
        name: &'static str,
        /// Returns true when the value is acceptable
        check: fn(&str) -> bool,
    },
}

impl DimensionRule {
    /// Check a dimension value
    pub fn check(&self, value: &str) -> bool {
        match self {
            DimensionRule::UuidShaped => {
                char_len(value) != UUID_LENGTH || UUID_SHAPE.is_match(value)
            },
            DimensionRule::Integer => parses_as_int(value),
            DimensionRule::PathFree => {
                char_len(value) < PATH_CHECK_LENGTH || !value.contains('/')
            },
            DimensionRule::Custom { check, .. } => check(value),
        }
    }

    /// Get the rule name as a string
    pub fn name(&self) -> &'static str {
        match self {
            DimensionRule::UuidShaped => "uuid",
            DimensionRule::Integer => "integer",
            DimensionRule::PathFree => "path_free",
            DimensionRule::Custom { name, .. } => *name,
        }
    }

    /// Parse a built-in rule from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "uuid" => Some(DimensionRule::UuidShaped),
            "integer" | "int" => Some(DimensionRule::Integer),
            "path_free" | "no_path" => Some(DimensionRule::PathFree),
            _ => None,
        }
    }
}

/// Decimal 32-bit integer with an optional leading minus sign
fn parses_as_int(value: &str) -> bool {
    !value.starts_with('+') && value.parse::<i32>().is_ok()
}

/// Rules of a single service, keyed by dimension name
#[derive(Debug, Clone, Default)]
pub struct ServiceRules {
    rules: HashMap<String, DimensionRule>,
}

impl ServiceRules {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `rule` to dimension `name`
    pub fn with_rule(mut self, name: impl Into<String>, rule: DimensionRule) -> Self {
        self.rules.insert(name.into(), rule);
        self
    }

    /// Get the rule for a dimension name
    pub fn rule(&self, name: &str) -> Option<&DimensionRule> {
        self.rules.get(name)
    }

    /// Check a dimension; names without a rule are accepted
    pub fn is_valid_dimension(&self, name: &str, value: &str) -> bool {
        self.rules.get(name).map_or(true, |rule| rule.check(value))
    }

    /// Get number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Dimension rule sets by service
///
/// Built once and shared read-only by all validations.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    services: HashMap<String, ServiceRules>,
}

impl RuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules for the built-in services
    pub fn builtin() -> Self {
        let instance_rules = ServiceRules::new()
            .with_rule("instance_id", DimensionRule::UuidShaped)
            .with_rule("az", DimensionRule::Integer);

        Self::new()
            .with_service(COMPUTE_SERVICE, instance_rules.clone())
            .with_service(VOLUME_SERVICE, instance_rules)
            .with_service(
                OBJECT_STORE_SERVICE,
                ServiceRules::new().with_rule("container", DimensionRule::PathFree),
            )
    }

    /// Build the registry from the `rules` tables of configured services
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let mut registry = Self::new();

        for service in &config.services {
            if service.rules.is_empty() {
                continue;
            }

            let mut rules = ServiceRules::new();
            for (dimension, kind) in &service.rules {
                let rule = DimensionRule::parse(kind).ok_or_else(|| {
                    Error::Configuration(format!(
                        "Unknown rule '{}' for dimension {} of service {}",
                        kind, dimension, service.name
                    ))
                })?;
                rules = rules.with_rule(dimension.clone(), rule);
            }
            registry = registry.with_service(service.name.clone(), rules);
        }

        Ok(registry)
    }

    /// Register the rule set of a service
    pub fn with_service(mut self, service: impl Into<String>, rules: ServiceRules) -> Self {
        self.services.insert(service.into(), rules);
        self
    }

    /// Get the rule set of a service
    pub fn rules_for(&self, service: &str) -> Option<&ServiceRules> {
        self.services.get(service)
    }

    /// Get number of services with rules
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
