//! Metric metadata validation
//!
//! Normalizes and validates the name and dimensions of submitted metrics
//! before they are persisted or published.
//!
//! # Architecture
//!
//! ```text
//!   raw name / raw dimensions
//!              │
//!              v
//!   ┌─────────────────────────┐
//!   │   Normalizer            │
//!   │   - Trim whitespace     │
//!   │   - Empty -> absent     │
//!   └────────────┬────────────┘
//!                │
//!                v
//!   ┌─────────────────────────┐      ┌─────────────────────────┐
//!   │   Structural checks     │─────>│   Service Catalog       │
//!   │   - Required / length   │      │   - Reserved names      │
//!   │   - Character class     │      │   - Allowed names       │
//!   └────────────┬────────────┘      └─────────────────────────┘
//!                │
//!                v
//!   ┌─────────────────────────┐
//!   │   Dimension Rules       │
//!   │   - Per-service values  │
//!   └─────────────────────────┘
//! ```
//!
//! Every check is fail-fast: the first violation is returned and the whole
//! submission is rejected.

pub mod catalog;
pub mod dimensions;
pub mod metric_name;
pub mod normalize;
pub mod rules;
pub mod validator;

pub use catalog::{ServiceCatalog, ServiceDefinition, StaticServiceCatalog, SERVICE_DIMENSION};
pub use normalize::{normalize_dimensions, normalize_name, Dimensions};
pub use rules::{DimensionRule, RuleRegistry, ServiceRules};
pub use validator::{
    default_validator, validate_dimensions, validate_name, AdmittedMetric, MetricName,
    MetricValidator,
};

use lazy_static::lazy_static;
use regex::Regex;

/// Maximum metric name length in characters
pub const MAX_METRIC_NAME_LENGTH: usize = 64;

/// Maximum dimension name length in characters
pub const MAX_DIMENSION_NAME_LENGTH: usize = 255;

/// Maximum dimension value length in characters
pub const MAX_DIMENSION_VALUE_LENGTH: usize = 255;

lazy_static! {
    static ref VALID_NAME: Regex =
        Regex::new(r"^[a-zA-Z0-9_.\-]+$").expect("valid name pattern");
}

/// Check that `name` only uses `a-z A-Z 0-9 _ - .`
pub fn is_valid_name(name: &str) -> bool {
    VALID_NAME.is_match(name)
}

/// Length in characters, which is what the limits are expressed in
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}
