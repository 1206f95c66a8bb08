//! Error types for metric admission
//!
//! `ValidationError` is the client-input taxonomy produced by the validation
//! engine. `Error` is the crate-level error that wraps it alongside the
//! plumbing failures (configuration, IO) and knows which HTTP status each
//! maps to.

use std::fmt;

use thiserror::Error;

/// HTTP status for rejected client input
pub const STATUS_UNPROCESSABLE_ENTITY: u16 = 422;

/// HTTP status for unknown entities
pub const STATUS_NOT_FOUND: u16 = 404;

/// HTTP status for everything else
pub const STATUS_INTERNAL_SERVER_ERROR: u16 = 500;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    /// Submitted metric was rejected
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A domain entity is unknown
    #[error("{0}")]
    EntityNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Build an `EntityNotFound` error for `kind` with the given `id`
    pub fn entity_not_found(kind: &str, id: impl fmt::Display) -> Self {
        Error::EntityNotFound(format!("{} {} not found", kind, id))
    }

    /// HTTP status code the API surfaces for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => STATUS_UNPROCESSABLE_ENTITY,
            Error::EntityNotFound(_) => STATUS_NOT_FOUND,
            _ => STATUS_INTERNAL_SERVER_ERROR,
        }
    }
}

/// Field of a metric submission a validation error refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// The metric name
    MetricName,
    /// A dimension name
    DimensionName,
    /// The value of the named dimension
    DimensionValue {
        /// Dimension the value belongs to
        name: String,
    },
}

impl Field {
    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Field::MetricName => "metric_name",
            Field::DimensionName => "dimension_name",
            Field::DimensionValue { .. } => "dimension_value",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::MetricName => write!(f, "Metric name"),
            Field::DimensionName => write!(f, "Dimension name"),
            Field::DimensionValue { .. } => write!(f, "Dimension value"),
        }
    }
}

/// Coarse classification of a `ValidationError`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// Required name or value missing
    EmptyField,
    /// Name or value over its character budget
    LengthExceeded,
    /// Name outside the allowed character class
    InvalidCharacters,
    /// Name not permitted in the service namespace
    NotAllowedForService,
    /// Service-specific dimension rule rejected the value
    SemanticRuleViolation,
}

impl ValidationErrorKind {
    /// Get the kind name as a string
    pub fn name(&self) -> &'static str {
        match self {
            ValidationErrorKind::EmptyField => "empty_field",
            ValidationErrorKind::LengthExceeded => "length_exceeded",
            ValidationErrorKind::InvalidCharacters => "invalid_characters",
            ValidationErrorKind::NotAllowedForService => "not_allowed_for_service",
            ValidationErrorKind::SemanticRuleViolation => "semantic_rule_violation",
        }
    }
}

/// Rejection of a submitted metric
///
/// Every variant names the offending field; `Display` renders the message
/// returned to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required name or value is absent or empty
    EmptyField {
        /// Field that is missing
        field: Field,
    },

    /// Name or value exceeds its character budget
    LengthExceeded {
        /// Field that is too long
        field: Field,
        /// Offending text
        value: String,
        /// Maximum allowed characters
        max: usize,
    },

    /// Name contains characters outside `a-z A-Z 0-9 _ - .`
    InvalidCharacters {
        /// Field with the bad characters
        field: Field,
        /// Offending text
        value: String,
    },

    /// Name is not permitted for the service namespace
    NotAllowedForService {
        /// Metric name or dimension name
        field: Field,
        /// Offending name
        value: String,
        /// Service the name was checked against
        service: String,
    },

    /// A service dimension rule rejected the value
    SemanticRuleViolation {
        /// Dimension the rule is attached to
        dimension: String,
        /// Offending value
        value: String,
        /// Service owning the rule
        service: String,
    },
}

impl ValidationError {
    /// Classification of this error
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            ValidationError::EmptyField { .. } => ValidationErrorKind::EmptyField,
            ValidationError::LengthExceeded { .. } => ValidationErrorKind::LengthExceeded,
            ValidationError::InvalidCharacters { .. } => ValidationErrorKind::InvalidCharacters,
            ValidationError::NotAllowedForService { .. } => {
                ValidationErrorKind::NotAllowedForService
            },
            ValidationError::SemanticRuleViolation { .. } => {
                ValidationErrorKind::SemanticRuleViolation
            },
        }
    }

    /// Field the error refers to
    pub fn field(&self) -> Field {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::LengthExceeded { field, .. }
            | ValidationError::InvalidCharacters { field, .. }
            | ValidationError::NotAllowedForService { field, .. } => field.clone(),
            ValidationError::SemanticRuleViolation { dimension, .. } => Field::DimensionValue {
                name: dimension.clone(),
            },
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField { field } => match field {
                Field::MetricName => write!(f, "Metric name is required"),
                Field::DimensionName => write!(f, "Dimension name cannot be empty"),
                Field::DimensionValue { name } => {
                    write!(f, "Dimension {} cannot have an empty value", name)
                },
            },
            ValidationError::LengthExceeded { field, value, max } => {
                write!(f, "{} {} must be {} characters or less", field, value, max)
            },
            ValidationError::InvalidCharacters { field, value } => {
                write!(f, "{} {} may only contain: a-z A-Z 0-9 _ - .", field, value)
            },
            ValidationError::NotAllowedForService {
                field,
                value,
                service,
            } => match field {
                Field::MetricName => write!(
                    f,
                    "{} is not a valid metric name for namespace {}",
                    value, service
                ),
                _ => write!(
                    f,
                    "{} is not a valid dimension name for service {}",
                    value, service
                ),
            },
            ValidationError::SemanticRuleViolation { value, service, .. } => {
                write!(
                    f,
                    "{} is not a valid dimension value for service {}",
                    value, service
                )
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_field_messages() {
        let err = ValidationError::EmptyField {
            field: Field::MetricName,
        };
        assert_eq!(err.to_string(), "Metric name is required");

        let err = ValidationError::EmptyField {
            field: Field::DimensionName,
        };
        assert_eq!(err.to_string(), "Dimension name cannot be empty");

        let err = ValidationError::EmptyField {
            field: Field::DimensionValue {
                name: "az".to_string(),
            },
        };
        assert_eq!(err.to_string(), "Dimension az cannot have an empty value");
    }

    #[test]
    fn test_service_messages() {
        let err = ValidationError::NotAllowedForService {
            field: Field::MetricName,
            value: "bogus".to_string(),
            service: "compute".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "bogus is not a valid metric name for namespace compute"
        );

        let err = ValidationError::SemanticRuleViolation {
            dimension: "az".to_string(),
            value: "abc".to_string(),
            service: "compute".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "abc is not a valid dimension value for service compute"
        );
        assert_eq!(
            err.field(),
            Field::DimensionValue {
                name: "az".to_string()
            }
        );
    }

    #[test]
    fn test_status_codes() {
        let err: Error = ValidationError::EmptyField {
            field: Field::MetricName,
        }
        .into();
        assert_eq!(err.status_code(), 422);

        let err = Error::entity_not_found("Alarm", "123");
        assert_eq!(err.to_string(), "Alarm 123 not found");
        assert_eq!(err.status_code(), 404);

        assert_eq!(Error::Configuration("bad".into()).status_code(), 500);
    }
}
