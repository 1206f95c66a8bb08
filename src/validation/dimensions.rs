//! Dimension validation
//!
//! Structural checks on every dimension, then the service catalog and the
//! service's dimension rules when a reserved service is given.

use super::catalog::{ServiceCatalog, SERVICE_DIMENSION};
use super::normalize::Dimensions;
use super::rules::RuleRegistry;
use super::{char_len, is_valid_name, MAX_DIMENSION_NAME_LENGTH, MAX_DIMENSION_VALUE_LENGTH};
use crate::error::{Field, ValidationError};

/// Validate normalized dimensions
///
/// Returns the first violation found. Service checks only apply to services
/// the catalog reserves; for any other service only the structural checks
/// run.
pub fn validate_dimensions<C>(
    dimensions: &Dimensions,
    service: Option<&str>,
    catalog: &C,
    rules: &RuleRegistry,
) -> Result<(), ValidationError>
where
    C: ServiceCatalog + ?Sized,
{
    let service = service.filter(|s| catalog.is_reserved_service(s));

    for (name, value) in dimensions {
        validate_dimension(name.as_deref(), value.as_deref(), service, catalog, rules)?;
    }

    Ok(())
}

fn validate_dimension<C>(
    name: Option<&str>,
    value: Option<&str>,
    service: Option<&str>,
    catalog: &C,
    rules: &RuleRegistry,
) -> Result<(), ValidationError>
where
    C: ServiceCatalog + ?Sized,
{
    let name = match name {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(ValidationError::EmptyField {
                field: Field::DimensionName,
            })
        },
    };

    let value = match value {
        Some(value) if !value.is_empty() => value,
        _ => {
            return Err(ValidationError::EmptyField {
                field: Field::DimensionValue {
                    name: name.to_string(),
                },
            })
        },
    };

    if char_len(name) > MAX_DIMENSION_NAME_LENGTH {
        return Err(ValidationError::LengthExceeded {
            field: Field::DimensionName,
            value: name.to_string(),
            max: MAX_DIMENSION_NAME_LENGTH,
        });
    }

    if char_len(value) > MAX_DIMENSION_VALUE_LENGTH {
        return Err(ValidationError::LengthExceeded {
            field: Field::DimensionValue {
                name: name.to_string(),
            },
            value: value.to_string(),
            max: MAX_DIMENSION_VALUE_LENGTH,
        });
    }

    if !is_valid_name(name) {
        return Err(ValidationError::InvalidCharacters {
            field: Field::DimensionName,
            value: name.to_string(),
        });
    }

    let Some(service) = service else {
        return Ok(());
    };

    if name != SERVICE_DIMENSION && !catalog.is_valid_dimension_name(service, name) {
        return Err(ValidationError::NotAllowedForService {
            field: Field::DimensionName,
            value: name.to_string(),
            service: service.to_string(),
        });
    }

    if let Some(service_rules) = rules.rules_for(service) {
        if !service_rules.is_valid_dimension(name, value) {
            return Err(ValidationError::SemanticRuleViolation {
                dimension: name.to_string(),
                value: value.to_string(),
                service: service.to_string(),
            });
        }
    }

    Ok(())
}
