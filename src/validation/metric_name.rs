//! Metric name validation

use super::catalog::ServiceCatalog;
use super::{char_len, is_valid_name, MAX_METRIC_NAME_LENGTH};
use crate::error::{Field, ValidationError};

/// Validate a normalized metric name
///
/// Checks, in order: presence, length, character class (unless the catalog
/// reserves the name) and, for reserved services, that the service allows
/// the name. Returns the first violation.
pub fn validate_name<C>(
    name: Option<&str>,
    service: Option<&str>,
    catalog: &C,
) -> Result<(), ValidationError>
where
    C: ServiceCatalog + ?Sized,
{
    let name = match name {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(ValidationError::EmptyField {
                field: Field::MetricName,
            })
        },
    };

    if char_len(name) > MAX_METRIC_NAME_LENGTH {
        return Err(ValidationError::LengthExceeded {
            field: Field::MetricName,
            value: name.to_string(),
            max: MAX_METRIC_NAME_LENGTH,
        });
    }

    if !catalog.is_reserved_metric_name(name) && !is_valid_name(name) {
        return Err(ValidationError::InvalidCharacters {
            field: Field::MetricName,
            value: name.to_string(),
        });
    }

    if let Some(service) = service {
        if catalog.is_reserved_service(service) && !catalog.is_valid_metric_name(service, name) {
            return Err(ValidationError::NotAllowedForService {
                field: Field::MetricName,
                value: name.to_string(),
                service: service.to_string(),
            });
        }
    }

    Ok(())
}
