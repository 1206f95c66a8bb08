//! Fuzz Tests for Normalization and Validation
//!
//! Uses property-based testing (proptest) to check normalization
//! idempotence and the structural validation boundaries.

use monapi_validation::validation::{
    is_valid_name, normalize_dimensions, normalize_name, MetricValidator,
    MAX_METRIC_NAME_LENGTH,
};
use monapi_validation::ValidationErrorKind;
use proptest::prelude::*;

// =============================================================================
// Test Data Strategies
// =============================================================================

/// Strategy for short runs of assorted whitespace
fn whitespace_pad() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![Just(' '), Just('\t'), Just('\n'), Just('\u{00A0}'), Just('\u{2003}')],
        0..4,
    )
    .prop_map(|chars| chars.into_iter().collect::<String>())
}

/// Strategy for strings padded with assorted whitespace
fn padded_string() -> impl Strategy<Value = String> {
    (whitespace_pad(), ".{0,20}", whitespace_pad())
        .prop_map(|(l, mid, r)| format!("{}{}{}", l, mid, r))
}

/// Strategy for names using only the allowed character class
fn valid_name(max_len: usize) -> impl Strategy<Value = String> {
    prop::string::string_regex(&format!("[a-zA-Z0-9_.-]{{1,{}}}", max_len)).unwrap()
}

/// Strategy for raw dimension pairs with optional keys and values
fn raw_dimensions() -> impl Strategy<Value = Vec<(Option<String>, Option<String>)>> {
    prop::collection::vec(
        (
            prop::option::of(padded_string()),
            prop::option::of(padded_string()),
        ),
        0..10,
    )
}

// =============================================================================
// Normalization Fuzz Tests
// =============================================================================

mod normalization {
    use super::*;

    proptest! {
        /// Normalizing a name twice equals normalizing once
        #[test]
        fn name_normalization_is_idempotent(raw in prop::option::of(padded_string())) {
            let once = normalize_name(raw.as_deref());
            let twice = normalize_name(once.as_deref());
            prop_assert_eq!(once, twice);
        }

        /// Normalized names never start or end with whitespace
        #[test]
        fn normalized_name_is_trimmed(raw in padded_string()) {
            let name = normalize_name(Some(&raw)).unwrap();
            prop_assert_eq!(name.trim(), name.as_str());
        }

        /// Normalizing dimensions twice equals normalizing once
        #[test]
        fn dimension_normalization_is_idempotent(raw in raw_dimensions()) {
            let once = normalize_dimensions(Some(raw)).unwrap();
            let twice = normalize_dimensions(Some(once.clone())).unwrap();
            prop_assert_eq!(once, twice);
        }

        /// Normalized dimensions never hold empty strings
        #[test]
        fn normalized_dimensions_have_no_empty_strings(raw in raw_dimensions()) {
            let dims = normalize_dimensions(Some(raw)).unwrap();
            for (k, v) in &dims {
                prop_assert!(k.as_deref().map_or(true, |k| !k.is_empty()));
                prop_assert!(v.as_deref().map_or(true, |v| !v.is_empty()));
            }
        }
    }
}

// =============================================================================
// Validation Fuzz Tests
// =============================================================================

mod validation {
    use super::*;

    proptest! {
        /// Every name of 1-64 allowed characters is accepted without a service
        #[test]
        fn valid_names_are_accepted(name in valid_name(MAX_METRIC_NAME_LENGTH)) {
            let validator = MetricValidator::builtin();
            prop_assert!(validator.validate_name(Some(&name), None).is_ok());
        }

        /// Names over 64 characters are rejected for length
        #[test]
        fn long_names_are_rejected(name in valid_name(200)) {
            prop_assume!(name.chars().count() > MAX_METRIC_NAME_LENGTH);
            let validator = MetricValidator::builtin();
            let err = validator.validate_name(Some(&name), None).unwrap_err();
            prop_assert_eq!(err.kind(), ValidationErrorKind::LengthExceeded);
        }

        /// Validation never panics and rejects exactly the malformed names
        #[test]
        fn arbitrary_names_never_panic(raw in padded_string()) {
            let validator = MetricValidator::builtin();
            let name = normalize_name(Some(&raw)).unwrap();
            let result = validator.validate_name(Some(&name), None);

            let expected_ok = !name.is_empty()
                && name.chars().count() <= MAX_METRIC_NAME_LENGTH
                && is_valid_name(&name);
            prop_assert_eq!(result.is_ok(), expected_ok);
        }

        /// Admission of arbitrary dimensions never panics
        #[test]
        fn arbitrary_dimensions_never_panic(
            raw in raw_dimensions(),
            service in prop::option::of(prop_oneof![
                Just("compute"), Just("object-store"), Just("volume"), Just("unknown")
            ])
        ) {
            let validator = MetricValidator::builtin();
            let _ = validator.admit(Some("cpu_time"), Some(raw), service);
        }
    }
}
