//! Whitespace normalization for metric names and dimensions
//!
//! Strips leading and trailing whitespace. For dimensions an empty result is
//! turned into an absent key or value so that validation reports it as
//! missing.

use std::collections::BTreeMap;

/// Normalized dimensions; `None` marks an absent name or value
pub type Dimensions = BTreeMap<Option<String>, Option<String>>;

/// Normalize a metric name
///
/// Returns `None` for `None`, otherwise the trimmed name, which may be empty.
pub fn normalize_name(raw: Option<&str>) -> Option<String> {
    raw.map(|name| name.trim().to_string())
}

/// Normalize a dimension map
///
/// Keys and values are trimmed independently. A key or value that is empty
/// after trimming becomes `None`. When two keys collide after trimming the
/// later entry wins.
pub fn normalize_dimensions<I, K, V>(raw: Option<I>) -> Option<Dimensions>
where
    I: IntoIterator<Item = (Option<K>, Option<V>)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let raw = raw?;
    let mut result = Dimensions::new();

    for (key, value) in raw {
        let key = key.as_ref().and_then(|k| trim_to_none(k.as_ref()));
        let value = value.as_ref().and_then(|v| trim_to_none(v.as_ref()));
        result.insert(key, value);
    }

    Some(result)
}

fn trim_to_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(pairs: &[(Option<&str>, Option<&str>)]) -> Option<Dimensions> {
        normalize_dimensions(Some(pairs.iter().cloned()))
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name(None), None);
        assert_eq!(normalize_name(Some("  cpu  ")), Some("cpu".to_string()));
        assert_eq!(normalize_name(Some("\tcpu\n")), Some("cpu".to_string()));
        assert_eq!(normalize_name(Some("   ")), Some(String::new()));
        assert_eq!(normalize_name(Some("cpu idle")), Some("cpu idle".to_string()));
    }

    #[test]
    fn test_normalize_name_unicode_whitespace() {
        assert_eq!(
            normalize_name(Some("\u{2003}cpu\u{00A0}")),
            Some("cpu".to_string())
        );
    }

    #[test]
    fn test_normalize_dimensions_none() {
        let raw: Option<Vec<(Option<String>, Option<String>)>> = None;
        assert_eq!(normalize_dimensions(raw), None);
    }

    #[test]
    fn test_normalize_dimensions_trims() {
        let result = dims(&[(Some(" az "), Some(" 2 ")), (Some("host"), Some("a"))]).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(
            result.get(&Some("az".to_string())),
            Some(&Some("2".to_string()))
        );
    }

    #[test]
    fn test_normalize_dimensions_empty_becomes_absent() {
        let result = dims(&[(Some("az"), Some("   ")), (Some("  "), Some("x"))]).unwrap();
        assert_eq!(result.get(&Some("az".to_string())), Some(&None));
        assert_eq!(result.get(&None), Some(&Some("x".to_string())));
    }

    #[test]
    fn test_normalize_dimensions_keeps_absent() {
        let result = dims(&[(None, None)]).unwrap();
        assert_eq!(result.get(&None), Some(&None));
    }

    #[test]
    fn test_normalize_dimensions_last_write_wins() {
        let result = dims(&[(Some("az"), Some("1")), (Some(" az"), Some("2"))]).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(
            result.get(&Some("az".to_string())),
            Some(&Some("2".to_string()))
        );
    }

    #[test]
    fn test_normalize_dimensions_idempotent() {
        let once = dims(&[(Some(" az "), Some(" 2")), (Some("x"), Some(" "))]).unwrap();
        let twice = normalize_dimensions(Some(once.clone())).unwrap();
        assert_eq!(once, twice);
    }
}
