// startpage-widgets/src/common/config.rs
use serde::de::DeserializeOwned;
use serde_json::Value;
use startpage_core::ConfigMap;

/// Non-empty string value of `key`
pub fn str_field<'a>(config: &'a ConfigMap, key: &str) -> Option<&'a str> {
    config
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Boolean value of `key`, `default` when absent or not a boolean
pub fn bool_field(config: &ConfigMap, key: &str, default: bool) -> bool {
    config.get(key).and_then(Value::as_bool).unwrap_or(default)
}

/// Positive integer value of `key`. Zero counts as unset.
pub fn count_field(config: &ConfigMap, key: &str) -> Option<usize> {
    config
        .get(key)
        .and_then(Value::as_u64)
        .filter(|n| *n > 0)
        .and_then(|n| usize::try_from(n).ok())
}

/// Decode the array under `key`, skipping entries of the wrong shape
///
/// A missing key or a non-array value yields an empty list.
pub fn list_field<T: DeserializeOwned>(config: &ConfigMap, key: &str) -> Vec<T> {
    let Some(items) = config.get(key).and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(key, error = %e, "Skipping malformed config entry");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> ConfigMap {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_str_field_ignores_blank_and_non_string() {
        let c = config(json!({"a": "x", "b": "  ", "c": 3}));
        assert_eq!(str_field(&c, "a"), Some("x"));
        assert_eq!(str_field(&c, "b"), None);
        assert_eq!(str_field(&c, "c"), None);
        assert_eq!(str_field(&c, "missing"), None);
    }

    #[test]
    fn test_bool_field_default() {
        let c = config(json!({"on": false, "odd": "yes"}));
        assert!(!bool_field(&c, "on", true));
        assert!(bool_field(&c, "odd", true));
        assert!(!bool_field(&c, "missing", false));
    }

    #[test]
    fn test_count_field() {
        let c = config(json!({"n": 3, "zero": 0, "neg": -2, "float": 1.5}));
        assert_eq!(count_field(&c, "n"), Some(3));
        assert_eq!(count_field(&c, "zero"), None);
        assert_eq!(count_field(&c, "neg"), None);
        assert_eq!(count_field(&c, "float"), None);
    }

    #[test]
    fn test_list_field_skips_bad_entries() {
        let c = config(json!({"xs": [1, "two", 3], "notlist": {"a": 1}}));
        let xs: Vec<u32> = list_field(&c, "xs");
        assert_eq!(xs, vec![1, 3]);
        assert!(list_field::<u32>(&c, "notlist").is_empty());
        assert!(list_field::<u32>(&c, "missing").is_empty());
    }
}
