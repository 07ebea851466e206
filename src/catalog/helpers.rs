//! Catalog Helpers
//!
//! Small pure functions used while decoding and querying the catalog.

use serde::{de, Deserialize, Deserializer, Serializer};
use std::collections::HashSet;

/// Accepts a boolean or the integers `0`/`1` as a flag.
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(other) => Err(de::Error::custom(format!(
            "expected 0 or 1 for flag, got {other}"
        ))),
    }
}

/// Writes a flag as the integer `0` or `1`.
pub fn serialize_flag<S>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(u8::from(*flag))
}

/// Deduplicates `values`, keeping the first occurrence of each.
pub fn distinct_values<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize, serde::Serialize)]
    struct Wrapper {
        #[serde(
            serialize_with = "serialize_flag",
            deserialize_with = "deserialize_flag"
        )]
        featured: bool,
    }

    #[test]
    fn test_flag_from_int_and_bool() {
        let a: Wrapper = serde_json::from_str(r#"{"featured": 1}"#).unwrap();
        let b: Wrapper = serde_json::from_str(r#"{"featured": false}"#).unwrap();
        assert!(a.featured);
        assert!(!b.featured);
        assert!(serde_json::from_str::<Wrapper>(r#"{"featured": 2}"#).is_err());
    }

    #[test]
    fn test_flag_written_as_int() {
        let json = serde_json::to_value(Wrapper { featured: true }).unwrap();
        assert_eq!(json, serde_json::json!({ "featured": 1 }));

        let json = serde_json::to_value(Wrapper { featured: false }).unwrap();
        assert_eq!(json["featured"], 0);
    }

    #[test]
    fn test_distinct_values_keeps_first_seen() {
        let values = distinct_values(["b", "a", "b", "c", "a"]);
        assert_eq!(values, vec!["b", "a", "c"]);
    }
}
