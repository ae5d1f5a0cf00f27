//! Partial-update field marker
//!
//! Update payloads distinguish three states per column: the key was left out
//! of the request (leave the column alone), the key was sent as `null` (clear
//! the column), or the key carried a value (overwrite). `Option<T>` cannot
//! express the first two separately, so patches use [`Field`].

use serde::{Deserialize, Deserializer};

/// One column of a partial update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    /// Not present in the request
    Absent,
    /// Present as `null`
    Null,
    /// Present with a value
    Value(T),
}

impl<T> Field<T> {
    /// Whether the caller supplied this field at all
    pub fn is_present(&self) -> bool {
        !matches!(self, Field::Absent)
    }

    /// The supplied value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Field::Absent => Field::Absent,
            Field::Null => Field::Null,
            Field::Value(v) => Field::Value(v),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Field<U> {
        match self {
            Field::Absent => Field::Absent,
            Field::Null => Field::Null,
            Field::Value(v) => Field::Value(f(v)),
        }
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Field::Value(v),
            None => Field::Null,
        }
    }
}

// Only called when the key exists; missing keys come from `#[serde(default)]`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Field::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default)]
        comment: Field<String>,
        #[serde(default)]
        count: Field<i64>,
    }

    #[test]
    fn test_missing_key_is_absent() {
        let probe: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(probe.comment, Field::Absent);
        assert!(!probe.count.is_present());
    }

    #[test]
    fn test_null_is_present_but_empty() {
        let probe: Probe = serde_json::from_str(r#"{"comment": null}"#).unwrap();
        assert_eq!(probe.comment, Field::Null);
        assert!(probe.comment.is_present());
        assert_eq!(probe.comment.value(), None);
    }

    #[test]
    fn test_value_is_kept() {
        let probe: Probe = serde_json::from_str(r#"{"comment": "hi", "count": 3}"#).unwrap();
        assert_eq!(probe.comment, Field::Value("hi".to_string()));
        assert_eq!(probe.count.value(), Some(&3));
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let result: Result<Probe, _> = serde_json::from_str(r#"{"count": "three"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_map_preserves_state() {
        assert_eq!(Field::Value(2).map(|n| n * 2), Field::Value(4));
        assert_eq!(Field::<i32>::Null.map(|n| n * 2), Field::Null);
        assert_eq!(Field::<i32>::Absent.map(|n| n * 2), Field::Absent);
    }
}
