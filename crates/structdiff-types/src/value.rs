use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Largest magnitude at which every integer is exactly representable as `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A format-independent value tree.
///
/// Every decoder lowers its native document model into this closed set of
/// variants. All numbers normalize to `f64`; this is a simplification, not a
/// precision guarantee. Mapping keys are unique and their order carries no
/// meaning, so mappings are kept sorted.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(BTreeMap<String, Value>),
}

/// The variant of a [`Value`], without its content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Sequence,
    Mapping,
}

impl ValueKind {
    /// Lowercase name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
        }
    }

    /// Returns `true` for sequences and mappings.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Sequence | Self::Mapping)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// An empty mapping.
    pub fn mapping() -> Self {
        Self::Mapping(BTreeMap::new())
    }

    /// An empty sequence.
    pub fn sequence() -> Self {
        Self::Sequence(Vec::new())
    }

    /// The variant of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Sequence(_) => ValueKind::Sequence,
            Self::Mapping(_) => ValueKind::Mapping,
        }
    }

    /// Returns `true` for sequences and mappings.
    pub fn is_composite(&self) -> bool {
        self.kind().is_composite()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a mapping entry by exact key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|m| m.get(key))
    }
}

/// Integral finite numbers serialize as integers so `4.0` prints as `4`.
fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER {
        Some(n as i64)
    } else {
        None
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Self::String(s) => serializer.serialize_str(s),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Sequence(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Self::Mapping(entries)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Self::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::Sequence(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_of_each_variant() {
        assert_eq!(Value::Null.kind(), ValueKind::Null);
        assert_eq!(Value::from(true).kind(), ValueKind::Bool);
        assert_eq!(Value::from(1.5).kind(), ValueKind::Number);
        assert_eq!(Value::from("x").kind(), ValueKind::String);
        assert_eq!(Value::sequence().kind(), ValueKind::Sequence);
        assert_eq!(Value::mapping().kind(), ValueKind::Mapping);
    }

    #[test]
    fn only_containers_are_composite() {
        assert!(Value::sequence().is_composite());
        assert!(Value::mapping().is_composite());
        assert!(!Value::from("seq").is_composite());
        assert!(!Value::Null.is_composite());
    }

    #[test]
    fn json_numbers_normalize_to_f64() {
        let v = Value::from(json!({"int": 3, "float": 3.0, "neg": -2}));
        assert_eq!(v.get("int"), Some(&Value::Number(3.0)));
        assert_eq!(v.get("int"), v.get("float"));
        assert_eq!(v.get("neg").and_then(Value::as_f64), Some(-2.0));
    }

    #[test]
    fn display_prints_integral_numbers_without_fraction() {
        assert_eq!(Value::from(4.0).to_string(), "4");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(-7i64).to_string(), "-7");
    }

    #[test]
    fn display_is_compact_json() {
        let v = Value::from(json!({"b": [1, "two", null], "a": true}));
        assert_eq!(v.to_string(), r#"{"a":true,"b":[1,"two",null]}"#);
    }

    #[test]
    fn serialize_matches_source_json() {
        let source = json!({"name": "svc", "ports": [80, 443], "ratio": 0.25, "tls": false});
        let v = Value::from(source.clone());
        assert_eq!(serde_json::to_value(&v).unwrap(), source);
    }

    #[test]
    fn collect_into_mapping_and_sequence() {
        let m: Value = [("k", Value::from(1i64))].into_iter().collect();
        assert_eq!(m.get("k"), Some(&Value::Number(1.0)));

        let s: Value = (0..3).map(Value::from).collect();
        assert_eq!(s.as_sequence().map(<[Value]>::len), Some(3));
    }

    #[test]
    fn accessors_reject_other_variants() {
        let v = Value::from("text");
        assert_eq!(v.as_str(), Some("text"));
        assert!(v.as_f64().is_none());
        assert!(v.as_bool().is_none());
        assert!(v.as_mapping().is_none());
        assert!(v.get("anything").is_none());
    }
}
