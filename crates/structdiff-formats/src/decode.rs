//! Decoders from each supported format into the generic value tree.
//!
//! Every decoder normalizes numbers to `f64` and stringifies anything the
//! value model has no variant for (TOML datetimes, non-string YAML keys).

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use structdiff_types::Value;
use tracing::debug;

use crate::error::{FormatError, FormatResult};
use crate::format::Format;

/// Decode `bytes` as a document of `format`.
pub fn decode(bytes: &[u8], format: Format) -> FormatResult<Value> {
    let value = match format {
        Format::Json => decode_json(bytes)?,
        Format::Yaml => decode_yaml(bytes)?,
        Format::Toml => decode_toml(text(bytes, format)?)?,
        Format::Ini => decode_ini(text(bytes, format)?)?,
        Format::Csv => decode_csv(bytes)?,
    };
    debug!(%format, bytes = bytes.len(), kind = %value.kind(), "decoded document");
    Ok(value)
}

fn text(bytes: &[u8], format: Format) -> FormatResult<&str> {
    std::str::from_utf8(bytes).map_err(|e| FormatError::decode(format, e))
}

fn decode_json(bytes: &[u8]) -> FormatResult<Value> {
    serde_json::from_slice::<serde_json::Value>(bytes)
        .map(Value::from)
        .map_err(|e| FormatError::decode(Format::Json, e))
}

fn decode_yaml(bytes: &[u8]) -> FormatResult<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    let yaml = serde_yaml::from_slice::<serde_yaml::Value>(bytes)
        .map_err(|e| FormatError::decode(Format::Yaml, e))?;
    from_yaml(yaml)
}

fn from_yaml(value: serde_yaml::Value) -> FormatResult<Value> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => Value::Number(n.as_f64().unwrap_or_default()),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<FormatResult<_>>()?,
        ),
        Yaml::Mapping(entries) => {
            let mut mapping = BTreeMap::new();
            for (k, v) in entries {
                let key = yaml_key(k)?;
                if mapping.contains_key(&key) {
                    return Err(FormatError::decode(
                        Format::Yaml,
                        format!("mapping keys collide as {key:?} once converted to text"),
                    ));
                }
                let value = from_yaml(v)?;
                mapping.insert(key, value);
            }
            Value::Mapping(mapping)
        }
        Yaml::Tagged(tagged) => {
            let tagged = *tagged;
            from_yaml(tagged.value)?
        }
    })
}

fn yaml_key(key: serde_yaml::Value) -> FormatResult<String> {
    Ok(match from_yaml(key)? {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn decode_toml(text: &str) -> FormatResult<Value> {
    toml::from_str::<toml::Table>(text)
        .map(|table| from_toml(toml::Value::Table(table)))
        .map_err(|e| FormatError::decode(Format::Toml, e))
}

fn from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::Number(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => items.into_iter().map(from_toml).collect(),
        toml::Value::Table(table) => table
            .into_iter()
            .map(|(k, v)| (k, from_toml(v)))
            .collect(),
    }
}

/// A top-level INI item: either a `[section]` or a key outside any section.
#[derive(Deserialize)]
#[serde(untagged)]
enum IniItem {
    Section(BTreeMap<String, String>),
    Global(String),
}

/// Sections become mappings of string values. Keys outside any section
/// are ignored.
fn decode_ini(text: &str) -> FormatResult<Value> {
    let items: BTreeMap<String, IniItem> =
        serde_ini::from_str(text).map_err(|e| FormatError::decode(Format::Ini, e))?;

    Ok(items
        .into_iter()
        .filter_map(|(name, item)| match item {
            IniItem::Section(entries) => Some((
                name,
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect::<Value>(),
            )),
            IniItem::Global(_) => None,
        })
        .collect())
}

/// The first row is the header; every following row becomes a mapping from
/// header to cell text. The document is the sequence of rows.
fn decode_csv(bytes: &[u8]) -> FormatResult<Value> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|e| FormatError::decode(Format::Csv, e))?
        .clone();
    let mut seen = BTreeSet::new();
    if let Some(duplicate) = headers.iter().find(|h| !seen.insert(*h)) {
        return Err(FormatError::decode(
            Format::Csv,
            format!("duplicate header column {duplicate:?}"),
        ));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| FormatError::decode(Format::Csv, e))?;
        let row: Value = headers
            .iter()
            .zip(record.iter())
            .map(|(h, cell)| (h, Value::from(cell)))
            .collect();
        rows.push(row);
    }
    Ok(Value::Sequence(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn json_document() {
        let value = decode(br#"{"name": "svc", "ports": [80, 443], "tls": null}"#, Format::Json)
            .unwrap();
        assert_eq!(value, v(json!({"name": "svc", "ports": [80, 443], "tls": null})));
    }

    #[test]
    fn json_malformed_reports_help() {
        let err = decode(br#"{"a": 1,}"#, Format::Json).unwrap_err();
        assert!(matches!(err, FormatError::Decode { format: Format::Json, .. }));
        assert!(err.help().unwrap().contains("trailing commas"));
    }

    #[test]
    fn yaml_document() {
        let src = b"name: svc\nreplicas: 3\nratio: 0.5\nenabled: true\ntags:\n  - a\n  - b\n";
        let value = decode(src, Format::Yaml).unwrap();
        assert_eq!(
            value,
            v(json!({"name": "svc", "replicas": 3, "ratio": 0.5, "enabled": true, "tags": ["a", "b"]}))
        );
    }

    #[test]
    fn yaml_non_string_keys_and_tags() {
        let src = b"1: one\ntrue: yes\ncolor: !rgb red\n";
        let value = decode(src, Format::Yaml).unwrap();
        assert_eq!(value, v(json!({"1": "one", "true": "yes", "color": "red"})));
    }

    #[test]
    fn yaml_keys_colliding_as_text_rejected() {
        let err = decode(b"1: int\n\"1\": str\n", Format::Yaml).unwrap_err();
        assert!(matches!(err, FormatError::Decode { format: Format::Yaml, .. }));
        assert!(err.to_string().contains("\"1\""));
    }

    #[test]
    fn yaml_empty_is_null() {
        assert_eq!(decode(b"", Format::Yaml).unwrap(), Value::Null);
        assert_eq!(decode(b"  \n", Format::Yaml).unwrap(), Value::Null);
    }

    #[test]
    fn yaml_malformed() {
        let err = decode(b"a: [1, 2\n", Format::Yaml).unwrap_err();
        assert!(matches!(err, FormatError::Decode { format: Format::Yaml, .. }));
    }

    #[test]
    fn toml_document() {
        let src = b"title = \"demo\"\n\n[server]\nport = 8080\nweights = [1.5, 2]\n";
        let value = decode(src, Format::Toml).unwrap();
        assert_eq!(
            value,
            v(json!({"title": "demo", "server": {"port": 8080, "weights": [1.5, 2]}}))
        );
    }

    #[test]
    fn toml_datetime_becomes_string() {
        let value = decode(b"released = 1979-05-27T07:32:00Z\n", Format::Toml).unwrap();
        assert_eq!(value.get("released"), Some(&Value::from("1979-05-27T07:32:00Z")));
    }

    #[test]
    fn toml_malformed() {
        assert!(decode(b"key = \n", Format::Toml).is_err());
        assert!(decode(&[0xff, 0xfe], Format::Toml).is_err());
    }

    #[test]
    fn ini_sections_become_mappings() {
        let src = b"[database]\nhost=localhost\nport=5432\n\n[cache]\nenabled=true\n";
        let value = decode(src, Format::Ini).unwrap();
        assert_eq!(
            value,
            v(json!({
                "database": {"host": "localhost", "port": "5432"},
                "cache": {"enabled": "true"}
            }))
        );
    }

    #[test]
    fn csv_rows_become_mappings() {
        let src = b"id,name\n1,alice\n2,bob\n";
        let value = decode(src, Format::Csv).unwrap();
        assert_eq!(
            value,
            v(json!([{"id": "1", "name": "alice"}, {"id": "2", "name": "bob"}]))
        );
    }

    #[test]
    fn csv_header_only_is_empty_sequence() {
        assert_eq!(decode(b"id,name\n", Format::Csv).unwrap(), Value::sequence());
        assert_eq!(decode(b"", Format::Csv).unwrap(), Value::sequence());
    }

    #[test]
    fn csv_duplicate_headers_rejected() {
        let err = decode(b"id,id\n1,2\n", Format::Csv).unwrap_err();
        assert!(matches!(err, FormatError::Decode { format: Format::Csv, .. }));
        assert!(err.to_string().contains("duplicate header"));
    }

    #[test]
    fn csv_ragged_rows_rejected() {
        let err = decode(b"a,b\n1,2,3\n", Format::Csv).unwrap_err();
        assert!(err.help().unwrap().contains("column count"));
    }
}
