//! Hash-field encoding of records.
//!
//! Every write stores a `__types` field mapping each field to the kind it was
//! written as, so reads decode by tag. Fields without a tag (written by other
//! clients) go through a best-effort guess: number, then UTF-8 text, then a
//! float32 vector, then raw bytes.
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use vecdb_core::codec::{decode_f32, encode_f32};
use vecdb_core::types::ValueKind;
use vecdb_core::{Error, FieldValue, Metadata, Record, Result};

pub const TYPES_FIELD: &str = "__types";
pub const TIME_FIELD: &str = "time";

fn value_bytes(value: &FieldValue) -> Vec<u8> {
    match value {
        FieldValue::Number(n) => n.to_string().into_bytes(),
        FieldValue::Text(s) => s.as_bytes().to_vec(),
        FieldValue::List(items) => items.join(", ").into_bytes(),
        FieldValue::Vector(v) => encode_f32(v),
        FieldValue::Bytes(b) => b.clone(),
    }
}

/// Builds the `HSET` field list: `time`, the metadata (which may override
/// `time`), the vector field and the type tags.
pub fn encode_fields(metadata: &Metadata, time: f64, vector_field: &str, vector: Vec<u8>) -> Result<Vec<(String, Vec<u8>)>> {
    if metadata.contains_key(TYPES_FIELD) || vector_field == TYPES_FIELD {
        return Err(Error::InvalidConfig(format!("field name '{TYPES_FIELD}' is reserved")));
    }
    let mut values: BTreeMap<&str, (ValueKind, Vec<u8>)> = BTreeMap::new();
    values.insert(TIME_FIELD, (ValueKind::Number, value_bytes(&FieldValue::Number(time))));
    for (name, value) in metadata {
        values.insert(name.as_str(), (value.kind(), value_bytes(value)));
    }
    values.insert(vector_field, (ValueKind::Vector, vector));

    let tags: BTreeMap<&str, ValueKind> = values.iter().map(|(name, (kind, _))| (*name, *kind)).collect();
    let tags = serde_json::to_vec(&tags).map_err(|e| Error::Decode(e.to_string()))?;

    let mut fields: Vec<(String, Vec<u8>)> = values.into_iter().map(|(name, (_, bytes))| (name.to_string(), bytes)).collect();
    fields.push((TYPES_FIELD.to_string(), tags));
    Ok(fields)
}

/// Decodes an `HGETALL` reply; an empty reply yields an empty record.
/// A field whose bytes no longer match its tag is guessed like an untagged one.
pub fn decode_fields(mut raw: HashMap<String, Vec<u8>>) -> Result<Record> {
    let tags: BTreeMap<String, ValueKind> = match raw.remove(TYPES_FIELD) {
        Some(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable type tags");
            BTreeMap::new()
        }),
        None => BTreeMap::new(),
    };
    let mut record = Record::new();
    for (name, bytes) in raw {
        let value = match tags.get(&name) {
            Some(kind) => decode_tagged(&name, *kind, &bytes).unwrap_or_else(|e| {
                warn!(field = %name, error = %e, "stale type tag, guessing instead");
                guess(bytes)
            }),
            None => guess(bytes),
        };
        record.insert(name, value);
    }
    Ok(record)
}

fn decode_tagged(name: &str, kind: ValueKind, bytes: &[u8]) -> Result<FieldValue> {
    match kind {
        ValueKind::Number => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .map(FieldValue::Number)
            .ok_or_else(|| Error::Decode(format!("field '{name}' is tagged numeric but is not a number"))),
        ValueKind::Text => String::from_utf8(bytes.to_vec())
            .map(FieldValue::Text)
            .map_err(|_| Error::Decode(format!("field '{name}' is tagged text but is not UTF-8"))),
        ValueKind::Vector => decode_f32(bytes).map(FieldValue::Vector),
        ValueKind::Bytes => Ok(FieldValue::Bytes(bytes.to_vec())),
    }
}

/// Positional fallback for untagged fields. Never fails.
pub fn guess(bytes: Vec<u8>) -> FieldValue {
    if let Ok(s) = std::str::from_utf8(&bytes) {
        if let Ok(n) = s.trim().parse::<f64>() { return FieldValue::Number(n); }
        return FieldValue::Text(s.to_string());
    }
    match decode_f32(&bytes) {
        Ok(v) => FieldValue::Vector(v),
        Err(_) => FieldValue::Bytes(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Metadata {
        let mut meta = Metadata::new();
        meta.insert("descr".to_string(), FieldValue::from("Samuel is into books and comics"));
        meta.insert("labels".to_string(), FieldValue::from(vec!["books", "comics"]));
        meta.insert("zip".to_string(), FieldValue::from("01234"));
        meta
    }

    #[test]
    fn fields_include_time_vector_and_tags() {
        let fields = encode_fields(&sample(), 1_700_000_000.25, "vec", encode_f32(&[0.9, 0.7, 0.2])).unwrap();
        let names: Vec<&str> = fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["descr", "labels", "time", "vec", "zip", "__types"]);
        let labels = &fields.iter().find(|(n, _)| n == "labels").unwrap().1;
        assert_eq!(labels.as_slice(), b"books, comics");
    }

    #[test]
    fn tagged_fields_decode_to_their_written_kind() {
        let fields = encode_fields(&sample(), 1.5, "vec", encode_f32(&[0.9, 0.7, 0.2])).unwrap();
        let record = decode_fields(fields.into_iter().collect()).unwrap();
        assert!(!record.contains_key(TYPES_FIELD));
        assert_eq!(record["time"], FieldValue::Number(1.5));
        assert_eq!(record["labels"], FieldValue::Text("books, comics".to_string()));
        // Numeric-looking text stays text when tagged.
        assert_eq!(record["zip"], FieldValue::Text("01234".to_string()));
        assert_eq!(record["vec"].as_vector().unwrap(), [0.9f32, 0.7, 0.2]);
    }

    #[test]
    fn untagged_fields_fall_back_to_guessing() {
        assert_eq!(guess(b"42".to_vec()), FieldValue::Number(42.0));
        assert_eq!(guess(b"comics".to_vec()), FieldValue::Text("comics".to_string()));
        let v = encode_f32(&[0.1, 0.9, 0.7]);
        assert!(std::str::from_utf8(&v).is_err());
        assert_eq!(guess(v), FieldValue::Vector(vec![0.1, 0.9, 0.7]));
        assert_eq!(guess(vec![0xff, 0xfe, 0xfd]), FieldValue::Bytes(vec![0xff, 0xfe, 0xfd]));
    }

    #[test]
    fn corrupt_tags_are_ignored_and_missing_keys_are_empty() {
        let mut raw = HashMap::new();
        raw.insert(TYPES_FIELD.to_string(), b"{not json".to_vec());
        raw.insert("time".to_string(), b"3".to_vec());
        let record = decode_fields(raw).unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record["time"], FieldValue::Number(3.0));
        assert!(decode_fields(HashMap::new()).unwrap().is_empty());
    }

    #[test]
    fn stale_tag_falls_back_without_losing_other_fields() {
        let mut raw = HashMap::new();
        raw.insert(TYPES_FIELD.to_string(), br#"{"time":"number","descr":"text","vec":"vector"}"#.to_vec());
        raw.insert("time".to_string(), b"n/a".to_vec());
        raw.insert("descr".to_string(), b"hello".to_vec());
        raw.insert("vec".to_string(), vec![0xff, 0xfe, 0xfd]);
        let record = decode_fields(raw).unwrap();
        assert_eq!(record["time"], FieldValue::Text("n/a".to_string()));
        assert_eq!(record["descr"], FieldValue::Text("hello".to_string()));
        assert_eq!(record["vec"], FieldValue::Bytes(vec![0xff, 0xfe, 0xfd]));
    }

    #[test]
    fn reserved_field_is_rejected() {
        let mut meta = Metadata::new();
        meta.insert(TYPES_FIELD.to_string(), FieldValue::from("x"));
        assert!(matches!(encode_fields(&meta, 0.0, "vec", vec![]), Err(Error::InvalidConfig(_))));
    }
}
