//! Reshapes raw RESP2 replies from `FT.SEARCH` and `FT.INFO`.
use redis::Value;

use vecdb_core::{Error, Result, SearchHit};

/// Subset of `FT.INFO` the client cares about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexInfo {
    pub num_docs: u64,
    pub indexing: Option<bool>,
    pub percent_indexed: Option<f64>,
}

impl IndexInfo {
    /// Ready once the engine stops reporting a background scan.
    pub fn is_ready(&self) -> bool {
        match self.indexing {
            Some(indexing) => !indexing,
            None => self.percent_indexed.map_or(true, |p| p >= 1.0),
        }
    }
}

pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::BulkString(s) => Some(String::from_utf8_lossy(s).to_string()),
        Value::SimpleString(s) => Some(s.clone()),
        Value::Int(i) => Some(i.to_string()),
        Value::Double(d) => Some(d.to_string()),
        Value::Okay => Some("OK".to_string()),
        _ => None,
    }
}

/// Parses `[total, key, [field, value, ...]?, key, ...]`.
///
/// Works for both `NOCONTENT` replies (keys only) and replies carrying the
/// returned fields; `score_field` is read from the latter when given.
pub fn parse_search(value: &Value, score_field: Option<&str>) -> Result<Vec<SearchHit>> {
    let Value::Array(items) = value else {
        return Err(Error::Decode(format!("unexpected FT.SEARCH reply: {value:?}")));
    };
    let mut hits: Vec<SearchHit> = Vec::new();
    for item in items.iter().skip(1) {
        match item {
            Value::Array(fields) => {
                let (Some(field), Some(hit)) = (score_field, hits.last_mut()) else { continue };
                hit.score = extract_score(fields, field)?;
            }
            other => {
                let key = value_to_string(other).ok_or_else(|| Error::Decode(format!("unexpected document key: {other:?}")))?;
                let hit = SearchHit::from_key(&key, None)
                    .ok_or_else(|| Error::Decode(format!("document key '{key}' has no type prefix")))?;
                hits.push(hit);
            }
        }
    }
    Ok(hits)
}

fn extract_score(fields: &[Value], score_field: &str) -> Result<Option<f32>> {
    for pair in fields.chunks_exact(2) {
        if value_to_string(&pair[0]).as_deref() != Some(score_field) { continue; }
        let raw = value_to_string(&pair[1]).unwrap_or_default();
        let score = raw.parse::<f32>().map_err(|_| Error::Decode(format!("score '{raw}' is not a number")))?;
        return Ok(Some(score));
    }
    Ok(None)
}

/// Parses the flat key/value array returned by `FT.INFO`.
pub fn parse_info(value: &Value) -> Result<IndexInfo> {
    let Value::Array(items) = value else {
        return Err(Error::Decode(format!("unexpected FT.INFO reply: {value:?}")));
    };
    let mut info = IndexInfo::default();
    for pair in items.chunks_exact(2) {
        let Some(key) = value_to_string(&pair[0]) else { continue };
        let val = value_to_string(&pair[1]);
        match key.as_str() {
            "num_docs" => info.num_docs = val.and_then(|s| s.parse::<f64>().ok()).map_or(0, |n| n as u64),
            "indexing" => info.indexing = val.and_then(|s| s.parse::<f64>().ok()).map(|n| n != 0.0),
            "percent_indexed" => info.percent_indexed = val.and_then(|s| s.parse().ok()),
            _ => {}
        }
    }
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulk(s: &str) -> Value { Value::BulkString(s.as_bytes().to_vec()) }

    #[test]
    fn knn_reply_keeps_engine_order_and_scores() {
        let reply = Value::Array(vec![
            Value::Int(2),
            bulk("user:samuel"),
            Value::Array(vec![bulk("__vec_score"), bulk("0")]),
            bulk("user:david"),
            Value::Array(vec![bulk("__vec_score"), bulk("0.0295688509941")]),
        ]);
        let hits = parse_search(&reply, Some("__vec_score")).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!((hits[0].item_type.as_str(), hits[0].id.as_str(), hits[0].score), ("user", "samuel", Some(0.0)));
        assert_eq!(hits[1].id, "david");
        assert!(hits[1].score.unwrap() > hits[0].score.unwrap());
    }

    #[test]
    fn nocontent_reply_has_no_scores() {
        let reply = Value::Array(vec![Value::Int(2), bulk("user:samuel"), bulk("user:david")]);
        let hits = parse_search(&reply, None).unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, ["samuel", "david"]);
        assert!(hits.iter().all(|h| h.score.is_none()));
    }

    #[test]
    fn empty_and_malformed_replies() {
        assert!(parse_search(&Value::Array(vec![Value::Int(0)]), None).unwrap().is_empty());
        assert!(parse_search(&Value::Nil, None).is_err());
        let bad_score = Value::Array(vec![Value::Int(1), bulk("a:b"), Value::Array(vec![bulk("__vec_score"), bulk("far")])]);
        assert!(matches!(parse_search(&bad_score, Some("__vec_score")), Err(Error::Decode(_))));
    }

    #[test]
    fn info_reports_readiness() {
        let building = Value::Array(vec![
            bulk("index_name"), bulk("idx:interests"),
            bulk("num_docs"), bulk("4"),
            bulk("indexing"), Value::Int(1),
            bulk("percent_indexed"), bulk("0.5"),
        ]);
        let info = parse_info(&building).unwrap();
        assert_eq!(info.num_docs, 4);
        assert!(!info.is_ready());

        let ready = Value::Array(vec![bulk("indexing"), bulk("0"), bulk("percent_indexed"), bulk("1")]);
        assert!(parse_info(&ready).unwrap().is_ready());
        assert!(parse_info(&Value::Array(vec![])).unwrap().is_ready());
    }
}
