//! RediSearch command construction. Nothing here talks to the server.
use redis::Cmd;

use vecdb_core::types::{FieldKind, Schema};

/// Engine-side name of a logical index.
pub fn index_key(index_name: &str) -> String { format!("idx:{index_name}") }

/// Name of the distance pseudo-field the engine adds for KNN queries on `vector_field`.
pub fn score_field(vector_field: &str) -> String { format!("__{vector_field}_score") }

pub fn knn_query(filter: &str, k: usize, vector_field: &str) -> String {
    format!("{filter}=>[KNN {k} @{vector_field} $vector]")
}

pub fn create_index(index_name: &str, schema: &Schema, dimension: usize, item_type: &str) -> Cmd {
    let mut cmd = redis::cmd("FT.CREATE");
    cmd.arg(index_key(index_name))
        .arg("ON").arg("HASH")
        .arg("PREFIX").arg(1).arg(format!("{item_type}:"))
        .arg("SCHEMA");
    for field in schema.fields() {
        cmd.arg(&field.name);
        match field.kind {
            FieldKind::Vector(params) => {
                cmd.arg("VECTOR").arg(params.algorithm.as_str()).arg(6)
                    .arg("TYPE").arg("FLOAT32")
                    .arg("DIM").arg(dimension)
                    .arg("DISTANCE_METRIC").arg(params.distance.as_str());
            }
            FieldKind::Text => { cmd.arg("TEXT"); }
            FieldKind::Tag => { cmd.arg("TAG").arg("SORTABLE"); }
            FieldKind::Numeric => { cmd.arg("NUMERIC").arg("SORTABLE"); }
        }
    }
    cmd
}

pub fn index_info(index_name: &str) -> Cmd {
    let mut cmd = redis::cmd("FT.INFO");
    cmd.arg(index_key(index_name));
    cmd
}

pub fn vector_search(index_name: &str, filter: &str, k: usize, vector_field: &str, vector: &[u8]) -> Cmd {
    let score = score_field(vector_field);
    let mut cmd = redis::cmd("FT.SEARCH");
    cmd.arg(index_key(index_name))
        .arg(knn_query(filter, k, vector_field))
        .arg("PARAMS").arg(2).arg("vector").arg(vector)
        .arg("SORTBY").arg(&score).arg("ASC")
        .arg("RETURN").arg(1).arg(&score)
        .arg("LIMIT").arg(0).arg(k)
        .arg("DIALECT").arg(2);
    cmd
}

pub fn search(index_name: &str, filter: &str) -> Cmd {
    let mut cmd = redis::cmd("FT.SEARCH");
    cmd.arg(index_key(index_name)).arg(filter).arg("NOCONTENT").arg("DIALECT").arg(2);
    cmd
}

pub fn hset(key: &str, fields: &[(String, Vec<u8>)]) -> Cmd {
    let mut cmd = redis::cmd("HSET");
    cmd.arg(key);
    for (name, value) in fields { cmd.arg(name).arg(value.as_slice()); }
    cmd
}

#[cfg(test)]
pub(crate) fn args(cmd: &Cmd) -> Vec<String> {
    cmd.args_iter()
        .map(|a| match a {
            redis::Arg::Simple(bytes) => String::from_utf8_lossy(bytes).to_string(),
            redis::Arg::Cursor => "<cursor>".to_string(),
        })
        .collect()
}
