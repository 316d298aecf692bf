//! Helpers shared by the demo binaries.
use anyhow::Result;
use tracing_subscriber::EnvFilter;
use vecdb_core::config::{Config, Settings};
use vecdb_core::types::VectorParams;
use vecdb_core::{FieldKind, FieldValue, Metadata, Schema};
use vecdb_redis::VectorDb;

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn load_settings() -> Result<Settings> {
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    Ok(config.settings()?)
}

pub fn flush_all(db: &mut VectorDb) -> Result<()> {
    redis::cmd("FLUSHALL").query::<()>(db.connection_mut())?;
    Ok(())
}

pub fn meta(descr: &str, labels: &[&str]) -> Metadata {
    let mut m = Metadata::new();
    m.insert("descr".to_string(), FieldValue::from(descr));
    m.insert("labels".to_string(), FieldValue::List(labels.iter().map(|l| l.to_string()).collect()));
    m
}

/// The default layout with the vector stored under `vector_field`.
pub fn text_schema(vector_field: &str) -> Schema {
    Schema::empty()
        .with(vector_field, FieldKind::Vector(VectorParams::default()))
        .with("descr", FieldKind::Text)
        .with("labels", FieldKind::Tag)
        .with("time", FieldKind::Numeric)
}

pub fn print_record(db: &mut VectorDb, item_type: &str, id: &str) -> Result<()> {
    for (field, value) in db.get(item_type, id)? {
        println!("     {field}: {value}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_schema_has_a_single_vector_field() {
        for field in ["vec", "embedding"] {
            let schema = text_schema(field);
            let vectors: Vec<&str> = schema.fields().iter()
                .filter(|f| matches!(f.kind, FieldKind::Vector(_)))
                .map(|f| f.name.as_str())
                .collect();
            assert_eq!(vectors, [field]);
            assert_eq!(schema.fields().len(), 4);
        }
    }
}
