use chrono::Utc;
use redis::{ConnectionLike, IntoConnectionInfo, Value};
use std::collections::HashMap;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

use vecdb_core::config::{DbSettings, IndexSettings};
use vecdb_core::types::record_key;
use vecdb_core::{EmbedInput, EmbeddingProvider, Error, Metadata, PassThrough, Record, Result, Schema, SearchHit};

use crate::commands;
use crate::record::{decode_fields, encode_fields};
use crate::response::{parse_info, parse_search, IndexInfo};

pub const DEFAULT_VECTOR_FIELD: &str = "vec";

/// How `create_index` waits for the engine to finish its initial scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub delay: Duration,
    /// `None` polls until the engine reports ready, however long that takes.
    pub max_attempts: Option<u32>,
}

impl Default for ReadinessPolicy {
    fn default() -> Self { Self { delay: Duration::from_millis(100), max_attempts: Some(600) } }
}

impl From<&IndexSettings> for ReadinessPolicy {
    fn from(s: &IndexSettings) -> Self { Self { delay: s.poll_delay(), max_attempts: s.max_poll_attempts } }
}

/// Client over a single Redis connection with the search module loaded.
///
/// Every call is one synchronous round trip, except `create_index` which
/// also polls `FT.INFO` until the index is ready.
pub struct VectorDb<C = redis::Connection> {
    con: C,
    provider: Box<dyn EmbeddingProvider>,
    readiness: ReadinessPolicy,
}

/// Item types become key prefixes split at the first ':', so they cannot contain one.
fn check_item_type(item_type: &str) -> Result<()> {
    if item_type.is_empty() || item_type.contains(':') {
        return Err(Error::InvalidConfig(format!("item type '{item_type}' must be non-empty and contain no ':'")));
    }
    Ok(())
}

impl VectorDb<redis::Connection> {
    /// Connects using the pass-through provider.
    pub fn connect(settings: &DbSettings) -> Result<Self> {
        Self::connect_with(settings, Box::new(PassThrough::new()))
    }

    pub fn connect_with(settings: &DbSettings, provider: Box<dyn EmbeddingProvider>) -> Result<Self> {
        let mut info = (settings.host.as_str(), settings.port).into_connection_info()?;
        info.redis.password = settings.password.clone().filter(|p| !p.is_empty());
        let client = redis::Client::open(info)?;
        let con = client.get_connection()?;
        info!(host = %settings.host, port = settings.port, provider = provider.name(), "connected to vector database");
        Ok(Self::with_connection(con, provider))
    }
}

impl<C: ConnectionLike> VectorDb<C> {
    pub fn with_connection(con: C, provider: Box<dyn EmbeddingProvider>) -> Self {
        Self { con, provider, readiness: ReadinessPolicy::default() }
    }

    pub fn with_readiness(mut self, readiness: ReadinessPolicy) -> Self {
        self.readiness = readiness;
        self
    }

    pub fn provider(&self) -> &dyn EmbeddingProvider { self.provider.as_ref() }

    /// Raw connection, for administrative commands this client does not wrap.
    pub fn connection_mut(&mut self) -> &mut C { &mut self.con }

    /// Creates `idx:{index_name}` over keys prefixed `{item_type}:` and blocks
    /// until the engine reports it ready. `dimension: None` asks the provider.
    pub fn create_index(&mut self, dimension: Option<usize>, index_name: &str, schema: &Schema, item_type: &str) -> Result<()> {
        check_item_type(item_type)?;
        if schema.is_empty() { return Err(Error::InvalidConfig("schema has no fields".to_string())); }
        let dimension = match dimension { Some(d) => d, None => self.provider.dim()? };
        if dimension == 0 { return Err(Error::InvalidConfig("vector dimension must be positive".to_string())); }
        let cmd = commands::create_index(index_name, schema, dimension, item_type);
        debug!(index = index_name, dimension, item_type, "FT.CREATE");
        cmd.query::<()>(&mut self.con)?;
        let ready = self.wait_for_index(index_name)?;
        info!(index = index_name, num_docs = ready.num_docs, "index ready");
        Ok(())
    }

    pub fn index_info(&mut self, index_name: &str) -> Result<IndexInfo> {
        let reply: Value = commands::index_info(index_name).query(&mut self.con)?;
        parse_info(&reply)
    }

    fn wait_for_index(&mut self, index_name: &str) -> Result<IndexInfo> {
        let mut attempts = 0u32;
        loop {
            let info = self.index_info(index_name)?;
            attempts += 1;
            if info.is_ready() { return Ok(info); }
            if self.readiness.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(Error::IndexNotReady { index: index_name.to_string(), attempts });
            }
            debug!(index = index_name, attempts, percent = ?info.percent_indexed, "index still building");
            thread::sleep(self.readiness.delay);
        }
    }

    /// Writes `{item_type}:{item_id}`, replacing any existing record.
    /// Returns the number of hash fields that did not exist before.
    pub fn add(&mut self, item_type: &str, item_id: &str, metadata: &Metadata, input: &EmbedInput, vector_field: &str) -> Result<usize> {
        check_item_type(item_type)?;
        let now = Utc::now().timestamp_micros() as f64 / 1_000_000.0;
        let vector = self.provider.embed(input)?;
        let fields = encode_fields(metadata, now, vector_field, vector)?;
        let key = record_key(item_type, item_id);
        debug!(key = %key, fields = fields.len(), "HSET");
        Ok(commands::hset(&key, &fields).query(&mut self.con)?)
    }

    /// Removes the record; `false` when there was nothing to remove.
    pub fn delete(&mut self, item_type: &str, item_id: &str) -> Result<bool> {
        let key = record_key(item_type, item_id);
        debug!(key = %key, "UNLINK");
        let removed: i64 = redis::cmd("UNLINK").arg(&key).query(&mut self.con)?;
        Ok(removed > 0)
    }

    /// Hybrid `filter=>[KNN k @vector_field $vector]` query, closest first.
    /// `filter` is passed to the engine verbatim (`*` matches everything).
    pub fn vector_search(&mut self, filter: &str, input: &EmbedInput, k: usize, index_name: &str, vector_field: &str) -> Result<Vec<SearchHit>> {
        if k == 0 { return Err(Error::InvalidConfig("k must be positive".to_string())); }
        let vector = self.provider.embed(input)?;
        let cmd = commands::vector_search(index_name, filter, k, vector_field, &vector);
        debug!(index = index_name, filter, k, "FT.SEARCH knn");
        let reply: Value = cmd.query(&mut self.con)?;
        parse_search(&reply, Some(&commands::score_field(vector_field)))
    }

    /// Plain filter query; hits carry no score and the engine's default page size applies.
    pub fn search(&mut self, filter: &str, index_name: &str) -> Result<Vec<SearchHit>> {
        debug!(index = index_name, filter, "FT.SEARCH");
        let reply: Value = commands::search(index_name, filter).query(&mut self.con)?;
        parse_search(&reply, None)
    }

    /// Fetches and decodes every field of a record; empty when absent.
    pub fn get(&mut self, item_type: &str, item_id: &str) -> Result<Record> {
        let key = record_key(item_type, item_id);
        let raw: HashMap<String, Vec<u8>> = redis::cmd("HGETALL").arg(&key).query(&mut self.con)?;
        debug!(key = %key, fields = raw.len(), "HGETALL");
        decode_fields(raw)
    }
}
