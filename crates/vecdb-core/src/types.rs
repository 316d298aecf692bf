//! Domain types shared by the embedding providers and the Redis client.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

/// Field values supplied on `add`, keyed by field name.
pub type Metadata = BTreeMap<String, FieldValue>;
/// A decoded record as returned by `get`; empty when the key does not exist.
pub type Record = BTreeMap<String, FieldValue>;

/// Index-side ANN algorithm for a vector field.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum VectorAlgorithm {
    #[default]
    Hnsw,
    Flat,
}

impl VectorAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self { Self::Hnsw => "HNSW", Self::Flat => "FLAT" }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum DistanceMetric {
    #[default]
    Cosine,
    L2,
    Ip,
}

impl DistanceMetric {
    pub fn as_str(self) -> &'static str {
        match self { Self::Cosine => "COSINE", Self::L2 => "L2", Self::Ip => "IP" }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VectorParams {
    pub algorithm: VectorAlgorithm,
    pub distance: DistanceMetric,
}

/// What an index does with a field. Tag and numeric fields are sortable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FieldKind {
    Vector(VectorParams),
    Text,
    Tag,
    Numeric,
}

impl FieldKind {
    /// Parses a kind name such as `"TagField"` or `"tag"` for the field `field`.
    pub fn parse(field: &str, kind: &str) -> Result<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "vectorfield" | "vector" => Ok(Self::Vector(VectorParams::default())),
            "textfield" | "text" => Ok(Self::Text),
            "tagfield" | "tag" => Ok(Self::Tag),
            "numericfield" | "numeric" => Ok(Self::Numeric),
            _ => Err(Error::InvalidConfig(format!("unknown kind '{kind}' for field '{field}'"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaField {
    pub name: String,
    pub kind: FieldKind,
}

/// Ordered field list an index is built from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<SchemaField>,
}

impl Default for Schema {
    /// `vec` vector, `descr` text, `labels` tag and `time` numeric.
    fn default() -> Self {
        Self::empty()
            .with("vec", FieldKind::Vector(VectorParams::default()))
            .with("descr", FieldKind::Text)
            .with("labels", FieldKind::Tag)
            .with("time", FieldKind::Numeric)
    }
}

impl Schema {
    pub fn empty() -> Self { Self { fields: Vec::new() } }

    /// Adds a field, replacing the kind of an existing field with the same name.
    pub fn with(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.kind = kind,
            None => self.fields.push(SchemaField { name, kind }),
        }
        self
    }

    /// Builds a schema from `(field, kind name)` pairs, failing on the first unknown kind.
    pub fn from_pairs<I, N, K>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, K)>,
        N: AsRef<str>,
        K: AsRef<str>,
    {
        let mut schema = Self::empty();
        for (name, kind) in pairs {
            let kind = FieldKind::parse(name.as_ref(), kind.as_ref())?;
            schema = schema.with(name.as_ref(), kind);
        }
        Ok(schema)
    }

    pub fn fields(&self) -> &[SchemaField] { &self.fields }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.kind)
    }
}

/// Storage-level type recorded next to each written field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Number,
    Text,
    Vector,
    Bytes,
}

/// A field value. `List` only exists on the write side: it is stored as a
/// `", "`-joined string and reads back as `Text`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
    Vector(Vec<f32>),
    Bytes(Vec<u8>),
}

impl FieldValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Number(_) => ValueKind::Number,
            Self::Text(_) | Self::List(_) => ValueKind::Text,
            Self::Vector(_) => ValueKind::Vector,
            Self::Bytes(_) => ValueKind::Bytes,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self { Self::Number(n) => Some(*n), _ => None }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self { Self::Text(s) => Some(s), _ => None }
    }

    pub fn as_vector(&self) -> Option<&[f32]> {
        match self { Self::Vector(v) => Some(v), _ => None }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
            Self::Vector(v) => write!(f, "{v:?}"),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<f64> for FieldValue { fn from(v: f64) -> Self { Self::Number(v) } }
impl From<i64> for FieldValue { fn from(v: i64) -> Self { Self::Number(v as f64) } }
impl From<&str> for FieldValue { fn from(v: &str) -> Self { Self::Text(v.to_string()) } }
impl From<String> for FieldValue { fn from(v: String) -> Self { Self::Text(v) } }
impl From<Vec<String>> for FieldValue { fn from(v: Vec<String>) -> Self { Self::List(v) } }
impl From<Vec<&str>> for FieldValue {
    fn from(v: Vec<&str>) -> Self { Self::List(v.into_iter().map(str::to_string).collect()) }
}
impl From<Vec<f32>> for FieldValue { fn from(v: Vec<f32>) -> Self { Self::Vector(v) } }

/// Input handed to an embedding provider.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbedInput {
    Numbers(Vec<f64>),
    Text(String),
}

impl From<Vec<f64>> for EmbedInput { fn from(v: Vec<f64>) -> Self { Self::Numbers(v) } }
impl From<&[f64]> for EmbedInput { fn from(v: &[f64]) -> Self { Self::Numbers(v.to_vec()) } }
impl From<Vec<f32>> for EmbedInput {
    fn from(v: Vec<f32>) -> Self { Self::Numbers(v.into_iter().map(f64::from).collect()) }
}
impl From<&str> for EmbedInput { fn from(v: &str) -> Self { Self::Text(v.to_string()) } }
impl From<String> for EmbedInput { fn from(v: String) -> Self { Self::Text(v) } }

/// One search result. `id` matches the `item_id` passed to `add`; `score` is
/// the engine distance (lower is closer) and only set for vector searches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub item_type: String,
    pub score: Option<f32>,
}

impl SearchHit {
    /// Splits a document key `type:id` at its first `:`.
    pub fn from_key(key: &str, score: Option<f32>) -> Option<Self> {
        let (item_type, id) = key.split_once(':')?;
        Some(Self { id: id.to_string(), item_type: item_type.to_string(), score })
    }

    pub fn key(&self) -> String { record_key(&self.item_type, &self.id) }
}

pub fn record_key(item_type: &str, item_id: &str) -> String { format!("{item_type}:{item_id}") }
