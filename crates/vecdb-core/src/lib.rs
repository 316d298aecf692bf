//! Shared building blocks for the Redis vector-search client: schema and
//! record types, the embedding provider seam, the float32 wire codec and
//! configuration loading.

pub mod codec;
pub mod config;
pub mod error;
pub mod passthrough;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use passthrough::PassThrough;
pub use traits::EmbeddingProvider;
pub use types::{EmbedInput, FieldKind, FieldValue, Metadata, Record, Schema, SearchHit};
