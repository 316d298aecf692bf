//! Redis vector-search client: index creation, writes, deletes, record
//! fetches and filter/KNN queries over RediSearch.
pub mod client;
pub mod commands;
pub mod record;
pub mod response;

pub use client::{ReadinessPolicy, VectorDb, DEFAULT_VECTOR_FIELD};
pub use response::IndexInfo;
