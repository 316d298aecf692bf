//! Text embedding providers: a local candle sentence model and a fast fake.
//!
//! `default_text_provider` respects `APP_USE_FAKE_EMBEDDINGS=1` (or
//! `embedding.use_fake`) to switch to the `FakeEmbedder` for deterministic
//! outputs in tests and development.
use tracing::info;

use vecdb_core::config::EmbeddingSettings;
use vecdb_core::{EmbeddingProvider, Error, Result};

pub mod device;
pub mod fake;
pub mod model;
pub mod pool;
pub mod tokenize;

pub use fake::FakeEmbedder;
pub use model::TextModel;
pub use pool::masked_mean_l2;

pub fn use_fake_embeddings() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

pub fn default_text_provider(settings: &EmbeddingSettings) -> Result<Box<dyn EmbeddingProvider>> {
    if settings.use_fake || use_fake_embeddings() {
        info!(dim = settings.fake_dim, "using FakeEmbedder");
        return Ok(Box::new(FakeEmbedder::new(settings.fake_dim)));
    }
    let model = TextModel::load(&settings.model_dir, settings.max_len).map_err(|e| Error::Model(e.to_string()))?;
    Ok(Box::new(model))
}
