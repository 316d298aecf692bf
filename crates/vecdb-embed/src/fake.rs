use std::hash::Hasher;
use twox_hash::XxHash64;

use vecdb_core::codec::encode_f32;
use vecdb_core::{EmbedInput, EmbeddingProvider, Error, Result};

/// Deterministic token-hashing embedder for tests and offline development.
pub struct FakeEmbedder { dim: usize, id: String }

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim: dim.max(1), id: format!("fake:d{}", dim.max(1)) } }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            hasher.write(token.to_lowercase().as_bytes());
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v { *x /= norm; }
        v
    }
}

impl EmbeddingProvider for FakeEmbedder {
    fn name(&self) -> &str { &self.id }

    fn embed(&self, input: &EmbedInput) -> Result<Vec<u8>> {
        match input {
            EmbedInput::Text(text) => Ok(encode_f32(&self.embed_text(text))),
            EmbedInput::Numbers(_) => Err(Error::Coercion("text embedder expects text input".to_string())),
        }
    }
}
