//! Sentence embedding model running locally on candle.
//!
//! Loads a RoBERTa-family encoder (tokenizer.json, config.json and either
//! model.safetensors or pytorch_model.bin) once, then embeds single texts by
//! masked mean pooling of the last hidden state with L2 normalisation.
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{Config as XLMRobertaConfig, XLMRobertaModel};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use vecdb_core::codec::encode_f32;
use vecdb_core::{EmbedInput, EmbeddingProvider, Error};

use crate::device::select_device;
use crate::pool::masked_mean_l2;
use crate::tokenize::tokenize_on_device;

pub struct TextModel { model: XLMRobertaModel, tokenizer: Tokenizer, device: Device, max_len: usize, id: String }

impl TextModel {
    /// Loads the model from `model_dir`. Expensive: do it once per process.
    pub fn load(model_dir: &Path, max_len: usize) -> Result<Self> {
        if !model_dir.exists() { return Err(anyhow!("Model directory {} does not exist", model_dir.display())); }
        let device = select_device();
        info!(dir = %model_dir.display(), "loading text embedding model");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let config_path = model_dir.join("config.json");
        let config: XLMRobertaConfig = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;
        let weights = load_weights(model_dir, &device)?;
        let vb = VarBuilder::from_tensors(weights, DType::F32, &device);
        let model = XLMRobertaModel::new(&config, vb)?;
        let id = format!("text:{}", model_dir.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default());
        info!(model = %id, "text embedding model loaded");
        Ok(Self { model, tokenizer, device, max_len, id })
    }

    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let start = Instant::now();
        let (input_ids, attention_mask) = tokenize_on_device(&self.tokenizer, text, self.max_len, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &attention_mask, &token_type_ids, None, None, None)?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let emb = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1::<f32>()?;
        let elapsed = start.elapsed();
        if elapsed.as_millis() > 100 { warn!(?elapsed, "slow embedding"); } else { debug!(?elapsed, dim = emb.len(), "embedded text"); }
        Ok(emb)
    }
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<HashMap<String, Tensor>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        return Ok(candle_core::safetensors::load(&safetensors, device)?);
    }
    let pickle = model_dir.join("pytorch_model.bin");
    if pickle.exists() {
        return Ok(candle_core::pickle::read_all(&pickle)?.into_iter().collect());
    }
    Err(anyhow!("No model.safetensors or pytorch_model.bin in {}", model_dir.display()))
}

impl EmbeddingProvider for TextModel {
    fn name(&self) -> &str { &self.id }

    fn embed(&self, input: &EmbedInput) -> vecdb_core::Result<Vec<u8>> {
        match input {
            EmbedInput::Text(text) => self.embed_text(text).map(|v| encode_f32(&v)).map_err(|e| Error::Model(e.to_string())),
            EmbedInput::Numbers(_) => Err(Error::Coercion("text model expects text input".to_string())),
        }
    }
}
