use crate::codec::decode_f32;
use crate::error::Result;
use crate::types::EmbedInput;

/// Turns application input into the float32 bytes stored in a vector field.
pub trait EmbeddingProvider: Send + Sync {
    /// Stable identifier for the provider/model.
    fn name(&self) -> &str;
    /// Encodes `input` as little-endian float32 bytes.
    fn embed(&self, input: &EmbedInput) -> Result<Vec<u8>>;
    /// Canonical input used to measure the output dimension.
    fn probe(&self) -> EmbedInput { EmbedInput::Text("Any text would do here.".to_string()) }
    /// Output dimensionality, measured by embedding `probe()`.
    fn dim(&self) -> Result<usize> { Ok(decode_f32(&self.embed(&self.probe())?)?.len()) }
}

impl<T: EmbeddingProvider + ?Sized> EmbeddingProvider for Box<T> {
    fn name(&self) -> &str { (**self).name() }
    fn embed(&self, input: &EmbedInput) -> Result<Vec<u8>> { (**self).embed(input) }
    fn probe(&self) -> EmbedInput { (**self).probe() }
    fn dim(&self) -> Result<usize> { (**self).dim() }
}
