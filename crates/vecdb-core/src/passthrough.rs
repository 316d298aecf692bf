//! Provider for callers that already hold numeric vectors.

use crate::codec::encode_f32;
use crate::error::{Error, Result};
use crate::traits::EmbeddingProvider;
use crate::types::EmbedInput;

/// Encodes numeric input directly. Text is accepted only when every comma or
/// whitespace separated token is a number.
#[derive(Debug, Clone, Default)]
pub struct PassThrough {
    dim: Option<usize>,
}

impl PassThrough {
    pub fn new() -> Self { Self::default() }

    /// Pins the dimension; inputs of any other length are rejected.
    pub fn with_dim(dim: usize) -> Self { Self { dim: Some(dim) } }

    fn coerce(input: &EmbedInput) -> Result<Vec<f32>> {
        let values: Vec<f32> = match input {
            EmbedInput::Numbers(v) => v.iter().map(|&x| x as f32).collect(),
            EmbedInput::Text(s) => s
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
                .map(|t| t.parse::<f32>().map_err(|_| Error::Coercion(format!("'{t}' is not a number"))))
                .collect::<Result<_>>()?,
        };
        if values.is_empty() { return Err(Error::Coercion("empty vector".to_string())); }
        Ok(values)
    }
}

impl EmbeddingProvider for PassThrough {
    fn name(&self) -> &str { "passthrough" }

    fn embed(&self, input: &EmbedInput) -> Result<Vec<u8>> {
        let values = Self::coerce(input)?;
        if let Some(expected) = self.dim {
            if values.len() != expected { return Err(Error::DimensionMismatch { expected, got: values.len() }); }
        }
        Ok(encode_f32(&values))
    }

    fn probe(&self) -> EmbedInput { EmbedInput::Numbers(vec![0.0; self.dim.unwrap_or(1)]) }

    fn dim(&self) -> Result<usize> {
        self.dim.ok_or_else(|| Error::InvalidConfig("pass-through provider has no intrinsic dimension; pass it to create_index".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_f32;

    #[test]
    fn numbers_round_trip() {
        let p = PassThrough::new();
        let out = p.embed(&EmbedInput::Numbers(vec![0.9, 0.7, 0.2])).unwrap();
        let back = decode_f32(&out).unwrap();
        for (a, b) in back.iter().zip([0.9f32, 0.7, 0.2]) { assert!((a - b).abs() < 1e-6); }
    }

    #[test]
    fn numeric_text_is_coerced() {
        let out = PassThrough::new().embed(&EmbedInput::from("1.5, 2 3")).unwrap();
        assert_eq!(decode_f32(&out).unwrap(), vec![1.5, 2.0, 3.0]);
    }

    #[test]
    fn non_numeric_text_is_a_coercion_error() {
        let err = PassThrough::new().embed(&EmbedInput::from("hello world")).unwrap_err();
        assert!(matches!(err, Error::Coercion(_)), "{err}");
        assert!(matches!(PassThrough::new().embed(&EmbedInput::Numbers(vec![])), Err(Error::Coercion(_))));
    }

    #[test]
    fn pinned_dimension_is_enforced() {
        let p = PassThrough::with_dim(3);
        assert_eq!(p.dim().unwrap(), 3);
        assert_eq!(decode_f32(&p.embed(&p.probe()).unwrap()).unwrap().len(), 3);
        assert!(matches!(p.embed(&EmbedInput::Numbers(vec![1.0, 2.0])), Err(Error::DimensionMismatch { expected: 3, got: 2 })));
        assert!(matches!(PassThrough::new().dim(), Err(Error::InvalidConfig(_))));
    }
}
