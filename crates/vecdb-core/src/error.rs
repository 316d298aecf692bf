use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot coerce input: {0}")]
    Coercion(String),

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Decode failed: {0}")]
    Decode(String),

    #[error("Embedding model failed: {0}")]
    Model(String),

    #[error("Index '{index}' not ready after {attempts} polls")]
    IndexNotReady { index: String, attempts: u32 },

    /// Failures reported by the engine or the connection, passed through untouched.
    #[error(transparent)]
    Engine(#[from] redis::RedisError),
}

pub type Result<T> = std::result::Result<T, Error>;
