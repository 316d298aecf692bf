//! Layered configuration for the client and the demo binaries.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars,
//! with `__` separating nested keys (`APP_DB__HOST` overrides `db.host`).
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        Self::from_figment(figment.merge(Self::env_provider()))
    }

    /// Loads a single TOML file, still honouring `APP_*` overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_figment(Figment::new().merge(Toml::file(path.as_ref())).merge(Self::env_provider()))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config = Self { figment };
        config.settings()?.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{key}': {e}")))
    }

    pub fn settings(&self) -> Result<Settings> {
        self.figment.extract().map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    fn env_provider() -> Env { Env::prefixed("APP_").split("__") }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub db: DbSettings,
    pub index: IndexSettings,
    pub embedding: EmbeddingSettings,
}

impl Settings {
    fn validate(&self) -> Result<()> {
        if self.db.host.trim().is_empty() { return Err(Error::InvalidConfig("db.host must not be empty".to_string())); }
        if self.db.port == 0 { return Err(Error::InvalidConfig("db.port must be non-zero".to_string())); }
        if self.index.item_type.is_empty() || self.index.item_type.contains(':') {
            return Err(Error::InvalidConfig(format!("index.item_type '{}' must be non-empty and contain no ':'", self.index.item_type)));
        }
        if self.embedding.max_len == 0 { return Err(Error::InvalidConfig("embedding.max_len must be positive".to_string())); }
        Ok(())
    }
}

/// Connection parameters. The password is sent as-is; TLS is not configured here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
}

impl Default for DbSettings {
    fn default() -> Self { Self { host: "localhost".to_string(), port: 6379, password: None } }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IndexSettings {
    pub name: String,
    pub item_type: String,
    pub vector_field: String,
    pub poll_delay_ms: u64,
    /// Readiness polls before giving up; `None` waits forever.
    pub max_poll_attempts: Option<u32>,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            name: "vectors".to_string(),
            item_type: "vec".to_string(),
            vector_field: "vec".to_string(),
            poll_delay_ms: 100,
            max_poll_attempts: Some(600),
        }
    }
}

impl IndexSettings {
    pub fn poll_delay(&self) -> Duration { Duration::from_millis(self.poll_delay_ms) }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub model_dir: PathBuf,
    pub max_len: usize,
    pub use_fake: bool,
    pub fake_dim: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { model_dir: PathBuf::from("models/all-distilroberta-v1"), max_len: 256, use_fake: false, fake_dim: 768 }
    }
}
