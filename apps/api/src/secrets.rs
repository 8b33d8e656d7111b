//! Credential sourcing.
//!
//! The answer pipeline asks a [`ConfigProvider`] for `OPENAI_API_KEY` on every request
//! instead of reading process state directly. Production wires a [`LayeredProvider`]
//! (secrets file first, environment second); tests inject a [`StaticProvider`].

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

/// Name of the credential looked up for the text-generation service.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

#[derive(Debug, Error)]
pub enum SecretsError {
    #[error("Failed to read secrets file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse secrets file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Key → optional value lookup. `None` means the source does not hold the key.
pub trait ConfigProvider: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Structured secrets store backed by a flat TOML file (`KEY = "value"` at top level).
#[derive(Debug, Clone, Default)]
pub struct SecretsFile {
    values: toml::Table,
}

impl SecretsFile {
    /// Loads the secrets file. A missing file is an empty store; an unreadable or
    /// malformed one is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SecretsError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No secrets file at {}; using environment only", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| SecretsError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let values: toml::Table = toml::from_str(&content).map_err(|source| SecretsError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        info!("Loaded {} secret(s) from {}", values.len(), path.display());
        Ok(Self { values })
    }
}

impl ConfigProvider for SecretsFile {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }
}

/// Process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvProvider;

impl ConfigProvider for EnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed in-memory values.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    values: HashMap<String, String>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl ConfigProvider for StaticProvider {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Asks each source in order; the first one holding the key wins, even with a blank value.
pub struct LayeredProvider {
    sources: Vec<Box<dyn ConfigProvider>>,
}

impl LayeredProvider {
    pub fn new(sources: Vec<Box<dyn ConfigProvider>>) -> Self {
        Self { sources }
    }

    /// Secrets file first, then the process environment.
    pub fn secrets_then_env(secrets: SecretsFile) -> Self {
        Self::new(vec![Box::new(secrets), Box::new(EnvProvider)])
    }
}

impl ConfigProvider for LayeredProvider {
    fn get(&self, key: &str) -> Option<String> {
        self.sources.iter().find_map(|source| source.get(key))
    }
}
