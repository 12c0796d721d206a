#[cfg(test)]
mod tests;

use std::env;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

pub const DEFAULT_EMBEDDING_DIMENSION: u32 = 768;
pub const DEFAULT_BATCH_SIZE: u32 = 100;

const DATABASE_URL_VAR: &str = "DATABASE_URL";
const CA_CERT_VAR: &str = "MOVIE_RECS_CA_CERT";
const OLLAMA_PROTOCOL_VAR: &str = "OLLAMA_PROTOCOL";
const OLLAMA_HOST_VAR: &str = "OLLAMA_HOST";
const OLLAMA_PORT_VAR: &str = "OLLAMA_PORT";
const OLLAMA_MODEL_VAR: &str = "OLLAMA_MODEL";
const DIMENSION_VAR: &str = "MOVIE_RECS_DIMENSION";
const BATCH_SIZE_VAR: &str = "MOVIE_RECS_BATCH_SIZE";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub ollama: OllamaConfig,
}

/// Where the movie records live. TLS is always on; `ca_cert` names the
/// trust-anchor certificate used to verify the server.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub ca_cert: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OllamaConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub model: String,
    pub batch_size: u32,
    pub embedding_dimension: u32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 11434,
            model: "nomic-embed-text:latest".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            embedding_dimension: DEFAULT_EMBEDDING_DIMENSION,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable {0} is not set")]
    MissingVar(&'static str),
    #[error("Environment variable {0} has invalid value: {1}")]
    InvalidVar(&'static str, String),
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
    #[error("Invalid port: {0} (must be between 1 and 65535)")]
    InvalidPort(u16),
    #[error("Invalid batch size: {0} (must be between 1 and 1000)")]
    InvalidBatchSize(u32),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid protocol: {0} (must be 'http' or 'https')")]
    InvalidProtocol(String),
    #[error("Invalid embedding dimension: {0} (must be between 64 and 4096)")]
    InvalidEmbeddingDimension(u32),
}

impl Config {
    /// Load the configuration from the process environment.
    #[inline]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load the configuration from an arbitrary variable source.
    #[inline]
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(DATABASE_URL_VAR).ok_or(ConfigError::MissingVar(DATABASE_URL_VAR))?;
        let ca_cert = lookup(CA_CERT_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("ca.pem"));

        let defaults = OllamaConfig::default();
        let ollama = OllamaConfig {
            protocol: lookup(OLLAMA_PROTOCOL_VAR).unwrap_or(defaults.protocol),
            host: lookup(OLLAMA_HOST_VAR).unwrap_or(defaults.host),
            port: parse_var(&lookup, OLLAMA_PORT_VAR)?.unwrap_or(defaults.port),
            model: lookup(OLLAMA_MODEL_VAR).unwrap_or(defaults.model),
            batch_size: parse_var(&lookup, BATCH_SIZE_VAR)?.unwrap_or(defaults.batch_size),
            embedding_dimension: parse_var(&lookup, DIMENSION_VAR)?
                .unwrap_or(defaults.embedding_dimension),
        };

        let config = Self {
            database: DatabaseConfig { url, ca_cert },
            ollama,
        };
        config.validate()?;

        Ok(config)
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.ollama.validate()?;
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed =
            Url::parse(&self.url).map_err(|_| ConfigError::InvalidDatabaseUrl(self.url.clone()))?;

        if parsed.scheme() != "postgres" && parsed.scheme() != "postgresql" {
            return Err(ConfigError::InvalidDatabaseUrl(self.url.clone()));
        }

        Ok(())
    }
}

impl OllamaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.protocol != "http" && self.protocol != "https" {
            return Err(ConfigError::InvalidProtocol(self.protocol.clone()));
        }

        let url_str = format!("{}://{}:{}", self.protocol, self.host, self.port);
        Url::parse(&url_str).map_err(|_| ConfigError::InvalidUrl(url_str))?;

        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.model.clone()));
        }

        if self.batch_size == 0 || self.batch_size > 1000 {
            return Err(ConfigError::InvalidBatchSize(self.batch_size));
        }

        if !(64..=4096).contains(&self.embedding_dimension) {
            return Err(ConfigError::InvalidEmbeddingDimension(
                self.embedding_dimension,
            ));
        }

        Ok(())
    }

    pub fn ollama_url(&self) -> Result<Url, ConfigError> {
        let url_str = format!("{}://{}:{}", self.protocol, self.host, self.port);
        Url::parse(&url_str).map_err(|_| ConfigError::InvalidUrl(url_str))
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar(name, raw)),
        None => Ok(None),
    }
}
