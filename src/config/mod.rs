// Configuration management module
// All settings come from the environment; see settings for the variable names

pub mod settings;

pub use settings::{Config, ConfigError, DatabaseConfig, OllamaConfig};
