// src/config.rs - Environment-driven configuration with CLI overrides

use std::path::PathBuf;

/// Everything the pipeline needs to run. Values come from `.env` / process
/// environment, with CLI flags taking precedence (applied in `cli.rs`).
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub openai_api_key: String,
    pub materials_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub output_dir: PathBuf,
    pub batch_size: usize,
    pub pause_seconds: f64,
    pub soffice_bin: String,
    /// Regenerate artifacts even when they already exist in the cache
    pub force: bool,
    /// Stop after per-word videos, skipping batch concatenation
    pub skip_batching: bool,
    /// Explicit word list; when non-empty the materials directory is ignored
    pub words: Vec<String>,
}

impl Config {
    /// Build a config from the process environment. CLI overrides are layered
    /// on top by the caller.
    pub fn from_env() -> Result<Self, ConfigError> {
        let anthropic_api_key = require_env("ANTHROPIC_API_KEY")?;
        let openai_api_key = require_env("OPENAI_API_KEY")?;

        let batch_size = parse_env("BATCH_SIZE", 10usize)?;
        let pause_seconds = parse_env("PAUSE_SECONDS", 2.0f64)?;

        let config = Self {
            anthropic_api_key,
            openai_api_key,
            materials_dir: env_or("MATERIALS_DIR", "materials").into(),
            cache_dir: env_or("CACHE_DIR", "cache").into(),
            output_dir: env_or("OUTPUT_DIR", "output").into(),
            batch_size,
            pause_seconds,
            soffice_bin: env_or("SOFFICE_BIN", "soffice"),
            force: false,
            skip_batching: false,
            words: Vec::new(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid {
                key: "BATCH_SIZE",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.pause_seconds < 0.0 {
            return Err(ConfigError::Invalid {
                key: "PAUSE_SECONDS",
                reason: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

fn require_env(key: &'static str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty()).unwrap_or_else(|| default.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            anthropic_api_key: "test-anthropic".to_string(),
            openai_api_key: "test-openai".to_string(),
            materials_dir: "materials".into(),
            cache_dir: "cache".into(),
            output_dir: "output".into(),
            batch_size: 10,
            pause_seconds: 2.0,
            soffice_bin: "soffice".to_string(),
            force: false,
            skip_batching: false,
            words: Vec::new(),
        }
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let mut config = test_config();
        config.batch_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("BATCH_SIZE"));
    }

    #[test]
    fn test_negative_pause_is_rejected() {
        let mut config = test_config();
        config.pause_seconds = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_defaults_pass_validation() {
        assert!(test_config().validate().is_ok());
    }
}
