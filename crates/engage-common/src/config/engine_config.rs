//! Engine configuration
//!
//! Loads configuration from environment variables (with `.env` support via
//! dotenvy). Only the database settings are required; everything else has
//! sensible defaults.

use serde::Deserialize;
use std::env;

/// Top-level configuration for the engagement engine
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub env: Environment,
    pub database: DatabaseSettings,
    pub engine: EngineSettings,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Database connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Tunables for the engine itself
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// How many times a service re-runs its load-mutate-commit cycle after
    /// losing a commit race before surfacing the conflict to the caller.
    #[serde(default = "default_commit_retries")]
    pub commit_retries: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            commit_retries: default_commit_retries(),
        }
    }
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_commit_retries() -> u32 {
    8
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            env: env::var("APP_ENV")
                .ok()
                .and_then(|s| match s.to_lowercase().as_str() {
                    "production" => Some(Environment::Production),
                    "staging" => Some(Environment::Staging),
                    "development" => Some(Environment::Development),
                    _ => None,
                })
                .unwrap_or_default(),
            database: DatabaseSettings {
                url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            },
            engine: EngineSettings {
                commit_retries: env::var("ENGINE_COMMIT_RETRIES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_commit_retries),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_settings_default() {
        let settings = EngineSettings::default();
        assert_eq!(settings.commit_retries, 8);
    }

    #[test]
    fn test_environment_helpers() {
        assert!(Environment::Production.is_production());
        assert!(!Environment::Production.is_development());
        assert!(Environment::Development.is_development());
        assert_eq!(Environment::default(), Environment::Development);
    }
}
