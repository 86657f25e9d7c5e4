//! Configuration structs

mod engine_config;

pub use engine_config::{ConfigError, DatabaseSettings, EngineConfig, EngineSettings, Environment};
