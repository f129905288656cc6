// src/config.rs - Configuration management
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub session: SessionConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the SQLite file backing the document collections.
    pub database_path: String,
}

/// The operator account the stand-in identity provider signs in as. Absent
/// means the service starts signed out.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SessionConfig {
    pub operator: Option<OperatorConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OperatorConfig {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

// Defaults keep tests and local runs free of any ENV reads.

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: "pharmatrack.db".to_string(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("invalid configuration file")
    }
}

/// File (PHARMATRACK_CONFIG, default config.toml) -> env overrides ->
/// built-in defaults.
pub fn load_config() -> Result<Config> {
    dotenvy::dotenv().ok();

    let config_path = env::var("PHARMATRACK_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let mut config = if Path::new(&config_path).exists() {
        let raw = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path))?;
        Config::from_toml(&raw)?
    } else {
        Config::default()
    };

    if let Ok(host) = env::var("PHARMATRACK_HOST") {
        config.server.host = host;
    }
    if let Ok(port) = env::var("PHARMATRACK_PORT") {
        config.server.port = port
            .parse()
            .context("PHARMATRACK_PORT must be a port number")?;
    }
    if let Ok(path) = env::var("PHARMATRACK_DB") {
        config.store.database_path = path;
    }
    if let Ok(origins) = env::var("ALLOWED_ORIGINS") {
        config.security.allowed_origins = origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Ok(level) = env::var("PHARMATRACK_LOG") {
        config.logging.level = level;
    }

    Ok(config)
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.database_path, "pharmatrack.db");
        assert!(config.session.operator.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 9090

            [session.operator]
            id = "uid-ops"
            email = "ops@pharmacy.example"
            display_name = "Operations"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        let operator = config.session.operator.unwrap();
        assert_eq!(operator.email, "ops@pharmacy.example");
        assert_eq!(operator.photo_url, None);
    }

    #[test]
    fn test_garbage_toml_is_an_error() {
        assert!(Config::from_toml("server = 'not a table").is_err());
    }
}
