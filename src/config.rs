//! Configuration module for anonboard.

use serde::Deserialize;
use std::path::Path;

use crate::{AnonboardError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means any origin without credentials.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/anonboard.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Cost parameters for hashing deletion passwords with Argon2id.
#[derive(Debug, Clone, Deserialize)]
pub struct SecretConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Time cost (iterations).
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    19_456 // 19 MiB
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}

impl Default for SecretConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty disables file logging.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/anonboard.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Secret hashing configuration.
    #[serde(default)]
    pub secret: SecretConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(AnonboardError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| AnonboardError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `ANONBOARD_DATABASE_PATH`: database file path
    /// - `ANONBOARD_PORT`: HTTP port (ignored if not a valid port number)
    /// - `ANONBOARD_LOG_LEVEL`: log level
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("ANONBOARD_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
        if let Ok(port) = std::env::var("ANONBOARD_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                // Logging is not up yet while config loads.
                Err(_) => eprintln!("Ignoring invalid ANONBOARD_PORT: {port}"),
            }
        }
        if let Ok(level) = std::env::var("ANONBOARD_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the database path is empty
    /// - the Argon2 cost parameters are rejected by the hasher
    pub fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(AnonboardError::Config(
                "database.path must not be empty".to_string(),
            ));
        }
        argon2::Params::new(
            self.secret.memory_kib,
            self.secret.iterations,
            self.secret.parallelism,
            None,
        )
        .map_err(|e| AnonboardError::Config(format!("invalid secret parameters: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert!(config.server.cors_origins.is_empty());

        assert_eq!(config.database.path, "data/anonboard.db");

        assert_eq!(config.secret.memory_kib, 19_456);
        assert_eq!(config.secret.iterations, 2);
        assert_eq!(config.secret.parallelism, 1);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/anonboard.log");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 8080
cors_origins = ["http://localhost:5173"]

[database]
path = "custom/board.sqlite"

[secret]
memory_kib = 8192
iterations = 1
parallelism = 2

[logging]
level = "debug"
file = "custom/board.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.database.path, "custom/board.sqlite");
        assert_eq!(config.secret.memory_kib, 8192);
        assert_eq!(config.secret.iterations, 1);
        assert_eq!(config.secret.parallelism, 2);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/board.log");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 4000
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.path, "data/anonboard.db");
        assert_eq!(config.secret.iterations, 2);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = Config::parse("[server\nport = ");
        assert!(matches!(result, Err(AnonboardError::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("does/not/exist.toml");
        assert!(matches!(result, Err(AnonboardError::Io(_))));
    }

    #[test]
    fn test_validate_default_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_database_path() {
        let mut config = Config::default();
        config.database.path = "  ".to_string();
        assert!(matches!(config.validate(), Err(AnonboardError::Config(_))));
    }

    #[test]
    fn test_validate_bad_secret_params() {
        let mut config = Config::default();
        config.secret.parallelism = 0;
        assert!(matches!(config.validate(), Err(AnonboardError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        // The only test touching these variables.
        std::env::set_var("ANONBOARD_PORT", "not-a-port");
        std::env::set_var("ANONBOARD_LOG_LEVEL", "debug");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.level, "debug");

        std::env::set_var("ANONBOARD_PORT", "8081");
        config.apply_env_overrides();
        assert_eq!(config.server.port, 8081);

        std::env::remove_var("ANONBOARD_PORT");
        std::env::remove_var("ANONBOARD_LOG_LEVEL");
    }
}
