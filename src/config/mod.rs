//! Configuration module
//!
//! Handles loading and saving wireplay configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::network::NetworkConfig as RuntimeNetworkConfig;
use crate::protocol::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TOKEN};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Game server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Connection behaviour
    #[serde(default)]
    pub network: NetworkConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Game server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host name or address of the game server
    #[serde(default = "default_host")]
    pub host: String,
    /// Game server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Authentication token
    #[serde(default = "default_token")]
    pub token: String,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_token() -> String {
    DEFAULT_TOKEN.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            token: default_token(),
        }
    }
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Connection timeout in ms
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
    /// First reconnect delay in ms
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,
    /// Reconnect delay cap in ms
    #[serde(default = "default_max_reconnect_delay")]
    pub max_reconnect_delay_ms: u64,
    /// Reconnect attempts before giving up (0 = unlimited)
    #[serde(default)]
    pub max_reconnect_attempts: u32,
}

fn default_connect_timeout() -> u64 {
    5000
}

fn default_reconnect_delay() -> u64 {
    500
}

fn default_max_reconnect_delay() -> u64 {
    8000
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout(),
            reconnect_delay_ms: default_reconnect_delay(),
            max_reconnect_delay_ms: default_max_reconnect_delay(),
            max_reconnect_attempts: 0,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
    /// `tracing` filter directive, e.g. "wireplay=trace"; overrides `verbose`
    pub filter: Option<String>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the default location
    pub fn load_default() -> ConfigResult<Self> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("wireplay/config.toml")),
            Some(PathBuf::from("./wireplay.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                return Self::load(path);
            }
        }

        // Return default config if no file found
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Build the runtime network settings, with optional command-line overrides
    pub fn network_config(
        &self,
        host: Option<String>,
        port: Option<u16>,
        token: Option<String>,
    ) -> RuntimeNetworkConfig {
        RuntimeNetworkConfig {
            host: host.unwrap_or_else(|| self.server.host.clone()),
            port: port.unwrap_or(self.server.port),
            token: token.unwrap_or_else(|| self.server.token.clone()),
            connect_timeout_ms: self.network.connect_timeout_ms,
            reconnect_delay_ms: self.network.reconnect_delay_ms,
            max_reconnect_delay_ms: self.network.max_reconnect_delay_ms,
            max_reconnect_attempts: self.network.max_reconnect_attempts,
        }
    }

    /// Filter directive for the log subscriber
    pub fn log_filter(&self, verbose: bool) -> String {
        match &self.logging.filter {
            Some(filter) => filter.clone(),
            None if verbose || self.logging.verbose => "debug".to_string(),
            None => "info".to_string(),
        }
    }
}

/// Generate a sample configuration file
pub fn generate_sample_config() -> ConfigResult<String> {
    let config = Config {
        server: ServerConfig {
            host: "game.example.org".to_string(),
            token: "0123456789abcdef".to_string(),
            ..Default::default()
        },
        network: NetworkConfig {
            max_reconnect_attempts: 10,
            ..Default::default()
        },
        logging: LoggingConfig {
            verbose: false,
            filter: Some("wireplay=debug".to_string()),
        },
    };

    Ok(toml::to_string_pretty(&config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.server.token, DEFAULT_TOKEN);
        assert_eq!(config.network.reconnect_delay_ms, 500);
    }

    #[test]
    fn test_save_and_load() {
        let mut config = Config::default();
        config.server.port = 40000;
        let file = NamedTempFile::new().unwrap();

        config.save(file.path()).unwrap();

        let loaded = Config::load(file.path()).unwrap();
        assert_eq!(loaded.server.port, 40000);
        assert_eq!(loaded.server.host, DEFAULT_HOST);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]\ntoken = \"abc\"\n\n[logging]\nverbose = true").unwrap();

        let loaded = Config::load(file.path()).unwrap();
        assert_eq!(loaded.server.token, "abc");
        assert_eq!(loaded.server.port, DEFAULT_PORT);
        assert_eq!(loaded.network.connect_timeout_ms, 5000);
        assert_eq!(loaded.log_filter(false), "debug");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default();
        let runtime = config.network_config(None, Some(31002), Some("xyz".to_string()));
        assert_eq!(runtime.host, DEFAULT_HOST);
        assert_eq!(runtime.port, 31002);
        assert_eq!(runtime.token, "xyz");
        assert_eq!(runtime.reconnect_delay_ms, 500);
    }

    #[test]
    fn test_sample_config() {
        let sample = generate_sample_config().unwrap();
        let parsed: Config = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.server.host, "game.example.org");
        assert_eq!(parsed.log_filter(false), "wireplay=debug");
    }
}
