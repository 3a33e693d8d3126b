// Configuration management with layered configuration (file, env)

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure containing all configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub display: DisplayConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Path the speedtest runner appends its CSV log to
    pub log_path: String,
    /// How long startup waits for the log to appear (in seconds)
    pub startup_timeout_seconds: u64,
    /// How often startup re-checks for the log (in seconds)
    pub startup_poll_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
}

impl Settings {
    /// Load configuration with layered precedence: defaults → file → env
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default configuration
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Add local configuration (not committed to git)
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // Add environment-specific configuration
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if self.display.log_path.is_empty() {
            return Err("Display log_path cannot be empty".to_string());
        }
        if self.display.startup_poll_seconds == 0 {
            return Err("Display startup_poll_seconds must be greater than 0".to_string());
        }
        if self.display.startup_timeout_seconds < self.display.startup_poll_seconds {
            return Err(
                "Display startup_timeout_seconds must be at least startup_poll_seconds".to_string(),
            );
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            display: DisplayConfig {
                log_path: "/app/log/ookla_speedtest_log.csv".to_string(),
                startup_timeout_seconds: 300,
                startup_poll_seconds: 2,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
            },
        }
    }
}
