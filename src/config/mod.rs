//! # Configuration Management Module
//!
//! TOML configuration for the puzzle engine, loaded once at startup.
//!
//! ## Configuration Structure
//!
//! - [`EngineConfig`] - command prefix, tick rate, progress store name
//! - [`ConsoleConfig`] - operator console behaviour (wipe confirmation expiry)
//! - [`StorageConfig`] - where the sled world properties live
//! - [`LevelsConfig`] - optional JSON level pack
//! - [`LoggingConfig`] - log level and files
//!
//! ## Usage
//!
//! ```rust,no_run
//! use blockpuzzle::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("World data: {}", config.storage.data_dir);
//!     Config::create_default("config.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [engine]
//! name = "Puzzle World"
//! command_prefix = "!"
//! tick_interval_ms = 50
//! progress_store = "level"
//!
//! [console]
//! # confirm_timeout_secs = 30
//!
//! [storage]
//! data_dir = "./data/world"
//!
//! [levels]
//! # pack = "levels.json"
//!
//! [logging]
//! level = "info"
//! file = "blockpuzzle.log"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::fs;

use crate::console::{ALLOWED_PREFIXES, DEFAULT_PREFIX};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub name: String,
    /// Chat command prefix. Must be one of a hard-coded allowed set; anything else means "!".
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    /// Milliseconds between level ticks. 50 gives the usual 20 ticks per second.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Number store holding the index of the current level.
    #[serde(default = "default_progress_store")]
    pub progress_store: String,
}

fn default_command_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_tick_interval_ms() -> u64 {
    50
}

fn default_progress_store() -> String {
    "level".to_string()
}

impl EngineConfig {
    /// Configured prefix if allowed, otherwise the default.
    pub fn effective_prefix(&self) -> &str {
        if ALLOWED_PREFIXES.contains(&self.command_prefix.as_str()) {
            &self.command_prefix
        } else {
            eprintln!(
                "Invalid command prefix '{}', defaulting to '{}'",
                self.command_prefix, DEFAULT_PREFIX
            );
            DEFAULT_PREFIX
        }
    }

    /// Tick interval, never below 1ms.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConsoleConfig {
    /// Seconds an armed bulk deletion stays confirmable. Unset means no expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_timeout_secs: Option<u64>,
}

impl ConsoleConfig {
    pub fn confirm_timeout(&self) -> Option<Duration> {
        self.confirm_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LevelsConfig {
    /// JSON level pack. When unset the built-in levels are used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    /// Separate audit log for destructive console actions.
    #[serde(default)]
    pub security_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub engine: EngineConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub levels: LevelsConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            engine: EngineConfig {
                name: "Puzzle World".to_string(),
                command_prefix: default_command_prefix(),
                tick_interval_ms: default_tick_interval_ms(),
                progress_store: default_progress_store(),
            },
            console: ConsoleConfig::default(),
            storage: StorageConfig {
                data_dir: "./data/world".to_string(),
            },
            levels: LevelsConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("blockpuzzle.log".to_string()),
                security_file: Some("blockpuzzle-security.log".to_string()),
            },
        }
    }
}
