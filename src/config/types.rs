//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::stabilizer::StabilizationConfig;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Log connection lifecycle and rejected frames
    #[serde(default = "default_true")]
    pub verbose: bool,

    /// Maximum number of concurrent connections (0 = unlimited)
    #[serde(default)]
    pub max_connections: usize,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            verbose: true,
            max_connections: 0,
        }
    }
}

/// Stabilization defaults for new sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilizationSettings {
    /// Attach a filter when a session starts
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter parameters
    #[serde(flatten)]
    pub filter: StabilizationConfig,
}

impl Default for StabilizationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            filter: StabilizationConfig::default(),
        }
    }
}

/// Pointer backend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerConfig {
    /// Backend name ("virtual")
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Screen width reported by the virtual backend
    #[serde(default = "default_screen_width")]
    pub screen_width: i32,

    /// Screen height reported by the virtual backend
    #[serde(default = "default_screen_height")]
    pub screen_height: i32,
}

fn default_backend() -> String {
    "virtual".to_string()
}
fn default_screen_width() -> i32 {
    1920
}
fn default_screen_height() -> i32 {
    1080
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level ("trace", "debug", "info", "warn", "error")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files (None = console only)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: None,
        }
    }
}
