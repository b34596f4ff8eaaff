//! Configuration management
//!
//! Handles loading, validation, and merging of configuration from:
//! - TOML files
//! - Environment variables
//! - CLI arguments
//!
//! Every section and field is optional in the file; anything missing takes
//! its default.
//!
//! ```toml
//! [server]
//! listen_addr = "0.0.0.0:8080"
//! verbose = true
//! max_connections = 0
//!
//! [motion]
//! speed_factor = 1.0
//! enforce_bounds = true
//! silent = false
//!
//! [stabilization]
//! enabled = true
//! dead_zone = 2
//! smoothing_level = 0.3
//! jiggle_filter = true
//! anti_drift = true
//! history_depth = 5
//!
//! [pointer]
//! backend = "virtual"
//! screen_width = 1920
//! screen_height = 1080
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

pub mod types;

pub use types::{LoggingConfig, PointerConfig, ServerConfig, StabilizationSettings};

use crate::cursor::SUPPORTED_BACKENDS;
use crate::input::MotionConfig;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Initial motion settings for every session
    #[serde(default)]
    pub motion: MotionConfig,
    /// Initial stabilization settings for every session
    #[serde(default)]
    pub stabilization: StabilizationSettings,
    /// Pointer backend
    #[serde(default)]
    pub pointer: PointerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Create default configuration
    pub fn default_config() -> Result<Self> {
        let config = Config::default();
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.server
            .listen_addr
            .parse::<SocketAddr>()
            .context("Invalid listen address")?;

        let speed = self.motion.speed_factor;
        if !speed.is_finite() || speed == 0.0 {
            anyhow::bail!("Invalid speed factor: {} (must be finite and non-zero)", speed);
        }

        let filter = &self.stabilization.filter;
        if !(0.0..=1.0).contains(&filter.smoothing_level) {
            anyhow::bail!(
                "smoothing_level ({}) must be between 0.0 and 1.0",
                filter.smoothing_level
            );
        }
        if filter.history_depth == 0 {
            anyhow::bail!("history_depth must be at least 1");
        }

        if !SUPPORTED_BACKENDS.contains(&self.pointer.backend.as_str()) {
            anyhow::bail!(
                "Invalid pointer backend: {} (supported: {})",
                self.pointer.backend,
                SUPPORTED_BACKENDS.join(", ")
            );
        }
        if self.pointer.screen_width <= 0 || self.pointer.screen_height <= 0 {
            anyhow::bail!(
                "Invalid screen size: {}x{}",
                self.pointer.screen_width,
                self.pointer.screen_height
            );
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Invalid log level: {}", self.logging.level),
        }

        Ok(())
    }

    /// Override config with CLI arguments
    ///
    /// `listen` may be a bare IP or a full `ip:port`; `port` wins over both.
    pub fn with_overrides(mut self, listen: Option<String>, port: Option<u16>) -> Self {
        let current = self.server.listen_addr.parse::<SocketAddr>().ok();

        let mut addr = match listen {
            Some(listen) => match (listen.parse::<SocketAddr>(), listen.parse::<IpAddr>()) {
                (Ok(addr), _) => Some(addr),
                (_, Ok(ip)) => Some(SocketAddr::new(
                    ip,
                    current.map(|a| a.port()).unwrap_or(8080),
                )),
                _ => {
                    // Leave it for validate() to reject
                    self.server.listen_addr = listen;
                    None
                }
            },
            None => current,
        };

        if let (Some(addr), Some(port)) = (addr.as_mut(), port) {
            addr.set_port(port);
        }
        if let Some(addr) = addr {
            self.server.listen_addr = addr.to_string();
        }

        self
    }
}
