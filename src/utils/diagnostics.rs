//! System Diagnostics and Status Reporting
//!
//! Provides startup diagnostics and runtime status for debugging and
//! the `/health` endpoint.

use std::time::{Duration, Instant};
use sysinfo::System;
use tracing::info;

use crate::config::Config;
use crate::session::ConnectionTracker;

/// System information for diagnostics
#[derive(Debug, Clone)]
pub struct SystemInfo {
    /// Operating system name (e.g., "Linux", "Ubuntu")
    pub os_name: String,
    /// Operating system version string
    pub os_version: String,

    /// Kernel version string
    pub kernel_version: String,

    /// Number of logical CPU cores
    pub cpu_count: usize,

    /// System hostname
    pub hostname: String,
}

impl SystemInfo {
    /// Gather system information
    pub fn gather() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu();

        Self {
            os_name: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version().unwrap_or_else(|| "Unknown".to_string()),
            cpu_count: sys.cpus().len(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }

    /// Log system information
    pub fn log(&self) {
        info!("=== System Information ===");
        info!("  OS: {} {}", self.os_name, self.os_version);
        info!("  Kernel: {}", self.kernel_version);
        info!("  Hostname: {}", self.hostname);
        info!("  CPUs: {}", self.cpu_count);
    }
}

/// Point-in-time server status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Time since the server started
    pub uptime: Duration,

    /// Sessions currently open
    pub active_connections: usize,

    /// Sessions opened since start
    pub total_connections: u64,
}

impl RuntimeStats {
    /// Capture current stats
    pub fn capture(start_time: Instant, tracker: &ConnectionTracker) -> Self {
        Self {
            uptime: start_time.elapsed(),
            active_connections: tracker.active(),
            total_connections: tracker.total(),
        }
    }

    /// Format uptime as string
    pub fn uptime_string(&self) -> String {
        let secs = self.uptime.as_secs();
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        let seconds = secs % 60;
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }

    /// Log current status
    pub fn log_status(&self) {
        info!("=== Server Status ===");
        info!("  Uptime: {}", self.uptime_string());
        info!("  Active connections: {}", self.active_connections);
        info!("  Total connections: {}", self.total_connections);
    }
}

/// Log complete diagnostics on startup
pub fn log_startup_diagnostics(config: &Config) {
    info!("╔════════════════════════════════════════════════════════════╗");
    info!("║          Startup Diagnostics                               ║");
    info!("╚════════════════════════════════════════════════════════════╝");

    SystemInfo::gather().log();

    info!("=== Server Configuration ===");
    info!("  Version: {}", env!("CARGO_PKG_VERSION"));
    #[cfg(debug_assertions)]
    info!("  Build: debug");
    #[cfg(not(debug_assertions))]
    info!("  Build: release");
    info!("  Listen: {}", config.server.listen_addr);
    if config.server.max_connections == 0 {
        info!("  Max connections: unlimited");
    } else {
        info!("  Max connections: {}", config.server.max_connections);
    }
    info!(
        "  Pointer: {} ({}x{})",
        config.pointer.backend, config.pointer.screen_width, config.pointer.screen_height
    );
    info!(
        "  Motion: speed {:.2}, bounds {}, silent {}",
        config.motion.speed_factor, config.motion.enforce_bounds, config.motion.silent
    );

    let stab = &config.stabilization;
    if stab.enabled {
        info!(
            "  Stabilization: dead zone {}px, smoothing {:.2}, jiggle {}, drift {}, depth {}",
            stab.filter.dead_zone,
            stab.filter.smoothing_level,
            stab.filter.jiggle_filter,
            stab.filter.anti_drift,
            stab.filter.history_depth
        );
    } else {
        info!("  Stabilization: off");
    }
}
