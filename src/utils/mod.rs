//! Utility Functions and Diagnostics
//!
//! Startup diagnostics, runtime status, and user-friendly error formatting.
//!
//! ## Diagnostics
//!
//! ```rust,no_run
//! use remote_pointer_server::utils::SystemInfo;
//!
//! let sys_info = SystemInfo::gather();
//! sys_info.log(); // Logs: OS, kernel, hostname, CPU count
//! ```
//!
//! [`RuntimeStats`] snapshots uptime and connection counts; the `/health`
//! endpoint and the shutdown summary both read from it.
//!
//! ## Error Formatting
//!
//! ```rust,no_run
//! use remote_pointer_server::utils::format_user_error;
//!
//! # fn run() -> anyhow::Result<()> { Ok(()) }
//! if let Err(e) = run() {
//!     eprintln!("{}", format_user_error(&e));
//! }
//! ```
//!
//! Error categories with context-aware help:
//! - Network errors → Port conflicts, address format
//! - Config errors → Syntax, value ranges
//! - Pointer errors → Backend name, screen size

pub mod diagnostics;
pub mod errors;

pub use diagnostics::{log_startup_diagnostics, RuntimeStats, SystemInfo};
pub use errors::format_user_error;
