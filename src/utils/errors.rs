//! User-Friendly Error Formatting
//!
//! Renders fatal startup errors with troubleshooting hints.

use std::fmt::Write;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Format error for user consumption
///
/// Picks a troubleshooting section from the full error chain, then appends
/// the technical details.
pub fn format_user_error(error: &anyhow::Error) -> String {
    let mut output = String::new();

    writeln!(output).ok();
    writeln!(
        output,
        "╔════════════════════════════════════════════════════════════╗"
    )
    .ok();
    writeln!(
        output,
        "║                     ERROR                                  ║"
    )
    .ok();
    writeln!(
        output,
        "╚════════════════════════════════════════════════════════════╝"
    )
    .ok();
    writeln!(output).ok();

    // Match on the whole chain; context layers often name the cause
    let chain = format!("{:#}", error);
    let lowered = chain.to_lowercase();

    if lowered.contains("bind") || lowered.contains("address") {
        format_network_error(&mut output);
    } else if lowered.contains("config") {
        format_config_error(&mut output);
    } else if lowered.contains("pointer") || lowered.contains("backend") {
        format_pointer_error(&mut output);
    } else {
        format_generic_error(&mut output, &error.to_string());
    }

    writeln!(output).ok();
    writeln!(output, "{}", RULE).ok();
    writeln!(output, "Technical Details:").ok();
    writeln!(output).ok();
    writeln!(output, "{}", chain).ok();
    writeln!(output).ok();

    writeln!(output, "{}", RULE).ok();
    writeln!(output, "Need Help?").ok();
    writeln!(
        output,
        "  - Run with --verbose for detailed logs: remote-pointer-server -vv"
    )
    .ok();
    writeln!(
        output,
        "  - Check the pointer backend alone: remote-pointer-server --self-test"
    )
    .ok();

    output
}

fn format_network_error(output: &mut String) {
    writeln!(output, "Network Binding Error").ok();
    writeln!(output).ok();
    writeln!(
        output,
        "Could not bind to the network address for client connections."
    )
    .ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Port 8080 already in use").ok();
    writeln!(output, "     → Check: ss -tlnp | grep 8080").ok();
    writeln!(output, "     → Stop the other process or pick another port").ok();
    writeln!(output, "     → Override: remote-pointer-server --port 8081").ok();
    writeln!(output).ok();
    writeln!(output, "  2. Permission denied (port < 1024)").ok();
    writeln!(output, "     → Use port >= 1024").ok();
    writeln!(output).ok();
    writeln!(output, "  3. Invalid listen address").ok();
    writeln!(output, "     → Should be: 'IP:PORT' like '0.0.0.0:8080'").ok();
    writeln!(output, "     → Or set POINTER_LISTEN_ADDR / POINTER_PORT").ok();
}

fn format_config_error(output: &mut String) {
    writeln!(output, "Configuration Error").ok();
    writeln!(output).ok();
    writeln!(output, "Problem with the configuration file.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Configuration file not found").ok();
    writeln!(
        output,
        "     → Specify: remote-pointer-server -c /path/to/config.toml"
    )
    .ok();
    writeln!(output, "     → Or run without -c to use built-in defaults").ok();
    writeln!(output).ok();
    writeln!(output, "  2. Invalid TOML syntax").ok();
    writeln!(output, "     → Check for typos, missing quotes, etc.").ok();
    writeln!(output).ok();
    writeln!(output, "  3. Value out of range").ok();
    writeln!(output, "     → smoothing_level must be within 0.0..=1.0").ok();
    writeln!(output, "     → speed_factor must be non-zero").ok();
    writeln!(output, "     → history_depth must be at least 1").ok();
}

fn format_pointer_error(output: &mut String) {
    writeln!(output, "Pointer Backend Error").ok();
    writeln!(output).ok();
    writeln!(output, "Could not open the pointer device.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Unsupported backend name").ok();
    writeln!(output, "     → Set [pointer] backend = \"virtual\"").ok();
    writeln!(output).ok();
    writeln!(output, "  2. Invalid screen size").ok();
    writeln!(output, "     → screen_width and screen_height must be positive").ok();
}

fn format_generic_error(output: &mut String, error: &str) {
    writeln!(output, "Server Error").ok();
    writeln!(output).ok();
    writeln!(output, "An error occurred while running the server.").ok();
    writeln!(output).ok();
    writeln!(output, "Error: {}", error).ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_format_user_error() {
        let error = anyhow::anyhow!("something unexpected");
        let formatted = format_user_error(&error);
        assert!(formatted.contains("ERROR"));
        assert!(formatted.contains("Server Error"));
        assert!(formatted.contains("something unexpected"));
    }

    #[test]
    fn test_network_error_formatting() {
        let error: anyhow::Error = std::io::Error::from(std::io::ErrorKind::AddrInUse).into();
        let error = error.context("Failed to bind 0.0.0.0:8080");
        let formatted = format_user_error(&error);
        assert!(formatted.contains("Network Binding Error"));
        assert!(formatted.contains("--port"));
    }

    #[test]
    fn test_config_error_uses_context_chain() {
        let result: anyhow::Result<()> =
            Err(anyhow::anyhow!("missing field")).context("Failed to parse config file");
        let formatted = format_user_error(&result.unwrap_err());
        assert!(formatted.contains("Configuration Error"));
        assert!(formatted.contains("missing field"));
    }

    #[test]
    fn test_pointer_error_formatting() {
        let error = anyhow::anyhow!("unsupported pointer backend: uinput");
        let formatted = format_user_error(&error);
        assert!(formatted.contains("Pointer Backend Error"));
    }
}
