//! Remote Pointer Server
//!
//! Entry point for the server binary.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use remote_pointer_server::config::Config;
use remote_pointer_server::cursor;
use remote_pointer_server::input::{run_self_test, SelfTestOptions};
use remote_pointer_server::server::PointerServer;

/// Command-line arguments for remote-pointer-server
#[derive(Parser, Debug)]
#[command(name = "remote-pointer-server")]
#[command(version, about = "Remote pointer server with motion stabilization", long_about = None)]
pub struct Args {
    /// Configuration file path (built-in defaults when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Listen address (IP or IP:PORT)
    #[arg(short, long, env = "POINTER_LISTEN_ADDR")]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short, long, env = "POINTER_PORT")]
    pub port: Option<u16>,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long, default_value = "pretty")]
    pub log_format: String,

    /// Write logs to file (in addition to stdout)
    #[arg(long)]
    pub log_file: Option<String>,

    /// Trace a square and click once of each kind, then exit
    #[arg(long)]
    pub self_test: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", remote_pointer_server::utils::format_user_error(&e));
            return Err(e);
        }
    };

    // Guard must live until exit so buffered lines reach the log file
    let _log_guard = init_logging(&args, &config)?;

    info!("════════════════════════════════════════════════════════");
    info!("  remote-pointer-server v{}", env!("CARGO_PKG_VERSION"));
    info!("  Built: {} {}", env!("BUILD_DATE"), env!("BUILD_TIME"));
    info!("  Commit: {}", env!("GIT_HASH"));
    info!("  Profile: {}", if cfg!(debug_assertions) { "debug" } else { "release" });
    info!("════════════════════════════════════════════════════════");

    remote_pointer_server::utils::log_startup_diagnostics(&config);
    tracing::debug!("Config: {:?}", config);

    if args.self_test {
        return self_test(&config).await;
    }

    info!("Initializing server");
    let server = match PointerServer::new(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", remote_pointer_server::utils::format_user_error(&e));
            return Err(e);
        }
    };

    if let Err(e) = server.run().await {
        eprintln!("{}", remote_pointer_server::utils::format_user_error(&e));
        return Err(e);
    }

    info!("Server shut down");
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default_config()?,
    };

    let config = config.with_overrides(args.listen.clone(), args.port);
    config.validate()?;
    Ok(config)
}

async fn self_test(config: &Config) -> Result<()> {
    let cursor =
        cursor::open_backend(&config.pointer).context("Failed to open pointer backend")?;

    let report = run_self_test(cursor, config.motion.clone(), SelfTestOptions::default())
        .await
        .context("Self-test failed")?;

    info!(
        "Self-test passed: {} moves, {} clicks",
        report.positions.len(),
        report.clicks
    );
    Ok(())
}

fn init_logging(
    args: &Args,
    config: &Config,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use std::fs::File;

    let log_level = match args.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "remote_pointer_server={level},hyper=info,warn",
            level = log_level
        ))
    });

    // --log-file wins over [logging] log_dir
    let (writer, guard) = if let Some(log_file_path) = &args.log_file {
        let file = File::create(log_file_path)
            .with_context(|| format!("Failed to create log file: {}", log_file_path))?;
        let (writer, guard) = tracing_appender::non_blocking(file);
        (Some(writer), Some(guard))
    } else if let Some(log_dir) = &config.logging.log_dir {
        let appender = tracing_appender::rolling::daily(log_dir, "remote-pointer-server.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        (Some(writer), Some(guard))
    } else {
        (None, None)
    };

    if let Some(writer) = writer {
        match args.log_format.as_str() {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(std::io::stdout),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(writer)
                            .with_ansi(false),
                    )
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(std::io::stdout),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(writer)
                            .with_ansi(false),
                    )
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_writer(std::io::stdout),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(writer)
                            .with_ansi(false),
                    )
                    .init();
            }
        }
    } else {
        match args.log_format.as_str() {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().json())
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().compact())
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().pretty())
                    .init();
            }
        }
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["remote-pointer-server"]);
        assert!(args.config.is_none());
        assert_eq!(args.verbose, 0);
        assert_eq!(args.log_format, "pretty");
        assert!(!args.self_test);
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::parse_from([
            "remote-pointer-server",
            "--listen",
            "127.0.0.1",
            "--port",
            "9001",
            "-vv",
            "--self-test",
        ]);
        assert_eq!(args.verbose, 2);
        assert!(args.self_test);

        let config = load_config(&args).unwrap();
        assert_eq!(config.server.listen_addr, "127.0.0.1:9001");
    }
}
