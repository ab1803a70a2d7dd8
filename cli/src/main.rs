//! Room escape reservation service - CLI server
//!
//! Headless booking API suitable for deployment as a systemd service,
//! Docker container or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/roomescape/config.toml)
//! roomescape-service
//!
//! # Custom config path
//! roomescape-service --config /etc/roomescape/config.toml
//!
//! # Override the port
//! roomescape-service --api-port 8080
//!
//! # Validate config without starting
//! roomescape-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use roomescape::config::AppConfig;
use roomescape::infrastructure::database::redact_url;
use roomescape::server::{init_tracing, ServerHandle, ServerOptions};

/// Room escape reservation service.
#[derive(Parser, Debug)]
#[command(
    name = "roomescape-service",
    version,
    about = "REST API for booking escape-room time slots",
    long_about = "Room escape reservation service: books, looks up and cancels \
                  escape-room slots over a JSON REST API.\n\n\
                  Default config: ~/.config/roomescape/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = roomescape::CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the configured themes.
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(roomescape::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) if cli.check => {
            eprintln!("Configuration is invalid: {}", e);
            std::process::exit(1);
        }
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.api_address());
        println!("   Database    : {}", redact_url(&config.database.connection_url()));
        println!("   Slot scope  : {}", config.booking.slot_scope);
        println!("   Themes      : {}", config.themes.len());
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        seed_themes: !cli.no_seed,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
