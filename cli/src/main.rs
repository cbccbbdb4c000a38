//! Campus table reservations CLI server
//!
//! Headless reservation service suitable for deployment as a systemd
//! service, Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/campus-reservations/config.toml)
//! reservations-service
//!
//! # Custom config path
//! reservations-service --config /etc/campus-reservations/config.toml
//!
//! # Override the API port
//! reservations-service --api-port 8080
//!
//! # Validate config without starting
//! reservations-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use campus_reservations::config::AppConfig;
use campus_reservations::server::{init_tracing, ServerHandle, ServerOptions};

/// Time-slot table availability and booking for the campus storefront.
#[derive(Parser, Debug)]
#[command(
    name = "reservations-service",
    version,
    about = "Table reservation availability service",
    long_about = "REST API for table availability per time slot, next free slot \
                  and atomic table booking.\n\n\
                  Default config: ~/.config/campus-reservations/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "RESERVATIONS_CONFIG")]
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
}

/// Apply command-line overrides on top of the loaded file.
fn with_overrides(mut config: AppConfig, cli: &Cli) -> AppConfig {
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    config
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(campus_reservations::default_config_path);

    let loaded = AppConfig::load(&config_path);
    if cli.check {
        return match loaded {
            Ok(config) => {
                println!("Configuration is valid");
                println!("   Config file : {}", config_path.display());
                println!("   API address : {}:{}", config.server.api_host, config.server.api_port);
                println!("   Storage     : {:?}", config.database.backend);
                println!("   Database    : {}", config.database.connection_url());
                println!(
                    "   Service     : {}-{} every {} min",
                    config.schedule.opens_at, config.schedule.closes_at, config.schedule.slot_minutes
                );
                println!("   Tables      : {}", config.reservations.fleet_size);
                Ok(())
            }
            Err(e) => {
                eprintln!("Configuration is invalid: {}", e);
                std::process::exit(1);
            }
        };
    }

    let config = match loaded {
        Ok(config) => with_overrides(config, &cli),
        Err(e) => {
            // Only a missing file falls back to defaults, inside `AppConfig::load`
            eprintln!("Failed to load config from {}: {}", config_path.display(), e);
            return Err(e.into());
        }
    };
    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());
    if let Some(port) = cli.api_port {
        info!("CLI override: api_port = {}", port);
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.wait().await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use campus_reservations::ConfigError;

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn flags_override_the_file() {
        let cli = Cli::parse_from(["reservations-service", "--api-port", "9090", "-l", "debug"]);
        let config = with_overrides(AppConfig::default(), &cli);
        assert_eq!(config.server.api_port, 9090);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn broken_config_is_an_error_not_defaults() {
        let file = config_file("[reservations]\nfleet_size = 0\n");
        assert!(matches!(
            AppConfig::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));

        let file = config_file("[server\n");
        assert!(matches!(
            AppConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
