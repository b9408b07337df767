//! PowerBill: CLI server
//!
//! Headless slab electricity billing server suitable for deployment as a
//! systemd service, Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/powerbill/config.toml)
//! powerbill-service
//!
//! # Custom config path and port
//! powerbill-service --config /etc/powerbill/config.toml --port 9000
//!
//! # Validate config without starting
//! powerbill-service --check
//!
//! # Print a bill for 250 units and exit
//! powerbill-service --quote 250
//! ```

mod tables;

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use powerbill::config::AppConfig;
use powerbill::server::{init_tracing, ServerHandle, ServerOptions};
use powerbill::BillingService;

/// PowerBill: tiered electricity bill calculator.
#[derive(Parser, Debug)]
#[command(
    name = "powerbill-service",
    version,
    about = "Slab tariff electricity billing server",
    long_about = "PowerBill: HTML calculator, JSON API and PDF invoices \
                  for tiered (slab) electricity tariffs.\n\n\
                  Default config: ~/.config/powerbill/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "POWERBILL_CONFIG")]
    config: Option<PathBuf>,

    /// Override the HTTP listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and tariff, then exit.
    #[arg(long)]
    check: bool,

    /// Print the bill for the given consumption and exit.
    #[arg(long, value_name = "UNITS", allow_hyphen_values = true)]
    quote: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(powerbill::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", config_path.display(), e);
            return Err(e.into());
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }

    // ── Offline modes ──────────────────────────────────────────
    if cli.check || cli.quote.is_some() {
        let tariff = match config.tariff() {
            Ok(tariff) => tariff,
            Err(e) => {
                error!("{}", e);
                return Err(e.into());
            }
        };

        if cli.check {
            println!("✅ Configuration is valid");
            println!("   Config file : {}", config_path.display());
            println!("   Address     : {}", config.address());
            println!("   Log level   : {}", config.logging.level);
            println!("   Fixed charge: {} {}", tariff.fixed_charge, tariff.currency);
            println!("   Tax         : {}", tariff.tax_caption());
            println!("{}", tables::build_tariff_table(&tariff));
            return Ok(());
        }

        if let Some(ref units) = cli.quote {
            let service = BillingService::new(tariff);
            let bill = match service.quote_str(units) {
                Ok(bill) => bill,
                Err(e) => {
                    eprintln!("Cannot quote '{}': {}", units, e.reason());
                    std::process::exit(2);
                }
            };
            println!("{}", tables::build_breakdown_table(&bill));
            println!("{}", tables::build_totals_table(&bill, service.tariff()));
            return Ok(());
        }
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions { config }).await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
