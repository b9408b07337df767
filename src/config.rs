//! Configuration module
//!
//! Reads a TOML file (default `~/.config/powerbill/config.toml`). Every
//! section is optional; missing keys fall back to the built-in residential
//! tariff and letterhead.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [billing]
//! currency = "NGN"
//! fixed_charge = 750
//! tax_rate = 0.075
//!
//! [[billing.bands]]
//! capacity = 100
//! rate = 10
//!
//! [[billing.bands]]   # no capacity: catch-all band
//! rate = 25
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Band, DomainError, Tariff, TariffSchedule};
use crate::infrastructure::invoice::Letterhead;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid tariff: {0}")]
    Tariff(#[from] DomainError),
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("powerbill")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub billing: BillingConfig,
    pub invoice: InvoiceConfig,
}

impl AppConfig {
    /// Loads the file at `path`. A file that does not exist yields the
    /// defaults; one that exists but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Builds the validated tariff; an invalid schedule fails here, at
    /// startup, rather than on the first request.
    pub fn tariff(&self) -> Result<Tariff, ConfigError> {
        let bands = self
            .billing
            .bands
            .iter()
            .map(|band| match band.capacity {
                Some(capacity) => Band::limited(capacity, band.rate),
                None => Band::unbounded(band.rate),
            })
            .collect();
        let schedule = TariffSchedule::new(bands)?;

        Ok(Tariff::new(
            schedule,
            self.billing.fixed_charge,
            self.billing.tax_rate,
            self.billing.currency.clone(),
            self.billing.tax_label.clone(),
        )?)
    }

    pub fn letterhead(&self) -> Letterhead {
        Letterhead {
            company_name: self.invoice.company_name.clone(),
            tagline: self.invoice.tagline.clone(),
            email: self.invoice.email.clone(),
            phone: self.invoice.phone.clone(),
            prepared_by: self.invoice.prepared_by.clone(),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    pub currency: String,
    pub tax_label: String,
    pub fixed_charge: Decimal,
    pub tax_rate: Decimal,
    pub bands: Vec<BandConfig>,
}

impl Default for BillingConfig {
    fn default() -> Self {
        let tariff = Tariff::default();
        Self {
            currency: tariff.currency,
            tax_label: tariff.tax_label,
            fixed_charge: tariff.fixed_charge,
            tax_rate: tariff.tax_rate,
            bands: tariff
                .schedule
                .bands()
                .iter()
                .map(|band| BandConfig {
                    capacity: band.capacity.limit(),
                    rate: band.rate,
                })
                .collect(),
        }
    }
}

/// One `[[billing.bands]]` entry; omit `capacity` for the catch-all band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandConfig {
    #[serde(default)]
    pub capacity: Option<Decimal>,
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceConfig {
    pub company_name: String,
    pub tagline: String,
    pub email: String,
    pub phone: String,
    pub prepared_by: String,
    /// Name offered to the browser for the downloaded PDF
    pub file_name: String,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        let letterhead = Letterhead::default();
        Self {
            company_name: letterhead.company_name,
            tagline: letterhead.tagline,
            email: letterhead.email,
            phone: letterhead.phone,
            prepared_by: letterhead.prepared_by,
            file_name: "PowerBill_Invoice.pdf".to_string(),
        }
    }
}
