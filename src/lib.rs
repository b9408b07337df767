//! # PowerBill
//!
//! Tiered (slab) electricity billing service.
//!
//! ## Architecture
//!
//! - **domain**: Tariff bands, consumption and bill results
//! - **application**: The slab calculator and the billing service
//! - **infrastructure**: PDF invoice rendering
//! - **interfaces**: HTML form, JSON API and Swagger documentation
//! - **server**: Process lifecycle shared by the CLI binary

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};

pub use application::{BillingService, SlabBillingCalculator};
pub use domain::{BillResult, Consumption, DomainError, Tariff, TariffSchedule};

pub use interfaces::http::create_router;
