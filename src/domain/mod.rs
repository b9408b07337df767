//! Core billing entities: tariff bands, consumption and bill results.
//!
//! Nothing in here performs I/O; every type is constructed per request
//! (or once at startup for the tariff) and never mutated afterwards.

pub mod billing;
pub mod error;
pub mod tariff;

pub use billing::{format_amount, BandUsage, BillResult, Consumption};
pub use error::{DomainError, DomainResult};
pub use tariff::{Band, BandCapacity, Tariff, TariffSchedule};
