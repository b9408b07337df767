//! Use cases built on the domain: the slab calculator and the billing
//! service that binds it to the configured tariff.

pub mod services;

pub use services::{BillingService, SlabBillingCalculator};
