//! Tariff aggregate
//!
//! Contains the slab schedule, its bands and the fixed/tax parameters.

pub mod model;

pub use model::{Band, BandCapacity, Tariff, TariffSchedule};
