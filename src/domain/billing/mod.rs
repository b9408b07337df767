//! Billing inputs and results

pub mod consumption;
pub mod model;

pub use consumption::Consumption;
pub use model::{format_amount, BandUsage, BillResult};
