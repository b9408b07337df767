pub mod billing;
pub mod calculator;

pub use billing::BillingService;
pub use calculator::SlabBillingCalculator;
