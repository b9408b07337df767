//! Bill result entities

use rust_decimal::{Decimal, RoundingStrategy};

use super::Consumption;

/// What a single band contributed to a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandUsage {
    /// 1-based position of the band in the schedule
    pub tier: usize,
    pub units_used: Decimal,
    pub rate: Decimal,
    /// `units_used × rate`
    pub cost: Decimal,
}

/// Breakdown and totals for one consumption figure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillResult {
    pub consumption: Consumption,
    /// Sum of every `BandUsage::cost`, before tax
    pub energy_total: Decimal,
    pub tax: Decimal,
    pub fixed_charge: Decimal,
    /// `energy_total + tax + fixed_charge`
    pub grand_total: Decimal,
    /// Bands in schedule order, up to the one where consumption ran out
    pub breakdown: Vec<BandUsage>,
}

impl BillResult {
    pub fn units_billed(&self) -> Decimal {
        self.breakdown.iter().map(|usage| usage.units_used).sum()
    }
}

/// Formats an amount with two decimal places, e.g. `4512.50`
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}
