//! Billing service for quoting bills against the configured tariff

use tracing::{info, warn};

use crate::application::services::calculator::SlabBillingCalculator;
use crate::domain::{BillResult, Consumption, DomainResult, Tariff};

/// Binds the slab calculator to one immutable tariff.
///
/// Shared behind an `Arc` by every request handler; it holds no mutable
/// state, so concurrent quotes need no coordination.
#[derive(Debug, Clone)]
pub struct BillingService {
    tariff: Tariff,
}

impl BillingService {
    pub fn new(tariff: Tariff) -> Self {
        Self { tariff }
    }

    pub fn tariff(&self) -> &Tariff {
        &self.tariff
    }

    pub fn quote(&self, consumption: Consumption) -> DomainResult<BillResult> {
        if let Err(e) = self.tariff.schedule.ensure_covers(consumption) {
            metrics::counter!("bill_inputs_rejected_total", "reason" => "coverage").increment(1);
            warn!(%consumption, error = %e, "Consumption exceeds tariff coverage");
            return Err(e);
        }

        let bill = SlabBillingCalculator::calculate(
            consumption,
            &self.tariff.schedule,
            self.tariff.fixed_charge,
            self.tariff.tax_rate,
        );

        metrics::counter!("bills_calculated_total").increment(1);
        info!(
            %consumption,
            bands = bill.breakdown.len(),
            energy_total = %bill.energy_total,
            grand_total = %bill.grand_total,
            currency = self.tariff.currency.as_str(),
            "Bill calculated"
        );

        Ok(bill)
    }

    /// Parses raw form input, then quotes it.
    pub fn quote_str(&self, input: &str) -> DomainResult<BillResult> {
        let consumption = Consumption::parse(input).map_err(|e| {
            metrics::counter!("bill_inputs_rejected_total", "reason" => "parse").increment(1);
            warn!(input, error = %e, "Rejected consumption input");
            e
        })?;
        self.quote(consumption)
    }
}

impl Default for BillingService {
    fn default() -> Self {
        Self::new(Tariff::default())
    }
}
