//! Invoice query parameters

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::domain::{format_amount, BillResult};
use crate::infrastructure::invoice::InvoiceTotals;

/// Already-computed totals, passed back by the results page as plain
/// strings. Missing parameters print as `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InvoiceQuery {
    pub energy_total: Option<String>,
    /// Tax amount
    pub vat: Option<String>,
    pub fixed_charge: Option<String>,
    pub grand_total: Option<String>,
}

impl InvoiceQuery {
    pub fn from_bill(bill: &BillResult) -> Self {
        Self {
            energy_total: Some(format_amount(bill.energy_total)),
            vat: Some(format_amount(bill.tax)),
            fixed_charge: Some(format_amount(bill.fixed_charge)),
            grand_total: Some(format_amount(bill.grand_total)),
        }
    }

    /// Relative download link, e.g. `/download_pdf?energy_total=3500.00&...`
    ///
    /// Amounts from [`format_amount`] contain only digits, `-` and `.`, so
    /// they need no percent-encoding.
    pub fn download_url(&self) -> String {
        let value = |v: &Option<String>| v.clone().unwrap_or_else(|| "0".to_string());
        format!(
            "/download_pdf?energy_total={}&vat={}&fixed_charge={}&grand_total={}",
            value(&self.energy_total),
            value(&self.vat),
            value(&self.fixed_charge),
            value(&self.grand_total),
        )
    }
}

impl From<InvoiceQuery> for InvoiceTotals {
    fn from(query: InvoiceQuery) -> Self {
        let or_zero = |v: Option<String>| v.unwrap_or_else(|| "0".to_string());
        Self {
            energy_total: or_zero(query.energy_total),
            tax: or_zero(query.vat),
            fixed_charge: or_zero(query.fixed_charge),
            grand_total: or_zero(query.grand_total),
        }
    }
}
