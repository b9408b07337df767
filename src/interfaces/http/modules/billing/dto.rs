//! Billing DTOs

use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::domain::{BandUsage, BillResult, Consumption, Tariff};
use crate::interfaces::http::modules::invoice::InvoiceQuery;

/// Form body of `POST /`. A missing field counts as empty input.
#[derive(Debug, Default, Deserialize)]
pub struct BillForm {
    #[serde(default)]
    pub units: String,
}

fn validate_consumption(value: &Decimal) -> Result<(), ValidationError> {
    Consumption::new(*value).map(|_| ()).map_err(|e| {
        let mut err = ValidationError::new("consumption");
        err.message = Some(Cow::Owned(e.reason().to_string()));
        err
    })
}

/// Consumption may be sent as a JSON number or a decimal string.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CalculateBillRequest {
    #[validate(custom(function = "validate_consumption"))]
    #[schema(value_type = String, example = "250")]
    pub consumption: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BandUsageResponse {
    pub tier: usize,
    #[schema(value_type = String)]
    pub units_used: Decimal,
    #[schema(value_type = String)]
    pub rate: Decimal,
    #[schema(value_type = String)]
    pub cost: Decimal,
}

impl From<&BandUsage> for BandUsageResponse {
    fn from(usage: &BandUsage) -> Self {
        Self {
            tier: usage.tier,
            units_used: usage.units_used.normalize(),
            rate: usage.rate.normalize(),
            cost: usage.cost.normalize(),
        }
    }
}

/// Calculated bill. Amounts are exact decimal strings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BillResponse {
    #[schema(value_type = String)]
    pub consumption: Decimal,
    #[schema(value_type = String)]
    pub energy_total: Decimal,
    #[schema(value_type = String)]
    pub tax: Decimal,
    #[schema(value_type = String)]
    pub fixed_charge: Decimal,
    #[schema(value_type = String)]
    pub grand_total: Decimal,
    pub currency: String,
    pub breakdown: Vec<BandUsageResponse>,
    /// Link that renders these totals as a PDF invoice
    pub invoice_url: String,
}

impl BillResponse {
    pub fn new(bill: &BillResult, currency: &str) -> Self {
        Self {
            consumption: bill.consumption.value(),
            energy_total: bill.energy_total.normalize(),
            tax: bill.tax.normalize(),
            fixed_charge: bill.fixed_charge.normalize(),
            grand_total: bill.grand_total.normalize(),
            currency: currency.to_string(),
            breakdown: bill.breakdown.iter().map(Into::into).collect(),
            invoice_url: InvoiceQuery::from_bill(bill).download_url(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BandResponse {
    pub tier: usize,
    /// `null` for the catch-all band
    #[schema(value_type = Option<String>)]
    pub capacity: Option<Decimal>,
    #[schema(value_type = String)]
    pub rate: Decimal,
}

/// Active tariff
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TariffResponse {
    pub currency: String,
    pub tax_label: String,
    #[schema(value_type = String)]
    pub tax_rate: Decimal,
    #[schema(value_type = String)]
    pub fixed_charge: Decimal,
    pub bands: Vec<BandResponse>,
}

impl From<&Tariff> for TariffResponse {
    fn from(tariff: &Tariff) -> Self {
        Self {
            currency: tariff.currency.clone(),
            tax_label: tariff.tax_label.clone(),
            tax_rate: tariff.tax_rate.normalize(),
            fixed_charge: tariff.fixed_charge.normalize(),
            bands: tariff
                .schedule
                .bands()
                .iter()
                .enumerate()
                .map(|(index, band)| BandResponse {
                    tier: index + 1,
                    capacity: band.capacity.limit().map(|c| c.normalize()),
                    rate: band.rate.normalize(),
                })
                .collect(),
        }
    }
}
