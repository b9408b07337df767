//! Tariff domain entity

use std::fmt;

use rust_decimal::Decimal;

use crate::domain::billing::consumption::{Consumption, MAX_FRACTION_DIGITS};
use crate::domain::{DomainError, DomainResult};

/// Highest per-unit rate a band may charge.
pub const MAX_RATE: i64 = 1_000_000;

/// Highest flat fee a tariff may add to a bill.
pub const MAX_FIXED_CHARGE: i64 = 1_000_000_000_000;

/// How many units a band can absorb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandCapacity {
    Limited(Decimal),
    /// Catch-all tier; only allowed as the last band.
    Unbounded,
}

impl BandCapacity {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    pub fn limit(&self) -> Option<Decimal> {
        match self {
            Self::Limited(limit) => Some(*limit),
            Self::Unbounded => None,
        }
    }
}

impl fmt::Display for BandCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limited(limit) => write!(f, "{}", limit.normalize()),
            Self::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// One slab of the schedule: up to `capacity` units billed at `rate` each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub capacity: BandCapacity,
    pub rate: Decimal,
}

impl Band {
    pub fn limited(capacity: Decimal, rate: Decimal) -> Self {
        Self {
            capacity: BandCapacity::Limited(capacity),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            capacity: BandCapacity::Unbounded,
            rate,
        }
    }
}

/// Ordered, immutable list of bands.
///
/// Bands are consumed strictly in sequence. At most one band is unbounded
/// and, if present, it is the last one. Construction is the only place the
/// invariants are checked, so a `TariffSchedule` value is always valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TariffSchedule {
    bands: Vec<Band>,
}

impl TariffSchedule {
    pub fn new(bands: Vec<Band>) -> DomainResult<Self> {
        if bands.is_empty() {
            return Err(DomainError::InvalidSchedule(
                "schedule must contain at least one band".to_string(),
            ));
        }

        let last = bands.len() - 1;
        for (index, band) in bands.iter().enumerate() {
            let tier = index + 1;

            if let BandCapacity::Limited(limit) = band.capacity {
                if limit < Decimal::ZERO {
                    return Err(DomainError::InvalidSchedule(format!(
                        "band {} has negative capacity {}",
                        tier, limit
                    )));
                }
            } else if index != last {
                return Err(DomainError::InvalidSchedule(format!(
                    "band {} is unbounded but is not the last band",
                    tier
                )));
            }

            if band.rate < Decimal::ZERO {
                return Err(DomainError::InvalidSchedule(format!(
                    "band {} has negative rate {}",
                    tier, band.rate
                )));
            }
            if band.rate > Decimal::from(MAX_RATE) {
                return Err(DomainError::InvalidSchedule(format!(
                    "band {} rate {} exceeds {}",
                    tier, band.rate, MAX_RATE
                )));
            }
            if band.rate.normalize().scale() > MAX_FRACTION_DIGITS {
                return Err(DomainError::InvalidSchedule(format!(
                    "band {} rate {} has more than {} decimal places",
                    tier, band.rate, MAX_FRACTION_DIGITS
                )));
            }
        }

        Ok(Self { bands })
    }

    /// `[0–100 @ 10, next 100 @ 15, next 300 @ 20, remainder @ 25]`
    pub fn default_residential() -> Self {
        Self {
            bands: vec![
                Band::limited(Decimal::from(100), Decimal::from(10)),
                Band::limited(Decimal::from(100), Decimal::from(15)),
                Band::limited(Decimal::from(300), Decimal::from(20)),
                Band::unbounded(Decimal::from(25)),
            ],
        }
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Total capacity, `None` when the last band is a catch-all.
    pub fn coverage(&self) -> Option<Decimal> {
        self.bands
            .iter()
            .try_fold(Decimal::ZERO, |acc, band| band.capacity.limit().map(|l| acc + l))
    }

    /// Rejects consumption that a bounded schedule could not fully bill.
    pub fn ensure_covers(&self, consumption: Consumption) -> DomainResult<()> {
        match self.coverage() {
            Some(coverage) if consumption.value() > coverage => {
                Err(DomainError::InvalidInput(format!(
                    "consumption {} exceeds the {} units covered by this tariff",
                    consumption, coverage.normalize()
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Default for TariffSchedule {
    fn default() -> Self {
        Self::default_residential()
    }
}

/// Everything needed to turn consumption into a bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tariff {
    pub schedule: TariffSchedule,
    /// Flat fee added to every bill
    pub fixed_charge: Decimal,
    /// Fraction of the energy charge, e.g. `0.075` for 7.5%
    pub tax_rate: Decimal,
    /// Currency code printed next to amounts
    pub currency: String,
    /// Name of the tax, e.g. `VAT`
    pub tax_label: String,
}

impl Tariff {
    pub fn new(
        schedule: TariffSchedule,
        fixed_charge: Decimal,
        tax_rate: Decimal,
        currency: impl Into<String>,
        tax_label: impl Into<String>,
    ) -> DomainResult<Self> {
        if fixed_charge < Decimal::ZERO {
            return Err(DomainError::InvalidSchedule(format!(
                "fixed charge {} is negative",
                fixed_charge
            )));
        }
        if fixed_charge > Decimal::from(MAX_FIXED_CHARGE) {
            return Err(DomainError::InvalidSchedule(format!(
                "fixed charge {} exceeds {}",
                fixed_charge, MAX_FIXED_CHARGE
            )));
        }
        if tax_rate < Decimal::ZERO || tax_rate > Decimal::ONE {
            return Err(DomainError::InvalidSchedule(format!(
                "tax rate {} must be a fraction between 0 and 1",
                tax_rate
            )));
        }
        for (name, value) in [("fixed charge", fixed_charge), ("tax rate", tax_rate)] {
            if value.normalize().scale() > MAX_FRACTION_DIGITS {
                return Err(DomainError::InvalidSchedule(format!(
                    "{} {} has more than {} decimal places",
                    name, value, MAX_FRACTION_DIGITS
                )));
            }
        }

        Ok(Self {
            schedule,
            fixed_charge,
            tax_rate,
            currency: currency.into(),
            tax_label: tax_label.into(),
        })
    }

    /// Tax line caption, e.g. `VAT (7.5%)`
    pub fn tax_caption(&self) -> String {
        let percent = (self.tax_rate * Decimal::ONE_HUNDRED).normalize();
        format!("{} ({}%)", self.tax_label, percent)
    }
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            schedule: TariffSchedule::default_residential(),
            fixed_charge: Decimal::from(750),
            tax_rate: Decimal::new(75, 3),
            currency: "NGN".to_string(),
            tax_label: "VAT".to_string(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
