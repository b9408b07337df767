//! Slab (tiered) billing calculation

use rust_decimal::Decimal;

use crate::domain::{BandCapacity, BandUsage, BillResult, Consumption, TariffSchedule};

/// Pure slab calculator.
///
/// Each unit is billed at the rate of the band it falls into. Bands are
/// walked in schedule order and the walk stops as soon as consumption is
/// exhausted, so untouched bands never appear in the breakdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlabBillingCalculator;

impl SlabBillingCalculator {
    pub fn calculate(
        consumption: Consumption,
        schedule: &TariffSchedule,
        fixed_charge: Decimal,
        tax_rate: Decimal,
    ) -> BillResult {
        let mut remaining = consumption.value();
        let mut energy_total = Decimal::ZERO;
        let mut breakdown = Vec::with_capacity(schedule.bands().len());

        for (index, band) in schedule.bands().iter().enumerate() {
            if remaining <= Decimal::ZERO {
                break;
            }

            let used = match band.capacity {
                BandCapacity::Limited(limit) => remaining.min(limit),
                BandCapacity::Unbounded => remaining,
            };
            let cost = used * band.rate;

            breakdown.push(BandUsage {
                tier: index + 1,
                units_used: used,
                rate: band.rate,
                cost,
            });
            energy_total += cost;
            remaining -= used;
        }

        let tax = energy_total * tax_rate;
        let grand_total = energy_total + tax + fixed_charge;

        BillResult {
            consumption,
            energy_total,
            tax,
            fixed_charge,
            grand_total,
            breakdown,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Band, Tariff};
    use proptest::prelude::*;

    fn d(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn bill(units: i64) -> BillResult {
        let tariff = Tariff::default();
        SlabBillingCalculator::calculate(
            Consumption::new(d(units)).unwrap(),
            &tariff.schedule,
            tariff.fixed_charge,
            tariff.tax_rate,
        )
    }

    fn usage(tier: usize, units: i64, rate: i64, cost: i64) -> BandUsage {
        BandUsage {
            tier,
            units_used: d(units),
            rate: d(rate),
            cost: d(cost),
        }
    }

    #[test]
    fn zero_consumption_only_pays_fixed_charge() {
        let result = bill(0);
        assert!(result.breakdown.is_empty());
        assert_eq!(result.energy_total, Decimal::ZERO);
        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(result.grand_total, d(750));
    }

    #[test]
    fn exact_band_edge_stays_in_first_band() {
        let result = bill(100);
        assert_eq!(result.breakdown, vec![usage(1, 100, 10, 1000)]);
        assert_eq!(result.energy_total, d(1000));
    }

    #[test]
    fn cross_band_consumption() {
        let result = bill(250);
        assert_eq!(
            result.breakdown,
            vec![
                usage(1, 100, 10, 1000),
                usage(2, 100, 15, 1500),
                usage(3, 50, 20, 1000),
            ]
        );
        assert_eq!(result.energy_total, d(3500));
        assert_eq!(result.tax, Decimal::new(2625, 1));
        assert_eq!(result.fixed_charge, d(750));
        assert_eq!(result.grand_total, Decimal::new(45125, 1));
    }

    #[test]
    fn large_consumption_reaches_unbounded_band() {
        let result = bill(1000);
        let last = result.breakdown.last().unwrap();
        assert_eq!(*last, usage(4, 500, 25, 12_500));
        // 1000 + 1500 + 6000 + 12500
        assert_eq!(result.energy_total, d(21_000));
    }

    #[test]
    fn fractional_consumption_is_billed_exactly() {
        let tariff = Tariff::default();
        let result = SlabBillingCalculator::calculate(
            Consumption::parse("100.5").unwrap(),
            &tariff.schedule,
            tariff.fixed_charge,
            tariff.tax_rate,
        );
        assert_eq!(result.breakdown.len(), 2);
        assert_eq!(result.breakdown[1].units_used, Decimal::new(5, 1));
        assert_eq!(result.energy_total, Decimal::new(10075, 1));
    }

    #[test]
    fn zero_capacity_band_is_emitted_with_zero_usage() {
        let schedule = TariffSchedule::new(vec![
            Band::limited(d(0), d(99)),
            Band::unbounded(d(2)),
        ])
        .unwrap();
        let result = SlabBillingCalculator::calculate(
            Consumption::new(d(10)).unwrap(),
            &schedule,
            Decimal::ZERO,
            Decimal::ZERO,
        );
        assert_eq!(result.breakdown, vec![usage(1, 0, 99, 0), usage(2, 10, 2, 20)]);
    }

    #[test]
    fn schedule_is_injectable() {
        let flat = TariffSchedule::new(vec![Band::unbounded(d(3))]).unwrap();
        let result = SlabBillingCalculator::calculate(
            Consumption::new(d(40)).unwrap(),
            &flat,
            d(5),
            Decimal::new(1, 1),
        );
        assert_eq!(result.energy_total, d(120));
        assert_eq!(result.tax, d(12));
        assert_eq!(result.grand_total, d(137));
    }

    #[test]
    fn same_input_same_output() {
        assert_eq!(bill(777), bill(777));
    }

    fn consumption_strategy() -> impl Strategy<Value = Consumption> {
        // up to 10 million units with two decimal places
        (0i64..=1_000_000_000).prop_map(|hundredths| {
            Consumption::new(Decimal::new(hundredths, 2)).unwrap()
        })
    }

    fn default_bill(consumption: Consumption) -> BillResult {
        let tariff = Tariff::default();
        SlabBillingCalculator::calculate(
            consumption,
            &tariff.schedule,
            tariff.fixed_charge,
            tariff.tax_rate,
        )
    }

    proptest! {
        #[test]
        fn breakdown_costs_sum_to_energy_total(consumption in consumption_strategy()) {
            let result = default_bill(consumption);
            let sum: Decimal = result.breakdown.iter().map(|b| b.cost).sum();
            prop_assert_eq!(sum, result.energy_total);
        }

        #[test]
        fn breakdown_units_sum_to_consumption(consumption in consumption_strategy()) {
            let result = default_bill(consumption);
            prop_assert_eq!(result.units_billed(), consumption.value());
        }

        #[test]
        fn grand_total_identity(consumption in consumption_strategy()) {
            let tariff = Tariff::default();
            let result = default_bill(consumption);
            prop_assert_eq!(
                result.grand_total,
                result.energy_total + result.energy_total * tariff.tax_rate + tariff.fixed_charge
            );
        }

        #[test]
        fn energy_total_is_monotonic(a in consumption_strategy(), b in consumption_strategy()) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(default_bill(low).energy_total <= default_bill(high).energy_total);
        }

        #[test]
        fn no_band_exceeds_its_capacity(consumption in consumption_strategy()) {
            let tariff = Tariff::default();
            let result = default_bill(consumption);
            for usage in &result.breakdown {
                let band = tariff.schedule.bands()[usage.tier - 1];
                if let Some(limit) = band.capacity.limit() {
                    prop_assert!(usage.units_used <= limit);
                }
                prop_assert!(usage.units_used >= Decimal::ZERO);
            }
        }
    }
}
