use comfy_table::{modifiers, presets, Attribute, Cell, CellAlignment, Table};
use powerbill::domain::{format_amount, BillResult, Tariff};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table
}

fn amount(value: impl std::fmt::Display) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

pub fn build_breakdown_table(bill: &BillResult) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Band", "Units", "Rate", "Cost"]);
    for usage in &bill.breakdown {
        table.add_row(vec![
            Cell::new(usage.tier),
            amount(usage.units_used.normalize()),
            amount(usage.rate.normalize()),
            amount(format_amount(usage.cost)),
        ]);
    }
    table
}

pub fn build_totals_table(bill: &BillResult, tariff: &Tariff) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Description".to_string(),
        format!("Amount ({})", tariff.currency),
    ]);
    table.add_row(vec![Cell::new("Energy Charge"), amount(format_amount(bill.energy_total))]);
    table.add_row(vec![Cell::new(tariff.tax_caption()), amount(format_amount(bill.tax))]);
    table.add_row(vec![Cell::new("Fixed Charge"), amount(format_amount(bill.fixed_charge))]);
    table.add_row(vec![
        Cell::new("Total Payable").add_attribute(Attribute::Bold),
        amount(format_amount(bill.grand_total)).add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn build_tariff_table(tariff: &Tariff) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Band".to_string(),
        "Capacity".to_string(),
        format!("Rate ({}/unit)", tariff.currency),
    ]);
    for (index, band) in tariff.schedule.bands().iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            amount(&band.capacity),
            amount(band.rate.normalize()),
        ]);
    }
    table
}
