//! HTML for the bill calculator page

use crate::domain::{format_amount, BillResult, Tariff};
use crate::interfaces::http::modules::invoice::InvoiceQuery;

pub const SUCCESS_MESSAGE: &str = "Bill calculated successfully.";
pub const INVALID_INPUT_MESSAGE: &str = "Please enter a valid positive number.";

/// What the page shows below the form.
pub enum Outcome<'a> {
    /// Plain `GET /`
    Empty,
    Calculated(&'a BillResult),
    /// User-facing reason from the rejected input
    Rejected(&'a str),
}

pub struct BillPage<'a> {
    pub tariff: &'a Tariff,
    /// Raw value of the `units` field, echoed back into the input box
    pub units: &'a str,
    pub outcome: Outcome<'a>,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_page(page: &BillPage<'_>) -> String {
    let tariff = page.tariff;
    let mut html = String::from(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>PowerBill Calculator</title>
<style>
body {
  font-family: Helvetica, Arial, sans-serif;
  max-width: 720px;
  margin: 2rem auto;
  color: #222;
}
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid #999; padding: .4rem .6rem; }
th { background: #777; color: #f5f5f5; text-align: left; }
td.amount { text-align: right; }
.message { color: #1b6e20; }
.error { color: #b00020; }
</style>
</head>
<body>
<h1>Electricity Bill Calculator</h1>
"#,
    );

    html.push_str(&tariff_summary(tariff));

    html.push_str(&format!(
        r#"<form method="post" action="/">
<label for="units">Units consumed</label>
<input id="units" name="units" type="text" inputmode="decimal" value="{}" required>
<button type="submit">Calculate</button>
</form>
"#,
        escape_html(page.units)
    ));

    match page.outcome {
        Outcome::Empty => {}
        Outcome::Rejected(reason) => {
            html.push_str(&format!(
                "<p class=\"error\">{} <small>({})</small></p>\n",
                INVALID_INPUT_MESSAGE,
                escape_html(reason)
            ));
        }
        Outcome::Calculated(bill) => {
            html.push_str(&format!("<p class=\"message\">{}</p>\n", SUCCESS_MESSAGE));
            html.push_str(&results(bill, tariff));
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn tariff_summary(tariff: &Tariff) -> String {
    let mut rows = String::new();
    let mut floor = rust_decimal::Decimal::ZERO;
    for band in tariff.schedule.bands() {
        let range = match band.capacity.limit() {
            Some(limit) => {
                let ceiling = floor + limit;
                let text = format!("{} – {}", floor.normalize(), ceiling.normalize());
                floor = ceiling;
                text
            }
            None => format!("above {}", floor.normalize()),
        };
        rows.push_str(&format!(
            "<tr><td>{}</td><td class=\"amount\">{}</td></tr>\n",
            range,
            band.rate.normalize()
        ));
    }

    format!(
        "<details><summary>Tariff</summary>\n<table>\n\
         <tr><th>Units</th><th>Rate ({cur}/unit)</th></tr>\n\
         {rows}</table>\n\
         <p>Fixed charge {fixed} {cur}; {tax}.</p>\n</details>\n",
        cur = escape_html(&tariff.currency),
        rows = rows,
        fixed = format_amount(tariff.fixed_charge),
        tax = escape_html(&tariff.tax_caption()),
    )
}

fn results(bill: &BillResult, tariff: &Tariff) -> String {
    let currency = escape_html(&tariff.currency);
    let mut html = String::from(
        "<h2>Breakdown</h2>\n<table>\n\
         <tr><th>Band</th><th>Units</th><th>Rate</th><th>Cost</th></tr>\n",
    );
    for usage in &bill.breakdown {
        html.push_str(&format!(
            "<tr><td>{}</td>\
             <td class=\"amount\">{}</td>\
             <td class=\"amount\">{}</td>\
             <td class=\"amount\">{}</td></tr>\n",
            usage.tier,
            usage.units_used.normalize(),
            usage.rate.normalize(),
            format_amount(usage.cost),
        ));
    }
    html.push_str("</table>\n");

    html.push_str(&format!(
        "<h2>Totals</h2>\n<table>\n\
         <tr><th>Description</th><th>Amount ({cur})</th></tr>\n\
         <tr><td>Energy Charge</td><td class=\"amount\">{energy}</td></tr>\n\
         <tr><td>{tax_caption}</td><td class=\"amount\">{tax}</td></tr>\n\
         <tr><td>Fixed Charge</td><td class=\"amount\">{fixed}</td></tr>\n\
         <tr><td><strong>Total Payable</strong></td>\
         <td class=\"amount\"><strong>{total}</strong></td></tr>\n\
         </table>\n",
        cur = currency,
        energy = format_amount(bill.energy_total),
        tax_caption = escape_html(&tariff.tax_caption()),
        tax = format_amount(bill.tax),
        fixed = format_amount(bill.fixed_charge),
        total = format_amount(bill.grand_total),
    ));

    html.push_str(&format!(
        "<p><a href=\"{}\">Download PDF invoice</a></p>\n",
        escape_html(&InvoiceQuery::from_bill(bill).download_url())
    ));
    html
}
