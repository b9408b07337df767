//! PDF invoice rendering
//!
//! The renderer prints the totals it is handed exactly as received. It never
//! parses, recomputes or validates them: the caller already produced them
//! from a [`BillResult`](crate::domain::BillResult).

use chrono::NaiveDate;
use printpdf::{BuiltinFont, Line, Mm, PdfDocument, PdfLayerReference, Point};
use thiserror::Error;
use tracing::debug;

// A4 portrait, millimetres
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 25.0;
const TOP: f32 = 272.0;

const DESCRIPTION_COLUMN: f32 = 88.0;
const AMOUNT_COLUMN: f32 = 53.0;
const ROW_HEIGHT: f32 = 9.0;
const CELL_PADDING: f32 = 2.5;

const PT_TO_MM: f32 = 0.352_778;

#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

/// Company block printed at the top of every invoice, plus the footer name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Letterhead {
    pub company_name: String,
    pub tagline: String,
    pub email: String,
    pub phone: String,
    pub prepared_by: String,
}

impl Default for Letterhead {
    fn default() -> Self {
        Self {
            company_name: "POWERBILL PRO LTD".to_string(),
            tagline: "Electricity Billing & Energy Solutions".to_string(),
            email: "support@powerbillpro.com".to_string(),
            phone: "+234-000-000-0000".to_string(),
            prepared_by: "Okechukwu Favour".to_string(),
        }
    }
}

/// Pre-formatted amounts, taken verbatim from the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub energy_total: String,
    pub tax: String,
    pub fixed_charge: String,
    pub grand_total: String,
}

pub struct InvoiceRenderer {
    letterhead: Letterhead,
    currency: String,
    tax_caption: String,
}

impl InvoiceRenderer {
    pub fn new(
        letterhead: Letterhead,
        currency: impl Into<String>,
        tax_caption: impl Into<String>,
    ) -> Self {
        Self {
            letterhead,
            currency: currency.into(),
            tax_caption: tax_caption.into(),
        }
    }

    /// Header row followed by the four charge rows.
    pub fn table_rows(&self, totals: &InvoiceTotals) -> Vec<(String, String)> {
        vec![
            (
                "Description".to_string(),
                format!("Amount ({})", self.currency),
            ),
            ("Energy Charge".to_string(), totals.energy_total.clone()),
            (self.tax_caption.clone(), totals.tax.clone()),
            ("Fixed Charge".to_string(), totals.fixed_charge.clone()),
            ("Total Payable".to_string(), totals.grand_total.clone()),
        ]
    }

    pub fn render(
        &self,
        totals: &InvoiceTotals,
        issued_on: NaiveDate,
    ) -> Result<Vec<u8>, InvoiceError> {
        let (doc, page, layer) = PdfDocument::new(
            format!("{} Invoice", self.letterhead.company_name),
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "Invoice",
        );
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| InvoiceError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| InvoiceError::Pdf(e.to_string()))?;

        // ===== Company header =====
        let mut y = TOP;
        layer.use_text(&self.letterhead.company_name, 20.0, Mm(MARGIN_LEFT), Mm(y), &bold);
        y -= 8.0;
        for line in [
            self.letterhead.tagline.clone(),
            format!("Email: {}", self.letterhead.email),
            format!("Phone: {}", self.letterhead.phone),
        ] {
            layer.use_text(line, 10.0, Mm(MARGIN_LEFT), Mm(y), &regular);
            y -= 5.5;
        }

        y -= 10.0;
        layer.use_text("INVOICE", 15.0, Mm(MARGIN_LEFT), Mm(y), &bold);
        y -= 6.0;
        layer.use_text(
            format!("Date: {}", issued_on.format("%d %B %Y")),
            10.0,
            Mm(MARGIN_LEFT),
            Mm(y),
            &regular,
        );
        y -= 10.0;

        // ===== Charge table =====
        let rows = self.table_rows(totals);
        let table_top = y;
        draw_grid(&layer, table_top, rows.len());

        for (index, (description, amount)) in rows.iter().enumerate() {
            let font = if index == 0 || index == rows.len() - 1 {
                &bold
            } else {
                &regular
            };
            let baseline = table_top - ROW_HEIGHT * (index as f32 + 1.0) + 3.0;
            layer.use_text(
                description.as_str(),
                10.0,
                Mm(MARGIN_LEFT + CELL_PADDING),
                Mm(baseline),
                font,
            );

            let right_edge = MARGIN_LEFT + DESCRIPTION_COLUMN + AMOUNT_COLUMN - CELL_PADDING;
            let x = if index == 0 {
                MARGIN_LEFT + DESCRIPTION_COLUMN + CELL_PADDING
            } else {
                right_edge - approx_text_width(amount, 10.0)
            };
            layer.use_text(amount.as_str(), 10.0, Mm(x), Mm(baseline), font);
        }

        // ===== Footer =====
        let footer_y = table_top - ROW_HEIGHT * rows.len() as f32 - 14.0;
        layer.use_text(
            format!("Prepared by {}", self.letterhead.prepared_by),
            10.0,
            Mm(MARGIN_LEFT),
            Mm(footer_y),
            &regular,
        );

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| InvoiceError::Pdf(e.to_string()))?;
        debug!(size = bytes.len(), "Invoice PDF rendered");
        Ok(bytes)
    }
}

fn draw_grid(layer: &PdfLayerReference, top: f32, rows: usize) {
    let left = MARGIN_LEFT;
    let right = MARGIN_LEFT + DESCRIPTION_COLUMN + AMOUNT_COLUMN;
    let bottom = top - ROW_HEIGHT * rows as f32;

    layer.set_outline_thickness(0.8);

    for row in 0..=rows {
        let y = top - ROW_HEIGHT * row as f32;
        layer.add_line(segment((left, y), (right, y)));
    }
    for x in [left, left + DESCRIPTION_COLUMN, right] {
        layer.add_line(segment((x, top), (x, bottom)));
    }
}

fn segment(from: (f32, f32), to: (f32, f32)) -> Line {
    Line {
        points: vec![
            (Point::new(Mm(from.0), Mm(from.1)), false),
            (Point::new(Mm(to.0), Mm(to.1)), false),
        ],
        is_closed: false,
    }
}

/// Helvetica advance widths: digits and most glyphs are 556/1000 em,
/// separators 278/1000 em. Good enough to right-align amounts.
fn approx_text_width(text: &str, font_size: f32) -> f32 {
    let em: f32 = text
        .chars()
        .map(|c| match c {
            '.' | ',' | ' ' | 'i' | 'l' => 0.278,
            _ => 0.556,
        })
        .sum();
    em * font_size * PT_TO_MM
}
