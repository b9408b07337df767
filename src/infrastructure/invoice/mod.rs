//! Downloadable invoice documents

pub mod pdf;

pub use pdf::{InvoiceError, InvoiceRenderer, InvoiceTotals, Letterhead};
