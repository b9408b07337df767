//! Invoice download endpoint

pub mod dto;
pub mod handlers;

pub use dto::InvoiceQuery;
pub use handlers::{download_invoice, InvoiceState};
