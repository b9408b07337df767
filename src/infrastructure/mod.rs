//! Infrastructure layer - external concerns

pub mod invoice;

pub use invoice::{InvoiceError, InvoiceRenderer, InvoiceTotals, Letterhead};
