//! Bill calculator: HTML form at `/`, JSON API under `/api/v1`

pub mod dto;
pub mod handlers;
pub mod view;

pub use dto::{BandResponse, BandUsageResponse, BillResponse, CalculateBillRequest, TariffResponse};
pub use handlers::{calculate_bill, get_tariff, show_form, submit_form, BillingState};
