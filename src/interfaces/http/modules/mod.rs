pub mod billing;
pub mod health;
pub mod invoice;
pub mod metrics;
pub mod request_id;
