//! HTTP interface
//!
//! - `common`: response envelope and the validating JSON extractor
//! - `modules`: handlers grouped by resource
//! - `router`: route table, middleware stack and Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::{create_router, AppState};
