//! Shared HTTP building blocks: the response envelope and extractors.

pub mod api_response;
pub mod validated_json;

pub use api_response::{domain_error, ApiError, ApiResponse};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};
