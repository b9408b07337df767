//! Domain errors

use thiserror::Error;

/// Domain-level error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Consumption that cannot be billed: not a number, negative,
    /// out of range or beyond what the schedule covers.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A tariff that breaks the schedule invariants. Raised while the
    /// configuration is loaded, never per request.
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),
}

impl DomainError {
    /// Message suitable for showing to the person who typed the input.
    pub fn reason(&self) -> &str {
        match self {
            Self::InvalidInput(msg) | Self::InvalidSchedule(msg) => msg,
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
