//! Validation errors for list request inputs.

use thiserror::Error;

/// Request validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The requested order-by column is not a sortable race field.
    #[error("unknown sort field: {0}")]
    UnknownSortField(String),
}
