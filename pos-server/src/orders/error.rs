//! Lifecycle manager errors

use thiserror::Error;

use super::storage::StorageError;
use crate::utils::AppError;

/// Errors produced by the order lifecycle manager
///
/// Every variant aborts the enclosing transaction; a failed operation
/// changes neither the order nor any table.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Validation(String),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Storage(e) => {
                tracing::error!(error = %e, "Order storage error");
                AppError::Database(e.to_string())
            }
            OrderError::NotFound(msg) => AppError::NotFound(msg),
            OrderError::Conflict(msg) => AppError::Conflict(msg),
            OrderError::InvalidState(msg) => AppError::InvalidState(msg),
            OrderError::Validation(msg) => AppError::Validation(msg),
        }
    }
}
