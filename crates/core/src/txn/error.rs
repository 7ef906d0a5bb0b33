//! Error types for expense transaction operations.

use rust_decimal::Decimal;
use thiserror::Error;

use kutip_shared::types::TransactionId;
use kutip_shared::AppError;

use crate::auth::AccessDenied;

/// Errors that can occur during transaction ledger operations.
#[derive(Debug, Error)]
pub enum TxnError {
    /// Purpose is required and must be non-empty.
    #[error("Transaction purpose is required")]
    EmptyPurpose,

    /// Transaction costs are never negative.
    #[error("Transaction cost cannot be negative: {0}")]
    NegativeCost(Decimal),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),

    /// The mutation was rejected by the authorization guard.
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),

    /// Store failure, surfaced unmodified.
    #[error("Store error: {0}")]
    Store(String),
}

impl TxnError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyPurpose => "EMPTY_PURPOSE",
            Self::NegativeCost(_) => "NEGATIVE_COST",
            Self::NotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::AccessDenied(_) => "ACCESS_DENIED",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}

impl From<TxnError> for AppError {
    fn from(err: TxnError) -> Self {
        match err {
            TxnError::EmptyPurpose | TxnError::NegativeCost(_) => {
                Self::Validation(err.to_string())
            }
            TxnError::NotFound(_) => Self::NotFound(err.to_string()),
            TxnError::AccessDenied(inner) => inner.into(),
            TxnError::Store(msg) => Self::Store(msg),
        }
    }
}
