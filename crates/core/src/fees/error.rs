//! Error types for fee operations.

use rust_decimal::Decimal;
use thiserror::Error;

use kutip_shared::types::LotId;
use kutip_shared::AppError;

use crate::auth::AccessDenied;

/// Errors that can occur during fee ledger operations.
#[derive(Debug, Error)]
pub enum FeeError {
    /// Fee amounts are never negative.
    #[error("Fee amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    /// The referenced lot was never provisioned.
    #[error("Lot not found: {0}")]
    LotNotFound(LotId),

    /// The mutation was rejected by the authorization guard.
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),

    /// Store failure, surfaced unmodified.
    #[error("Store error: {0}")]
    Store(String),
}

impl FeeError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::LotNotFound(_) => "LOT_NOT_FOUND",
            Self::AccessDenied(_) => "ACCESS_DENIED",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}

impl From<FeeError> for AppError {
    fn from(err: FeeError) -> Self {
        match err {
            FeeError::NegativeAmount(_) => Self::Validation(err.to_string()),
            FeeError::LotNotFound(_) => Self::NotFound(err.to_string()),
            FeeError::AccessDenied(inner) => inner.into(),
            FeeError::Store(msg) => Self::Store(msg),
        }
    }
}
