//! Store error types.

use thiserror::Error;

use kutip_core::fees::FeeError;
use kutip_core::txn::TxnError;
use kutip_shared::AppError;

/// Errors raised by store collaborators.
///
/// Store failures always surface to the caller unmodified; the services
/// never retry or swallow them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store reported a failure.
    #[error("Store backend error: {0}")]
    Backend(String),

    /// The store was shut down while a subscription was waiting.
    #[error("Store closed")]
    Closed,
}

impl From<StoreError> for FeeError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<StoreError> for TxnError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}
