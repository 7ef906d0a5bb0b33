//! Transaction input validation.
//!
//! Runs synchronously before any store call so invalid input never causes
//! a partial write.

use kutip_shared::types::money::is_valid_amount;

use super::error::TxnError;
use super::types::TransactionInput;

/// Validates input for create and update.
///
/// Purpose must be non-empty after trimming and the cost non-negative.
/// The image URL is opaque: stored as-is, never fetched or checked.
pub fn validate_input(input: &TransactionInput) -> Result<(), TxnError> {
    if input.purpose.trim().is_empty() {
        return Err(TxnError::EmptyPurpose);
    }
    if !is_valid_amount(input.cost) {
        return Err(TxnError::NegativeCost(input.cost));
    }
    Ok(())
}
