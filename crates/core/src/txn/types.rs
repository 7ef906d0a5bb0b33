//! Expense transaction domain types.

use std::cmp::Reverse;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kutip_shared::types::money::round_cents;
use kutip_shared::types::TransactionId;

/// Input for creating or updating an expense transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    /// What the money was spent on.
    pub purpose: String,
    /// Date of the expense.
    pub date: NaiveDate,
    /// Cost at currency scale 2.
    pub cost: Decimal,
    /// Opaque reference to an externally hosted receipt image.
    /// The core never validates reachability or content.
    pub image_url: Option<String>,
}

/// A community expense transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Unique identifier.
    pub id: TransactionId,
    /// What the money was spent on.
    pub purpose: String,
    /// Date of the expense.
    pub date: NaiveDate,
    /// Cost at currency scale 2.
    pub cost: Decimal,
    /// Opaque receipt image reference.
    pub image_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Builds a new record from validated input.
    #[must_use]
    pub fn build(input: TransactionInput, now: DateTime<Utc>) -> Self {
        Self {
            id: TransactionId::new(),
            purpose: input.purpose.trim().to_string(),
            date: input.date,
            cost: round_cents(input.cost),
            image_url: input.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the record with validated input applied, keeping identity
    /// and creation time.
    #[must_use]
    pub fn apply_update(&self, input: TransactionInput, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            purpose: input.purpose.trim().to_string(),
            date: input.date,
            cost: round_cents(input.cost),
            image_url: input.image_url,
            created_at: self.created_at,
            updated_at: now,
        }
    }
}

/// Sum of all transaction costs regardless of date.
#[must_use]
pub fn total_cost(transactions: &[TransactionRecord]) -> Decimal {
    transactions.iter().map(|txn| txn.cost).sum()
}

/// Sorts transactions by date descending.
pub fn sort_newest_first(transactions: &mut [TransactionRecord]) {
    transactions.sort_by_key(|txn| Reverse(txn.date));
}
