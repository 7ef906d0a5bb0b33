//! Domain types for the fee ledger.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kutip_shared::types::{LotId, MonthKey};

/// Payment status of a fee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    /// The maintenance fee for the month has been paid.
    Paid,
    /// The maintenance fee for the month is outstanding.
    Unpaid,
}

impl FeeStatus {
    /// Returns true for [`FeeStatus::Paid`].
    #[must_use]
    pub const fn is_paid(self) -> bool {
        matches!(self, Self::Paid)
    }
}

impl std::fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paid => write!(f, "paid"),
            Self::Unpaid => write!(f, "unpaid"),
        }
    }
}

/// The payment state for one lot in one month.
///
/// Invariant: an unpaid record carries no payment date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRecord {
    /// Whether the fee has been paid.
    pub status: FeeStatus,
    /// Date the payment was received; `None` while unpaid.
    pub payment_date: Option<NaiveDate>,
    /// The fee amount at currency scale 2. Never negative.
    pub amount: Decimal,
}

impl FeeRecord {
    /// An unpaid record with the given amount and no payment date.
    #[must_use]
    pub const fn unpaid(amount: Decimal) -> Self {
        Self {
            status: FeeStatus::Unpaid,
            payment_date: None,
            amount,
        }
    }

    /// A paid record with the given amount and payment date.
    #[must_use]
    pub const fn paid(amount: Decimal, payment_date: NaiveDate) -> Self {
        Self {
            status: FeeStatus::Paid,
            payment_date: Some(payment_date),
            amount,
        }
    }

    /// Checks the structural invariants: unpaid records carry no payment
    /// date, and the amount is never negative.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let date_ok = match self.status {
            FeeStatus::Unpaid => self.payment_date.is_none(),
            FeeStatus::Paid => true,
        };
        date_ok && !self.amount.is_sign_negative()
    }
}

/// Whether a record was read back from the store or synthesized on read.
///
/// Keeping the distinction at the type level prevents accidental writes of
/// synthesized defaults: only an explicit mutation persists a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RecordState {
    /// The record exists in the ledger store.
    Persisted(FeeRecord),
    /// A transient default view; nothing was written.
    Synthesized(FeeRecord),
}

impl RecordState {
    /// The underlying record, regardless of provenance.
    #[must_use]
    pub const fn record(&self) -> &FeeRecord {
        match self {
            Self::Persisted(record) | Self::Synthesized(record) => record,
        }
    }

    /// Consumes the state, returning the record.
    #[must_use]
    pub fn into_record(self) -> FeeRecord {
        match self {
            Self::Persisted(record) | Self::Synthesized(record) => record,
        }
    }

    /// Returns true if the record exists in the store.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted(_))
    }
}

/// All fee records of one month, keyed by lot.
pub type MonthLedger = BTreeMap<LotId, FeeRecord>;

/// An immutable point-in-time view of the entire fee ledger.
///
/// All aggregation runs over one snapshot so a single call never mixes data
/// from before and after a concurrent write (best-effort snapshot
/// consistency, not a serializable transaction).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    months: BTreeMap<MonthKey, MonthLedger>,
}

impl LedgerSnapshot {
    /// An empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the persisted record for one `(month, lot)` key.
    #[must_use]
    pub fn get(&self, month: MonthKey, lot: &LotId) -> Option<&FeeRecord> {
        self.months.get(&month).and_then(|ledger| ledger.get(lot))
    }

    /// The records of one month, if any were persisted.
    #[must_use]
    pub fn month(&self, month: MonthKey) -> Option<&MonthLedger> {
        self.months.get(&month)
    }

    /// Inserts or replaces one record. Used by store backends and tests to
    /// build snapshots; the core itself never writes through a snapshot.
    pub fn upsert(&mut self, month: MonthKey, lot: LotId, record: FeeRecord) {
        self.months.entry(month).or_default().insert(lot, record);
    }

    /// Iterates months in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (&MonthKey, &MonthLedger)> {
        self.months.iter()
    }

    /// Month keys with at least one persisted record, chronological order.
    pub fn months(&self) -> impl Iterator<Item = MonthKey> + '_ {
        self.months.keys().copied()
    }

    /// True when no record has ever been persisted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Total number of persisted records across all months.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.months.values().map(BTreeMap::len).sum()
    }
}
