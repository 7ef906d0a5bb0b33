//! Store collaborator traits.
//!
//! The services depend only on this capability set, not on any specific
//! store technology: read one key, read a prefix, full snapshot, merge one
//! key, batched write, and full-snapshot change notification.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use kutip_core::fees::types::{FeeRecord, LedgerSnapshot, MonthLedger};
use kutip_core::registry::Lot;
use kutip_core::txn::TransactionRecord;
use kutip_shared::types::{LotId, MonthKey, TransactionId};

use crate::error::StoreError;

/// Keyed storage for per-month-per-lot fee records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeeLedgerStore: Send + Sync {
    /// Reads the record for one `(month, lot)` key.
    async fn read_one(
        &self,
        month: MonthKey,
        lot: &LotId,
    ) -> Result<Option<FeeRecord>, StoreError>;

    /// Reads every record of one month.
    async fn read_month(&self, month: MonthKey) -> Result<Option<MonthLedger>, StoreError>;

    /// Takes a point-in-time snapshot of the full ledger.
    async fn snapshot(&self) -> Result<LedgerSnapshot, StoreError>;

    /// Writes or replaces one record. Exactly one upsert per mutation.
    async fn upsert(
        &self,
        month: MonthKey,
        lot: LotId,
        record: FeeRecord,
    ) -> Result<(), StoreError>;

    /// Writes a batch of records for one month atomically with respect to
    /// notification: subscribers see a single snapshot containing all of
    /// them.
    async fn write_many(
        &self,
        month: MonthKey,
        records: Vec<(LotId, FeeRecord)>,
    ) -> Result<(), StoreError>;

    /// Subscribes to change notification. Each delivery is a full-state
    /// snapshot replacement, never a delta.
    fn subscribe(&self) -> LedgerWatch;
}

/// Keyed storage for expense transactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Reads one transaction.
    async fn read(&self, id: TransactionId) -> Result<Option<TransactionRecord>, StoreError>;

    /// Inserts or replaces one transaction.
    async fn put(&self, record: TransactionRecord) -> Result<(), StoreError>;

    /// Removes one transaction; returns false when it was absent.
    async fn remove(&self, id: TransactionId) -> Result<bool, StoreError>;

    /// Reads all transactions in unspecified order.
    async fn list(&self) -> Result<Vec<TransactionRecord>, StoreError>;
}

/// Keyed storage for the pre-provisioned lot registry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LotStore: Send + Sync {
    /// Reads one lot.
    async fn get(&self, lot: &LotId) -> Result<Option<Lot>, StoreError>;

    /// Reads all lots in unspecified order.
    async fn list(&self) -> Result<Vec<Lot>, StoreError>;

    /// Seeds the registry when it is empty; returns true if it seeded.
    async fn seed_if_empty(&self, lots: Vec<Lot>) -> Result<bool, StoreError>;

    /// Inserts or replaces one lot.
    async fn put(&self, lot: Lot) -> Result<(), StoreError>;
}

/// A handle on ledger change notification.
///
/// Dropping the handle (or calling [`LedgerWatch::unsubscribe`]) detaches
/// the listener deterministically; nothing keeps delivering to a handle
/// that went away.
#[derive(Debug)]
pub struct LedgerWatch {
    rx: watch::Receiver<Arc<LedgerSnapshot>>,
}

impl LedgerWatch {
    /// Wraps a watch receiver fed by a store backend.
    #[must_use]
    pub fn new(rx: watch::Receiver<Arc<LedgerSnapshot>>) -> Self {
        Self { rx }
    }

    /// The most recently delivered snapshot, without waiting.
    #[must_use]
    pub fn latest(&self) -> Arc<LedgerSnapshot> {
        self.rx.borrow().clone()
    }

    /// Waits for the next change and returns the new full snapshot.
    ///
    /// Intermediate states may be superseded before this returns; each
    /// delivery must be treated as a full-state replacement, not a delta.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Closed`] when the store shut down.
    pub async fn changed(&mut self) -> Result<Arc<LedgerSnapshot>, StoreError> {
        self.rx.changed().await.map_err(|_| StoreError::Closed)?;
        Ok(self.rx.borrow_and_update().clone())
    }

    /// Explicitly detaches the listener.
    pub fn unsubscribe(self) {
        drop(self);
    }
}
