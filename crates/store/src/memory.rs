//! In-memory store backend.
//!
//! Implements all three collaborator traits over tokio `RwLock` maps with
//! a `watch` channel for ledger change notification. Used by tests and
//! embedded deployments; a hosted tree store slots in behind the same
//! traits.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};
use tracing::debug;

use kutip_core::fees::types::{FeeRecord, LedgerSnapshot, MonthLedger};
use kutip_core::registry::Lot;
use kutip_core::txn::TransactionRecord;
use kutip_shared::types::{LotId, MonthKey, TransactionId};

use crate::error::StoreError;
use crate::store::{FeeLedgerStore, LedgerWatch, LotStore, TransactionStore};

/// In-memory backend for all three collections.
#[derive(Debug)]
pub struct MemoryStore {
    ledger: RwLock<LedgerSnapshot>,
    lots: RwLock<BTreeMap<LotId, Lot>>,
    transactions: RwLock<BTreeMap<TransactionId, TransactionRecord>>,
    ledger_tx: watch::Sender<Arc<LedgerSnapshot>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (ledger_tx, _) = watch::channel(Arc::new(LedgerSnapshot::new()));
        Self {
            ledger: RwLock::new(LedgerSnapshot::new()),
            lots: RwLock::new(BTreeMap::new()),
            transactions: RwLock::new(BTreeMap::new()),
            ledger_tx,
        }
    }

    /// Publishes the current ledger state to subscribers.
    fn notify(&self, snapshot: &LedgerSnapshot) {
        // send_replace never fails; a channel with no receivers just
        // drops the value.
        self.ledger_tx.send_replace(Arc::new(snapshot.clone()));
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeeLedgerStore for MemoryStore {
    async fn read_one(
        &self,
        month: MonthKey,
        lot: &LotId,
    ) -> Result<Option<FeeRecord>, StoreError> {
        Ok(self.ledger.read().await.get(month, lot).cloned())
    }

    async fn read_month(&self, month: MonthKey) -> Result<Option<MonthLedger>, StoreError> {
        Ok(self.ledger.read().await.month(month).cloned())
    }

    async fn snapshot(&self) -> Result<LedgerSnapshot, StoreError> {
        Ok(self.ledger.read().await.clone())
    }

    async fn upsert(
        &self,
        month: MonthKey,
        lot: LotId,
        record: FeeRecord,
    ) -> Result<(), StoreError> {
        let mut ledger = self.ledger.write().await;
        debug!(%month, %lot, status = %record.status, "ledger upsert");
        ledger.upsert(month, lot, record);
        self.notify(&ledger);
        Ok(())
    }

    async fn write_many(
        &self,
        month: MonthKey,
        records: Vec<(LotId, FeeRecord)>,
    ) -> Result<(), StoreError> {
        let mut ledger = self.ledger.write().await;
        debug!(%month, count = records.len(), "ledger batch write");
        for (lot, record) in records {
            ledger.upsert(month, lot, record);
        }
        // One notification for the whole batch.
        self.notify(&ledger);
        Ok(())
    }

    fn subscribe(&self) -> LedgerWatch {
        LedgerWatch::new(self.ledger_tx.subscribe())
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn read(&self, id: TransactionId) -> Result<Option<TransactionRecord>, StoreError> {
        Ok(self.transactions.read().await.get(&id).cloned())
    }

    async fn put(&self, record: TransactionRecord) -> Result<(), StoreError> {
        debug!(id = %record.id, cost = %record.cost, "transaction put");
        self.transactions.write().await.insert(record.id, record);
        Ok(())
    }

    async fn remove(&self, id: TransactionId) -> Result<bool, StoreError> {
        debug!(%id, "transaction remove");
        Ok(self.transactions.write().await.remove(&id).is_some())
    }

    async fn list(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        Ok(self.transactions.read().await.values().cloned().collect())
    }
}

#[async_trait]
impl LotStore for MemoryStore {
    async fn get(&self, lot: &LotId) -> Result<Option<Lot>, StoreError> {
        Ok(self.lots.read().await.get(lot).cloned())
    }

    async fn list(&self) -> Result<Vec<Lot>, StoreError> {
        Ok(self.lots.read().await.values().cloned().collect())
    }

    async fn seed_if_empty(&self, lots: Vec<Lot>) -> Result<bool, StoreError> {
        let mut stored = self.lots.write().await;
        if !stored.is_empty() {
            return Ok(false);
        }
        debug!(count = lots.len(), "seeding lot registry");
        for lot in lots {
            stored.insert(lot.id.clone(), lot);
        }
        Ok(true)
    }

    async fn put(&self, lot: Lot) -> Result<(), StoreError> {
        debug!(id = %lot.id, "lot put");
        self.lots.write().await.insert(lot.id.clone(), lot);
        Ok(())
    }
}
