//! Expense transaction ledger service.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use kutip_core::auth::{ensure_admin, Actor};
use kutip_core::report::{Aggregator, ExpenseReport};
use kutip_core::txn::{
    sort_newest_first, total_cost, validate_input, TransactionInput, TransactionRecord, TxnError,
};
use kutip_shared::types::TransactionId;

use crate::store::TransactionStore;

/// The expense transaction ledger. All mutations are admin only.
pub struct TransactionLedger {
    store: Arc<dyn TransactionStore>,
    /// Cached cost total; every mutation clears it before the next read.
    cached_total: RwLock<Option<Decimal>>,
}

impl TransactionLedger {
    /// Creates the service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self {
            store,
            cached_total: RwLock::new(None),
        }
    }

    async fn invalidate_cache(&self) {
        *self.cached_total.write().await = None;
    }

    /// Records a new expense. Validation runs before any store call.
    #[instrument(skip_all, fields(purpose = %input.purpose, cost = %input.cost))]
    pub async fn create(
        &self,
        actor: Option<&Actor>,
        input: TransactionInput,
    ) -> Result<TransactionRecord, TxnError> {
        ensure_admin(actor)?;
        validate_input(&input)?;

        let record = TransactionRecord::build(input, Utc::now());
        self.store.put(record.clone()).await?;
        self.invalidate_cache().await;
        info!(id = %record.id, "transaction created");
        Ok(record)
    }

    /// Replaces an existing expense's fields, keeping id and creation
    /// time.
    #[instrument(skip_all, fields(%id))]
    pub async fn update(
        &self,
        actor: Option<&Actor>,
        id: TransactionId,
        input: TransactionInput,
    ) -> Result<TransactionRecord, TxnError> {
        ensure_admin(actor)?;
        validate_input(&input)?;

        let existing = self
            .store
            .read(id)
            .await?
            .ok_or(TxnError::NotFound(id))?;
        let record = existing.apply_update(input, Utc::now());
        self.store.put(record.clone()).await?;
        self.invalidate_cache().await;
        Ok(record)
    }

    /// Deletes an expense.
    #[instrument(skip_all, fields(%id))]
    pub async fn delete(&self, actor: Option<&Actor>, id: TransactionId) -> Result<(), TxnError> {
        ensure_admin(actor)?;

        if !self.store.remove(id).await? {
            return Err(TxnError::NotFound(id));
        }
        self.invalidate_cache().await;
        info!("transaction deleted");
        Ok(())
    }

    /// All expenses, date descending.
    pub async fn list_all(&self) -> Result<Vec<TransactionRecord>, TxnError> {
        let mut transactions = self.store.list().await?;
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    /// Sum of every expense cost regardless of date. Cached until the
    /// next mutation through this service.
    pub async fn total(&self) -> Result<Decimal, TxnError> {
        if let Some(total) = *self.cached_total.read().await {
            return Ok(total);
        }
        // Same discipline as the fee ledger: list and fill under the
        // write lock so a racing mutation's invalidation lands after the
        // fill, never before it.
        let mut cache = self.cached_total.write().await;
        if let Some(total) = *cache {
            return Ok(total);
        }
        let transactions = self.store.list().await?;
        let total = total_cost(&transactions);
        *cache = Some(total);
        Ok(total)
    }

    /// Year-scoped expense report, newest first.
    pub async fn expenses_for_year(&self, year: u16) -> Result<ExpenseReport, TxnError> {
        let transactions = self.store.list().await?;
        Ok(Aggregator::expenses_for_year(&transactions, year))
    }
}
