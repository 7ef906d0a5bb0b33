//! Fee ledger service.
//!
//! Orchestrates pure core logic against the ledger and lot stores:
//! synthesis on read, exactly one store write per mutation, and snapshot
//! aggregation. Permission and validation checks run before any store
//! call.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use kutip_core::auth::{ensure_admin, Actor};
use kutip_core::fees::types::{FeeRecord, FeeStatus, RecordState};
use kutip_core::fees::{
    plan_bulk_mark_paid, resolve_amount_change, resolve_status_change, synthesize_from,
    year_records, FeeError,
};
use kutip_core::registry::Lot;
use kutip_core::report::{Aggregator, IncomeReport};
use kutip_shared::types::money::round_cents;
use kutip_shared::types::{LotId, MonthKey};
use kutip_shared::CommunityConfig;

use crate::store::{FeeLedgerStore, LedgerWatch, LotStore};

/// The fee-ledger and aggregation service.
pub struct FeeLedger {
    store: Arc<dyn FeeLedgerStore>,
    lots: Arc<dyn LotStore>,
    /// Default amount for subsequently synthesized records. Instance
    /// state, not a process-wide global, so parallel tests stay isolated.
    default_amount: RwLock<Decimal>,
    /// Cached grand total; every mutation clears it before the next read.
    cached_grand_total: RwLock<Option<Decimal>>,
}

impl FeeLedger {
    /// Creates the service over the given stores.
    #[must_use]
    pub fn new(
        store: Arc<dyn FeeLedgerStore>,
        lots: Arc<dyn LotStore>,
        config: &CommunityConfig,
    ) -> Self {
        Self {
            store,
            lots,
            default_amount: RwLock::new(config.default_fee_amount),
            cached_grand_total: RwLock::new(None),
        }
    }

    /// The current default fee amount.
    pub async fn default_amount(&self) -> Decimal {
        *self.default_amount.read().await
    }

    /// Changes the default amount for subsequently synthesized records.
    /// Existing records are untouched. Admin only.
    pub async fn set_default_amount(
        &self,
        actor: Option<&Actor>,
        amount: Decimal,
    ) -> Result<Decimal, FeeError> {
        ensure_admin(actor)?;
        if amount.is_sign_negative() {
            return Err(FeeError::NegativeAmount(amount));
        }
        let amount = round_cents(amount);
        *self.default_amount.write().await = amount;
        info!(%amount, "default fee amount changed");
        Ok(amount)
    }

    async fn require_lot(&self, lot: &LotId) -> Result<Lot, FeeError> {
        self.lots
            .get(lot)
            .await?
            .ok_or_else(|| FeeError::LotNotFound(lot.clone()))
    }

    async fn invalidate_cache(&self) {
        *self.cached_grand_total.write().await = None;
    }

    /// Returns the record for one `(lot, month)` key, synthesizing an
    /// unpaid default when nothing is persisted. Never writes.
    pub async fn get_record(
        &self,
        lot: &LotId,
        month: MonthKey,
    ) -> Result<RecordState, FeeError> {
        self.require_lot(lot).await?;
        let existing = self.store.read_one(month, lot).await?;
        Ok(synthesize_from(
            existing.as_ref(),
            self.default_amount().await,
        ))
    }

    /// Returns exactly 12 records for a lot's year, January first, from a
    /// single ledger snapshot.
    pub async fn year_records(
        &self,
        lot: &LotId,
        year: u16,
    ) -> Result<Vec<(MonthKey, RecordState)>, FeeError> {
        self.require_lot(lot).await?;
        let snapshot = self.store.snapshot().await?;
        Ok(year_records(
            &snapshot,
            lot,
            year,
            self.default_amount().await,
        ))
    }

    /// Sets the payment status for one lot and month. Admin only.
    ///
    /// Marking paid without an explicit date uses today; marking unpaid
    /// forces the payment date to null regardless of input. Exactly one
    /// upsert against the store.
    #[instrument(skip(self, actor), fields(%lot, %month, %status))]
    pub async fn set_status(
        &self,
        actor: Option<&Actor>,
        lot: &LotId,
        month: MonthKey,
        status: FeeStatus,
        payment_date: Option<NaiveDate>,
    ) -> Result<FeeRecord, FeeError> {
        ensure_admin(actor)?;
        self.require_lot(lot).await?;

        let existing = self.store.read_one(month, lot).await?;
        let record = resolve_status_change(
            existing.as_ref(),
            status,
            payment_date,
            Utc::now().date_naive(),
            self.default_amount().await,
        );
        self.store.upsert(month, lot.clone(), record.clone()).await?;
        self.invalidate_cache().await;
        info!(amount = %record.amount, "fee status updated");
        Ok(record)
    }

    /// Sets the fee amount for one lot and month, leaving status and
    /// payment date untouched. Admin only.
    #[instrument(skip(self, actor), fields(%lot, %month, %amount))]
    pub async fn set_amount(
        &self,
        actor: Option<&Actor>,
        lot: &LotId,
        month: MonthKey,
        amount: Decimal,
    ) -> Result<FeeRecord, FeeError> {
        ensure_admin(actor)?;
        if amount.is_sign_negative() {
            // Fail before any store call.
            return Err(FeeError::NegativeAmount(amount));
        }
        self.require_lot(lot).await?;

        let existing = self.store.read_one(month, lot).await?;
        let record = resolve_amount_change(existing.as_ref(), amount)?;
        self.store.upsert(month, lot.clone(), record.clone()).await?;
        self.invalidate_cache().await;
        Ok(record)
    }

    /// Marks the month paid for every provisioned lot in one batched
    /// write, dated today. Existing records keep their amount. Admin only.
    ///
    /// Returns the number of lots written.
    #[instrument(skip(self, actor), fields(%month))]
    pub async fn bulk_mark_paid(
        &self,
        actor: Option<&Actor>,
        month: MonthKey,
    ) -> Result<usize, FeeError> {
        ensure_admin(actor)?;

        let mut lots = self.lots.list().await?;
        kutip_core::registry::sort_by_lot_number(&mut lots);
        let month_ledger = self.store.read_month(month).await?;

        let plan = plan_bulk_mark_paid(
            month_ledger.as_ref(),
            &lots,
            Utc::now().date_naive(),
            self.default_amount().await,
        );
        let written = plan.len();
        self.store.write_many(month, plan).await?;
        self.invalidate_cache().await;
        info!(lots = written, "month marked paid in bulk");
        Ok(written)
    }

    /// Sum of paid amounts for one lot over all months.
    pub async fn total_paid_for_lot(&self, lot: &LotId) -> Result<Decimal, FeeError> {
        self.require_lot(lot).await?;
        let snapshot = self.store.snapshot().await?;
        Ok(Aggregator::total_paid_for_lot(&snapshot, lot))
    }

    /// Per-lot paid totals for every provisioned lot in one traversal.
    pub async fn totals_by_lot(&self) -> Result<HashMap<LotId, Decimal>, FeeError> {
        let lots = self.lots.list().await?;
        let snapshot = self.store.snapshot().await?;
        Ok(Aggregator::totals_by_lot(&snapshot, &lots))
    }

    /// Sum of all paid amounts across every lot and month. Best-effort
    /// snapshot consistency: the value is cached until the next mutation
    /// through this service.
    pub async fn grand_total_paid(&self) -> Result<Decimal, FeeError> {
        if let Some(total) = *self.cached_grand_total.read().await {
            return Ok(total);
        }
        // Snapshot and fill under the write lock: an invalidation from a
        // mutation racing this read queues behind the lock and clears the
        // entry afterwards, so a pre-mutation total is never pinned.
        let mut cache = self.cached_grand_total.write().await;
        if let Some(total) = *cache {
            return Ok(total);
        }
        let snapshot = self.store.snapshot().await?;
        let total = Aggregator::grand_total_paid(&snapshot);
        *cache = Some(total);
        Ok(total)
    }

    /// Year-scoped income report, details newest month first, lots in
    /// numeric order within a month.
    pub async fn income_for_year(&self, year: u16) -> Result<IncomeReport, FeeError> {
        let lots = self.lots.list().await?;
        let snapshot = self.store.snapshot().await?;
        Ok(Aggregator::income_for_year(&snapshot, &lots, year))
    }

    /// Distinct month keys with any persisted record, newest first.
    pub async fn recorded_months(&self) -> Result<Vec<MonthKey>, FeeError> {
        let snapshot = self.store.snapshot().await?;
        Ok(Aggregator::recorded_months(&snapshot))
    }

    /// Subscribes to ledger change notification.
    #[must_use]
    pub fn subscribe(&self) -> LedgerWatch {
        self.store.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use rust_decimal_macros::dec;

    use kutip_core::auth::Role;
    use kutip_shared::types::UserId;

    use crate::memory::MemoryStore;
    use crate::store::{MockFeeLedgerStore, MockLotStore};

    fn admin() -> Actor {
        Actor {
            id: UserId::new(),
            role: Role::Admin,
            display_name: "Admin".to_string(),
        }
    }

    fn march() -> MonthKey {
        "2025-03".parse().unwrap()
    }

    fn service(
        store: MockFeeLedgerStore,
        lots: MockLotStore,
    ) -> FeeLedger {
        FeeLedger::new(
            Arc::new(store),
            Arc::new(lots),
            &CommunityConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_unmodified() {
        let mut store = MockFeeLedgerStore::new();
        store
            .expect_read_one()
            .returning(|_, _| Err(crate::error::StoreError::Backend("unreachable".into())));
        let mut lots = MockLotStore::new();
        lots.expect_get()
            .returning(|lot| Ok(Some(Lot::numbered(5)).filter(|l| &l.id == lot)));

        let ledger = service(store, lots);
        let err = ledger
            .get_record(&LotId::from_index(5), march())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "STORE_ERROR");
    }

    #[tokio::test]
    async fn test_mutation_rejected_before_store_is_touched() {
        // No expectations set: any store call would panic the mock.
        let store = MockFeeLedgerStore::new();
        let lots = MockLotStore::new();
        let ledger = service(store, lots);

        let err = ledger
            .set_amount(None, &LotId::from_index(5), march(), dec!(15.00))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "ACCESS_DENIED");

        let err = ledger
            .set_amount(Some(&admin()), &LotId::from_index(5), march(), dec!(-1))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "NEGATIVE_AMOUNT");
    }

    #[tokio::test]
    async fn test_unprovisioned_lot_is_not_found() {
        let store = MockFeeLedgerStore::new();
        let mut lots = MockLotStore::new();
        lots.expect_get()
            .with(eq(LotId::from_index(99)))
            .returning(|_| Ok(None));

        let ledger = service(store, lots);
        let err = ledger
            .get_record(&LotId::from_index(99), march())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "LOT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_set_status_performs_exactly_one_upsert() {
        let mut store = MockFeeLedgerStore::new();
        store.expect_read_one().returning(|_, _| Ok(None));
        store
            .expect_upsert()
            .times(1)
            .returning(|_, _, _| Ok(()));
        let mut lots = MockLotStore::new();
        lots.expect_get().returning(|_| Ok(Some(Lot::numbered(5))));

        let ledger = service(store, lots);
        let record = ledger
            .set_status(
                Some(&admin()),
                &LotId::from_index(5),
                march(),
                FeeStatus::Paid,
                None,
            )
            .await
            .unwrap();

        assert!(record.status.is_paid());
        assert!(record.payment_date.is_some());
        assert_eq!(record.amount, dec!(10.00));
    }

    /// Store double whose first snapshot parks between capturing the
    /// ledger and returning it, so a mutation can land in the gap.
    struct GatedSnapshotStore {
        inner: MemoryStore,
        entered: tokio::sync::Notify,
        release: tokio::sync::Notify,
        gated: std::sync::atomic::AtomicBool,
    }

    impl GatedSnapshotStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                entered: tokio::sync::Notify::new(),
                release: tokio::sync::Notify::new(),
                gated: std::sync::atomic::AtomicBool::new(true),
            }
        }
    }

    #[async_trait::async_trait]
    impl crate::store::FeeLedgerStore for GatedSnapshotStore {
        async fn read_one(
            &self,
            month: MonthKey,
            lot: &LotId,
        ) -> Result<Option<FeeRecord>, crate::error::StoreError> {
            crate::store::FeeLedgerStore::read_one(&self.inner, month, lot).await
        }

        async fn read_month(
            &self,
            month: MonthKey,
        ) -> Result<Option<kutip_core::fees::types::MonthLedger>, crate::error::StoreError>
        {
            crate::store::FeeLedgerStore::read_month(&self.inner, month).await
        }

        async fn snapshot(
            &self,
        ) -> Result<kutip_core::fees::types::LedgerSnapshot, crate::error::StoreError> {
            let snapshot = crate::store::FeeLedgerStore::snapshot(&self.inner).await?;
            if self.gated.swap(false, std::sync::atomic::Ordering::SeqCst) {
                self.entered.notify_one();
                self.release.notified().await;
            }
            Ok(snapshot)
        }

        async fn upsert(
            &self,
            month: MonthKey,
            lot: LotId,
            record: FeeRecord,
        ) -> Result<(), crate::error::StoreError> {
            crate::store::FeeLedgerStore::upsert(&self.inner, month, lot, record).await
        }

        async fn write_many(
            &self,
            month: MonthKey,
            records: Vec<(LotId, FeeRecord)>,
        ) -> Result<(), crate::error::StoreError> {
            crate::store::FeeLedgerStore::write_many(&self.inner, month, records).await
        }

        fn subscribe(&self) -> crate::store::LedgerWatch {
            crate::store::FeeLedgerStore::subscribe(&self.inner)
        }
    }

    #[tokio::test]
    async fn test_read_overlapping_mutation_cannot_pin_stale_total() {
        let store = Arc::new(GatedSnapshotStore::new());
        let lots = Arc::new(MemoryStore::new());
        crate::store::LotStore::seed_if_empty(
            lots.as_ref(),
            kutip_core::registry::provision_lots(48),
        )
        .await
        .unwrap();
        let ledger = Arc::new(FeeLedger::new(
            store.clone(),
            lots,
            &CommunityConfig::default(),
        ));

        // Reader takes its snapshot on the empty ledger, then parks.
        let reader = {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.grand_total_paid().await })
        };
        store.entered.notified().await;

        // Mutation runs to completion, including its cache invalidation,
        // while the reader is still parked.
        let writer = {
            let ledger = ledger.clone();
            tokio::spawn(async move {
                ledger
                    .set_status(
                        Some(&admin()),
                        &LotId::from_index(5),
                        march(),
                        FeeStatus::Paid,
                        None,
                    )
                    .await
            })
        };
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        store.release.notify_one();

        reader.await.unwrap().unwrap();
        writer.await.unwrap().unwrap();

        // The parked reader's pre-mutation total must not survive in the
        // cache; the next read reflects the mutation.
        assert_eq!(ledger.grand_total_paid().await.unwrap(), dec!(10.00));
    }

    #[tokio::test]
    async fn test_default_amount_is_admin_gated() {
        let store = MockFeeLedgerStore::new();
        let lots = MockLotStore::new();
        let ledger = service(store, lots);

        assert!(ledger.set_default_amount(None, dec!(12.00)).await.is_err());
        assert_eq!(ledger.default_amount().await, dec!(10.00));

        let updated = ledger
            .set_default_amount(Some(&admin()), dec!(12.00))
            .await
            .unwrap();
        assert_eq!(updated, dec!(12.00));
        assert_eq!(ledger.default_amount().await, dec!(12.00));
    }
}
