//! Lot registry service.
//!
//! Lots are seeded once at first run and never created ad hoc afterwards;
//! only owner name and phone number change through the normal flow.

use std::sync::Arc;

use tracing::{info, instrument};

use kutip_core::auth::{ensure_admin, Actor};
use kutip_core::registry::{provision_lots, sort_by_lot_number, Lot};
use kutip_shared::types::LotId;
use kutip_shared::{AppError, AppResult, CommunityConfig};

use crate::store::LotStore;

/// The pre-provisioned lot registry service.
pub struct LotRegistry {
    store: Arc<dyn LotStore>,
    lot_count: u32,
}

impl LotRegistry {
    /// Creates the service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn LotStore>, config: &CommunityConfig) -> Self {
        Self {
            store,
            lot_count: config.lot_count,
        }
    }

    /// Seeds the configured number of empty lots when the registry is
    /// empty. Returns true when seeding happened.
    #[instrument(skip(self))]
    pub async fn provision_if_empty(&self) -> AppResult<bool> {
        let seeded = self
            .store
            .seed_if_empty(provision_lots(self.lot_count))
            .await?;
        if seeded {
            info!(count = self.lot_count, "lot registry provisioned");
        }
        Ok(seeded)
    }

    /// All lots in numeric lot-number order.
    pub async fn list(&self) -> AppResult<Vec<Lot>> {
        let mut lots = self.store.list().await?;
        sort_by_lot_number(&mut lots);
        Ok(lots)
    }

    /// One lot by key.
    pub async fn get(&self, lot: &LotId) -> AppResult<Lot> {
        self.store
            .get(lot)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lot not found: {lot}")))
    }

    /// Updates a lot's owner name and phone number. Admin only. Lot
    /// number and key never change.
    #[instrument(skip(self, actor), fields(%lot))]
    pub async fn update_contact(
        &self,
        actor: Option<&Actor>,
        lot: &LotId,
        owner_name: Option<String>,
        phone_number: Option<String>,
    ) -> AppResult<Lot> {
        ensure_admin(actor)?;

        let mut stored = self.get(lot).await?;
        stored.owner_name = owner_name.filter(|name| !name.trim().is_empty());
        stored.phone_number = phone_number.filter(|phone| !phone.trim().is_empty());
        self.store.put(stored.clone()).await?;
        info!("lot contact updated");
        Ok(stored)
    }
}
