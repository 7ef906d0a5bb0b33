//! Community balance board.

use std::sync::Arc;

use rust_decimal::Decimal;

use kutip_core::report::BalanceCalculator;
use kutip_shared::AppResult;

use crate::fees::FeeLedger;
use crate::transactions::TransactionLedger;

/// Derives the running community balance from the two ledgers.
///
/// The balance is never persisted; it is recomputed on demand from the
/// (per-ledger cached) aggregates, and every mutation invalidates the
/// cache on its own ledger before the next read.
pub struct BalanceBoard {
    fees: Arc<FeeLedger>,
    transactions: Arc<TransactionLedger>,
}

impl BalanceBoard {
    /// Creates the board over the two ledgers.
    #[must_use]
    pub fn new(fees: Arc<FeeLedger>, transactions: Arc<TransactionLedger>) -> Self {
        Self { fees, transactions }
    }

    /// Grand total of paid fees minus all transaction costs.
    pub async fn balance(&self) -> AppResult<Decimal> {
        let income = self.fees.grand_total_paid().await?;
        let expenses = self.transactions.total().await?;
        Ok(BalanceCalculator::balance(income, expenses))
    }
}
