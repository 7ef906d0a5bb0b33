//! Aggregation over ledger snapshots.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::Datelike;
use rust_decimal::Decimal;

use kutip_shared::types::LotId;
use kutip_shared::types::MonthKey;

use crate::fees::types::LedgerSnapshot;
use crate::registry::{lot_sort_index, Lot};
use crate::txn::TransactionRecord;

use super::types::{ExpenseReport, IncomeLine, IncomeReport};

/// Single-pass aggregation over the fee ledger.
///
/// Every method consumes a snapshot taken at call time; concurrent writes
/// during traversal are not reflected in that call's result.
pub struct Aggregator;

impl Aggregator {
    /// Sum of paid amounts for one lot over all months.
    #[must_use]
    pub fn total_paid_for_lot(snapshot: &LedgerSnapshot, lot: &LotId) -> Decimal {
        snapshot
            .iter()
            .filter_map(|(_, ledger)| ledger.get(lot))
            .filter(|record| record.status.is_paid())
            .map(|record| record.amount)
            .sum()
    }

    /// Per-lot paid totals for every lot in one combined traversal.
    ///
    /// Lots with no paid record map to zero, so the result always carries
    /// one entry per provisioned lot.
    #[must_use]
    pub fn totals_by_lot(snapshot: &LedgerSnapshot, lots: &[Lot]) -> HashMap<LotId, Decimal> {
        let mut totals: HashMap<LotId, Decimal> = lots
            .iter()
            .map(|lot| (lot.id.clone(), Decimal::ZERO))
            .collect();

        for (_, ledger) in snapshot.iter() {
            for (lot_id, record) in ledger {
                if record.status.is_paid() {
                    if let Some(total) = totals.get_mut(lot_id) {
                        *total += record.amount;
                    }
                }
            }
        }
        totals
    }

    /// Sum of all paid amounts across every lot and month.
    #[must_use]
    pub fn grand_total_paid(snapshot: &LedgerSnapshot) -> Decimal {
        snapshot
            .iter()
            .flat_map(|(_, ledger)| ledger.values())
            .filter(|record| record.status.is_paid())
            .map(|record| record.amount)
            .sum()
    }

    /// Year-scoped income: every paid record whose month falls in `year`.
    #[must_use]
    pub fn income_for_year(snapshot: &LedgerSnapshot, lots: &[Lot], year: u16) -> IncomeReport {
        let numbers: HashMap<&LotId, &str> = lots
            .iter()
            .map(|lot| (&lot.id, lot.lot_number.as_str()))
            .collect();

        let mut details: Vec<IncomeLine> = snapshot
            .iter()
            .filter(|(month, _)| month.year() == year)
            .flat_map(|(month, ledger)| {
                ledger
                    .iter()
                    .filter(|(_, record)| record.status.is_paid())
                    .map(|(lot_id, record)| IncomeLine {
                        month_key: *month,
                        lot_id: lot_id.clone(),
                        lot_number: numbers
                            .get(lot_id)
                            .map_or_else(|| lot_id.to_string(), ToString::to_string),
                        amount: record.amount,
                        payment_date: record.payment_date,
                    })
            })
            .collect();

        details.sort_by_key(|line| (Reverse(line.month_key), lot_sort_index(&line.lot_number)));
        let total = details.iter().map(|line| line.amount).sum();

        IncomeReport {
            year,
            total,
            details,
        }
    }

    /// Year-scoped expenses: every transaction dated within `year`,
    /// newest first.
    #[must_use]
    pub fn expenses_for_year(transactions: &[TransactionRecord], year: u16) -> ExpenseReport {
        let mut details: Vec<TransactionRecord> = transactions
            .iter()
            .filter(|txn| txn.date.year() == i32::from(year))
            .cloned()
            .collect();
        details.sort_by_key(|txn| Reverse(txn.date));
        let total = details.iter().map(|txn| txn.cost).sum();

        ExpenseReport {
            year,
            total,
            details,
        }
    }

    /// Distinct month keys with any persisted record, newest first.
    #[must_use]
    pub fn recorded_months(snapshot: &LedgerSnapshot) -> Vec<MonthKey> {
        let mut months: Vec<MonthKey> = snapshot.months().collect();
        months.reverse();
        months
    }
}

/// Derives the running community balance.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// `balance = grand total paid - total transaction costs`.
    ///
    /// Recomputed on demand from the two aggregates; never persisted.
    #[must_use]
    pub fn balance(grand_total_paid: Decimal, total_transactions: Decimal) -> Decimal {
        grand_total_paid - total_transactions
    }
}
