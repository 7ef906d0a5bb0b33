//! Property tests for aggregation consistency.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use kutip_shared::types::{LotId, MonthKey};

use crate::fees::types::{FeeRecord, LedgerSnapshot};
use crate::registry::provision_lots;

use super::service::{Aggregator, BalanceCalculator};

/// One generated ledger entry: (year, month, lot index, amount cents, paid).
type RawEntry = (u16, u8, u32, i64, bool);

fn entry_strategy() -> impl Strategy<Value = RawEntry> {
    (
        2023u16..=2026,
        1u8..=12,
        1u32..=48,
        0i64..100_000,
        any::<bool>(),
    )
}

fn snapshot_strategy() -> impl Strategy<Value = LedgerSnapshot> {
    prop::collection::vec(entry_strategy(), 0..120).prop_map(|entries| {
        let mut snapshot = LedgerSnapshot::new();
        for (year, month, lot, cents, paid) in entries {
            let month_key = MonthKey::new(year, month).expect("month in range");
            let amount = Decimal::new(cents, 2);
            let record = if paid {
                let date = NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), 15)
                    .expect("valid date");
                FeeRecord::paid(amount, date)
            } else {
                FeeRecord::unpaid(amount)
            };
            snapshot.upsert(month_key, LotId::from_index(lot), record);
        }
        snapshot
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The grand total always equals the sum of per-lot totals, with no
    /// rounding drift.
    #[test]
    fn prop_grand_total_equals_sum_of_lot_totals(snapshot in snapshot_strategy()) {
        let lots = provision_lots(48);
        let sum_of_lots: Decimal = lots
            .iter()
            .map(|lot| Aggregator::total_paid_for_lot(&snapshot, &lot.id))
            .sum();

        prop_assert_eq!(Aggregator::grand_total_paid(&snapshot), sum_of_lots);
    }

    /// The combined single-traversal totals match the lot-by-lot ones.
    #[test]
    fn prop_totals_by_lot_matches_per_lot_queries(snapshot in snapshot_strategy()) {
        let lots = provision_lots(48);
        let totals = Aggregator::totals_by_lot(&snapshot, &lots);

        prop_assert_eq!(totals.len(), lots.len());
        for lot in &lots {
            prop_assert_eq!(
                totals[&lot.id],
                Aggregator::total_paid_for_lot(&snapshot, &lot.id)
            );
        }
    }

    /// An income report's total equals the sum of its details, every
    /// detail falls in the report year, and details are sorted by month
    /// descending then lot number ascending (numeric).
    #[test]
    fn prop_income_report_is_consistent(snapshot in snapshot_strategy(), year in 2023u16..=2026) {
        let lots = provision_lots(48);
        let report = Aggregator::income_for_year(&snapshot, &lots, year);

        let detail_sum: Decimal = report.details.iter().map(|l| l.amount).sum();
        prop_assert_eq!(report.total, detail_sum);
        prop_assert!(report.details.iter().all(|l| l.month_key.year() == year));

        for pair in report.details.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.month_key >= b.month_key);
            if a.month_key == b.month_key {
                prop_assert!(
                    crate::registry::lot_sort_index(&a.lot_number)
                        <= crate::registry::lot_sort_index(&b.lot_number)
                );
            }
        }
    }

    /// Summing income over every year in range recovers the grand total.
    #[test]
    fn prop_yearly_income_partitions_grand_total(snapshot in snapshot_strategy()) {
        let lots = provision_lots(48);
        let yearly_sum: Decimal = (2023u16..=2026)
            .map(|year| Aggregator::income_for_year(&snapshot, &lots, year).total)
            .sum();

        prop_assert_eq!(yearly_sum, Aggregator::grand_total_paid(&snapshot));
    }

    /// Balance is the exact difference of the two aggregates.
    #[test]
    fn prop_balance_is_exact_difference(
        income_cents in 0i64..10_000_000,
        expense_cents in 0i64..10_000_000,
    ) {
        let income = Decimal::new(income_cents, 2);
        let expenses = Decimal::new(expense_cents, 2);
        let balance = BalanceCalculator::balance(income, expenses);

        prop_assert_eq!(balance + expenses, income);
    }
}
