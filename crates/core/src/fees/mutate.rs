//! Pure resolution of fee mutations.
//!
//! Each function takes the currently persisted record (if any) and returns
//! the record to upsert, so the store service performs exactly one write
//! per mutation. Validation happens here, before any store call.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use kutip_shared::types::money::round_cents;
use kutip_shared::types::LotId;

use crate::registry::Lot;

use super::error::FeeError;
use super::types::{FeeRecord, FeeStatus, MonthLedger};

/// Resolves a status change into the record to persist.
///
/// Marking paid without an explicit date uses `today`; marking unpaid
/// forces the payment date to `None` regardless of input. A missing record
/// is created with the default amount; an existing one keeps its amount.
#[must_use]
pub fn resolve_status_change(
    existing: Option<&FeeRecord>,
    status: FeeStatus,
    payment_date: Option<NaiveDate>,
    today: NaiveDate,
    default_amount: Decimal,
) -> FeeRecord {
    let amount = existing.map_or(default_amount, |record| record.amount);
    match status {
        FeeStatus::Paid => FeeRecord::paid(amount, payment_date.unwrap_or(today)),
        FeeStatus::Unpaid => FeeRecord::unpaid(amount),
    }
}

/// Resolves an amount change into the record to persist.
///
/// Status and payment date are untouched; a missing record is created
/// unpaid. The amount is normalized to currency scale.
pub fn resolve_amount_change(
    existing: Option<&FeeRecord>,
    amount: Decimal,
) -> Result<FeeRecord, FeeError> {
    if amount.is_sign_negative() {
        return Err(FeeError::NegativeAmount(amount));
    }
    let amount = round_cents(amount);

    Ok(match existing {
        Some(record) => FeeRecord {
            amount,
            ..record.clone()
        },
        None => FeeRecord::unpaid(amount),
    })
}

/// Plans the batched write for marking a whole month paid.
///
/// Every provisioned lot gets a paid record dated `today`; lots that
/// already have a record for the month keep their amount, the rest get the
/// default.
#[must_use]
pub fn plan_bulk_mark_paid(
    month_ledger: Option<&MonthLedger>,
    lots: &[Lot],
    today: NaiveDate,
    default_amount: Decimal,
) -> Vec<(LotId, FeeRecord)> {
    lots.iter()
        .map(|lot| {
            let amount = month_ledger
                .and_then(|ledger| ledger.get(&lot.id))
                .map_or(default_amount, |record| record.amount);
            (lot.id.clone(), FeeRecord::paid(amount, today))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::registry::provision_lots;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_mark_paid_without_date_uses_today() {
        let record = resolve_status_change(None, FeeStatus::Paid, None, day(10), dec!(10.00));
        assert_eq!(record.status, FeeStatus::Paid);
        assert_eq!(record.payment_date, Some(day(10)));
        assert_eq!(record.amount, dec!(10.00));
    }

    #[test]
    fn test_mark_paid_with_explicit_date() {
        let record =
            resolve_status_change(None, FeeStatus::Paid, Some(day(2)), day(10), dec!(10.00));
        assert_eq!(record.payment_date, Some(day(2)));
    }

    #[test]
    fn test_mark_unpaid_forces_null_date() {
        let existing = FeeRecord::paid(dec!(15.00), day(2));
        // A date argument on an unpaid change is ignored.
        let record = resolve_status_change(
            Some(&existing),
            FeeStatus::Unpaid,
            Some(day(9)),
            day(10),
            dec!(10.00),
        );
        assert_eq!(record.status, FeeStatus::Unpaid);
        assert_eq!(record.payment_date, None);
        assert_eq!(record.amount, dec!(15.00));
        assert!(record.is_consistent());
    }

    #[test]
    fn test_status_change_preserves_existing_amount() {
        let existing = FeeRecord::unpaid(dec!(12.50));
        let record =
            resolve_status_change(Some(&existing), FeeStatus::Paid, None, day(10), dec!(10.00));
        assert_eq!(record.amount, dec!(12.50));
    }

    #[test]
    fn test_amount_change_rejects_negative() {
        let result = resolve_amount_change(None, dec!(-5.00));
        assert!(matches!(result, Err(FeeError::NegativeAmount(_))));
    }

    #[test]
    fn test_amount_change_keeps_status_and_date() {
        let existing = FeeRecord::paid(dec!(10.00), day(2));
        let record = resolve_amount_change(Some(&existing), dec!(15.00)).unwrap();
        assert_eq!(record.status, FeeStatus::Paid);
        assert_eq!(record.payment_date, Some(day(2)));
        assert_eq!(record.amount, dec!(15.00));
    }

    #[test]
    fn test_amount_change_normalizes_scale() {
        let record = resolve_amount_change(None, dec!(15.005)).unwrap();
        assert_eq!(record.amount, dec!(15.00)); // banker's rounding
        assert_eq!(record.status, FeeStatus::Unpaid);
    }

    #[test]
    fn test_amount_change_is_idempotent() {
        let first = resolve_amount_change(None, dec!(5.00)).unwrap();
        let second = resolve_amount_change(Some(&first), dec!(5.00)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_bulk_covers_every_lot() {
        let lots = provision_lots(48);
        let plan = plan_bulk_mark_paid(None, &lots, day(10), dec!(10.00));

        assert_eq!(plan.len(), 48);
        for (_, record) in &plan {
            assert_eq!(record.status, FeeStatus::Paid);
            assert_eq!(record.payment_date, Some(day(10)));
            assert_eq!(record.amount, dec!(10.00));
        }
    }

    #[test]
    fn test_bulk_preserves_existing_amounts() {
        let lots = provision_lots(3);
        let mut ledger = MonthLedger::new();
        ledger.insert(LotId::from_index(2), FeeRecord::unpaid(dec!(25.00)));

        let plan = plan_bulk_mark_paid(Some(&ledger), &lots, day(10), dec!(10.00));

        let amounts: Vec<Decimal> = plan.iter().map(|(_, r)| r.amount).collect();
        assert_eq!(amounts, vec![dec!(10.00), dec!(25.00), dec!(10.00)]);
    }
}
