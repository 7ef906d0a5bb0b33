//! Lazy default-record synthesis.
//!
//! Records are synthesized on read and persisted only when explicitly
//! mutated, so viewing a year of fees for a lot never writes 12 records
//! into the store.

use rust_decimal::Decimal;

use kutip_shared::types::{LotId, MonthKey};

use super::types::{FeeRecord, LedgerSnapshot, RecordState};

/// Returns the record for one `(month, lot)` key.
///
/// When nothing is persisted, returns a transient unpaid record with the
/// configured default amount. Pure function of the snapshot and the default
/// amount; calling it never writes.
#[must_use]
pub fn synthesize(
    snapshot: &LedgerSnapshot,
    month: MonthKey,
    lot: &LotId,
    default_amount: Decimal,
) -> RecordState {
    synthesize_from(snapshot.get(month, lot), default_amount)
}

/// Synthesis over a single-key lookup result, for callers that read one
/// record instead of a full snapshot.
#[must_use]
pub fn synthesize_from(existing: Option<&FeeRecord>, default_amount: Decimal) -> RecordState {
    match existing {
        Some(record) => RecordState::Persisted(record.clone()),
        None => RecordState::Synthesized(FeeRecord::unpaid(default_amount)),
    }
}

/// Returns exactly 12 records for a lot's year, January first,
/// synthesizing the months with nothing persisted.
#[must_use]
pub fn year_records(
    snapshot: &LedgerSnapshot,
    lot: &LotId,
    year: u16,
    default_amount: Decimal,
) -> Vec<(MonthKey, RecordState)> {
    MonthKey::months_of(year)
        .into_iter()
        .map(|month| (month, synthesize(snapshot, month, lot, default_amount)))
        .collect()
}
