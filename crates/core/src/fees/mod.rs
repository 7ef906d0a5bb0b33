//! Fee record synthesis and mutation resolution.
//!
//! This module implements the fee-ledger core:
//! - Domain types for per-month-per-lot fee records
//! - Lazy default-record synthesis over a ledger snapshot
//! - Pure resolution of status/amount mutations before persistence
//! - Error types for fee operations

pub mod error;
pub mod mutate;
pub mod synth;
pub mod types;

pub use error::FeeError;
pub use mutate::{plan_bulk_mark_paid, resolve_amount_change, resolve_status_change};
pub use synth::{synthesize, synthesize_from, year_records};
pub use types::{FeeRecord, FeeStatus, LedgerSnapshot, MonthLedger, RecordState};
