//! Report output types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kutip_shared::types::{LotId, MonthKey};

use crate::txn::TransactionRecord;

/// One paid fee in a year income report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeLine {
    /// The month the fee covers.
    pub month_key: MonthKey,
    /// The paying lot's store key.
    pub lot_id: LotId,
    /// The paying lot's display number.
    pub lot_number: String,
    /// Amount received.
    pub amount: Decimal,
    /// Date the payment was received.
    pub payment_date: Option<NaiveDate>,
}

/// Year-scoped income summary.
///
/// Details are sorted by month key descending, then lot number ascending
/// (numeric extraction, so `LOT 2` comes before `LOT 10`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeReport {
    /// The report year.
    pub year: u16,
    /// Sum of all detail amounts.
    pub total: Decimal,
    /// Individual paid fees.
    pub details: Vec<IncomeLine>,
}

/// Year-scoped expense summary. Details are sorted by date descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseReport {
    /// The report year.
    pub year: u16,
    /// Sum of all detail costs.
    pub total: Decimal,
    /// Individual expense transactions.
    pub details: Vec<TransactionRecord>,
}
