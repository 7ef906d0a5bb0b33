//! Single-pass aggregation and balance calculation.
//!
//! All aggregation operates over one ledger snapshot in a single traversal
//! rather than issuing a query per lot per month.

pub mod service;
pub mod types;

#[cfg(test)]
mod props;

pub use service::{Aggregator, BalanceCalculator};
pub use types::{ExpenseReport, IncomeLine, IncomeReport};
