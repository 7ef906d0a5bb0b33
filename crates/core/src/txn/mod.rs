//! Expense transaction validation and domain types.
//!
//! Transactions record community expenses (purpose, date, cost, optional
//! receipt reference). They are consumed by the balance calculation and
//! the year expense report.

pub mod error;
pub mod types;
pub mod validation;

pub use error::TxnError;
pub use types::{sort_newest_first, total_cost, TransactionInput, TransactionRecord};
pub use validation::validate_input;
