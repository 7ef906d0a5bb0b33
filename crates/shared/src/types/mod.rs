//! Common types used across the application.

pub mod id;
pub mod money;
pub mod month;

pub use id::{LotId, TransactionId, UserId};
pub use month::MonthKey;
