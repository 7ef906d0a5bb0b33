//! Store collaborators and async services for Kutip.
//!
//! The core crate is pure; this crate supplies the seam to durable storage:
//! - Collaborator traits for the fee ledger, transaction, and lot
//!   collections (`store` module)
//! - An in-memory backend with full-snapshot change notification
//!   (`memory` module)
//! - Async services that orchestrate core logic against a store:
//!   [`FeeLedger`], [`TransactionLedger`], [`LotRegistry`], [`BalanceBoard`]
//!
//! Concurrency model: single logical writer per operation, last-write-wins
//! on racing same-key writes. Aggregation reads take one snapshot at call
//! time; a concurrent write during traversal is not reflected in that
//! call's result.

pub mod balance;
pub mod error;
pub mod fees;
pub mod memory;
pub mod registry;
pub mod store;
pub mod transactions;

pub use balance::BalanceBoard;
pub use error::StoreError;
pub use fees::FeeLedger;
pub use memory::MemoryStore;
pub use registry::LotRegistry;
pub use store::{FeeLedgerStore, LedgerWatch, LotStore, TransactionStore};
pub use transactions::TransactionLedger;
