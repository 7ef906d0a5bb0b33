//! Core business logic for Kutip.
//!
//! This crate contains pure business logic with ZERO web or store
//! dependencies. All domain types, validation rules, and calculations live
//! here; persistence and change notification are the store crate's job.
//!
//! # Modules
//!
//! - `auth` - Actor roles and the admin authorization guard
//! - `registry` - Pre-provisioned lot registry rules
//! - `fees` - Fee record synthesis and mutation resolution
//! - `report` - Single-pass aggregation and balance calculation
//! - `txn` - Expense transaction validation

pub mod auth;
pub mod fees;
pub mod registry;
pub mod report;
pub mod txn;
