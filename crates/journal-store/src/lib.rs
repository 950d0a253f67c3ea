//! # Trade Journal Store
//!
//! This crate holds the ordered collection of recorded trades and is the only
//! place that knows how the journal is persisted.
//!
//! ## Architectural Principles
//!
//! - **Snapshot Reads:** `list_trades` hands out an `Arc` snapshot. Readers such
//!   as the analytics core never observe a half-applied edit, and edits never
//!   disturb a snapshot already in use.
//! - **Whole-Record Edits:** trades are added, replaced or removed as a unit,
//!   addressed by their stable id.
//!
//! ## Public API
//!
//! - `TradeStore`: the add/update/delete/list interface.
//! - `JsonFileStore`: the journal as a JSON array on disk.
//! - `InMemoryStore`: the same semantics without persistence.
//! - `TradeFilter`, `sort_newest_first`, `distinct_assets`: history views.
//! - `StoreError`: the specific error types that can be returned from this crate.

pub mod error;
pub mod json_file;
pub mod query;
pub mod store;

pub use error::StoreError;
pub use json_file::JsonFileStore;
pub use query::{Outcome, TradeFilter, distinct_assets, sort_newest_first};
pub use store::{InMemoryStore, Snapshot, TradeStore};
