//! # Trade Journal Core Types
//!
//! The data model shared by every other crate in the workspace: the `Trade`
//! record, its enumerations, and the validated form payload that produces it.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{EntryReason, OperationType};
pub use error::CoreError;
pub use structs::{NewTrade, Trade, TradeId, parse_time_of_day};
