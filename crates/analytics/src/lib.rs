//! # Trade Journal Analytics
//!
//! This crate turns the recorded trades of a journal into performance
//! statistics, grouped breakdowns and rule-based insights.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O and no knowledge of where trades are stored. It
//!   depends only on `core-types`.
//! - **Snapshot In, Report Out:** Every calculation borrows an immutable slice
//!   of trades and returns owned results. Nothing here mutates a trade or keeps
//!   state between calls, so any number of callers can share it.
//! - **Total Functions:** There is no error type. Empty journals and
//!   breakeven-only journals produce well-defined zero results.
//!
//! ## Public API
//!
//! - `compute_stats`, `compute_breakdowns`, `generate_insights`: the three
//!   entry points used by the presentation layer.
//! - `AnalyticsEngine`: bundles the three with a configurable amount formatter.
//! - `TradeStats`, `ProfitFactor`, `Breakdowns`, `Insight`: the result types.

pub mod breakdown;
pub mod engine;
pub mod format;
pub mod insights;
pub mod report;
pub mod util;

pub use breakdown::{
    AssetPerformance, Breakdowns, PeriodPerformance, ReasonPerformance, TimeOfDay,
    TimeOfDayBreakdown, compute_breakdowns,
};
pub use engine::{AnalyticsEngine, JournalAnalysis, compute_stats, total_profit};
pub use format::{AmountFormatter, PlainAmountFormatter};
pub use insights::{Insight, InsightGenerator, Severity, generate_insights};
pub use report::{ProfitFactor, TradeStats};
