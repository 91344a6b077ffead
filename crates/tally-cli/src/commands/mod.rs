//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (settings, input files, month selection)
//! - `summary` - Per-month totals with the current-month projection
//! - `categories` - Essential / non-essential breakdown
//! - `transactions` - Category drilldown with predictions merged in
//! - `predict` - Recurring payment predictions
//! - `config` - Effective settings

pub mod categories;
pub mod config;
pub mod core;
pub mod predict;
pub mod summary;
pub mod transactions;

// Re-export command functions for main.rs
pub use categories::*;
pub use config::*;
pub use self::core::*;
pub use predict::*;
pub use summary::*;
pub use transactions::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
