//! Tally Core Library
//!
//! The computational core of the Tally monthly budget overview:
//! - Essential / non-essential classification of expense categories
//! - Loan-payment handling (counted as essential, or redirected to savings)
//! - Current-month projection of essential spending and savings
//! - Category drilldown with predicted transactions merged in
//! - Recurring payment detection and prediction
//! - Settings loaded from TOML with embedded defaults

pub mod aggregate;
pub mod classify;
pub mod defaults;
pub mod error;
pub mod merge;
pub mod models;
pub mod months;
pub mod predictions;
pub mod projection;
pub mod settings;
pub mod summary;
pub mod view_state;

/// Shared fixtures for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{adjust_totals, aggregate, AdjustedTotals, CategorySplit};
pub use classify::{classify, Classification, Classifier, LoanMatcher, MatchType};
pub use error::{Error, Result};
pub use merge::{merge_for_category, merge_record_category, LedgerEntry};
pub use models::{
    EngineConfig, HistoricalPayment, MonthKey, MonthRecord, PredictedTransaction,
    RecurrenceType, Transaction, TransactionType,
};
pub use predictions::{
    prediction_key, DetectionConfig, Dismissal, DismissalSet, PatternDetector, RecurringPattern,
};
pub use projection::{project, Projection, ProjectionInput, SavingsDisplay};
pub use settings::{ChartView, Settings, SettingsSource};
pub use summary::{summarize, CategoryShare, MonthSummary};
pub use view_state::{ExpansionKey, ExpansionState, Section};
