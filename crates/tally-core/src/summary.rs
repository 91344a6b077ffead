//! Per-month summary
//!
//! Composes classification, aggregation, the loan adjustment and (for the
//! current month) the projection into the figures a month card shows.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::{aggregate, AdjustedTotals, CategorySplit};
use crate::models::{EngineConfig, MonthKey, MonthRecord};
use crate::months;
use crate::projection::{project, Projection, ProjectionInput, SavingsDisplay};

/// Share of a category in its section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub name: String,
    pub amount: f64,
    pub percentage: f64,
}

/// Everything derived for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: MonthKey,
    pub is_current: bool,
    pub split: CategorySplit,
    pub totals: AdjustedTotals,
    pub projection: Projection,
    pub savings_display: SavingsDisplay,
    /// Adjusted savings as a percentage of income
    pub savings_rate: f64,
    pub essential_shares: Vec<CategoryShare>,
    pub non_essential_shares: Vec<CategoryShare>,
    pub income_shares: Vec<CategoryShare>,
}

/// `part` as a percentage of `whole`; zero when `whole` is zero
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

fn shares(categories: &BTreeMap<String, f64>, whole: f64) -> Vec<CategoryShare> {
    let mut shares: Vec<CategoryShare> = categories
        .iter()
        .map(|(name, &amount)| CategoryShare {
            name: name.clone(),
            amount,
            percentage: percentage(amount, whole),
        })
        .collect();

    // Largest first, ties by name
    shares.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    shares
}

impl MonthSummary {
    pub fn build(record: &MonthRecord, config: &EngineConfig, is_current: bool) -> Self {
        let split = aggregate(&record.expense_categories, config);
        let totals = AdjustedTotals::for_record(record, &split, config);

        let projection = if is_current {
            project(&ProjectionInput::from_split(&split, record.income, config))
        } else {
            Projection::actual(split.essential_total, split.non_essential_total, totals.savings)
        };
        let savings_display = SavingsDisplay::choose(&projection, totals.savings);

        let expense_whole = split.total();
        let essential_shares = shares(&split.essential, expense_whole);
        let non_essential_shares = shares(&split.non_essential, expense_whole);
        let income_shares = shares(&record.income_categories, record.income);

        Self {
            month: record.month,
            is_current,
            savings_rate: percentage(totals.savings, totals.income),
            split,
            totals,
            projection,
            savings_display,
            essential_shares,
            non_essential_shares,
            income_shares,
        }
    }
}

/// Summaries for all records, newest first.
///
/// The configured average essential spend only affects the current month.
pub fn summarize(records: &[MonthRecord], config: &EngineConfig) -> Vec<MonthSummary> {
    let current = months::current_month(records);
    let mut summaries: Vec<MonthSummary> = records
        .iter()
        .map(|r| MonthSummary::build(r, config, Some(r.month) == current))
        .collect();
    summaries.sort_by(|a, b| b.month.cmp(&a.month));
    summaries
}
