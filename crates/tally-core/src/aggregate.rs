//! Essential / non-essential aggregation
//!
//! Splits a month's expense categories into essential and non-essential
//! buckets and applies the loan-payment adjustment: when loan payments are
//! counted as savings, their amount leaves the expense total and is added to
//! savings, so `income - expenses == savings` keeps holding.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::classify::{Classification, Classifier};
use crate::models::{EngineConfig, MonthRecord};

/// Result of partitioning expense categories
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySplit {
    pub essential: BTreeMap<String, f64>,
    pub non_essential: BTreeMap<String, f64>,
    pub essential_total: f64,
    pub non_essential_total: f64,
    /// Amount of the loan-payment categories. Captured even when loans stay in
    /// expenses, so callers can show what would be redirected.
    pub loan_payment_amount: f64,
    /// First loan-payment category in name order
    pub loan_category: Option<String>,
}

impl CategorySplit {
    /// Essential plus non-essential; excluded loan payments are not part of it
    pub fn total(&self) -> f64 {
        self.essential_total + self.non_essential_total
    }

    /// Loan amount moved out of expenses under the given setting
    pub fn redirected_amount(&self, include_loan_payments: bool) -> f64 {
        if include_loan_payments {
            self.loan_payment_amount
        } else {
            0.0
        }
    }
}

/// Partition expense categories using the configured classifier
pub fn aggregate(expense_categories: &BTreeMap<String, f64>, config: &EngineConfig) -> CategorySplit {
    let classifier = Classifier::from_config(config);

    let mut essential = BTreeMap::new();
    let mut non_essential = BTreeMap::new();
    let mut loan_payment_amount: f64 = 0.0;
    let mut loan_category = None;

    for (name, &amount) in expense_categories {
        if classifier.is_loan(name) {
            loan_payment_amount += amount;
            if loan_category.is_none() {
                loan_category = Some(name.clone());
            }
        }

        match classifier.classify(name) {
            Classification::Excluded => {}
            Classification::Essential => {
                essential.insert(name.clone(), amount);
            }
            Classification::NonEssential => {
                non_essential.insert(name.clone(), amount);
            }
        }
    }

    let essential_total: f64 = essential.values().sum();
    let non_essential_total: f64 = non_essential.values().sum();

    debug!(
        essential = essential.len(),
        non_essential = non_essential.len(),
        essential_total,
        non_essential_total,
        loan_payment_amount,
        "Aggregated expense categories"
    );

    CategorySplit {
        essential,
        non_essential,
        essential_total,
        non_essential_total,
        loan_payment_amount,
        loan_category,
    }
}

/// Month totals after the loan-payment adjustment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdjustedTotals {
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
}

/// Move the loan amount from expenses to savings when loans count as savings
pub fn adjust_totals(
    income: f64,
    base_expenses: f64,
    base_savings: f64,
    split: &CategorySplit,
    include_loan_payments: bool,
) -> AdjustedTotals {
    let redirected = split.redirected_amount(include_loan_payments);
    AdjustedTotals {
        income,
        expenses: base_expenses - redirected,
        savings: base_savings + redirected,
    }
}

impl AdjustedTotals {
    pub fn for_record(record: &MonthRecord, split: &CategorySplit, config: &EngineConfig) -> Self {
        adjust_totals(
            record.income,
            record.expenses,
            record.savings,
            split,
            config.include_loan_payments,
        )
    }
}
