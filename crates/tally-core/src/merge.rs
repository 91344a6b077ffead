//! Category drilldown: actual transactions merged with predicted ones

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{MonthRecord, PredictedTransaction, Transaction, TransactionType};

/// A row in a category drilldown
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LedgerEntry<'a> {
    Actual(&'a Transaction),
    Predicted(&'a PredictedTransaction),
}

impl<'a> LedgerEntry<'a> {
    pub fn transaction(&self) -> &'a Transaction {
        match self {
            Self::Actual(tx) => tx,
            Self::Predicted(p) => &p.transaction,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.transaction().date
    }

    pub fn amount(&self) -> f64 {
        self.transaction().amount
    }

    pub fn is_predicted(&self) -> bool {
        matches!(self, Self::Predicted(_))
    }
}

/// Merge a category's actual transactions with its predictions.
///
/// Outside the current month, or without predictions, the actual
/// transactions come back in the order received. Otherwise the matching
/// predictions are appended and the whole list is sorted newest first;
/// the sort is stable so same-day rows keep their relative order.
pub fn merge_for_category<'a>(
    category: &str,
    kind: TransactionType,
    actual: &'a [Transaction],
    predicted: &'a [PredictedTransaction],
    is_current_month: bool,
) -> Vec<LedgerEntry<'a>> {
    let mut entries: Vec<LedgerEntry<'a>> = actual.iter().map(LedgerEntry::Actual).collect();

    if !is_current_month || predicted.is_empty() {
        return entries;
    }

    entries.extend(
        predicted
            .iter()
            .filter(|p| {
                p.transaction.category.as_deref() == Some(category)
                    && p.transaction.transaction_type == Some(kind)
            })
            .map(LedgerEntry::Predicted),
    );

    entries.sort_by(|a, b| b.date().cmp(&a.date()));
    entries
}

/// [`merge_for_category`] over the transactions stored in a month record
pub fn merge_record_category<'a>(
    record: &'a MonthRecord,
    category: &str,
    kind: TransactionType,
    predicted: &'a [PredictedTransaction],
    is_current_month: bool,
) -> Vec<LedgerEntry<'a>> {
    merge_for_category(
        category,
        kind,
        record.transactions_for(category, kind),
        predicted,
        is_current_month,
    )
}
