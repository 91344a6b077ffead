//! Expand/collapse state for month cards
//!
//! Each expandable row is identified by a structured key (month, section,
//! optional category) instead of a string assembled from those parts, so
//! a category whose name contains a separator cannot collide with another
//! row.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::MonthKey;

/// Section of a month card
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Essential,
    NonEssential,
    Income,
    Expenses,
    Predicted,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Essential => "essential",
            Self::NonEssential => "non_essential",
            Self::Income => "income",
            Self::Expenses => "expenses",
            Self::Predicted => "predicted",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of an expandable row
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExpansionKey {
    pub month: MonthKey,
    pub section: Section,
    /// `None` for the section header itself
    pub category: Option<String>,
}

impl ExpansionKey {
    pub fn section(month: MonthKey, section: Section) -> Self {
        Self {
            month,
            section,
            category: None,
        }
    }

    pub fn category(month: MonthKey, section: Section, category: impl Into<String>) -> Self {
        Self {
            month,
            section,
            category: Some(category.into()),
        }
    }
}

/// Which rows are expanded. Rows not present are collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: BTreeMap<ExpansionKey, bool>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, key: &ExpansionKey) -> bool {
        self.expanded.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: ExpansionKey, expanded: bool) {
        if expanded {
            self.expanded.insert(key, true);
        } else {
            self.expanded.remove(&key);
        }
    }

    /// Flip a row, returning its new state
    pub fn toggle(&mut self, key: ExpansionKey) -> bool {
        let expanded = !self.is_expanded(&key);
        self.set(key, expanded);
        expanded
    }

    /// Collapse every row of a month
    pub fn collapse_month(&mut self, month: MonthKey) {
        self.expanded.retain(|key, _| key.month != month);
    }

    pub fn expanded_keys(&self) -> impl Iterator<Item = &ExpansionKey> {
        self.expanded.keys()
    }
}
