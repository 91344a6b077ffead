//! Expense category classification
//!
//! Every expense category is either essential, non-essential, or (for loan
//! payments when they are redirected to savings) excluded from the expense
//! view altogether. Classification depends only on the category name and
//! the configuration, never on the amount.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::EngineConfig;

/// Default substring that marks a loan-payment category
pub const LOAN_MARKER: &str = "loan";

/// Outcome of classifying an expense category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Loan payment redirected to savings; not part of expenses
    Excluded,
    Essential,
    NonEssential,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excluded => "excluded",
            Self::Essential => "essential",
            Self::NonEssential => "non_essential",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a loan rule's pattern is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Case-insensitive substring match (supports | for OR)
    Contains,
    /// Exact name match (case-insensitive)
    Exact,
    /// Regular expression match (case-insensitive)
    Regex,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Exact => "exact",
            Self::Regex => "regex",
        }
    }
}

impl std::str::FromStr for MatchType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "contains" => Ok(Self::Contains),
            "exact" => Ok(Self::Exact),
            "regex" => Ok(Self::Regex),
            _ => Err(format!("Unknown match type: {}", s)),
        }
    }
}

/// Predicate identifying loan-payment categories by name
#[derive(Debug, Clone)]
pub enum LoanMatcher {
    /// Any of the (lowercased) substrings
    Contains(Vec<String>),
    /// Whole name, lowercased
    Exact(String),
    Pattern(Regex),
}

impl LoanMatcher {
    /// Build a matcher from a configured rule
    pub fn from_rule(match_type: MatchType, pattern: &str) -> Result<Self> {
        Ok(match match_type {
            MatchType::Contains => Self::Contains(
                pattern
                    .split('|')
                    .map(|p| p.trim().to_lowercase())
                    .filter(|p| !p.is_empty())
                    .collect(),
            ),
            MatchType::Exact => Self::Exact(pattern.trim().to_lowercase()),
            MatchType::Regex => Self::Pattern(
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()?,
            ),
        })
    }

    pub fn is_loan(&self, category_name: &str) -> bool {
        match self {
            Self::Contains(needles) => {
                let lower = category_name.to_lowercase();
                needles.iter().any(|n| lower.contains(n.as_str()))
            }
            Self::Exact(name) => category_name.to_lowercase() == *name,
            Self::Pattern(re) => re.is_match(category_name),
        }
    }
}

impl Default for LoanMatcher {
    fn default() -> Self {
        Self::Contains(vec![LOAN_MARKER.to_string()])
    }
}

/// Classify a category with the default loan rule (name contains "loan")
pub fn classify(
    category_name: &str,
    include_loan_payments: bool,
    essential_categories: &[String],
) -> Classification {
    let is_loan = category_name.to_lowercase().contains(LOAN_MARKER);
    let is_essential = || {
        essential_categories
            .iter()
            .any(|e| e.to_lowercase() == category_name.to_lowercase())
    };
    resolve(is_loan, include_loan_payments, is_essential)
}

fn resolve(
    is_loan: bool,
    include_loan_payments: bool,
    is_essential: impl FnOnce() -> bool,
) -> Classification {
    if is_loan {
        if include_loan_payments {
            Classification::Excluded
        } else {
            Classification::Essential
        }
    } else if is_essential() {
        Classification::Essential
    } else {
        Classification::NonEssential
    }
}

/// Reusable classifier for a whole month's categories
pub struct Classifier<'a> {
    matcher: &'a LoanMatcher,
    essential: HashSet<String>,
    include_loan_payments: bool,
}

impl<'a> Classifier<'a> {
    pub fn new(
        matcher: &'a LoanMatcher,
        essential_categories: &[String],
        include_loan_payments: bool,
    ) -> Self {
        Self {
            matcher,
            essential: essential_categories
                .iter()
                .map(|c| c.to_lowercase())
                .collect(),
            include_loan_payments,
        }
    }

    pub fn from_config(config: &'a EngineConfig) -> Self {
        Self::new(
            &config.loan_matcher,
            &config.essential_categories,
            config.include_loan_payments,
        )
    }

    pub fn is_loan(&self, category_name: &str) -> bool {
        self.matcher.is_loan(category_name)
    }

    pub fn classify(&self, category_name: &str) -> Classification {
        resolve(
            self.is_loan(category_name),
            self.include_loan_payments,
            || self.essential.contains(&category_name.to_lowercase()),
        )
    }
}
