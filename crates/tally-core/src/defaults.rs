//! Fallback category lists
//!
//! Used when the categories service cannot be reached or has nothing stored
//! for the user.

use tracing::warn;

/// Essential categories assumed when the user has not chosen any
pub const DEFAULT_ESSENTIAL_CATEGORIES: &[&str] = &["Rent", "Insurance", "Groceries", "Utilities"];

/// Expense categories offered by the category editor
pub const DEFAULT_EXPENSE_CATEGORIES: &[&str] = &[
    "Rent",
    "Insurance",
    "Groceries",
    "Utilities",
    "Transportation",
    "Healthcare",
    "Loan Payment",
    "Dining",
    "Entertainment",
    "Shopping",
    "Subscriptions",
    "Travel",
    "Education",
    "Gifts",
    "Personal Care",
    "Internal Transfer",
    "Other",
];

/// Income categories offered by the category editor
pub const DEFAULT_INCOME_CATEGORIES: &[&str] = &[
    "Salary",
    "Bonus",
    "Freelance",
    "Investment Income",
    "Interest",
    "Refunds",
    "Gifts",
    "Internal Transfer",
    "Other",
];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

pub fn default_essential_categories() -> Vec<String> {
    owned(DEFAULT_ESSENTIAL_CATEGORIES)
}

pub fn default_expense_categories() -> Vec<String> {
    owned(DEFAULT_EXPENSE_CATEGORIES)
}

pub fn default_income_categories() -> Vec<String> {
    owned(DEFAULT_INCOME_CATEGORIES)
}

/// The fetched essential categories, or the defaults when the fetch failed
/// or returned nothing
pub fn essential_or_default(fetched: Option<Vec<String>>) -> Vec<String> {
    match fetched {
        Some(list) if !list.is_empty() => list,
        Some(_) => default_essential_categories(),
        None => {
            warn!("Essential categories unavailable, using defaults");
            default_essential_categories()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_essential_defaults() {
        assert_eq!(
            default_essential_categories(),
            vec!["Rent", "Insurance", "Groceries", "Utilities"]
        );
    }

    #[test]
    fn test_essential_or_default() {
        assert_eq!(essential_or_default(None).len(), 4);
        assert_eq!(essential_or_default(Some(Vec::new())).len(), 4);
        assert_eq!(
            essential_or_default(Some(vec!["Rent".to_string()])),
            vec!["Rent".to_string()]
        );
    }

    #[test]
    fn test_essentials_are_offered_by_editor() {
        let expense = default_expense_categories();
        for essential in DEFAULT_ESSENTIAL_CATEGORIES {
            assert!(expense.iter().any(|c| c == essential));
        }
    }
}
