//! Test fixtures for tally-core
//!
//! Month records and transaction histories shared by the unit tests, the
//! integration tests and the CLI tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{MonthKey, MonthRecord, Transaction, TransactionType};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("fixture date")
}

pub fn month(s: &str) -> MonthKey {
    MonthKey::parse(s).expect("fixture month")
}

/// Expense transaction with recipient and category
pub fn expense(d: &str, recipient: &str, category: &str, amount: f64) -> Transaction {
    Transaction {
        currency: Some("EUR".to_string()),
        recipient: Some(recipient.to_string()),
        category: Some(category.to_string()),
        transaction_type: Some(TransactionType::Expense),
        ..Transaction::new(date(d), -amount.abs())
    }
}

pub fn income(d: &str, recipient: &str, category: &str, amount: f64) -> Transaction {
    Transaction {
        currency: Some("EUR".to_string()),
        recipient: Some(recipient.to_string()),
        category: Some(category.to_string()),
        transaction_type: Some(TransactionType::Income),
        ..Transaction::new(date(d), amount.abs())
    }
}

/// Record whose totals are consistent with its categories
pub fn month_record(key: &str, income_total: f64, expenses: &[(&str, f64)]) -> MonthRecord {
    let mut record = MonthRecord::empty(month(key));
    record.expense_categories = expenses
        .iter()
        .map(|(name, amount)| (name.to_string(), *amount))
        .collect();
    record.expenses = record.expense_categories.values().sum();
    record.income = income_total;
    record.savings = income_total - record.expenses;
    record.income_categories = BTreeMap::from([("Salary".to_string(), income_total)]);
    record
}

/// Four months (2024-02 .. 2024-05), May in progress
pub fn sample_records() -> Vec<MonthRecord> {
    let mut records = vec![
        month_record(
            "2024-02",
            5000.0,
            &[("Rent", 1500.0), ("Groceries", 600.0), ("Loan Payment", 800.0), ("Dining", 250.0)],
        ),
        month_record(
            "2024-03",
            5000.0,
            &[("Rent", 1500.0), ("Groceries", 700.0), ("Loan Payment", 800.0), ("Dining", 300.0)],
        ),
        month_record(
            "2024-04",
            5000.0,
            &[("Rent", 1500.0), ("Groceries", 800.0), ("Loan Payment", 800.0), ("Dining", 200.0)],
        ),
        month_record(
            "2024-05",
            5000.0,
            &[("Rent", 1500.0), ("Groceries", 400.0), ("Loan Payment", 800.0), ("Subscriptions", 9.99)],
        ),
    ];

    let may = &mut records[3];
    may.expense_transactions.insert(
        "Rent".to_string(),
        vec![expense("2024-05-01", "Landlord", "Rent", 1500.0)],
    );
    may.expense_transactions.insert(
        "Subscriptions".to_string(),
        vec![expense("2024-05-02", "Streamly", "Subscriptions", 9.99)],
    );
    may.income_transactions.insert(
        "Salary".to_string(),
        vec![income("2024-05-03", "Employer", "Salary", 5000.0)],
    );

    records
}

/// Transaction history with one monthly, one quarterly and one yearly payment
pub fn recurring_history() -> Vec<Transaction> {
    vec![
        expense("2024-01-15", "Streamly", "Subscriptions", 9.99),
        expense("2024-02-15", "Streamly", "Subscriptions", 9.99),
        expense("2024-03-14", "Streamly", "Subscriptions", 9.99),
        expense("2024-04-15", "Streamly", "Subscriptions", 9.99),
        expense("2023-08-05", "City Water", "Utilities", 120.0),
        expense("2023-11-05", "City Water", "Utilities", 125.0),
        expense("2024-02-05", "City Water", "Utilities", 118.0),
        expense("2022-05-20", "Home Insurance Co", "Insurance", 600.0),
        expense("2023-05-21", "Home Insurance Co", "Insurance", 620.0),
        expense("2024-03-09", "Corner Bistro", "Dining", 42.0),
        income("2024-04-25", "Employer", "Salary", 5000.0),
    ]
}

/// Serialize `value` as pretty JSON into `dir/name`
pub fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> PathBuf {
    let path = dir.join(name);
    let json = serde_json::to_string_pretty(value).expect("fixture serializes");
    std::fs::write(&path, json).expect("fixture written");
    path
}
