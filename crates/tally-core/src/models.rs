//! Domain models for Tally

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::classify::LoanMatcher;
use crate::error::{Error, Result};

/// A calendar month, written `YYYY-MM`.
///
/// Ordering is chronological, which matches the lexicographic order of the
/// `YYYY-MM` strings for four-digit years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    first: NaiveDate,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=9999).contains(&year) {
            return Err(Error::InvalidMonth(format!("{}-{:02}", year, month)));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or_else(|| Error::InvalidMonth(format!("{:04}-{:02}", year, month)))
    }

    /// Parse a strict `YYYY-MM` key
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .unwrap_or(self.first)
    }

    /// The given day of this month, clamped to the last day (Jan 31 -> Feb 28/29)
    pub fn clamped_day(&self, day: u32) -> NaiveDate {
        let last = self.last_day();
        let day = day.clamp(1, last.day());
        self.first.with_day(day).unwrap_or(last)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first && date <= self.last_day()
    }

    /// Shift by a number of months (negative goes back). `None` when out of range.
    pub fn checked_add(&self, months: i32) -> Option<Self> {
        let shifted = if months >= 0 {
            self.first.checked_add_months(Months::new(months as u32))
        } else {
            self.first.checked_sub_months(Months::new(months.unsigned_abs()))
        }?;
        if (1..=9999).contains(&shifted.year()) {
            Some(Self { first: shifted })
        } else {
            None
        }
    }

    pub fn previous(&self) -> Option<Self> {
        self.checked_add(-1)
    }

    pub fn next(&self) -> Option<Self> {
        self.checked_add(1)
    }

    /// Signed number of months from `self` to `other`
    pub fn months_until(&self, other: &MonthKey) -> i32 {
        (other.year() - self.year()) * 12 + other.month() as i32 - self.month() as i32
    }
}

impl std::str::FromStr for MonthKey {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl TryFrom<String> for MonthKey {
    type Error = Error;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" | "expenses" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How often a recurring payment repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    Monthly,
    Quarterly,
    Yearly,
}

impl RecurrenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Months between two expected payments
    pub fn interval_months(&self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Yearly => 12,
        }
    }
}

impl std::str::FromStr for RecurrenceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" | "annual" => Ok(Self::Yearly),
            _ => Err(format!("Unknown recurrence type: {}", s)),
        }
    }
}

impl std::fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Accepts `YYYY-MM-DD` as well as ISO datetimes (`2024-05-15T00:00:00`)
fn flexible_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let date_part = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

/// A single ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
}

impl Transaction {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self {
            date,
            amount,
            currency: None,
            recipient: None,
            description: None,
            category: None,
            transaction_type: None,
        }
    }

    /// Currency code, falling back to the configured default
    pub fn currency_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.currency.as_deref().unwrap_or(default)
    }
}

/// A payment the transaction history was used to produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPayment {
    #[serde(deserialize_with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

fn predicted_flag() -> bool {
    true
}

/// A speculative, not-yet-posted transaction inferred from a recurring pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    #[serde(default = "predicted_flag")]
    pub is_predicted: bool,
    pub prediction_key: String,
    #[serde(default)]
    pub confidence: f64,
    pub recurrence_type: RecurrenceType,
    #[serde(default)]
    pub based_on: Vec<HistoricalPayment>,
}

/// One calendar month's aggregated finances, as delivered by the summary service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRecord {
    pub month: MonthKey,
    #[serde(default)]
    pub income: f64,
    #[serde(default)]
    pub expenses: f64,
    #[serde(default)]
    pub savings: f64,
    #[serde(default)]
    pub expense_categories: BTreeMap<String, f64>,
    #[serde(default)]
    pub income_categories: BTreeMap<String, f64>,
    #[serde(default)]
    pub expense_transactions: BTreeMap<String, Vec<Transaction>>,
    #[serde(default)]
    pub income_transactions: BTreeMap<String, Vec<Transaction>>,
}

impl MonthRecord {
    /// An empty record, used when a month's data is unavailable
    pub fn empty(month: MonthKey) -> Self {
        Self {
            month,
            income: 0.0,
            expenses: 0.0,
            savings: 0.0,
            expense_categories: BTreeMap::new(),
            income_categories: BTreeMap::new(),
            expense_transactions: BTreeMap::new(),
            income_transactions: BTreeMap::new(),
        }
    }

    /// Transactions of a category; empty when the category has no list
    pub fn transactions_for(&self, category: &str, kind: TransactionType) -> &[Transaction] {
        let map = match kind {
            TransactionType::Income => &self.income_transactions,
            TransactionType::Expense => &self.expense_transactions,
        };
        map.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Category totals for one side of the ledger
    pub fn categories(&self, kind: TransactionType) -> &BTreeMap<String, f64> {
        match kind {
            TransactionType::Income => &self.income_categories,
            TransactionType::Expense => &self.expense_categories,
        }
    }
}

/// Per-session configuration the engine derives its figures from
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Categories the user designated essential (matched case-insensitively)
    pub essential_categories: Vec<String>,
    /// Redirect loan payments from expenses into savings
    pub include_loan_payments: bool,
    /// Currency for transactions that carry none
    pub default_currency: String,
    /// Trailing historical essential spend; only used for the current month
    pub average_essential_spending: f64,
    /// Rule that identifies loan-payment categories
    pub loan_matcher: LoanMatcher,
}

impl EngineConfig {
    pub fn new(essential_categories: Vec<String>, include_loan_payments: bool) -> Self {
        Self {
            essential_categories,
            include_loan_payments,
            ..Default::default()
        }
    }

    pub fn with_average_essential_spending(mut self, average: f64) -> Self {
        self.average_essential_spending = average;
        self
    }

    pub fn with_loan_matcher(mut self, matcher: LoanMatcher) -> Self {
        self.loan_matcher = matcher;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            essential_categories: Vec::new(),
            include_loan_payments: false,
            default_currency: "EUR".to_string(),
            average_essential_spending: 0.0,
            loan_matcher: LoanMatcher::default(),
        }
    }
}
