//! Recurring payment prediction
//!
//! Finds payments that repeat monthly, quarterly or yearly in the
//! transaction history and turns them into predicted transactions for a
//! target month. Predictions the user dismissed stay hidden until the
//! dismissal expires.
//!
//! Detection rules:
//! - Monthly: consecutive months, within ±3 days of the previous payment's
//!   day of month (clamped to month end), at least 2 payments
//! - Quarterly: exactly 3 calendar months apart, at least 3 payments
//! - Yearly: 11-13 months apart on a day of month within 7 days, at least 2
//! - Patterns whose amounts vary by more than 30% (std dev / mean) are dropped

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::models::{
    HistoricalPayment, MonthKey, PredictedTransaction, RecurrenceType, Transaction,
    TransactionType,
};

/// Category never treated as a recurring payment
pub const INTERNAL_TRANSFER: &str = "Internal Transfer";

const UNCATEGORIZED: &str = "Uncategorized";

/// Detection configuration
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Allowed distance (days) from the expected monthly date
    pub monthly_window_days: i64,
    /// Allowed day-of-month difference for yearly payments
    pub yearly_window_days: u32,
    pub min_occurrences_monthly: usize,
    pub min_occurrences_quarterly: usize,
    pub min_occurrences_yearly: usize,
    /// Maximum std dev / mean of the amounts
    pub max_variability: f64,
    /// Days past the expected date after which a pattern counts as stopped
    pub overdue_grace_days: i64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            monthly_window_days: 3,
            yearly_window_days: 7,
            min_occurrences_monthly: 2,
            min_occurrences_quarterly: 3,
            min_occurrences_yearly: 2,
            max_variability: 0.30,
            overdue_grace_days: 7,
        }
    }
}

/// A recurring payment found in the history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringPattern {
    pub recipient: String,
    pub category: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub recurrence_type: RecurrenceType,
    /// Absolute amount expected per payment
    pub average_amount: f64,
    pub typical_day: u32,
    pub currency: String,
    pub confidence: f64,
    pub occurrences: usize,
    pub last_date: NaiveDate,
    /// Oldest first
    pub historical_payments: Vec<HistoricalPayment>,
    pub prediction_key: String,
}

/// Stable identifier of a pattern: first 16 hex chars of
/// sha256("recipient|category|recurrence")
pub fn prediction_key(recipient: &str, category: &str, recurrence: RecurrenceType) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}|{}|{}", recipient, category, recurrence.as_str()).as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..16].to_string()
}

/// Same day of month `months` later, clamped to the end of that month
fn shift_months(date: NaiveDate, months: u32) -> NaiveDate {
    match date.checked_add_months(Months::new(months)) {
        Some(shifted) => shifted,
        None => date,
    }
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    MonthKey::from_date(from).months_until(&MonthKey::from_date(to))
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Sample standard deviation (n - 1)
fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

fn median_day(days: &mut [u32]) -> u32 {
    days.sort_unstable();
    let n = days.len();
    if n == 0 {
        return 1;
    }
    if n % 2 == 1 {
        days[n / 2]
    } else {
        (days[n / 2 - 1] + days[n / 2]) / 2
    }
}

type GroupKey = (String, String, TransactionType);

/// Detects recurring payments and generates predictions from them
pub struct PatternDetector {
    config: DetectionConfig,
}

impl PatternDetector {
    pub fn new() -> Self {
        Self {
            config: DetectionConfig::default(),
        }
    }

    pub fn with_config(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Find recurring patterns in a transaction history.
    ///
    /// Transactions without a recipient and internal transfers are ignored.
    /// Missing categories count as "Uncategorized", missing types as expense.
    pub fn detect(&self, transactions: &[Transaction], default_currency: &str) -> Vec<RecurringPattern> {
        let groups = Self::group(transactions);
        debug!("Pattern detection: {} groups from {} transactions", groups.len(), transactions.len());

        let mut patterns = Vec::new();
        for (key, mut txns) in groups {
            if txns.len() < self.config.min_occurrences_monthly {
                continue;
            }
            txns.sort_by_key(|t| t.date);

            // Shortest interval that yields a pattern wins
            for recurrence in [RecurrenceType::Monthly, RecurrenceType::Quarterly, RecurrenceType::Yearly] {
                let matching = match recurrence {
                    RecurrenceType::Monthly => self.match_monthly(&txns),
                    RecurrenceType::Quarterly => self.match_quarterly(&txns),
                    RecurrenceType::Yearly => self.match_yearly(&txns),
                };
                let Some(matching) = matching else {
                    continue;
                };
                if let Some(pattern) = self.build_pattern(&matching, &key, recurrence, default_currency) {
                    patterns.push(pattern);
                    break;
                }
            }
        }

        info!("Detected {} recurring payment patterns", patterns.len());
        patterns
    }

    fn group(transactions: &[Transaction]) -> BTreeMap<GroupKey, Vec<&Transaction>> {
        let mut groups: BTreeMap<GroupKey, Vec<&Transaction>> = BTreeMap::new();

        for tx in transactions {
            let category = tx.category.as_deref().unwrap_or(UNCATEGORIZED);
            if category == INTERNAL_TRANSFER {
                continue;
            }
            let recipient = tx.recipient.as_deref().map(str::trim).unwrap_or("");
            if recipient.is_empty() {
                continue;
            }
            let kind = tx.transaction_type.unwrap_or(TransactionType::Expense);

            groups
                .entry((recipient.to_string(), category.to_string(), kind))
                .or_default()
                .push(tx);
        }

        groups
    }

    fn match_monthly<'a>(&self, sorted: &[&'a Transaction]) -> Option<Vec<&'a Transaction>> {
        let min = self.config.min_occurrences_monthly;
        if sorted.len() < min {
            return None;
        }

        let mut matching: Vec<&Transaction> = Vec::new();
        let mut last_date: Option<NaiveDate> = None;

        for &tx in sorted {
            let Some(last) = last_date else {
                matching = vec![tx];
                last_date = Some(tx.date);
                continue;
            };

            let expected = shift_months(last, 1);
            let days_off = (tx.date - expected).num_days().abs();

            if days_off <= self.config.monthly_window_days {
                matching.push(tx);
                last_date = Some(tx.date);
                continue;
            }

            let months_apart = months_between(last, tx.date);
            if months_apart == 1 {
                // Next month but off schedule: start over from here
                matching = vec![tx];
                last_date = Some(tx.date);
            } else if months_apart > 1 {
                if matching.len() >= min {
                    break;
                }
                matching = vec![tx];
                last_date = Some(tx.date);
            }
        }

        (matching.len() >= min).then_some(matching)
    }

    fn match_quarterly<'a>(&self, sorted: &[&'a Transaction]) -> Option<Vec<&'a Transaction>> {
        let min = self.config.min_occurrences_quarterly;
        if sorted.len() < min {
            return None;
        }

        let mut matching: Vec<&Transaction> = Vec::new();
        for pair in sorted.windows(2) {
            let (current, next) = (pair[0], pair[1]);
            if months_between(current.date, next.date) == 3 {
                if matching.is_empty() {
                    matching.push(current);
                }
                matching.push(next);
            } else if matching.len() >= min {
                break;
            } else {
                matching.clear();
            }
        }

        (matching.len() >= min).then_some(matching)
    }

    fn match_yearly<'a>(&self, sorted: &[&'a Transaction]) -> Option<Vec<&'a Transaction>> {
        let min = self.config.min_occurrences_yearly;
        if sorted.len() < min {
            return None;
        }

        let mut matching: Vec<&Transaction> = Vec::new();
        for pair in sorted.windows(2) {
            let (current, next) = (pair[0], pair[1]);
            let months_apart = months_between(current.date, next.date);
            if (11..=13).contains(&months_apart) {
                // Year apart but on a different day: neither extends nor breaks
                if next.date.day().abs_diff(current.date.day()) <= self.config.yearly_window_days {
                    if matching.is_empty() {
                        matching.push(current);
                    }
                    matching.push(next);
                }
            } else if matching.len() >= min {
                break;
            } else {
                matching.clear();
            }
        }

        (matching.len() >= min).then_some(matching)
    }

    fn build_pattern(
        &self,
        matching: &[&Transaction],
        key: &GroupKey,
        recurrence: RecurrenceType,
        default_currency: &str,
    ) -> Option<RecurringPattern> {
        let (recipient, category, kind) = key;
        let first = matching.first()?;
        let last = matching.last()?;

        let all_amounts: Vec<f64> = matching.iter().map(|t| t.amount.abs()).collect();

        // Monthly patterns follow the last three payments
        let average_amount = if recurrence == RecurrenceType::Monthly && all_amounts.len() >= 3 {
            mean(&all_amounts[all_amounts.len() - 3..])
        } else {
            mean(&all_amounts)
        };

        let variability = if all_amounts.len() > 1 {
            let m = mean(&all_amounts);
            if m > 0.0 {
                sample_std_dev(&all_amounts) / m
            } else {
                0.0
            }
        } else {
            0.0
        };
        if variability > self.config.max_variability {
            debug!(
                "Skipping {} pattern for {}: variability {:.2}",
                recurrence, recipient, variability
            );
            return None;
        }

        let mut days: Vec<u32> = matching.iter().map(|t| t.date.day()).collect();
        let typical_day = median_day(&mut days);
        let confidence = confidence(matching.len(), variability);
        let currency = first.currency_or(default_currency).to_string();

        let historical_payments = matching
            .iter()
            .map(|t| HistoricalPayment {
                date: t.date,
                amount: Some(t.amount),
                currency: Some(t.currency_or(&currency).to_string()),
            })
            .collect();

        Some(RecurringPattern {
            recipient: recipient.clone(),
            category: category.clone(),
            transaction_type: *kind,
            recurrence_type: recurrence,
            average_amount,
            typical_day,
            currency,
            confidence,
            occurrences: matching.len(),
            last_date: last.date,
            historical_payments,
            prediction_key: prediction_key(recipient, category, recurrence),
        })
    }

    /// Predicted transactions for `month`.
    ///
    /// A pattern whose next expected payment is more than the grace period
    /// in the past (relative to `today`) has stopped and predicts nothing.
    pub fn generate_for_month(
        &self,
        patterns: &[RecurringPattern],
        month: MonthKey,
        dismissed: &HashSet<String>,
        today: NaiveDate,
    ) -> Vec<PredictedTransaction> {
        let mut predictions = Vec::new();

        for pattern in patterns {
            if dismissed.contains(&pattern.prediction_key) {
                continue;
            }

            let expected = shift_months(pattern.last_date, pattern.recurrence_type.interval_months());
            let days_overdue = (today - expected).num_days();
            if days_overdue > self.config.overdue_grace_days {
                info!(
                    "Skipping {} prediction for {}: payment is {} days overdue (expected {})",
                    pattern.recurrence_type, pattern.recipient, days_overdue, expected
                );
                continue;
            }

            let last_month = MonthKey::from_date(pattern.last_date);
            let should_predict = match pattern.recurrence_type {
                RecurrenceType::Monthly => true,
                RecurrenceType::Quarterly => (2..=4).contains(&last_month.months_until(&month)),
                RecurrenceType::Yearly => {
                    month.month() == last_month.month() && month.year() > last_month.year()
                }
            };
            if !should_predict {
                continue;
            }

            let amount = match pattern.transaction_type {
                TransactionType::Expense => -pattern.average_amount.abs(),
                TransactionType::Income => pattern.average_amount.abs(),
            };
            let description = if pattern.recurrence_type == RecurrenceType::Monthly
                && pattern.occurrences >= 3
            {
                format!(
                    "Predicted based on last 3 months (of {} total payments)",
                    pattern.occurrences
                )
            } else {
                format!("Predicted based on {} past payments", pattern.occurrences)
            };

            predictions.push(PredictedTransaction {
                transaction: Transaction {
                    date: month.clamped_day(pattern.typical_day),
                    amount,
                    currency: Some(pattern.currency.clone()),
                    recipient: Some(pattern.recipient.clone()),
                    description: Some(description),
                    category: Some(pattern.category.clone()),
                    transaction_type: Some(pattern.transaction_type),
                },
                is_predicted: true,
                prediction_key: pattern.prediction_key.clone(),
                confidence: pattern.confidence,
                recurrence_type: pattern.recurrence_type,
                based_on: pattern.historical_payments.clone(),
            });
        }

        debug!("Generated {} predictions for {}", predictions.len(), month);
        predictions
    }
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// 60% occurrence count (saturating at 6), 40% amount consistency, two decimals
fn confidence(occurrences: usize, variability: f64) -> f64 {
    let occurrence_score = (occurrences as f64 / 6.0).min(1.0);
    let consistency_score = (1.0 - variability).max(0.0);
    let combined = occurrence_score * 0.6 + consistency_score * 0.4;
    (combined * 100.0).round() / 100.0
}

/// A user's request to hide a prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dismissal {
    pub prediction_key: String,
    pub recurrence_type: RecurrenceType,
    /// Last day the dismissal applies; `None` never expires
    #[serde(default)]
    pub expires_on: Option<NaiveDate>,
}

impl Dismissal {
    /// Dismissal made on `dismissed_on`, expiring after roughly two
    /// occurrences of the payment (60 / 120 / 420 days)
    pub fn new(prediction_key: impl Into<String>, recurrence_type: RecurrenceType, dismissed_on: NaiveDate) -> Self {
        let days = match recurrence_type {
            RecurrenceType::Monthly => 60,
            RecurrenceType::Quarterly => 120,
            RecurrenceType::Yearly => 420,
        };
        Self {
            prediction_key: prediction_key.into(),
            recurrence_type,
            expires_on: Some(dismissed_on + Duration::days(days)),
        }
    }

    /// Still in effect for a month (unexpired on its first day)
    pub fn applies_to(&self, month: MonthKey) -> bool {
        self.expires_on.map_or(true, |d| d >= month.first_day())
    }
}

/// Dismissals known to the prediction store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DismissalSet {
    dismissals: Vec<Dismissal>,
}

impl DismissalSet {
    pub fn new(dismissals: Vec<Dismissal>) -> Self {
        Self { dismissals }
    }

    /// Record a dismissal, replacing an earlier one for the same prediction
    pub fn dismiss(&mut self, dismissal: Dismissal) {
        self.dismissals.retain(|d| {
            !(d.prediction_key == dismissal.prediction_key
                && d.recurrence_type == dismissal.recurrence_type)
        });
        self.dismissals.push(dismissal);
    }

    pub fn len(&self) -> usize {
        self.dismissals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dismissals.is_empty()
    }

    /// Keys of the dismissals in effect for `month`
    pub fn active_for(&self, month: MonthKey) -> HashSet<String> {
        self.dismissals
            .iter()
            .filter(|d| d.applies_to(month))
            .map(|d| d.prediction_key.clone())
            .collect()
    }

    /// Drop predictions dismissed for `month`
    pub fn retain_active(
        &self,
        predictions: Vec<PredictedTransaction>,
        month: MonthKey,
    ) -> Vec<PredictedTransaction> {
        predictions
            .into_iter()
            .filter(|p| {
                !self.dismissals.iter().any(|d| {
                    d.applies_to(month)
                        && d.prediction_key == p.prediction_key
                        && d.recurrence_type == p.recurrence_type
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn payment(d: &str, recipient: &str, category: &str, amount: f64) -> Transaction {
        Transaction {
            recipient: Some(recipient.to_string()),
            category: Some(category.to_string()),
            transaction_type: Some(TransactionType::Expense),
            currency: Some("EUR".to_string()),
            ..Transaction::new(date(d), amount)
        }
    }

    fn monthly_history() -> Vec<Transaction> {
        vec![
            payment("2024-01-15", "Spotify", "Subscriptions", -9.99),
            payment("2024-02-14", "Spotify", "Subscriptions", -9.99),
            payment("2024-03-16", "Spotify", "Subscriptions", -10.99),
            payment("2024-04-15", "Spotify", "Subscriptions", -10.99),
        ]
    }

    #[test]
    fn test_prediction_key_is_stable() {
        let key = prediction_key("Spotify", "Subscriptions", RecurrenceType::Monthly);
        assert_eq!(key.len(), 16);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, prediction_key("Spotify", "Subscriptions", RecurrenceType::Monthly));
        assert_ne!(key, prediction_key("Spotify", "Subscriptions", RecurrenceType::Yearly));
    }

    #[test]
    fn test_detects_monthly_pattern() {
        let patterns = PatternDetector::new().detect(&monthly_history(), "EUR");
        assert_eq!(patterns.len(), 1);

        let pattern = &patterns[0];
        assert_eq!(pattern.recurrence_type, RecurrenceType::Monthly);
        assert_eq!(pattern.occurrences, 4);
        assert_eq!(pattern.typical_day, 15);
        assert_eq!(pattern.last_date, date("2024-04-15"));
        // Last three payments
        assert!((pattern.average_amount - (9.99 + 10.99 + 10.99) / 3.0).abs() < 1e-9);
        assert!(pattern.confidence > 0.0 && pattern.confidence <= 1.0);
    }

    #[test]
    fn test_off_schedule_payment_restarts_monthly_run() {
        let history = vec![
            payment("2024-01-05", "Gym", "Health", -30.0),
            payment("2024-02-20", "Gym", "Health", -30.0),
            payment("2024-03-20", "Gym", "Health", -30.0),
        ];
        let patterns = PatternDetector::new().detect(&history, "EUR");
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].occurrences, 2);
        assert_eq!(patterns[0].typical_day, 20);
    }

    #[test]
    fn test_detects_quarterly_pattern() {
        let history = vec![
            payment("2023-01-10", "Water Co", "Utilities", -90.0),
            payment("2023-04-10", "Water Co", "Utilities", -95.0),
            payment("2023-07-11", "Water Co", "Utilities", -92.0),
            payment("2023-10-10", "Water Co", "Utilities", -94.0),
        ];
        let patterns = PatternDetector::new().detect(&history, "EUR");
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].recurrence_type, RecurrenceType::Quarterly);
        assert_eq!(patterns[0].occurrences, 4);
    }

    #[test]
    fn test_detects_yearly_pattern() {
        let history = vec![
            payment("2022-03-01", "Insurer", "Insurance", -480.0),
            payment("2023-03-03", "Insurer", "Insurance", -500.0),
        ];
        let patterns = PatternDetector::new().detect(&history, "EUR");
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].recurrence_type, RecurrenceType::Yearly);
        assert_eq!(patterns[0].average_amount, 490.0);
    }

    #[test]
    fn test_variable_amounts_rejected() {
        let history = vec![
            payment("2024-01-15", "Market", "Groceries", -20.0),
            payment("2024-02-15", "Market", "Groceries", -200.0),
            payment("2024-03-15", "Market", "Groceries", -60.0),
        ];
        assert!(PatternDetector::new().detect(&history, "EUR").is_empty());
    }

    #[test]
    fn test_variable_monthly_run_falls_back_to_quarterly() {
        let history = vec![
            payment("2023-01-10", "City Water", "Utilities", -100.0),
            payment("2023-02-10", "City Water", "Utilities", -300.0),
            payment("2023-04-10", "City Water", "Utilities", -100.0),
            payment("2023-07-10", "City Water", "Utilities", -100.0),
            payment("2023-10-10", "City Water", "Utilities", -100.0),
        ];
        let patterns = PatternDetector::new().detect(&history, "EUR");

        assert_eq!(patterns.len(), 1);
        let water = &patterns[0];
        assert_eq!(water.recurrence_type, RecurrenceType::Quarterly);
        assert_eq!(water.occurrences, 3);
        assert_eq!(water.last_date, date("2023-10-10"));
        assert_eq!(water.average_amount, 100.0);
    }

    #[test]
    fn test_ignores_transfers_and_missing_recipients() {
        let mut history = vec![
            payment("2024-01-15", "Savings", INTERNAL_TRANSFER, -500.0),
            payment("2024-02-15", "Savings", INTERNAL_TRANSFER, -500.0),
        ];
        let mut anonymous = payment("2024-01-15", "", "Rent", -1000.0);
        anonymous.recipient = None;
        history.push(anonymous.clone());
        anonymous.date = date("2024-02-15");
        history.push(anonymous);

        assert!(PatternDetector::new().detect(&history, "EUR").is_empty());
    }

    #[test]
    fn test_generate_monthly_prediction() {
        let detector = PatternDetector::new();
        let patterns = detector.detect(&monthly_history(), "EUR");
        let month = MonthKey::parse("2024-05").unwrap();

        let predictions =
            detector.generate_for_month(&patterns, month, &HashSet::new(), date("2024-05-02"));
        assert_eq!(predictions.len(), 1);

        let p = &predictions[0];
        assert!(p.is_predicted);
        assert_eq!(p.transaction.date, date("2024-05-15"));
        assert!(p.transaction.amount < 0.0);
        assert_eq!(p.transaction.category.as_deref(), Some("Subscriptions"));
        assert_eq!(p.based_on.len(), 4);
        assert_eq!(
            p.transaction.description.as_deref(),
            Some("Predicted based on last 3 months (of 4 total payments)")
        );
    }

    #[test]
    fn test_stopped_pattern_not_predicted() {
        let detector = PatternDetector::new();
        let patterns = detector.detect(&monthly_history(), "EUR");
        // Next payment was due 2024-05-15; more than a week later nothing arrived
        let predictions = detector.generate_for_month(
            &patterns,
            MonthKey::parse("2024-06").unwrap(),
            &HashSet::new(),
            date("2024-05-25"),
        );
        assert!(predictions.is_empty());
    }

    #[test]
    fn test_dismissed_pattern_not_predicted() {
        let detector = PatternDetector::new();
        let patterns = detector.detect(&monthly_history(), "EUR");
        let month = MonthKey::parse("2024-05").unwrap();

        let mut dismissals = DismissalSet::default();
        dismissals.dismiss(Dismissal::new(
            patterns[0].prediction_key.clone(),
            RecurrenceType::Monthly,
            date("2024-05-01"),
        ));

        let predictions = detector.generate_for_month(
            &patterns,
            month,
            &dismissals.active_for(month),
            date("2024-05-02"),
        );
        assert!(predictions.is_empty());
    }

    #[test]
    fn test_quarterly_predicts_only_near_due_month() {
        let detector = PatternDetector::new();
        let history = vec![
            payment("2023-07-10", "Water Co", "Utilities", -90.0),
            payment("2023-10-10", "Water Co", "Utilities", -90.0),
            payment("2024-01-10", "Water Co", "Utilities", -90.0),
        ];
        let patterns = detector.detect(&history, "EUR");
        let today = date("2024-02-01");

        let in_april = detector.generate_for_month(
            &patterns,
            MonthKey::parse("2024-04").unwrap(),
            &HashSet::new(),
            today,
        );
        assert_eq!(in_april.len(), 1);

        let in_february = detector.generate_for_month(
            &patterns,
            MonthKey::parse("2024-02").unwrap(),
            &HashSet::new(),
            today,
        );
        assert!(in_february.is_empty());
    }

    #[test]
    fn test_prediction_day_clamped_to_month_end() {
        let detector = PatternDetector::new();
        let history = vec![
            payment("2024-01-31", "Landlord", "Rent", -1000.0),
            payment("2024-02-29", "Landlord", "Rent", -1000.0),
            payment("2024-03-31", "Landlord", "Rent", -1000.0),
        ];
        let patterns = detector.detect(&history, "EUR");
        assert_eq!(patterns.len(), 1);

        let predictions = detector.generate_for_month(
            &patterns,
            MonthKey::parse("2024-04").unwrap(),
            &HashSet::new(),
            date("2024-04-01"),
        );
        assert_eq!(predictions[0].transaction.date, date("2024-04-30"));
    }

    #[test]
    fn test_dismissal_expiry() {
        let dismissal = Dismissal::new("abc", RecurrenceType::Monthly, date("2024-01-10"));
        assert_eq!(dismissal.expires_on, Some(date("2024-03-10")));
        assert!(dismissal.applies_to(MonthKey::parse("2024-03").unwrap()));
        assert!(!dismissal.applies_to(MonthKey::parse("2024-04").unwrap()));

        let forever = Dismissal {
            expires_on: None,
            ..dismissal
        };
        assert!(forever.applies_to(MonthKey::parse("2030-01").unwrap()));
    }

    #[test]
    fn test_retain_active_matches_key_and_recurrence() {
        let detector = PatternDetector::new();
        let patterns = detector.detect(&monthly_history(), "EUR");
        let month = MonthKey::parse("2024-05").unwrap();
        let predictions =
            detector.generate_for_month(&patterns, month, &HashSet::new(), date("2024-05-02"));

        let other_tag = DismissalSet::new(vec![Dismissal {
            prediction_key: patterns[0].prediction_key.clone(),
            recurrence_type: RecurrenceType::Yearly,
            expires_on: None,
        }]);
        assert_eq!(other_tag.retain_active(predictions.clone(), month).len(), 1);

        let mut same_tag = DismissalSet::default();
        same_tag.dismiss(Dismissal::new(
            patterns[0].prediction_key.clone(),
            RecurrenceType::Monthly,
            date("2024-05-01"),
        ));
        assert!(same_tag.retain_active(predictions, month).is_empty());
    }

    #[test]
    fn test_confidence_rounding() {
        assert_eq!(confidence(6, 0.0), 1.0);
        assert_eq!(confidence(3, 0.1), 0.66);
    }
}
