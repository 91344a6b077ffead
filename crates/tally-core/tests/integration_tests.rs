//! Integration tests for tally-core
//!
//! These tests exercise the full records → summary and history → predictions
//! → drilldown workflows.

use std::collections::{BTreeMap, HashSet};

use tally_core::test_utils::{date, expense, month, recurring_history, sample_records};
use tally_core::{
    aggregate, merge_record_category, months, summarize, Dismissal, DismissalSet, EngineConfig,
    MonthRecord, PatternDetector, PredictedTransaction, RecurrenceType, SavingsDisplay, Settings,
    TransactionType,
};

// =============================================================================
// Fixtures
// =============================================================================

fn essentials() -> Vec<String> {
    vec!["Rent".to_string(), "Groceries".to_string()]
}

fn scenario_categories() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("Rent".to_string(), 1500.0),
        ("Groceries".to_string(), 400.0),
        ("Loan Payment".to_string(), 800.0),
    ])
}

// =============================================================================
// Aggregation
// =============================================================================

#[test]
fn test_loan_forced_essential_when_not_redirected() {
    let split = aggregate(&scenario_categories(), &EngineConfig::new(essentials(), false));

    assert_eq!(split.essential.len(), 3);
    assert_eq!(split.essential["Loan Payment"], 800.0);
    assert_eq!(split.essential_total, 2700.0);
    assert_eq!(split.non_essential_total, 0.0);
}

#[test]
fn test_loan_redirected_to_savings() {
    let config = EngineConfig::new(essentials(), true);
    let mut record = MonthRecord::empty(month("2024-05"));
    record.expense_categories = scenario_categories();
    record.income = 5000.0;
    record.expenses = 2700.0;
    record.savings = 2300.0;

    let summaries = summarize(&[record], &config);
    let may = &summaries[0];

    assert!(!may.split.essential.contains_key("Loan Payment"));
    assert_eq!(may.split.essential_total, 1900.0);
    assert_eq!(may.split.loan_payment_amount, 800.0);
    assert_eq!(may.totals.expenses, 1900.0);
    assert_eq!(may.totals.savings, 3100.0);
}

// =============================================================================
// Projection
// =============================================================================

#[test]
fn test_current_month_projects_from_history() {
    let records = sample_records();
    let base = EngineConfig::new(essentials(), false);
    let current = months::current_month(&records).unwrap();
    assert_eq!(current, month("2024-05"));

    // Feb..Apr essentials including the loan: 2900, 3000, 3100
    let average = months::trailing_essential_average(&records, current, &base, 3);
    assert_eq!(average, 3000.0);

    let config = base.with_average_essential_spending(average);
    let summaries = summarize(&records, &config);
    let may = &summaries[0];
    assert!(may.is_current);

    // May so far: 1500 + 400 + 800
    assert_eq!(may.split.essential_total, 2700.0);
    assert_eq!(may.split.non_essential_total, 9.99);
    assert_eq!(may.projection.effective_essential, 3000.0);
    assert_eq!(may.projection.predicted_essential_difference, 300.0);
    assert!(may.savings_display.is_predicted());

    // Past months never carry a projection
    for past in &summaries[1..] {
        assert!(!past.is_current);
        assert_eq!(past.projection.predicted_essential_difference, 0.0);
        assert!(matches!(past.savings_display, SavingsDisplay::Actual { .. }));
    }
}

#[test]
fn test_projection_without_history_falls_back_to_actual() {
    let records: Vec<MonthRecord> = sample_records()
        .into_iter()
        .filter(|r| r.month == month("2024-05"))
        .collect();
    let config = EngineConfig::new(essentials(), false);
    let summaries = summarize(&records, &config);

    let may = &summaries[0];
    assert_eq!(may.projection.effective_essential, may.split.essential_total);
    assert_eq!(may.projection.predicted_essential_difference, 0.0);
    assert!(!may.savings_display.is_predicted());
}

#[test]
fn test_stable_history_with_loans_as_savings_shows_actual() {
    let records: Vec<MonthRecord> = ["2024-02", "2024-03", "2024-04", "2024-05"]
        .iter()
        .map(|m| MonthRecord {
            month: month(m),
            ..months::find(&sample_records(), month("2024-04")).unwrap().clone()
        })
        .collect();
    let base = EngineConfig::new(essentials(), true);
    let current = months::current_month(&records).unwrap();

    // Loans stay in the average even when they count as savings
    let average = months::trailing_essential_average(&records, current, &base, 3);
    assert_eq!(average, 3100.0);

    let summaries = summarize(&records, &base.with_average_essential_spending(average));
    let may = &summaries[0];
    assert!(may.is_current);
    assert_eq!(may.split.essential_total, 2300.0);
    assert_eq!(may.projection.effective_essential, 3100.0);
    assert_eq!(may.projection.predicted_savings, may.totals.savings);
    assert!(matches!(may.savings_display, SavingsDisplay::Actual { .. }));
}

#[test]
fn test_summaries_are_newest_first() {
    let mut records = sample_records();
    records.reverse();
    records.swap(0, 2);
    let summaries = summarize(&records, &EngineConfig::new(essentials(), false));
    let keys: Vec<String> = summaries.iter().map(|s| s.month.to_string()).collect();
    assert_eq!(keys, vec!["2024-05", "2024-04", "2024-03", "2024-02"]);
}

#[test]
fn test_records_from_json() {
    let json = r#"[
        {"month": "2024-04", "income": 3000, "expenses": 1000, "savings": 2000,
         "expenseCategories": {"Rent": 1000}},
        {"month": "2024-05", "income": 3000,
         "expenseCategories": {"Rent": 1000, "Car Loan": 300, "Cinema": 50},
         "expenses": 1350, "savings": 1650}
    ]"#;
    let records: Vec<MonthRecord> = serde_json::from_str(json).unwrap();
    let settings = Settings::default();
    let summaries = summarize(&records, &settings.engine_config(0.0));

    let may = &summaries[0];
    assert_eq!(may.split.essential_total, 1300.0);
    assert_eq!(may.split.non_essential["Cinema"], 50.0);
    assert_eq!(may.split.loan_category.as_deref(), Some("Car Loan"));
}

// =============================================================================
// Predictions and drilldown
// =============================================================================

fn may_predictions(dismissed: &HashSet<String>) -> Vec<PredictedTransaction> {
    let detector = PatternDetector::new();
    let patterns = detector.detect(&recurring_history(), "EUR");
    detector.generate_for_month(&patterns, month("2024-05"), dismissed, date("2024-05-03"))
}

#[test]
fn test_history_yields_monthly_quarterly_and_yearly_patterns() {
    let patterns = PatternDetector::new().detect(&recurring_history(), "EUR");
    let mut kinds: Vec<(String, RecurrenceType)> = patterns
        .iter()
        .map(|p| (p.recipient.clone(), p.recurrence_type))
        .collect();
    kinds.sort_by(|a, b| a.0.cmp(&b.0));

    assert_eq!(
        kinds,
        vec![
            ("City Water".to_string(), RecurrenceType::Quarterly),
            ("Home Insurance Co".to_string(), RecurrenceType::Yearly),
            ("Streamly".to_string(), RecurrenceType::Monthly),
        ]
    );
}

#[test]
fn test_predictions_for_current_month() {
    let predictions = may_predictions(&HashSet::new());
    let mut categories: Vec<&str> = predictions
        .iter()
        .filter_map(|p| p.transaction.category.as_deref())
        .collect();
    categories.sort();

    // Water is due in May (3 months after February), insurance yearly in May
    assert_eq!(categories, vec!["Insurance", "Subscriptions", "Utilities"]);
    assert!(predictions.iter().all(|p| p.is_predicted && p.transaction.amount < 0.0));
}

#[test]
fn test_drilldown_merges_predictions_newest_first() {
    let records = sample_records();
    let predictions = may_predictions(&HashSet::new());
    let may = months::find(&records, month("2024-05")).unwrap();

    let rows = merge_record_category(may, "Subscriptions", TransactionType::Expense, &predictions, true);
    assert_eq!(rows.len(), 2);
    assert!(rows[0].is_predicted());
    assert_eq!(rows[0].date(), date("2024-05-15"));
    assert!(!rows[1].is_predicted());
    assert_eq!(rows[1].date(), date("2024-05-02"));

    // Past months show actual transactions only
    let april = months::find(&records, month("2024-04")).unwrap();
    let rows = merge_record_category(april, "Subscriptions", TransactionType::Expense, &predictions, false);
    assert!(rows.is_empty());
}

#[test]
fn test_drilldown_merge_scenario() {
    let mut record = MonthRecord::empty(month("2024-05"));
    let mut rent = expense("2024-05-01", "Landlord", "Rent", 1500.0);
    rent.transaction_type = None;
    record.expense_transactions.insert("Rent".to_string(), vec![rent]);

    let predicted: PredictedTransaction = serde_json::from_str(
        r#"{"date": "2024-05-15", "amount": -1500, "category": "Rent", "type": "expense",
            "prediction_key": "0123456789abcdef", "recurrence_type": "monthly"}"#,
    )
    .unwrap();
    let predictions = vec![predicted];

    let rows = merge_record_category(&record, "Rent", TransactionType::Expense, &predictions, true);
    let dates: Vec<String> = rows.iter().map(|r| r.date().to_string()).collect();
    assert_eq!(dates, vec!["2024-05-15", "2024-05-01"]);
}

#[test]
fn test_dismissed_prediction_hidden_until_expiry() {
    let all = may_predictions(&HashSet::new());
    let streamly = all
        .iter()
        .find(|p| p.transaction.recipient.as_deref() == Some("Streamly"))
        .unwrap();

    let mut dismissals = DismissalSet::default();
    dismissals.dismiss(Dismissal::new(
        streamly.prediction_key.clone(),
        RecurrenceType::Monthly,
        date("2024-05-03"),
    ));

    let may = may_predictions(&dismissals.active_for(month("2024-05")));
    assert_eq!(may.len(), all.len() - 1);

    // 60 days later the dismissal has lapsed
    assert!(dismissals.active_for(month("2024-08")).is_empty());
}
