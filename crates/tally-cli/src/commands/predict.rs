//! Prediction command implementation

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tally_core::{DismissalSet, PatternDetector, Settings, Transaction};

use super::{format_amount, parse_month, print_json, read_json, truncate};

pub fn cmd_predict(
    settings: &Settings,
    history: &Path,
    month: &str,
    dismissed: Option<&Path>,
    today: Option<&str>,
    json: bool,
) -> Result<()> {
    let month = parse_month(month)?;
    let today = today
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("Invalid --today format (use YYYY-MM-DD)")?
        .unwrap_or_else(|| Local::now().date_naive());

    let transactions: Vec<Transaction> = read_json(history, "transaction history")?;
    let dismissals: DismissalSet = match dismissed {
        Some(path) => read_json(path, "dismissals")?,
        None => DismissalSet::default(),
    };

    let detector = PatternDetector::new();
    let patterns = detector.detect(&transactions, &settings.default_currency);
    let predictions =
        detector.generate_for_month(&patterns, month, &dismissals.active_for(month), today);

    if json {
        return print_json(&predictions);
    }

    if predictions.is_empty() {
        println!("No recurring payments predicted for {}", month);
        return Ok(());
    }

    println!();
    println!("🔮 Predicted payments for {}", month);
    println!("   ─────────────────────────────────────────────────────────────────────");

    for p in &predictions {
        let tx = &p.transaction;
        println!(
            "   {} │ {:22} │ {:16} │ {:>14} │ {:9} │ {:>3.0}%",
            tx.date,
            truncate(tx.recipient.as_deref().unwrap_or("-"), 22),
            truncate(tx.category.as_deref().unwrap_or("-"), 16),
            format_amount(tx.amount, tx.currency_or(&settings.default_currency)),
            p.recurrence_type,
            p.confidence * 100.0
        );
    }

    println!();
    println!("   {} of {} recurring patterns predicted", predictions.len(), patterns.len());
    if !dismissals.is_empty() {
        println!("   {} dismissal(s) on file", dismissals.len());
    }

    Ok(())
}
