//! Category breakdown command implementation

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tally_core::{months, CategoryShare, MonthKey, MonthSummary, Settings};

use super::{engine_config, format_amount, load_records, print_json, select_month, truncate};

/// JSON shape of the breakdown
#[derive(Serialize)]
struct CategoryReport<'a> {
    month: MonthKey,
    essential_total: f64,
    non_essential_total: f64,
    redirected_to_savings: f64,
    loan_category: Option<&'a str>,
    essential: &'a [CategoryShare],
    non_essential: &'a [CategoryShare],
    income: &'a [CategoryShare],
}

pub fn cmd_categories(settings: &Settings, data: &Path, month: Option<&str>, json: bool) -> Result<()> {
    let records = load_records(data)?;
    let key = select_month(&records, month)?;
    let record = months::find(&records, key).context("Month disappeared from records")?;
    let is_current = months::current_month(&records) == Some(key);

    let config = engine_config(settings, &records, settings.average_window_months)?;
    let summary = MonthSummary::build(record, &config, is_current);
    let redirected = summary.split.redirected_amount(settings.include_loan_payments);

    if json {
        return print_json(&CategoryReport {
            month: key,
            essential_total: summary.split.essential_total,
            non_essential_total: summary.split.non_essential_total,
            redirected_to_savings: redirected,
            loan_category: summary.split.loan_category.as_deref(),
            essential: &summary.essential_shares,
            non_essential: &summary.non_essential_shares,
            income: &summary.income_shares,
        });
    }

    let currency = settings.default_currency.as_str();

    println!();
    println!("📊 Categories for {}", key);
    print_section("🏠 Essential", &summary.essential_shares, summary.split.essential_total, currency);
    print_section(
        "🛍️  Non-essential",
        &summary.non_essential_shares,
        summary.split.non_essential_total,
        currency,
    );
    print_section("💰 Income", &summary.income_shares, record.income, currency);

    if redirected > 0.0 {
        println!();
        println!(
            "   🏦 {} of loan payments ({}) counted as savings",
            format_amount(redirected, currency),
            summary.split.loan_category.as_deref().unwrap_or("loan")
        );
    }

    Ok(())
}

fn print_section(title: &str, shares: &[CategoryShare], total: f64, currency: &str) {
    println!();
    println!("   {}  {}", title, format_amount(total, currency));
    println!("   ─────────────────────────────────────────────");
    if shares.is_empty() {
        println!("   (none)");
        return;
    }
    for share in shares {
        println!(
            "   {:24} │ {:>14} │ {:>5.1}%",
            truncate(&share.name, 24),
            format_amount(share.amount, currency),
            share.percentage
        );
    }
}
