//! Summary command implementation

use std::path::Path;

use anyhow::Result;
use tally_core::{summarize, MonthSummary, SavingsDisplay, Settings};

use super::{engine_config, format_amount, load_records, parse_month, print_json};

pub fn cmd_summary(
    settings: &Settings,
    data: &Path,
    month: Option<&str>,
    window: Option<usize>,
    json: bool,
) -> Result<()> {
    let records = load_records(data)?;
    let window = window.unwrap_or(settings.average_window_months);
    let config = engine_config(settings, &records, window)?;

    let mut summaries = summarize(&records, &config);
    if let Some(month) = month {
        let key = parse_month(month)?;
        summaries.retain(|s| s.month == key);
        if summaries.is_empty() {
            anyhow::bail!("No record for month {}", key);
        }
    }

    if json {
        return print_json(&summaries);
    }

    if summaries.is_empty() {
        println!("No monthly data found in {}", data.display());
        return Ok(());
    }

    for summary in &summaries {
        print_month(summary, settings, config.average_essential_spending);
    }

    Ok(())
}

fn print_month(summary: &MonthSummary, settings: &Settings, average: f64) {
    let currency = settings.default_currency.as_str();
    let totals = &summary.totals;

    println!();
    if summary.is_current {
        println!("📅 {} (current month)", summary.month);
    } else {
        println!("📅 {}", summary.month);
    }
    println!("   ─────────────────────────────────────────");
    println!("   Income        {:>14}", format_amount(totals.income, currency));
    println!("   Expenses      {:>14}", format_amount(totals.expenses, currency));
    println!(
        "   Savings       {:>14}  ({:.1}%)",
        format_amount(totals.savings, currency),
        summary.savings_rate
    );

    if settings.show_essential_split {
        println!(
            "   Essential     {:>14}",
            format_amount(summary.split.essential_total, currency)
        );
        println!(
            "   Non-essential {:>14}",
            format_amount(summary.split.non_essential_total, currency)
        );
    }

    let redirected = summary.split.redirected_amount(settings.include_loan_payments);
    if redirected > 0.0 {
        println!(
            "   🏦 {} of loan payments counted as savings",
            format_amount(redirected, currency)
        );
    }

    if summary.is_current && average > 0.0 {
        let projection = &summary.projection;
        println!(
            "   🔮 Essential by month end {:>14}  (avg {}, {} still expected)",
            format_amount(projection.effective_essential, currency),
            format_amount(average, currency),
            format_amount(projection.predicted_essential_difference, currency)
        );
    }

    if let SavingsDisplay::Predicted { predicted, .. } = summary.savings_display {
        println!(
            "   🔮 Predicted savings       {:>14}",
            format_amount(predicted, currency)
        );
    }
}
