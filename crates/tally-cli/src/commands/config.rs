//! Config command implementation

use anyhow::Result;
use serde::Serialize;
use tally_core::defaults::{default_expense_categories, default_income_categories};
use tally_core::{ChartView, Settings};

use super::print_json;

#[derive(Serialize)]
pub(crate) struct SettingsView<'a> {
    source: String,
    show_essential_split: bool,
    chart_view: ChartView,
    include_loan_payments: bool,
    default_currency: &'a str,
    essential_categories: &'a [String],
    average_window_months: usize,
    loan_match_type: &'static str,
    loan_pattern: &'a str,
    /// Category choices offered when editing entries
    expense_categories: Vec<String>,
    income_categories: Vec<String>,
}

pub(crate) fn settings_view(settings: &Settings) -> SettingsView<'_> {
    SettingsView {
        source: settings.source.to_string(),
        show_essential_split: settings.show_essential_split,
        chart_view: settings.chart_view,
        include_loan_payments: settings.include_loan_payments,
        default_currency: &settings.default_currency,
        essential_categories: &settings.essential_categories,
        average_window_months: settings.average_window_months,
        loan_match_type: settings.loan_match_type.as_str(),
        loan_pattern: &settings.loan_pattern,
        expense_categories: default_expense_categories(),
        income_categories: default_income_categories(),
    }
}

pub fn cmd_config(settings: &Settings, json: bool) -> Result<()> {
    let view = settings_view(settings);
    if json {
        return print_json(&view);
    }

    println!();
    println!("⚙️  Settings ({})", settings.source);
    println!("   ─────────────────────────────────────────");
    println!("   Essential split shown:  {}", settings.show_essential_split);
    println!("   Chart view:             {}", settings.chart_view);
    println!("   Loans count as savings: {}", settings.include_loan_payments);
    println!("   Default currency:       {}", settings.default_currency);
    println!("   Essential categories:   {}", settings.essential_categories.join(", "));
    println!("   Projection window:      {} months", settings.average_window_months);
    println!(
        "   Loan rule:              {} \"{}\"",
        settings.loan_match_type.as_str(),
        settings.loan_pattern
    );
    println!("   Expense categories:     {}", view.expense_categories.join(", "));
    println!("   Income categories:      {}", view.income_categories.join(", "));

    Ok(())
}
