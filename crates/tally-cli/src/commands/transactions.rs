//! Transaction drilldown command implementation

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{
    merge_record_category, months, LedgerEntry, PredictedTransaction, Settings, TransactionType,
};

use super::{format_amount, load_records, print_json, read_json, select_month, truncate};

pub fn cmd_transactions(
    settings: &Settings,
    data: &Path,
    category: &str,
    kind: &str,
    month: Option<&str>,
    predictions: Option<&Path>,
    json: bool,
) -> Result<()> {
    let kind: TransactionType = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let records = load_records(data)?;
    let key = select_month(&records, month)?;
    let record = months::find(&records, key).context("Month disappeared from records")?;
    let is_current = months::current_month(&records) == Some(key);

    let predicted: Vec<PredictedTransaction> = match predictions {
        Some(path) => read_json(path, "predictions")?,
        None => Vec::new(),
    };

    let rows = merge_record_category(record, category, kind, &predicted, is_current);

    if json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!("No {} transactions in {} for {}", kind, category, key);
        return Ok(());
    }

    println!();
    println!("📋 {} ({}) - {}", category, kind, key);
    println!("   ─────────────────────────────────────────────────────────────");

    for row in &rows {
        print_row(row, &settings.default_currency);
    }

    let predicted_count = rows.iter().filter(|r| r.is_predicted()).count();
    if predicted_count > 0 {
        println!();
        println!("   🔮 {} predicted", predicted_count);
    }

    Ok(())
}

fn print_row(row: &LedgerEntry<'_>, default_currency: &str) {
    let tx = row.transaction();
    let icon = if row.is_predicted() { "🔮" } else { "  " };
    let label = tx
        .recipient
        .as_deref()
        .or(tx.description.as_deref())
        .unwrap_or("-");

    println!(
        "   {} {} │ {:28} │ {:>14}",
        icon,
        row.date(),
        truncate(label, 28),
        format_amount(row.amount(), tx.currency_or(default_currency))
    );
}
