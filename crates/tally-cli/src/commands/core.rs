//! Shared utilities for the commands
//!
//! This module contains:
//! - `load_settings` - Resolve settings and apply command-line overrides
//! - `load_records` - Read monthly records, newest first
//! - `read_json` - Read any JSON input file
//! - `select_month` - Pick the requested or current month
//! - `engine_config` - Engine configuration with the trailing essential average

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tally_core::{months, EngineConfig, MonthKey, MonthRecord, Settings};
use tracing::debug;

/// Load settings, then apply `--include-loans` / `--exclude-loans`
pub fn load_settings(path: Option<&Path>, include_loans: Option<bool>) -> Result<Settings> {
    let mut settings = Settings::load(path).context("Failed to load settings")?;
    if let Some(include) = include_loans {
        debug!("Loan payments counted as savings: {} (command line)", include);
        settings.include_loan_payments = include;
    }
    Ok(settings)
}

pub fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} from {}", what, path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid {} in {}", what, path.display()))
}

/// Monthly records sorted newest first
pub fn load_records(path: &Path) -> Result<Vec<MonthRecord>> {
    let records = months::load_records(path)
        .with_context(|| format!("Failed to load monthly records from {}", path.display()))?;
    debug!("Loaded {} monthly records", records.len());
    Ok(records)
}

pub fn parse_month(s: &str) -> Result<MonthKey> {
    MonthKey::parse(s).with_context(|| format!("Invalid month '{}' (use YYYY-MM)", s))
}

/// The requested month, or the current one. The month must have a record.
pub fn select_month(records: &[MonthRecord], month: Option<&str>) -> Result<MonthKey> {
    let key = match month {
        Some(s) => parse_month(s)?,
        None => months::current_month(records).context("No monthly records found")?,
    };
    if months::find(records, key).is_none() {
        anyhow::bail!("No record for month {}", key);
    }
    Ok(key)
}

/// Engine configuration whose average covers the months before the current one
pub fn engine_config(settings: &Settings, records: &[MonthRecord], window: usize) -> Result<EngineConfig> {
    if window == 0 {
        anyhow::bail!("--window must be at least 1");
    }

    let base = settings.engine_config(0.0);
    let Some(current) = months::current_month(records) else {
        return Ok(base);
    };

    let average = months::trailing_essential_average(records, current, &base, window);
    debug!("Average essential spending before {}: {:.2}", current, average);
    Ok(base.with_average_essential_spending(average))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn format_amount(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}
