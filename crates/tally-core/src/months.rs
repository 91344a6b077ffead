//! Month ordering and the current month
//!
//! Records arrive in no particular order. The current (in-progress) month is
//! the greatest month key present.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::aggregate::aggregate;
use crate::error::{Error, Result};
use crate::models::{EngineConfig, MonthKey, MonthRecord};

/// Parse a JSON array of month records, newest first.
///
/// Two records for the same month are rejected: the current month would be
/// ambiguous.
pub fn parse_records(json: &str) -> Result<Vec<MonthRecord>> {
    let mut records: Vec<MonthRecord> = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.month) {
            return Err(Error::InvalidData(format!(
                "duplicate record for month {}",
                record.month
            )));
        }
    }

    sort_desc(&mut records);
    debug!("Parsed {} month records", records.len());
    Ok(records)
}

/// [`parse_records`] on a file
pub fn load_records(path: &Path) -> Result<Vec<MonthRecord>> {
    let content = std::fs::read_to_string(path)?;
    parse_records(&content)
}

/// Sort records newest first
pub fn sort_desc(records: &mut [MonthRecord]) {
    records.sort_by(|a, b| b.month.cmp(&a.month));
}

/// The greatest month key among the records
pub fn current_month(records: &[MonthRecord]) -> Option<MonthKey> {
    records.iter().map(|r| r.month).max()
}

pub fn is_current(record: &MonthRecord, records: &[MonthRecord]) -> bool {
    current_month(records) == Some(record.month)
}

pub fn find(records: &[MonthRecord], month: MonthKey) -> Option<&MonthRecord> {
    records.iter().find(|r| r.month == month)
}

/// Mean essential spend over up to `window` months before `current`.
///
/// Each month is classified with the essential list of `config`. Loan
/// payments always count as essential here, whatever the loan setting: the
/// predicted savings add the loan back when loans count as savings. Months
/// without any essential spend are skipped. Zero without history.
pub fn trailing_essential_average(
    records: &[MonthRecord],
    current: MonthKey,
    config: &EngineConfig,
    window: usize,
) -> f64 {
    let loans_essential = EngineConfig {
        include_loan_payments: false,
        ..config.clone()
    };

    let mut history: Vec<&MonthRecord> = records.iter().filter(|r| r.month < current).collect();
    history.sort_by(|a, b| b.month.cmp(&a.month));

    let totals: Vec<f64> = history
        .iter()
        .map(|r| aggregate(&r.expense_categories, &loans_essential).essential_total)
        .filter(|total| *total > 0.0)
        .take(window)
        .collect();

    if totals.is_empty() {
        return 0.0;
    }
    totals.iter().sum::<f64>() / totals.len() as f64
}
