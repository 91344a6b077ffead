//! Error types for Tally
//!
//! The aggregation engine itself never fails. These errors come from the
//! edges: reading settings and input files, parsing month keys, and
//! compiling configured match rules.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid month key: {0} (expected YYYY-MM)")]
    InvalidMonth(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
