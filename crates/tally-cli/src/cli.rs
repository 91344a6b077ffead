//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Monthly income, expenses and savings at a glance
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Monthly finance summaries with essential spending projections", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file (defaults to the override in the data dir, then built-in defaults)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Count loan payments as savings (overrides settings)
    #[arg(long, global = true, conflicts_with = "exclude_loans")]
    pub include_loans: bool,

    /// Count loan payments as essential expenses (overrides settings)
    #[arg(long, global = true)]
    pub exclude_loans: bool,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Loan setting requested on the command line, if any
    pub fn loan_override(&self) -> Option<bool> {
        if self.include_loans {
            Some(true)
        } else if self.exclude_loans {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show income, expenses and savings per month
    Summary {
        /// Monthly records (JSON array)
        #[arg(short, long)]
        data: PathBuf,

        /// Only show this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// Months of history averaged for the projection (defaults to settings)
        #[arg(long)]
        window: Option<usize>,
    },

    /// Show the essential / non-essential breakdown of a month
    Categories {
        /// Monthly records (JSON array)
        #[arg(short, long)]
        data: PathBuf,

        /// Month to break down (defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// List a category's transactions, with predictions for the current month
    Transactions {
        /// Monthly records (JSON array)
        #[arg(short, long)]
        data: PathBuf,

        /// Category name
        #[arg(short, long)]
        category: String,

        /// Transaction type: expense, income
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,

        /// Month (defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Predicted transactions (JSON array, as printed by `tally predict --json`)
        #[arg(short, long)]
        predictions: Option<PathBuf>,
    },

    /// Predict recurring payments for a month from the transaction history
    Predict {
        /// Transaction history (JSON array)
        #[arg(long)]
        history: PathBuf,

        /// Month to predict (YYYY-MM)
        #[arg(short, long)]
        month: String,

        /// Dismissed predictions (JSON array)
        #[arg(long)]
        dismissed: Option<PathBuf>,

        /// Reference date for overdue checks (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<String>,
    },

    /// Show the effective settings
    Config,
}
