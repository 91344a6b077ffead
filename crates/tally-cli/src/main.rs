//! Tally CLI - Monthly finance summaries
//!
//! Usage:
//!   tally summary --data months.json              Per-month totals and projection
//!   tally categories --data months.json           Essential / non-essential breakdown
//!   tally transactions --data months.json -c Rent Category drilldown
//!   tally predict --history tx.json -m 2024-05    Predict recurring payments
//!   tally config                                  Effective settings

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .init();

    let settings = commands::load_settings(cli.settings.as_deref(), cli.loan_override())?;

    match cli.command {
        Commands::Summary {
            data,
            month,
            window,
        } => commands::cmd_summary(&settings, &data, month.as_deref(), window, cli.json),
        Commands::Categories { data, month } => {
            commands::cmd_categories(&settings, &data, month.as_deref(), cli.json)
        }
        Commands::Transactions {
            data,
            category,
            kind,
            month,
            predictions,
        } => commands::cmd_transactions(
            &settings,
            &data,
            &category,
            &kind,
            month.as_deref(),
            predictions.as_deref(),
            cli.json,
        ),
        Commands::Predict {
            history,
            month,
            dismissed,
            today,
        } => commands::cmd_predict(
            &settings,
            &history,
            &month,
            dismissed.as_deref(),
            today.as_deref(),
            cli.json,
        ),
        Commands::Config => commands::cmd_config(&settings, cli.json),
    }
}
