//! User settings
//!
//! UI toggles and engine parameters, loaded from TOML.
//!
//! ## Configuration Resolution
//!
//! 1. An explicit path (`--settings`), which must exist
//! 2. The override in the data dir (~/.local/share/tally/config/settings.toml)
//! 3. The embedded defaults (compiled into binary)
//!
//! Keys missing from a file keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classify::{LoanMatcher, MatchType};
use crate::defaults;
use crate::error::{Error, Result};
use crate::models::EngineConfig;

/// Embedded default settings (compiled into binary)
const DEFAULT_SETTINGS: &str = include_str!("../../../config/settings.toml");

/// Chart style for the monthly overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartView {
    Bar,
    Line,
    Area,
}

impl ChartView {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Area => "area",
        }
    }
}

impl std::str::FromStr for ChartView {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bar" => Ok(Self::Bar),
            "line" => Ok(Self::Line),
            "area" => Ok(Self::Area),
            _ => Err(format!("Unknown chart view: {}", s)),
        }
    }
}

impl std::fmt::Display for ChartView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the settings were read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    Explicit(PathBuf),
    Override(PathBuf),
    Embedded,
}

impl std::fmt::Display for SettingsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Explicit(path) => write!(f, "{}", path.display()),
            Self::Override(path) => write!(f, "{} (override)", path.display()),
            Self::Embedded => write!(f, "built-in defaults"),
        }
    }
}

/// Resolved settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub show_essential_split: bool,
    pub chart_view: ChartView,
    pub include_loan_payments: bool,
    pub default_currency: String,
    pub essential_categories: Vec<String>,
    /// Months of history averaged for the essential projection
    pub average_window_months: usize,
    pub loan_match_type: MatchType,
    pub loan_pattern: String,
    /// Compiled from `loan_match_type` and `loan_pattern`
    pub loan_matcher: LoanMatcher,
    pub source: SettingsSource,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_essential_split: true,
            chart_view: ChartView::Bar,
            include_loan_payments: false,
            default_currency: "EUR".to_string(),
            essential_categories: defaults::default_essential_categories(),
            average_window_months: 3,
            loan_match_type: MatchType::Contains,
            loan_pattern: crate::classify::LOAN_MARKER.to_string(),
            loan_matcher: LoanMatcher::default(),
            source: SettingsSource::Embedded,
        }
    }
}

impl Settings {
    /// Load using the resolution order above
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Settings file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path, SettingsSource::Explicit(path.to_path_buf()));
        }

        if let Some(path) = default_settings_path() {
            if path.exists() {
                return Self::from_file(&path, SettingsSource::Override(path.clone()));
            }
        }

        debug!("Using built-in settings");
        parse_settings(DEFAULT_SETTINGS, SettingsSource::Embedded)
    }

    fn from_file(path: &Path, source: SettingsSource) -> Result<Self> {
        info!("Loading settings from {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        parse_settings(&content, source)
    }

    /// Engine configuration for a session
    pub fn engine_config(&self, average_essential_spending: f64) -> EngineConfig {
        EngineConfig {
            essential_categories: self.essential_categories.clone(),
            include_loan_payments: self.include_loan_payments,
            default_currency: self.default_currency.clone(),
            average_essential_spending,
            loan_matcher: self.loan_matcher.clone(),
        }
    }
}

/// Default override path
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config").join("settings.toml"))
}

/// Raw settings structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    display: Option<RawDisplay>,
    engine: Option<RawEngine>,
    projection: Option<RawProjection>,
    loan_rule: Option<RawLoanRule>,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    show_essential_split: Option<bool>,
    chart_view: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEngine {
    include_loan_payments: Option<bool>,
    default_currency: Option<String>,
    essential_categories: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawProjection {
    average_window_months: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawLoanRule {
    match_type: Option<String>,
    pattern: Option<String>,
}

/// Parse settings from TOML content
fn parse_settings(content: &str, source: SettingsSource) -> Result<Settings> {
    let raw: RawSettings = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid settings TOML: {}", e)))?;

    let mut settings = Settings {
        source,
        ..Default::default()
    };

    if let Some(display) = raw.display {
        if let Some(show) = display.show_essential_split {
            settings.show_essential_split = show;
        }
        if let Some(view) = display.chart_view {
            settings.chart_view = view.parse().map_err(Error::Config)?;
        }
    }

    if let Some(engine) = raw.engine {
        if let Some(include) = engine.include_loan_payments {
            settings.include_loan_payments = include;
        }
        if let Some(currency) = engine.default_currency {
            settings.default_currency = currency.trim().to_uppercase();
        }
        if let Some(categories) = engine.essential_categories {
            settings.essential_categories = defaults::essential_or_default(Some(categories));
        }
    }

    if let Some(projection) = raw.projection {
        if let Some(window) = projection.average_window_months {
            if window == 0 {
                return Err(Error::Config(
                    "average_window_months must be at least 1".to_string(),
                ));
            }
            settings.average_window_months = window;
        }
    }

    if let Some(rule) = raw.loan_rule {
        if let Some(match_type) = rule.match_type {
            settings.loan_match_type = match_type.parse().map_err(Error::Config)?;
        }
        if let Some(pattern) = rule.pattern {
            settings.loan_pattern = pattern;
        }
    }

    if settings.loan_pattern.trim().is_empty() {
        return Err(Error::Config("loan_rule.pattern must not be empty".to_string()));
    }
    settings.loan_matcher = LoanMatcher::from_rule(settings.loan_match_type, &settings.loan_pattern)?;

    Ok(settings)
}
