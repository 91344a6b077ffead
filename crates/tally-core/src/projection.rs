//! Current-month projection
//!
//! For the month still in progress, essential spending is projected as the
//! greater of what has been spent so far and the trailing historical
//! average. Past months are not projected: their predicted figures equal
//! the actual ones.

use serde::Serialize;

use crate::aggregate::CategorySplit;
use crate::models::EngineConfig;

/// Inputs of a projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionInput {
    pub essential_total: f64,
    pub non_essential_total: f64,
    pub income: f64,
    pub average_essential_spending: f64,
    pub include_loan_payments: bool,
    pub loan_payment_amount: f64,
}

impl ProjectionInput {
    pub fn from_split(split: &CategorySplit, income: f64, config: &EngineConfig) -> Self {
        Self {
            essential_total: split.essential_total,
            non_essential_total: split.non_essential_total,
            income,
            average_essential_spending: config.average_essential_spending,
            include_loan_payments: config.include_loan_payments,
            loan_payment_amount: split.loan_payment_amount,
        }
    }
}

/// Projected month-end figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projection {
    /// Essential spend expected by month end; never below the actual
    pub effective_essential: f64,
    /// Essential spend still expected this month; never negative
    pub predicted_essential_difference: f64,
    pub total_predicted_expenses: f64,
    pub predicted_savings: f64,
}

/// Project the in-progress month
pub fn project(input: &ProjectionInput) -> Projection {
    let average = input.average_essential_spending;
    let actual = input.essential_total;

    let predicted_essential_difference = (average - actual).max(0.0);
    let effective_essential = if average > 0.0 {
        actual.max(average)
    } else {
        actual
    };
    let total_predicted_expenses = effective_essential + input.non_essential_total;

    let redirected = if input.include_loan_payments {
        input.loan_payment_amount
    } else {
        0.0
    };
    let predicted_savings = input.income - total_predicted_expenses + redirected;

    Projection {
        effective_essential,
        predicted_essential_difference,
        total_predicted_expenses,
        predicted_savings,
    }
}

impl Projection {
    /// Figures for a closed month: nothing left to predict
    pub fn actual(essential_total: f64, non_essential_total: f64, savings: f64) -> Self {
        Self {
            effective_essential: essential_total,
            predicted_essential_difference: 0.0,
            total_predicted_expenses: essential_total + non_essential_total,
            predicted_savings: savings,
        }
    }
}

/// Savings figure to show for a month
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SavingsDisplay {
    Actual { savings: f64 },
    Predicted { predicted: f64, actual: f64 },
}

impl SavingsDisplay {
    /// Falls back to the actual savings when the projection changes nothing.
    ///
    /// The comparison is exact; floating-point drift between the two sums
    /// shows up as a (tiny) predicted figure.
    pub fn choose(projection: &Projection, savings: f64) -> Self {
        if projection.predicted_savings == savings {
            Self::Actual { savings }
        } else {
            Self::Predicted {
                predicted: projection.predicted_savings,
                actual: savings,
            }
        }
    }

    pub fn amount(&self) -> f64 {
        match self {
            Self::Actual { savings } => *savings,
            Self::Predicted { predicted, .. } => *predicted,
        }
    }

    pub fn is_predicted(&self) -> bool {
        matches!(self, Self::Predicted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(essential: f64, average: f64) -> ProjectionInput {
        ProjectionInput {
            essential_total: essential,
            non_essential_total: 500.0,
            income: 5000.0,
            average_essential_spending: average,
            include_loan_payments: false,
            loan_payment_amount: 0.0,
        }
    }

    #[test]
    fn test_average_above_actual() {
        let projection = project(&input(1900.0, 2200.0));
        assert_eq!(projection.predicted_essential_difference, 300.0);
        assert_eq!(projection.effective_essential, 2200.0);
        assert_eq!(projection.total_predicted_expenses, 2700.0);
        assert_eq!(projection.predicted_savings, 2300.0);
    }

    #[test]
    fn test_actual_already_above_average() {
        let projection = project(&input(2500.0, 2200.0));
        assert_eq!(projection.predicted_essential_difference, 0.0);
        assert_eq!(projection.effective_essential, 2500.0);
    }

    #[test]
    fn test_zero_average_means_no_projection() {
        let projection = project(&input(1900.0, 0.0));
        assert_eq!(projection.effective_essential, 1900.0);
        assert_eq!(projection.predicted_essential_difference, 0.0);

        // income 5000 - (1900 + 500) = 2600, same as the actual savings
        let display = SavingsDisplay::choose(&projection, 2600.0);
        assert_eq!(display, SavingsDisplay::Actual { savings: 2600.0 });
        assert!(!display.is_predicted());
    }

    #[test]
    fn test_loan_payments_added_back_to_predicted_savings() {
        let mut with_loans = input(1900.0, 2200.0);
        with_loans.include_loan_payments = true;
        with_loans.loan_payment_amount = 800.0;

        let projection = project(&with_loans);
        assert_eq!(projection.predicted_savings, 5000.0 - 2700.0 + 800.0);
    }

    #[test]
    fn test_loan_amount_ignored_when_not_redirected() {
        let mut kept = input(1900.0, 2200.0);
        kept.loan_payment_amount = 800.0;
        assert_eq!(project(&kept).predicted_savings, 2300.0);
    }

    #[test]
    fn test_projection_bounds_hold() {
        for essential in [0.0, 100.0, 1999.5, 2200.0, 4000.0] {
            for average in [0.0, 50.0, 2200.0, 3000.0] {
                let projection = project(&input(essential, average));
                assert!(projection.predicted_essential_difference >= 0.0);
                assert!(projection.effective_essential >= essential);
                if average <= essential {
                    assert_eq!(projection.predicted_essential_difference, 0.0);
                }
            }
        }
    }

    #[test]
    fn test_predicted_display_when_projection_differs() {
        let projection = project(&input(1900.0, 2200.0));
        let display = SavingsDisplay::choose(&projection, 2600.0);
        assert!(display.is_predicted());
        assert_eq!(display.amount(), 2300.0);
    }

    #[test]
    fn test_closed_month_projection_equals_actuals() {
        let projection = Projection::actual(1900.0, 500.0, 2600.0);
        assert_eq!(projection.effective_essential, 1900.0);
        assert_eq!(projection.total_predicted_expenses, 2400.0);
        assert_eq!(
            SavingsDisplay::choose(&projection, 2600.0),
            SavingsDisplay::Actual { savings: 2600.0 }
        );
    }
}
