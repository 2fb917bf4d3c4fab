use tracing::debug;

use crate::problem::Sense;
use crate::tableau::{AuxColumn, Tableau};

/// Reads results back out of a terminal tableau.
pub(crate) struct PostOptimalAnalyzer<'a> {
    tableau: &'a Tableau,
    /// Ratio-test tolerance
    tolerance: f64,
    /// Tolerance for residual artificials and zero reduced costs
    feasibility_tolerance: f64,
}

/// Outcome of probing for a second optimal vertex
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AlternateOptimum {
    /// Non-basic columns with zero reduced cost
    pub columns: Vec<usize>,
    /// Variable values after pivoting the first such column in, if a pivot row exists
    pub values: Option<Vec<f64>>,
}

impl<'a> PostOptimalAnalyzer<'a> {
    pub fn new(tableau: &'a Tableau, tolerance: f64, feasibility_tolerance: f64) -> Self {
        Self {
            tableau,
            tolerance,
            feasibility_tolerance,
        }
    }

    fn sense_sign(&self) -> f64 {
        match self.tableau.sense {
            Sense::Maximize => 1.0,
            Sense::Minimize => -1.0,
        }
    }

    pub fn objective_value(&self) -> f64 {
        let t = self.tableau;
        self.sense_sign() * t.rhs(t.obj_row())
    }

    pub fn variable_values(&self) -> Vec<f64> {
        self.tableau.variable_values()
    }

    /// Marginal objective change per unit increase of each constraint's RHS
    pub fn shadow_prices(&self) -> Vec<f64> {
        let t = self.tableau;
        let obj = t.objective_row();
        t.aux_columns
            .iter()
            .zip(&t.flipped)
            .map(|(aux, &flipped)| {
                let mut value = match *aux {
                    AuxColumn::Slack(col) => obj[col],
                    AuxColumn::Surplus(col) => -obj[col],
                    AuxColumn::Artificial(col) => obj[col] - t.big_m,
                };
                value *= self.sense_sign();
                if flipped {
                    value = -value;
                }
                value
            })
            .collect()
    }

    /// An artificial variable is still basic at a positive level
    pub fn has_positive_artificial(&self) -> bool {
        let t = self.tableau;
        t.basic_vars
            .iter()
            .enumerate()
            .any(|(row, &col)| t.is_artificial(col) && t.rhs(row) > self.feasibility_tolerance)
    }

    /// Non-basic columns whose reduced cost is zero at the optimum
    pub fn zero_reduced_cost_columns(&self) -> Vec<usize> {
        let t = self.tableau;
        let obj = t.objective_row();
        (0..t.rhs_col())
            .filter(|&col| !t.is_basic(col) && obj[col].abs() < self.feasibility_tolerance)
            .collect()
    }

    /// Detects alternate optima and, if possible, pivots a private copy of the
    /// tableau once to reach a second optimal vertex.
    pub fn alternate_optimum(&self) -> Option<AlternateOptimum> {
        let columns = self.zero_reduced_cost_columns();
        let &entering = columns.first()?;

        let mut alt = self.tableau.clone();
        let values = match alt.leaving_row(entering, self.tolerance) {
            Some(row) => {
                alt.pivot(row, entering);
                Some(alt.variable_values())
            }
            None => {
                debug!(column = %alt.headers[entering], "no pivot row for alternate optimum");
                None
            }
        };

        Some(AlternateOptimum { columns, values })
    }
}
