use std::fmt;

use crate::geometry::GraphData;

/// The result of solving an LP problem
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Objective value in the problem's own sense
    pub objective_value: f64,
    /// Values for each decision variable, aligned with the problem's variables
    pub values: Vec<f64>,
    /// Shadow prices, one per constraint
    pub shadow_prices: Vec<f64>,
    /// Tableau column headers (decision, slack, surplus, artificial)
    pub columns: Vec<String>,
    /// Every tableau visited, starting with the initial one
    pub iterations: Vec<Iteration>,
    /// A non-basic column has zero reduced cost at the optimum
    pub multiple_solutions: bool,
    /// Another optimal vertex, when one could be reached in a single pivot
    pub alternate_values: Option<Vec<f64>>,
    /// Plot data, only for two-variable problems
    pub graph: Option<GraphData>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// An artificial variable stayed positive in the optimal basis
    Infeasible,
    /// The objective can improve without limit
    Unbounded,
    /// The iteration cap was reached before optimality
    NonConvergent,
}

impl SolutionStatus {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolutionStatus::Optimal)
    }
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "optimal"),
            SolutionStatus::Infeasible => write!(f, "infeasible"),
            SolutionStatus::Unbounded => write!(f, "unbounded solution"),
            SolutionStatus::NonConvergent => write!(f, "did not converge (iteration limit)"),
        }
    }
}

/// Snapshot of the tableau after one pivot (or at initialization)
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Iteration {
    /// 1-based position in the trace
    pub id: usize,
    /// Basic variable name per constraint row
    pub basis: Vec<String>,
    /// Objective row, RHS last
    pub objective_row: Vec<f64>,
    /// Constraint rows, RHS last
    pub rows: Vec<Vec<f64>>,
    /// The pivot that produced this tableau; `None` for the initial one
    pub pivot: Option<Pivot>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pivot {
    pub row: usize,
    pub column: usize,
    pub entering: String,
    pub leaving: String,
}

impl Solution {
    /// Basic column names in the final tableau, one per constraint row,
    /// slack, surplus and artificial columns included
    pub fn final_basis(&self) -> &[String] {
        self.iterations.last().map(|it| it.basis.as_slice()).unwrap_or(&[])
    }

    pub fn pivot_count(&self) -> usize {
        self.iterations.iter().filter(|it| it.pivot.is_some()).count()
    }
}
