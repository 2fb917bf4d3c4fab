use thiserror::Error;
use tracing::{debug, info, trace};

use crate::analysis::PostOptimalAnalyzer;
use crate::geometry;
use crate::problem::ProblemDescription;
use crate::solution::{Iteration, Pivot, Solution, SolutionStatus};
use crate::tableau::Tableau;

/// Default Big-M penalty for artificial variables
pub const DEFAULT_BIG_M: f64 = 100_000.0;

/// Terminal failures of the pivoting loop
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimplexError {
    #[error("unbounded solution: no row limits entering column {column}")]
    Unbounded { column: String },
    #[error("did not converge after {iterations} iterations")]
    NonConvergent { iterations: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineState {
    Iterating,
    Optimal,
    Unbounded,
    NonConvergent,
}

/// Runs Big-M simplex pivots over one tableau and records the trace.
#[derive(Debug, Clone)]
pub(crate) struct SimplexEngine {
    tableau: Tableau,
    iterations: Vec<Iteration>,
    state: EngineState,
}

impl SimplexEngine {
    pub fn new(tableau: Tableau) -> Self {
        let mut engine = Self {
            tableau,
            iterations: Vec::new(),
            state: EngineState::Iterating,
        };
        engine.record(None);
        engine
    }

    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    pub fn into_parts(self) -> (Tableau, Vec<Iteration>) {
        (self.tableau, self.iterations)
    }

    /// Pivots until optimal, unbounded, or `max_iterations` pivots have been spent.
    pub fn run(&mut self, max_iterations: usize, tolerance: f64) -> Result<(), SimplexError> {
        let mut pivots = 0;
        while self.state == EngineState::Iterating {
            let Some(col) = self.tableau.entering_column(tolerance) else {
                self.state = EngineState::Optimal;
                debug!(pivots, "simplex reached optimality");
                break;
            };

            if pivots >= max_iterations {
                self.state = EngineState::NonConvergent;
                debug!(pivots, "simplex iteration cap reached");
                return Err(SimplexError::NonConvergent { iterations: pivots });
            }

            let Some(row) = self.tableau.leaving_row(col, tolerance) else {
                self.state = EngineState::Unbounded;
                let column = self.tableau.headers[col].clone();
                debug!(%column, "simplex found an unbounded direction");
                return Err(SimplexError::Unbounded { column });
            };

            let leaving = self.tableau.headers[self.tableau.basic_vars[row]].clone();
            let entering = self.tableau.headers[col].clone();
            debug!(
                iteration = pivots + 1,
                %entering,
                %leaving,
                element = self.tableau.data[row][col],
                "pivot"
            );

            self.tableau.pivot(row, col);
            self.record(Some(Pivot {
                row,
                column: col,
                entering,
                leaving,
            }));
            pivots += 1;
        }
        Ok(())
    }

    fn record(&mut self, pivot: Option<Pivot>) {
        let obj_row = self.tableau.obj_row();
        let iteration = Iteration {
            id: self.iterations.len() + 1,
            basis: self.tableau.basis_names(),
            objective_row: self.tableau.data[obj_row].clone(),
            rows: self.tableau.data[..obj_row].to_vec(),
            pivot,
        };
        trace!(id = iteration.id, basis = ?iteration.basis, z = iteration.objective_row.last().copied(), "tableau");
        self.iterations.push(iteration);
    }
}

/// Big-M simplex solver for linear programming problems
#[derive(Debug, Clone)]
pub struct Solver {
    /// Penalty on artificial variables
    pub(crate) big_m: f64,
    /// Maximum pivots per simplex run
    pub(crate) max_iterations: usize,
    /// Maximum branch-and-bound node expansions
    pub(crate) max_nodes: usize,
    /// Tolerance for optimality and ratio tests
    pub(crate) tolerance: f64,
    /// Tolerance for feasibility, integrality and zero reduced costs
    pub(crate) feasibility_tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            big_m: DEFAULT_BIG_M,
            max_iterations: 100,
            max_nodes: 5000,
            tolerance: 1e-9,
            feasibility_tolerance: 1e-5,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_big_m(mut self, big_m: f64) -> Self {
        self.big_m = big_m;
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_max_nodes(mut self, max: usize) -> Self {
        self.max_nodes = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_feasibility_tolerance(mut self, tol: f64) -> Self {
        self.feasibility_tolerance = tol;
        self
    }

    /// Solve the LP problem with the Big-M simplex method.
    ///
    /// Unbounded, infeasible and non-convergent runs are reported through
    /// `Solution::status`; the rest of the solution reflects the tableau at
    /// termination.
    pub fn solve(&self, problem: &ProblemDescription) -> Solution {
        let solution = self.solve_relaxation(problem, true);
        info!(
            status = %solution.status,
            objective = solution.objective_value,
            pivots = solution.pivot_count(),
            "simplex finished"
        );
        solution
    }

    pub(crate) fn solve_relaxation(&self, problem: &ProblemDescription, project: bool) -> Solution {
        let tableau = Tableau::standard_form(problem, self.big_m);
        let mut engine = SimplexEngine::new(tableau);
        let outcome = engine.run(self.max_iterations, self.tolerance);

        let analyzer = PostOptimalAnalyzer::new(engine.tableau(), self.tolerance, self.feasibility_tolerance);
        let status = match outcome {
            Ok(()) if analyzer.has_positive_artificial() => SolutionStatus::Infeasible,
            Ok(()) => SolutionStatus::Optimal,
            Err(SimplexError::Unbounded { .. }) => SolutionStatus::Unbounded,
            Err(SimplexError::NonConvergent { .. }) => SolutionStatus::NonConvergent,
        };

        let objective_value = analyzer.objective_value();
        let values = analyzer.variable_values();
        let shadow_prices = analyzer.shadow_prices();
        let alternate = if status.is_optimal() {
            analyzer.alternate_optimum()
        } else {
            None
        };
        if let Some(alt) = &alternate {
            debug!(candidates = alt.columns.len(), found = alt.values.is_some(), "alternate optima");
        }

        let (tableau, iterations) = engine.into_parts();
        let mut solution = Solution {
            status,
            objective_value,
            values,
            shadow_prices,
            columns: tableau.headers,
            iterations,
            multiple_solutions: alternate.is_some(),
            alternate_values: alternate.and_then(|alt| alt.values),
            graph: None,
        };

        if project && problem.num_variables() == 2 {
            solution.graph = Some(geometry::project(problem, &solution));
        }
        solution
    }
}
