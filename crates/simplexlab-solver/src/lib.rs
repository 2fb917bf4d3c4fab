mod analysis;
mod branch;
mod dual;
mod geometry;
mod linear_system;
mod problem;
mod simplex;
mod solution;
mod tableau;

pub use branch::{IntegerSolution, IntegerStatus};
pub use dual::{DualProblem, DualVariable, SignRestriction};
pub use geometry::{GraphData, LineSegment, OptimalPoint, PlotPoint, feasible_region, project};
pub use linear_system::{LinearSystemError, solve_linear_system};
pub use problem::{Constraint, ConstraintSign, ProblemDescription, ProblemError, Sense};
pub use simplex::{DEFAULT_BIG_M, SimplexError, Solver};
pub use solution::{Iteration, Pivot, Solution, SolutionStatus};
