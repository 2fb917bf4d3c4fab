use tracing::{debug, info, trace};

use crate::geometry::OptimalPoint;
use crate::problem::{Constraint, ConstraintSign, ProblemDescription};
use crate::simplex::Solver;
use crate::solution::Solution;

/// Status of an all-integer branch-and-bound search
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerStatus {
    /// The search tree was exhausted and an incumbent exists
    Optimal,
    /// The search tree was exhausted without an integer point
    Infeasible,
    /// The node cap stopped the search; `best` is the incumbent so far
    NodeLimit,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerSolution {
    pub status: IntegerStatus,
    /// Best all-integer solution found
    pub best: Option<Solution>,
    /// Nodes popped from the search stack
    pub nodes_explored: usize,
}

/// A pending subproblem: its own constraint list plus the parent's relaxed objective
#[derive(Debug, Clone)]
struct BranchNode {
    constraints: Vec<Constraint>,
    bound: Option<f64>,
}

impl Solver {
    /// Solves `problem` with every variable restricted to integers, using
    /// depth-first branch-and-bound on the most fractional variable.
    pub fn solve_integer(&self, problem: &ProblemDescription) -> IntegerSolution {
        let sense = problem.sense;
        let n_vars = problem.num_variables();

        let mut stack = vec![BranchNode {
            constraints: problem.constraints.clone(),
            bound: None,
        }];
        let mut best: Option<Solution> = None;
        let mut best_z = sense.worst();
        let mut root_graph = None;
        let mut nodes = 0;

        while let Some(node) = stack.pop() {
            if nodes >= self.max_nodes {
                stack.push(node);
                break;
            }
            nodes += 1;

            if let Some(bound) = node.bound {
                if !sense.improves(bound, best_z) {
                    trace!(nodes, bound, "pruned by parent bound");
                    continue;
                }
            }

            let subproblem = problem.with_constraints(node.constraints);
            let is_root = nodes == 1;
            let mut relaxed = self.solve_relaxation(&subproblem, is_root && n_vars == 2);
            if is_root {
                root_graph = relaxed.graph.take();
            }

            if !relaxed.status.is_optimal() {
                trace!(nodes, status = %relaxed.status, "pruned subproblem");
                continue;
            }

            let z = relaxed.objective_value;
            if !sense.improves(z, best_z) {
                trace!(nodes, z, best_z, "pruned by bound");
                continue;
            }

            let Some((index, value)) = self.most_fractional(&relaxed.values) else {
                debug!(nodes, z, "new integer incumbent");
                best_z = z;
                best = Some(relaxed);
                continue;
            };

            let floor = value.floor();
            let ceil = value.ceil();
            trace!(nodes, variable = %problem.variables[index], value, "branching");

            let mut down = subproblem.constraints.clone();
            down.push(Constraint::bound(n_vars, index, ConstraintSign::Le, floor));
            let mut up = subproblem.constraints;
            up.push(Constraint::bound(n_vars, index, ConstraintSign::Ge, ceil));

            stack.push(BranchNode {
                constraints: down,
                bound: Some(z),
            });
            stack.push(BranchNode {
                constraints: up,
                bound: Some(z),
            });
        }

        let status = if !stack.is_empty() {
            IntegerStatus::NodeLimit
        } else if best.is_some() {
            IntegerStatus::Optimal
        } else {
            IntegerStatus::Infeasible
        };
        info!(nodes, ?status, "branch and bound finished");

        if let (Some(solution), Some(mut graph)) = (best.as_mut(), root_graph) {
            graph.integer_optimal_point = Some(OptimalPoint {
                x: solution.values[0],
                y: solution.values[1],
                value: solution.objective_value,
            });
            solution.graph = Some(graph);
        }

        IntegerSolution {
            status,
            best,
            nodes_explored: nodes,
        }
    }

    /// Variable furthest from an integer, first on ties; `None` if all are integral
    fn most_fractional(&self, values: &[f64]) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        let mut max_frac = self.feasibility_tolerance;
        for (i, &v) in values.iter().enumerate() {
            let frac = (v - v.round()).abs();
            if frac > max_frac {
                max_frac = frac;
                best = Some((i, v));
            }
        }
        best
    }
}
