//! Dual problem derivation.
//!
//! The primal's decision variables are assumed non-negative; the dual
//! constraint signs below are only correct under that assumption.

use std::fmt;

use crate::problem::{Constraint, ConstraintSign, ProblemDescription, Sense, write_linear};

/// Sign restriction on a dual variable
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignRestriction {
    NonNegative,
    NonPositive,
    Free,
}

impl fmt::Display for SignRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignRestriction::NonNegative => write!(f, ">= 0"),
            SignRestriction::NonPositive => write!(f, "<= 0"),
            SignRestriction::Free => write!(f, "free"),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DualVariable {
    pub name: String,
    pub restriction: SignRestriction,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DualProblem {
    pub sense: Sense,
    /// One per primal constraint
    pub variables: Vec<DualVariable>,
    /// One per primal variable
    pub constraints: Vec<Constraint>,
    /// The primal RHS vector
    pub objective: Vec<f64>,
}

impl DualProblem {
    pub fn from_primal(primal: &ProblemDescription) -> Self {
        let variables = primal
            .constraints
            .iter()
            .enumerate()
            .map(|(i, c)| DualVariable {
                name: format!("y{}", i + 1),
                restriction: restriction_for(primal.sense, c.sign),
            })
            .collect();

        let sign = match primal.sense {
            Sense::Maximize => ConstraintSign::Ge,
            Sense::Minimize => ConstraintSign::Le,
        };
        let constraints = (0..primal.num_variables())
            .map(|j| {
                let coefficients = primal.constraints.iter().map(|c| c.coefficients[j]).collect();
                Constraint::new(coefficients, sign, primal.objective[j])
            })
            .collect();

        Self {
            sense: primal.sense.flipped(),
            variables,
            constraints,
            objective: primal.constraints.iter().map(|c| c.rhs).collect(),
        }
    }

    pub fn variable_names(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name.clone()).collect()
    }

    /// Dual objective at the given dual values
    pub fn objective_value(&self, dual_values: &[f64]) -> f64 {
        self.objective.iter().zip(dual_values).map(|(b, y)| b * y).sum()
    }

    /// Whether the dual objective at `shadow_prices` matches the primal optimum
    pub fn verify_strong_duality(&self, primal_objective: f64, shadow_prices: &[f64], tolerance: f64) -> bool {
        let dual_objective = self.objective_value(shadow_prices);
        let scale = primal_objective.abs().max(1.0);
        (dual_objective - primal_objective).abs() <= tolerance * scale
    }
}

fn restriction_for(sense: Sense, sign: ConstraintSign) -> SignRestriction {
    match (sense, sign) {
        (_, ConstraintSign::Eq) => SignRestriction::Free,
        (Sense::Maximize, ConstraintSign::Le) | (Sense::Minimize, ConstraintSign::Ge) => SignRestriction::NonNegative,
        (Sense::Maximize, ConstraintSign::Ge) | (Sense::Minimize, ConstraintSign::Le) => SignRestriction::NonPositive,
    }
}

impl ProblemDescription {
    pub fn dual(&self) -> DualProblem {
        DualProblem::from_primal(self)
    }
}

impl fmt::Display for DualProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.variable_names();
        write!(f, "{} W = ", self.sense)?;
        write_linear(f, &self.objective, &names)?;
        writeln!(f)?;
        writeln!(f, "subject to")?;
        for c in &self.constraints {
            writeln!(f, "  {}", c.display_with(&names))?;
        }
        let restrictions: Vec<String> = self
            .variables
            .iter()
            .map(|v| format!("{} {}", v.name, v.restriction))
            .collect();
        write!(f, "  {}", restrictions.join(", "))
    }
}
