use std::fmt;

use thiserror::Error;

/// Represents a linear programming problem
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemDescription {
    /// Whether to maximize or minimize
    pub sense: Sense,
    /// Variable names
    pub variables: Vec<String>,
    /// Objective function coefficients, one per variable
    pub objective: Vec<f64>,
    /// Constraints, in order
    pub constraints: Vec<Constraint>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    #[cfg_attr(feature = "serde", serde(alias = "max"))]
    Maximize,
    #[cfg_attr(feature = "serde", serde(alias = "min"))]
    Minimize,
}

impl Sense {
    pub fn flipped(self) -> Self {
        match self {
            Sense::Maximize => Sense::Minimize,
            Sense::Minimize => Sense::Maximize,
        }
    }

    /// Whether `candidate` is strictly better than `incumbent` in this direction
    pub fn improves(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Sense::Maximize => candidate > incumbent,
            Sense::Minimize => candidate < incumbent,
        }
    }

    /// The worst possible objective value, used to seed incumbents
    pub fn worst(self) -> f64 {
        match self {
            Sense::Maximize => f64::NEG_INFINITY,
            Sense::Minimize => f64::INFINITY,
        }
    }
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sense::Maximize => write!(f, "max"),
            Sense::Minimize => write!(f, "min"),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison operator
    pub sign: ConstraintSign,
    /// Right-hand side value
    pub rhs: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSign {
    /// Less than or equal (<=)
    #[cfg_attr(feature = "serde", serde(rename = "<="))]
    Le,
    /// Greater than or equal (>=)
    #[cfg_attr(feature = "serde", serde(rename = ">="))]
    Ge,
    /// Equal (=)
    #[cfg_attr(feature = "serde", serde(rename = "="))]
    Eq,
}

impl ConstraintSign {
    /// The sign obtained by multiplying both sides by -1
    pub fn reversed(self) -> Self {
        match self {
            ConstraintSign::Le => ConstraintSign::Ge,
            ConstraintSign::Ge => ConstraintSign::Le,
            ConstraintSign::Eq => ConstraintSign::Eq,
        }
    }

    /// Checks `lhs <sign> rhs` with `tolerance` slack
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            ConstraintSign::Le => lhs <= rhs + tolerance,
            ConstraintSign::Ge => lhs >= rhs - tolerance,
            ConstraintSign::Eq => (lhs - rhs).abs() < tolerance,
        }
    }
}

impl fmt::Display for ConstraintSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintSign::Le => write!(f, "<="),
            ConstraintSign::Ge => write!(f, ">="),
            ConstraintSign::Eq => write!(f, "="),
        }
    }
}

impl Constraint {
    pub fn new(coefficients: Vec<f64>, sign: ConstraintSign, rhs: f64) -> Self {
        Self { coefficients, sign, rhs }
    }

    /// A single-variable bound `x_index <sign> rhs` over `n_vars` variables
    pub fn bound(n_vars: usize, index: usize, sign: ConstraintSign, rhs: f64) -> Self {
        let mut coefficients = vec![0.0; n_vars];
        coefficients[index] = 1.0;
        Self { coefficients, sign, rhs }
    }

    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.coefficients.iter().zip(values).map(|(a, x)| a * x).sum()
    }

    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        self.sign.holds(self.lhs(values), self.rhs, tolerance)
    }

    /// Renders the constraint against the given variable names
    pub fn display_with<'a>(&'a self, names: &'a [String]) -> impl fmt::Display + 'a {
        ConstraintDisplay { constraint: self, names }
    }
}

struct ConstraintDisplay<'a> {
    constraint: &'a Constraint,
    names: &'a [String],
}

impl fmt::Display for ConstraintDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_linear(f, &self.constraint.coefficients, self.names)?;
        write!(f, " {} {}", self.constraint.sign, self.constraint.rhs)
    }
}

/// Writes `3x1 + 5x2 - x3`, skipping zero terms
pub(crate) fn write_linear(f: &mut fmt::Formatter<'_>, coefficients: &[f64], names: &[String]) -> fmt::Result {
    let mut first = true;
    for (coef, name) in coefficients.iter().zip(names) {
        if *coef == 0.0 {
            continue;
        }
        let magnitude = coef.abs();
        if first {
            if *coef < 0.0 {
                write!(f, "-")?;
            }
        } else if *coef < 0.0 {
            write!(f, " - ")?;
        } else {
            write!(f, " + ")?;
        }
        if magnitude == 1.0 {
            write!(f, "{}", name)?;
        } else {
            write!(f, "{}{}", magnitude, name)?;
        }
        first = false;
    }
    if first {
        write!(f, "0")?;
    }
    Ok(())
}

/// Malformed problem descriptions, caught at the boundary before solving
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    #[error("problem has no variables")]
    NoVariables,
    #[error("objective has {found} coefficients, expected {expected}")]
    ObjectiveLength { expected: usize, found: usize },
    #[error("constraint {index} has {found} coefficients, expected {expected}")]
    ConstraintLength { index: usize, expected: usize, found: usize },
    #[error("non-finite value in {0}")]
    NonFinite(String),
}

impl ProblemDescription {
    pub fn new(sense: Sense, variables: Vec<String>) -> Self {
        let n = variables.len();
        Self {
            sense,
            variables,
            objective: vec![0.0; n],
            constraints: Vec::new(),
        }
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>) {
        self.objective = coefficients;
    }

    pub fn add_constraint(&mut self, coefficients: Vec<f64>, sign: ConstraintSign, rhs: f64) {
        self.constraints.push(Constraint::new(coefficients, sign, rhs));
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Same problem over a different constraint list
    pub fn with_constraints(&self, constraints: Vec<Constraint>) -> Self {
        Self {
            sense: self.sense,
            variables: self.variables.clone(),
            objective: self.objective.clone(),
            constraints,
        }
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.iter().zip(values).map(|(c, x)| c * x).sum()
    }

    /// Checks the length and finiteness invariants the engine assumes.
    pub fn validate(&self) -> Result<(), ProblemError> {
        let n = self.num_variables();
        if n == 0 {
            return Err(ProblemError::NoVariables);
        }
        if self.objective.len() != n {
            return Err(ProblemError::ObjectiveLength {
                expected: n,
                found: self.objective.len(),
            });
        }
        if self.objective.iter().any(|c| !c.is_finite()) {
            return Err(ProblemError::NonFinite("objective".to_string()));
        }
        for (index, c) in self.constraints.iter().enumerate() {
            if c.coefficients.len() != n {
                return Err(ProblemError::ConstraintLength {
                    index,
                    expected: n,
                    found: c.coefficients.len(),
                });
            }
            if !c.rhs.is_finite() || c.coefficients.iter().any(|a| !a.is_finite()) {
                return Err(ProblemError::NonFinite(format!("constraint {}", index)));
            }
        }
        Ok(())
    }
}

impl fmt::Display for ProblemDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Z = ", self.sense)?;
        write_linear(f, &self.objective, &self.variables)?;
        writeln!(f)?;
        writeln!(f, "subject to")?;
        for c in &self.constraints {
            writeln!(f, "  {}", c.display_with(&self.variables))?;
        }
        write!(f, "  {} >= 0", self.variables.join(", "))
    }
}
