use crate::problem::{ConstraintSign, ProblemDescription, Sense};

/// Which auxiliary column carries a constraint's dual information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuxColumn {
    Slack(usize),
    Surplus(usize),
    Artificial(usize),
}

/// Augmented simplex tableau in canonical form.
///
/// Rows `0..m` are constraints, row `m` is the objective row. Columns are laid
/// out as decision variables, slacks, surpluses, artificials, then RHS.
#[derive(Debug, Clone)]
pub(crate) struct Tableau {
    pub data: Vec<Vec<f64>>,
    pub basic_vars: Vec<usize>,
    pub headers: Vec<String>,
    pub n_vars: usize,
    pub artificial_start: usize,
    /// Per constraint: the column shadow prices are read from
    pub aux_columns: Vec<AuxColumn>,
    /// Per constraint: whether the row was negated to make its RHS non-negative
    pub flipped: Vec<bool>,
    pub sense: Sense,
    pub big_m: f64,
}

impl Tableau {
    /// Builds the initial Big-M tableau for `problem`.
    ///
    /// The engine always maximizes; a minimization objective is negated here
    /// and corrected again when values are read back.
    pub fn standard_form(problem: &ProblemDescription, big_m: f64) -> Self {
        let n_vars = problem.num_variables();
        let n_constraints = problem.num_constraints();

        // Normalize signs so every RHS is non-negative
        let rows: Vec<(Vec<f64>, ConstraintSign, f64, bool)> = problem
            .constraints
            .iter()
            .map(|c| {
                if c.rhs < 0.0 {
                    let coefs = c.coefficients.iter().map(|a| -a).collect();
                    (coefs, c.sign.reversed(), -c.rhs, true)
                } else {
                    (c.coefficients.clone(), c.sign, c.rhs, false)
                }
            })
            .collect();

        let mut n_slack = 0;
        let mut n_surplus = 0;
        let mut n_artificial = 0;
        for (_, sign, _, _) in &rows {
            match sign {
                ConstraintSign::Le => n_slack += 1,
                ConstraintSign::Ge => {
                    n_surplus += 1;
                    n_artificial += 1;
                }
                ConstraintSign::Eq => n_artificial += 1,
            }
        }

        let surplus_start = n_vars + n_slack;
        let artificial_start = surplus_start + n_surplus;
        let total_cols = artificial_start + n_artificial + 1; // +1 for RHS
        let rhs_col = total_cols - 1;
        let obj_row = n_constraints;

        let mut headers = problem.variables.clone();
        headers.extend((1..=n_slack).map(|i| format!("S{}", i)));
        headers.extend((1..=n_surplus).map(|i| format!("E{}", i)));
        headers.extend((1..=n_artificial).map(|i| format!("A{}", i)));

        let mut data = vec![vec![0.0; total_cols]; n_constraints + 1];
        let mut basic_vars = vec![0; n_constraints];
        let mut aux_columns = Vec::with_capacity(n_constraints);
        let mut flipped = Vec::with_capacity(n_constraints);
        let mut artificial_rows = Vec::with_capacity(n_artificial);

        let mut slack_idx = n_vars;
        let mut surplus_idx = surplus_start;
        let mut artificial_idx = artificial_start;

        for (i, (coefs, sign, rhs, was_flipped)) in rows.into_iter().enumerate() {
            for (j, coef) in coefs.into_iter().enumerate().take(n_vars) {
                data[i][j] = coef;
            }
            data[i][rhs_col] = rhs;
            flipped.push(was_flipped);

            match sign {
                ConstraintSign::Le => {
                    data[i][slack_idx] = 1.0;
                    basic_vars[i] = slack_idx;
                    aux_columns.push(AuxColumn::Slack(slack_idx));
                    slack_idx += 1;
                }
                ConstraintSign::Ge => {
                    data[i][surplus_idx] = -1.0;
                    data[i][artificial_idx] = 1.0;
                    basic_vars[i] = artificial_idx;
                    aux_columns.push(AuxColumn::Surplus(surplus_idx));
                    artificial_rows.push((artificial_idx, i));
                    surplus_idx += 1;
                    artificial_idx += 1;
                }
                ConstraintSign::Eq => {
                    data[i][artificial_idx] = 1.0;
                    basic_vars[i] = artificial_idx;
                    aux_columns.push(AuxColumn::Artificial(artificial_idx));
                    artificial_rows.push((artificial_idx, i));
                    artificial_idx += 1;
                }
            }
        }

        // Objective row stores Z - c.x = 0, so the coefficients are -c
        for (j, &coef) in problem.objective.iter().enumerate().take(n_vars) {
            let internal = match problem.sense {
                Sense::Maximize => coef,
                Sense::Minimize => -coef,
            };
            data[obj_row][j] = -internal;
        }

        // Big-M: penalize each artificial, then eliminate it from the objective
        // row so its reduced cost is consistent with the basis
        for (col, row) in artificial_rows {
            data[obj_row][col] += big_m;
            for j in 0..total_cols {
                let delta = big_m * data[row][j];
                data[obj_row][j] -= delta;
            }
        }

        Self {
            data,
            basic_vars,
            headers,
            n_vars,
            artificial_start,
            aux_columns,
            flipped,
            sense: problem.sense,
            big_m,
        }
    }

    pub fn num_constraints(&self) -> usize {
        self.basic_vars.len()
    }

    pub fn obj_row(&self) -> usize {
        self.data.len() - 1
    }

    pub fn rhs_col(&self) -> usize {
        self.data[0].len() - 1
    }

    pub fn objective_row(&self) -> &[f64] {
        &self.data[self.obj_row()]
    }

    pub fn rhs(&self, row: usize) -> f64 {
        self.data[row][self.rhs_col()]
    }

    pub fn is_artificial(&self, col: usize) -> bool {
        col >= self.artificial_start && col < self.rhs_col()
    }

    pub fn is_basic(&self, col: usize) -> bool {
        self.basic_vars.contains(&col)
    }

    /// Most negative objective-row entry below `-tolerance`, first on ties
    pub fn entering_column(&self, tolerance: f64) -> Option<usize> {
        let obj = self.objective_row();
        let mut min_val = -tolerance;
        let mut min_col = None;
        for (j, &val) in obj.iter().enumerate().take(self.rhs_col()) {
            if val < min_val {
                min_val = val;
                min_col = Some(j);
            }
        }
        min_col
    }

    /// Minimum-ratio row for `col` among strictly positive entries, first on ties
    pub fn leaving_row(&self, col: usize, tolerance: f64) -> Option<usize> {
        let rhs_col = self.rhs_col();
        let mut min_ratio = f64::INFINITY;
        let mut min_row = None;
        for i in 0..self.num_constraints() {
            let val = self.data[i][col];
            if val > tolerance {
                let ratio = self.data[i][rhs_col] / val;
                if ratio < min_ratio {
                    min_ratio = ratio;
                    min_row = Some(i);
                }
            }
        }
        min_row
    }

    pub fn pivot(&mut self, row: usize, col: usize) {
        let n_rows = self.data.len();
        let n_cols = self.data[0].len();

        self.basic_vars[row] = col;

        let pivot_val = self.data[row][col];
        for j in 0..n_cols {
            self.data[row][j] /= pivot_val;
        }

        for i in 0..n_rows {
            if i != row {
                let factor = self.data[i][col];
                if factor == 0.0 {
                    continue;
                }
                for j in 0..n_cols {
                    self.data[i][j] -= factor * self.data[row][j];
                }
            }
        }
    }

    /// Decision variable values: basic columns read their row's RHS, others are 0
    pub fn variable_values(&self) -> Vec<f64> {
        let mut values = vec![0.0; self.n_vars];
        for (i, &basic) in self.basic_vars.iter().enumerate() {
            if basic < self.n_vars {
                values[basic] = self.rhs(i);
            }
        }
        values
    }

    pub fn basis_names(&self) -> Vec<String> {
        self.basic_vars.iter().map(|&b| self.headers[b].clone()).collect()
    }
}
