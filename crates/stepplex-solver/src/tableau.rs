use crate::problem::{Problem, Relation, Sense};

/// Simplex tableau in canonical form.
///
/// Row 0 is the objective row, rows `1..=m` the constraint rows, the last
/// column the RHS. Columns are the original variables `x1..xn`, then one
/// slack/surplus column `s*` per inequality, then artificial columns `a*`.
/// The objective row is kept in the minimization direction regardless of the
/// problem sense, so its RHS cell tracks `-z` of the internal minimization.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    matrix: Vec<Vec<f64>>,
    basis: Vec<usize>,
    labels: Vec<String>,
    num_vars: usize,
    num_slack: usize,
    num_artificial: usize,
    big_m: f64,
    sense: Sense,
}

impl Tableau {
    /// Build the initial canonical tableau for a validated problem.
    ///
    /// Rows with negative RHS are negated (flipping `<=`/`>=`); every `<=`
    /// gains a slack, every `>=` a surplus plus a Big-M artificial, every `=`
    /// an artificial. The slack or artificial of each row forms the initial
    /// basis, and the objective row is reduced so basic artificial columns
    /// read zero.
    pub fn build(problem: &Problem, big_m: f64) -> Tableau {
        let num_vars = problem.num_variables();
        let m = problem.num_constraints();

        // Restore non-negative RHS before any auxiliary column is assigned.
        let mut rows: Vec<(Vec<f64>, Relation, f64)> = Vec::with_capacity(m);
        for constraint in &problem.constraints {
            let mut coefficients = constraint.coefficients.clone();
            let mut relation = constraint.relation;
            let mut rhs = constraint.rhs;
            if rhs < 0.0 {
                for c in &mut coefficients {
                    *c = -*c;
                }
                rhs = -rhs;
                relation = match relation {
                    Relation::Le => Relation::Ge,
                    Relation::Ge => Relation::Le,
                    Relation::Eq => Relation::Eq,
                };
            }
            rows.push((coefficients, relation, rhs));
        }

        // Count auxiliary columns (surplus columns count as slack).
        let mut num_slack = 0;
        let mut num_artificial = 0;
        for (_, relation, _) in &rows {
            match relation {
                Relation::Le => num_slack += 1,
                Relation::Ge => {
                    num_slack += 1;
                    num_artificial += 1;
                }
                Relation::Eq => num_artificial += 1,
            }
        }

        let total = num_vars + num_slack + num_artificial;
        let rhs_col = total;
        let mut matrix = vec![vec![0.0; total + 1]; m + 1];
        let mut basis = vec![0usize; m];

        let mut labels = Vec::with_capacity(total);
        for j in 1..=num_vars {
            labels.push(format!("x{}", j));
        }
        for j in 1..=num_slack {
            labels.push(format!("s{}", j));
        }
        for j in 1..=num_artificial {
            labels.push(format!("a{}", j));
        }

        // Constraint rows; each gets exactly one basic auxiliary column.
        let mut slack_col = num_vars;
        let mut artificial_col = num_vars + num_slack;
        for (i, (coefficients, relation, rhs)) in rows.into_iter().enumerate() {
            let row = &mut matrix[i + 1];
            for (j, &c) in coefficients.iter().enumerate() {
                row[j] = c;
            }
            row[rhs_col] = rhs;
            match relation {
                Relation::Le => {
                    row[slack_col] = 1.0;
                    basis[i] = slack_col;
                    slack_col += 1;
                }
                Relation::Ge => {
                    row[slack_col] = -1.0; // surplus
                    slack_col += 1;
                    row[artificial_col] = 1.0;
                    basis[i] = artificial_col;
                    artificial_col += 1;
                }
                Relation::Eq => {
                    row[artificial_col] = 1.0;
                    basis[i] = artificial_col;
                    artificial_col += 1;
                }
            }
        }

        // Objective row in the internal minimization direction.
        for j in 0..num_vars {
            matrix[0][j] = match problem.sense {
                Sense::Maximize => -problem.objective[j],
                Sense::Minimize => problem.objective[j],
            };
        }
        for j in (num_vars + num_slack)..total {
            matrix[0][j] = big_m;
        }

        // Reduce: basic artificial columns must read zero in the objective row.
        for i in 0..m {
            if basis[i] >= num_vars + num_slack {
                for j in 0..=total {
                    matrix[0][j] -= big_m * matrix[i + 1][j];
                }
            }
        }

        Tableau {
            matrix,
            basis,
            labels,
            num_vars,
            num_slack,
            num_artificial,
            big_m,
            sense: problem.sense,
        }
    }

    /// Pivot on constraint row `row` and column `col`: normalize the pivot
    /// row, eliminate `col` from every other row (objective row included),
    /// and make `col` basic in `row`. The pivot element must be non-zero.
    pub fn pivot(&mut self, row: usize, col: usize) {
        let pivot_row = row + 1;
        let cols = self.num_cols();

        let pivot_value = self.matrix[pivot_row][col];
        for j in 0..cols {
            self.matrix[pivot_row][j] /= pivot_value;
        }

        for r in 0..self.matrix.len() {
            if r != pivot_row {
                let factor = self.matrix[r][col];
                if factor != 0.0 {
                    for j in 0..cols {
                        self.matrix[r][j] -= factor * self.matrix[pivot_row][j];
                    }
                }
            }
        }

        self.basis[row] = col;
    }

    /// Rows including the objective row.
    pub fn num_rows(&self) -> usize {
        self.matrix.len()
    }

    /// Columns including the RHS column.
    pub fn num_cols(&self) -> usize {
        self.matrix[0].len()
    }

    pub fn num_constraints(&self) -> usize {
        self.basis.len()
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn num_slack(&self) -> usize {
        self.num_slack
    }

    pub fn num_artificial(&self) -> usize {
        self.num_artificial
    }

    pub fn big_m(&self) -> f64 {
        self.big_m
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn rhs_col(&self) -> usize {
        self.num_cols() - 1
    }

    /// Column labels, RHS excluded.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label(&self, col: usize) -> &str {
        &self.labels[col]
    }

    /// Basic column index per constraint row.
    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    /// Constraint row `i` (in `0..m`) including its RHS cell.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.matrix[i + 1]
    }

    pub fn rhs(&self, i: usize) -> f64 {
        self.matrix[i + 1][self.rhs_col()]
    }

    /// The full objective row including its RHS cell.
    pub fn objective_row(&self) -> &[f64] {
        &self.matrix[0]
    }

    pub fn is_artificial(&self, col: usize) -> bool {
        col >= self.num_vars + self.num_slack
    }

    /// Current objective value, sign-corrected back to the problem sense.
    pub fn objective_value(&self) -> f64 {
        let minimized = -self.matrix[0][self.rhs_col()];
        match self.sense {
            Sense::Minimize => minimized,
            Sense::Maximize => -minimized,
        }
    }

    /// Values of the original variables in the current basic solution.
    pub fn decision_values(&self) -> Vec<f64> {
        let mut values = vec![0.0; self.num_vars];
        for (i, &col) in self.basis.iter().enumerate() {
            if col < self.num_vars {
                values[col] = self.rhs(i);
            }
        }
        values
    }

    /// First constraint row whose RHS fell below `-tolerance`, if any.
    /// A hit means a pivot corrupted the basic feasible form.
    pub fn feasibility_violation(&self, tolerance: f64) -> Option<(usize, f64)> {
        let rhs_col = self.rhs_col();
        for i in 0..self.basis.len() {
            let value = self.matrix[i + 1][rhs_col];
            if value < -tolerance {
                return Some((i, value));
            }
        }
        None
    }

    /// Whether every basis column reads 1 in its own row and 0 in every
    /// other constraint row.
    pub fn is_canonical(&self, tolerance: f64) -> bool {
        for (i, &col) in self.basis.iter().enumerate() {
            for r in 0..self.basis.len() {
                let expected = if r == i { 1.0 } else { 0.0 };
                if (self.matrix[r + 1][col] - expected).abs() > tolerance {
                    return false;
                }
            }
        }
        true
    }

    /// First basic artificial variable with value above `tolerance`, if any.
    pub fn artificial_in_basis(&self, tolerance: f64) -> Option<(usize, f64)> {
        for (i, &col) in self.basis.iter().enumerate() {
            if self.is_artificial(col) {
                let value = self.rhs(i);
                if value > tolerance {
                    return Some((i, value));
                }
            }
        }
        None
    }
}
