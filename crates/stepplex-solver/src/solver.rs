use log::{debug, info, warn};

use crate::error::SolveError;
use crate::problem::{Problem, Sense};
use crate::solution::{Solution, Verdict};
use crate::tableau::Tableau;
use crate::trace::{PivotInfo, Trace};

/// Tableau simplex driver.
///
/// Equality and `>=` rows are handled with Big-M artificial variables, so a
/// single pivot loop covers every problem shape. Each solve records the full
/// tableau history in a [`Trace`].
pub struct Solver {
    /// Penalty cost attached to artificial variables.
    big_m: f64,
    /// Tolerance for floating point comparisons.
    tolerance: f64,
    /// Pivot cap; `None` selects `50 * (variables + constraints)`.
    iteration_cap: Option<usize>,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            big_m: 1e6,
            tolerance: 1e-9,
            iteration_cap: None,
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

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_iteration_cap(mut self, cap: usize) -> Self {
        self.iteration_cap = Some(cap);
        self
    }

    /// The pivot cap that applies to `problem`: the configured value, or
    /// `50 * (variables + constraints)` when none was set.
    pub fn effective_cap(&self, problem: &Problem) -> usize {
        self.iteration_cap
            .unwrap_or(50 * (problem.num_variables() + problem.num_constraints()))
    }

    /// Build the initial canonical tableau without iterating.
    pub fn canonicalize(&self, problem: &Problem) -> Result<Tableau, SolveError> {
        problem.validate()?;
        Ok(Tableau::build(problem, self.big_m))
    }

    /// Run the simplex method to a terminal verdict.
    ///
    /// `Unbounded`, `Infeasible` and `CycleLimit` are verdicts, not errors;
    /// `Err` is reserved for malformed input and numeric breakdown.
    pub fn solve(&self, problem: &Problem) -> Result<Solution, SolveError> {
        problem.validate()?;

        let cap = self.effective_cap(problem);
        let mut tableau = Tableau::build(problem, self.big_m);
        let mut trace = Trace::new();
        trace.push(&tableau, None);

        let mut iterations = 0;
        let verdict = loop {
            let Some(entering) = self.select_entering(&tableau) else {
                // No improving column. Optimal, unless an artificial variable
                // is still carrying value.
                if let Some((row, value)) = tableau.artificial_in_basis(self.tolerance) {
                    warn!(
                        "optimal form reached with {} basic at {:.6}; problem is infeasible",
                        tableau.label(tableau.basis()[row]),
                        value
                    );
                    break Verdict::Infeasible;
                }
                break Verdict::Optimal;
            };

            let Some(row) = self.select_leaving(&tableau, entering) else {
                break Verdict::Unbounded;
            };

            // The next pivot would exceed the cap. Checked after the column
            // and row searches so a solve finishing at exactly the cap still
            // reports its true verdict.
            if iterations == cap {
                warn!(
                    "iteration cap of {} reached without a terminal verdict (objective {:.6}, basis {:?})",
                    cap,
                    tableau.objective_value(),
                    tableau.basis()
                );
                break Verdict::CycleLimit;
            }

            let leaving = tableau.basis()[row];
            let element = tableau.row(row)[entering];
            tableau.pivot(row, entering);
            iterations += 1;

            if let Some((bad_row, value)) = tableau.feasibility_violation(self.tolerance) {
                return Err(SolveError::NumericInstability {
                    iteration: iterations,
                    row: bad_row,
                    value,
                });
            }

            debug!(
                "pivot {}: {} enters, {} leaves (row {}, element {:.6})",
                iterations,
                tableau.label(entering),
                tableau.label(leaving),
                row,
                element
            );
            trace.push(
                &tableau,
                Some(PivotInfo {
                    entering,
                    leaving,
                    row,
                    element,
                }),
            );
        };

        info!("{} after {} pivots", verdict, iterations);

        let (values, objective) = match verdict {
            Verdict::Optimal | Verdict::CycleLimit => {
                (tableau.decision_values(), tableau.objective_value())
            }
            Verdict::Unbounded => (
                Vec::new(),
                match problem.sense {
                    Sense::Maximize => f64::INFINITY,
                    Sense::Minimize => f64::NEG_INFINITY,
                },
            ),
            Verdict::Infeasible => (
                Vec::new(),
                match problem.sense {
                    Sense::Maximize => f64::NEG_INFINITY,
                    Sense::Minimize => f64::INFINITY,
                },
            ),
        };

        Ok(Solution {
            verdict,
            values,
            objective,
            iterations,
            trace,
        })
    }

    /// Entering column: most negative objective-row entry below `-tolerance`.
    /// Ties go to the lowest column index.
    pub fn select_entering(&self, tableau: &Tableau) -> Option<usize> {
        let objective = tableau.objective_row();
        let mut best = -self.tolerance;
        let mut best_col = None;

        for j in 0..tableau.rhs_col() {
            if objective[j] < best {
                best = objective[j];
                best_col = Some(j);
            }
        }

        best_col
    }

    /// Leaving row: minimum ratio `rhs / coefficient` over rows whose
    /// coefficient in `entering` exceeds the tolerance. Ratio ties go to the
    /// row whose basis column index is lowest.
    pub fn select_leaving(&self, tableau: &Tableau, entering: usize) -> Option<usize> {
        let mut best_ratio = f64::INFINITY;
        let mut best_row: Option<usize> = None;

        for i in 0..tableau.num_constraints() {
            let coeff = tableau.row(i)[entering];
            if coeff <= self.tolerance {
                continue;
            }
            let ratio = tableau.rhs(i) / coeff;
            let better = match best_row {
                None => true,
                Some(current) => {
                    if ratio < best_ratio - self.tolerance {
                        true
                    } else if (ratio - best_ratio).abs() <= self.tolerance {
                        tableau.basis()[i] < tableau.basis()[current]
                    } else {
                        false
                    }
                }
            };
            if better {
                best_ratio = best_ratio.min(ratio);
                best_row = Some(i);
            }
        }

        best_row
    }
}
