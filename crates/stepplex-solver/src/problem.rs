use std::fmt;

use crate::error::ProblemError;

/// Optimization direction of the objective.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Maximize,
    Minimize,
}

/// Comparison relation of a constraint.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

/// One linear constraint `coefficients . x  relation  rhs`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison relation
    pub relation: Relation,
    /// Right-hand side value (may be negative; canonicalization negates the row)
    pub rhs: f64,
}

/// A linear programming problem over non-negative variables.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    /// Objective function coefficients
    pub objective: Vec<f64>,
    /// Whether to maximize or minimize
    pub sense: Sense,
    /// Constraints, in statement order
    pub constraints: Vec<Constraint>,
}

impl Problem {
    pub fn new(sense: Sense, objective: Vec<f64>) -> Self {
        Self {
            objective,
            sense,
            constraints: Vec::new(),
        }
    }

    pub fn add_constraint(&mut self, coefficients: Vec<f64>, relation: Relation, rhs: f64) {
        self.constraints.push(Constraint {
            coefficients,
            relation,
            rhs,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Check the structural rules the engine relies on: at least one variable
    /// and constraint, matching coefficient counts, finite numbers.
    pub fn validate(&self) -> Result<(), ProblemError> {
        if self.objective.is_empty() {
            return Err(ProblemError::NoVariables);
        }
        if self.constraints.is_empty() {
            return Err(ProblemError::NoConstraints);
        }
        if let Some(index) = self.objective.iter().position(|c| !c.is_finite()) {
            return Err(ProblemError::NonFiniteObjective { index });
        }
        for (index, constraint) in self.constraints.iter().enumerate() {
            if constraint.coefficients.len() != self.num_variables() {
                return Err(ProblemError::DimensionMismatch {
                    index,
                    expected: self.num_variables(),
                    found: constraint.coefficients.len(),
                });
            }
            if !constraint.rhs.is_finite()
                || constraint.coefficients.iter().any(|c| !c.is_finite())
            {
                return Err(ProblemError::NonFiniteConstraint { index });
            }
        }
        Ok(())
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

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Le => write!(f, "<="),
            Relation::Ge => write!(f, ">="),
            Relation::Eq => write!(f, "="),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_linear(f, &self.coefficients)?;
        write!(f, " {} {}", self.relation, self.rhs)
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.sense)?;
        write_linear(f, &self.objective)?;
        writeln!(f)?;
        writeln!(f, "subject to")?;
        for constraint in &self.constraints {
            writeln!(f, "  {}", constraint)?;
        }
        let names: Vec<String> = (1..=self.num_variables())
            .map(|j| format!("x{}", j))
            .collect();
        write!(f, "  {} >= 0", names.join(", "))
    }
}

/// Write `3 x1 + 5 x2 - x3`, skipping zero terms and unit coefficients.
fn write_linear(f: &mut fmt::Formatter<'_>, coefficients: &[f64]) -> fmt::Result {
    let mut first = true;
    for (j, &c) in coefficients.iter().enumerate() {
        if c == 0.0 {
            continue;
        }
        if first {
            if c < 0.0 {
                write!(f, "-")?;
            }
            first = false;
        } else if c < 0.0 {
            write!(f, " - ")?;
        } else {
            write!(f, " + ")?;
        }
        let magnitude = c.abs();
        if magnitude != 1.0 {
            write!(f, "{} ", magnitude)?;
        }
        write!(f, "x{}", j + 1)?;
    }
    if first {
        write!(f, "0")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_well_formed_problem() {
        let mut problem = Problem::new(Sense::Maximize, vec![3.0, 5.0]);
        problem.add_constraint(vec![1.0, 0.0], Relation::Le, 4.0);
        assert_eq!(problem.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_structural_defects() {
        let empty = Problem::new(Sense::Minimize, vec![]);
        assert_eq!(empty.validate(), Err(ProblemError::NoVariables));

        let unconstrained = Problem::new(Sense::Minimize, vec![1.0]);
        assert_eq!(unconstrained.validate(), Err(ProblemError::NoConstraints));

        let mut short_row = Problem::new(Sense::Minimize, vec![1.0, 2.0]);
        short_row.add_constraint(vec![1.0], Relation::Ge, 5.0);
        assert_eq!(
            short_row.validate(),
            Err(ProblemError::DimensionMismatch {
                index: 0,
                expected: 2,
                found: 1,
            })
        );

        let mut nan_rhs = Problem::new(Sense::Minimize, vec![1.0]);
        nan_rhs.add_constraint(vec![1.0], Relation::Le, f64::NAN);
        assert_eq!(
            nan_rhs.validate(),
            Err(ProblemError::NonFiniteConstraint { index: 0 })
        );
    }

    #[test]
    fn display_renders_statement() {
        let mut problem = Problem::new(Sense::Maximize, vec![3.0, 5.0]);
        problem.add_constraint(vec![1.0, 0.0], Relation::Le, 4.0);
        problem.add_constraint(vec![0.0, 2.0], Relation::Le, 12.0);
        problem.add_constraint(vec![3.0, -2.0], Relation::Ge, -6.0);

        let text = problem.to_string();
        assert!(text.starts_with("max 3 x1 + 5 x2\n"));
        assert!(text.contains("  x1 <= 4\n"));
        assert!(text.contains("  2 x2 <= 12\n"));
        assert!(text.contains("  3 x1 - 2 x2 >= -6\n"));
        assert!(text.ends_with("x1, x2 >= 0"));
    }
}
