use thiserror::Error;

/// Structural defects in a problem statement. These are caught by the input
/// collaborator (or by `Solver::solve` as a backstop) before any tableau is
/// built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProblemError {
    #[error("Problem has no variables")]
    NoVariables,
    #[error("Problem has no constraints")]
    NoConstraints,
    #[error("Constraint {index}: expected {expected} coefficients, found {found}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("Objective coefficient {index} is not finite")]
    NonFiniteObjective { index: usize },
    #[error("Constraint {index} contains a non-finite coefficient or right-hand side")]
    NonFiniteConstraint { index: usize },
}

/// Failures that abort a solve. LP-theoretic outcomes (unbounded, infeasible)
/// and the iteration cap are verdicts, not errors; only a malformed problem
/// or a corrupted tableau ends up here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Malformed problem: {0}")]
    Malformed(#[from] ProblemError),
    #[error(
        "Numeric instability at iteration {iteration}: RHS of row {row} drifted to {value:e}"
    )]
    NumericInstability {
        iteration: usize,
        row: usize,
        value: f64,
    },
}
