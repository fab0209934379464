mod error;
mod problem;
mod solution;
mod solver;
mod tableau;
mod trace;

pub use error::{ProblemError, SolveError};
pub use problem::{Constraint, Problem, Relation, Sense};
pub use solution::{Solution, Verdict};
pub use solver::Solver;
pub use tableau::Tableau;
pub use trace::{PivotInfo, StepRecord, Trace};
