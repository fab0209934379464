use std::fmt;

use crate::trace::Trace;

/// Terminal state of a solve.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No improving column remained and no artificial variable stayed basic.
    Optimal,
    /// An improving column had no positive entry in any constraint row.
    Unbounded,
    /// Optimality was reached with an artificial variable still basic.
    Infeasible,
    /// The iteration cap was reached before any other terminal state.
    CycleLimit,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Optimal => "solved",
            Verdict::Unbounded => "unbounded",
            Verdict::Infeasible => "infeasible",
            Verdict::CycleLimit => "cycle-limit",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of a solve, including the full pivot history.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub verdict: Verdict,
    /// Final values of the original variables; empty when the solve ended
    /// without a feasible point.
    pub values: Vec<f64>,
    /// Objective in the problem's own sense. Unbounded and infeasible solves
    /// carry the sense-respective infinity.
    pub objective: f64,
    /// Number of pivots performed.
    pub iterations: usize,
    pub trace: Trace,
}

impl Solution {
    pub fn is_optimal(&self) -> bool {
        self.verdict == Verdict::Optimal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_display_matches_report_wording() {
        assert_eq!(Verdict::Optimal.to_string(), "solved");
        assert_eq!(Verdict::Unbounded.to_string(), "unbounded");
        assert_eq!(Verdict::Infeasible.to_string(), "infeasible");
        assert_eq!(Verdict::CycleLimit.to_string(), "cycle-limit");
    }
}
