use std::io::{self, Write};

use stepplex_solver::{Problem, Solution};

/// A rendering sink for a finished solve.
///
/// Implementations only need the problem, the solution (trace included) and
/// somewhere to write; swapping the console renderer for the workbook writer
/// is a one-line change at the call site.
pub trait Report {
    fn write(&self, problem: &Problem, solution: &Solution, out: &mut dyn Write)
        -> io::Result<()>;
}
