use std::io::{self, Write};

use stepplex_solver::{Problem, Solution, Tableau};

use crate::report::Report;

/// Console renderer: the result block, optionally preceded by every recorded
/// tableau.
#[derive(Debug, Default)]
pub struct TextReport {
    steps: bool,
}

impl TextReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include one block per recorded tableau before the result.
    pub fn with_steps(mut self, steps: bool) -> Self {
        self.steps = steps;
        self
    }
}

impl Report for TextReport {
    fn write(
        &self,
        problem: &Problem,
        solution: &Solution,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        writeln!(out, "{}", problem)?;

        if self.steps {
            for record in &solution.trace {
                writeln!(out)?;
                match &record.pivot {
                    None => writeln!(out, "step 0 (initial tableau)")?,
                    Some(pivot) => writeln!(
                        out,
                        "step {}: {} enters, {} leaves (element {} in row {})",
                        record.iteration,
                        record.tableau.label(pivot.entering),
                        record.tableau.label(pivot.leaving),
                        cell(pivot.element),
                        pivot.row + 1,
                    )?,
                }
                write!(out, "{}", render_tableau(&record.tableau))?;
            }
        }

        writeln!(out)?;
        writeln!(out, "status: {}", solution.verdict)?;
        writeln!(out, "objective: {}", cell(solution.objective))?;
        for (j, &value) in solution.values.iter().enumerate() {
            writeln!(out, "  x{} = {}", j + 1, cell(value))?;
        }
        writeln!(out, "iterations: {}", solution.iterations)?;
        Ok(())
    }
}

/// Render a tableau as an aligned grid with basis labels on the left and the
/// objective row (`z`) at the bottom.
pub fn render_tableau(tableau: &Tableau) -> String {
    let mut out = String::new();
    let rhs_col = tableau.rhs_col();

    out.push_str(&format!("{:>6} |", "Basis"));
    for label in tableau.labels() {
        out.push_str(&format!("{:>9}", label));
    }
    out.push_str(&format!(" |{:>9}\n", "RHS"));

    for i in 0..tableau.num_constraints() {
        let row = tableau.row(i);
        out.push_str(&format!("{:>6} |", tableau.label(tableau.basis()[i])));
        for j in 0..rhs_col {
            out.push_str(&format!("{:>9}", cell(row[j])));
        }
        out.push_str(&format!(" |{:>9}\n", cell(row[rhs_col])));
    }

    let objective = tableau.objective_row();
    out.push_str(&format!("{:>6} |", "z"));
    for j in 0..rhs_col {
        out.push_str(&format!("{:>9}", cell(objective[j])));
    }
    out.push_str(&format!(" |{:>9}\n", cell(objective[rhs_col])));

    out
}

/// Whole numbers print without a fraction, everything else with three
/// decimals.
fn cell(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value == value.trunc() && value.abs() < 1e9 {
        format!("{:.0}", value)
    } else {
        format!("{:.3}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepplex_solver::{Relation, Sense, Solver};

    fn wyndor() -> Problem {
        let mut problem = Problem::new(Sense::Maximize, vec![3.0, 5.0]);
        problem.add_constraint(vec![1.0, 0.0], Relation::Le, 4.0);
        problem.add_constraint(vec![0.0, 2.0], Relation::Le, 12.0);
        problem.add_constraint(vec![3.0, 2.0], Relation::Le, 18.0);
        problem
    }

    #[test]
    fn cells_drop_trailing_zero_fractions() {
        assert_eq!(cell(0.0), "0");
        assert_eq!(cell(-0.0), "0");
        assert_eq!(cell(36.0), "36");
        assert_eq!(cell(-997.0), "-997");
        assert_eq!(cell(0.25), "0.250");
        assert_eq!(cell(f64::INFINITY), "inf");
    }

    #[test]
    fn rendered_tableau_lists_basis_labels_and_rhs() {
        let problem = wyndor();
        let tableau = Solver::new().canonicalize(&problem).unwrap();
        let rendered = render_tableau(&tableau);

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 5); // header, 3 constraints, objective
        assert!(lines[0].contains("Basis"));
        assert!(lines[0].contains("x1"));
        assert!(lines[0].contains("RHS"));
        assert!(lines[1].trim_start().starts_with("s1"));
        assert!(lines[4].trim_start().starts_with("z"));
        assert!(lines[2].ends_with("12"));
    }

    #[test]
    fn result_block_reports_verdict_and_values() {
        let problem = wyndor();
        let solution = Solver::new().solve(&problem).unwrap();

        let mut out = Vec::new();
        TextReport::new()
            .write(&problem, &solution, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("status: solved"));
        assert!(text.contains("objective: 36"));
        assert!(text.contains("x1 = 2"));
        assert!(text.contains("x2 = 6"));
        assert!(text.contains("iterations: 2"));
        assert!(!text.contains("step 0"));
    }

    #[test]
    fn steps_mode_prints_every_recorded_tableau() {
        let problem = wyndor();
        let solution = Solver::new().solve(&problem).unwrap();

        let mut out = Vec::new();
        TextReport::new()
            .with_steps(true)
            .write(&problem, &solution, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("step 0 (initial tableau)"));
        assert!(text.contains("step 1: x2 enters, s2 leaves"));
        assert!(text.contains("step 2: x1 enters, s3 leaves"));
        assert_eq!(text.matches("Basis").count(), 3);
    }
}
