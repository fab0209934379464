use std::io::{self, Write};

use quick_xml::escape::escape;
use stepplex_solver::{Problem, Solution};

use crate::report::Report;

/// SpreadsheetML (Excel 2003 XML) workbook with three sheets: the problem
/// statement, one block per recorded tableau, and the result.
#[derive(Debug, Default)]
pub struct WorkbookReport;

impl WorkbookReport {
    pub fn new() -> Self {
        Self
    }

    fn problem_sheet(&self, problem: &Problem, out: &mut dyn Write) -> io::Result<()> {
        open_sheet(out, "Problem")?;
        write_row(
            out,
            &[text_cell("Sense"), text_cell(&problem.sense.to_string())],
        )?;
        write_row(
            out,
            &[
                text_cell("Variables"),
                number_cell(problem.num_variables() as f64),
            ],
        )?;
        write_row(
            out,
            &[
                text_cell("Constraints"),
                number_cell(problem.num_constraints() as f64),
            ],
        )?;
        write_row(out, &[])?;

        let mut cells = vec![text_cell("Objective")];
        cells.extend(problem.objective.iter().map(|&c| number_cell(c)));
        write_row(out, &cells)?;

        for (i, constraint) in problem.constraints.iter().enumerate() {
            let mut cells = vec![text_cell(&format!("c{}", i + 1))];
            cells.extend(constraint.coefficients.iter().map(|&c| number_cell(c)));
            cells.push(text_cell(&constraint.relation.to_string()));
            cells.push(number_cell(constraint.rhs));
            write_row(out, &cells)?;
        }
        close_sheet(out)
    }

    fn iterations_sheet(&self, solution: &Solution, out: &mut dyn Write) -> io::Result<()> {
        open_sheet(out, "Iterations")?;
        for record in &solution.trace {
            let tableau = &record.tableau;

            let mut header = vec![text_cell(&format!("Iteration {}", record.iteration))];
            match &record.pivot {
                None => header.push(text_cell("initial tableau")),
                Some(pivot) => {
                    header.push(text_cell(&format!("{} enters", tableau.label(pivot.entering))));
                    header.push(text_cell(&format!("{} leaves", tableau.label(pivot.leaving))));
                    header.push(text_cell("element"));
                    header.push(number_cell(pivot.element));
                }
            }
            write_row(out, &header)?;

            let mut labels = vec![text_cell("Basis")];
            labels.extend(tableau.labels().iter().map(|label| text_cell(label)));
            labels.push(text_cell("RHS"));
            write_row(out, &labels)?;

            let rhs_col = tableau.rhs_col();
            for i in 0..tableau.num_constraints() {
                let row = tableau.row(i);
                let mut cells = vec![text_cell(tableau.label(tableau.basis()[i]))];
                cells.extend(row[..rhs_col].iter().map(|&v| number_cell(v)));
                cells.push(number_cell(row[rhs_col]));
                write_row(out, &cells)?;
            }

            let objective = tableau.objective_row();
            let mut cells = vec![text_cell("z")];
            cells.extend(objective[..rhs_col].iter().map(|&v| number_cell(v)));
            cells.push(number_cell(objective[rhs_col]));
            write_row(out, &cells)?;
            write_row(out, &[])?;
        }
        close_sheet(out)
    }

    fn result_sheet(&self, solution: &Solution, out: &mut dyn Write) -> io::Result<()> {
        open_sheet(out, "Result")?;
        write_row(
            out,
            &[text_cell("Status"), text_cell(&solution.verdict.to_string())],
        )?;
        write_row(
            out,
            &[text_cell("Objective"), number_cell(solution.objective)],
        )?;
        write_row(
            out,
            &[
                text_cell("Iterations"),
                number_cell(solution.iterations as f64),
            ],
        )?;
        if !solution.values.is_empty() {
            write_row(out, &[])?;
            for (j, &value) in solution.values.iter().enumerate() {
                write_row(out, &[text_cell(&format!("x{}", j + 1)), number_cell(value)])?;
            }
        }
        close_sheet(out)
    }
}

impl Report for WorkbookReport {
    fn write(
        &self,
        problem: &Problem,
        solution: &Solution,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        writeln!(out, "<?xml version=\"1.0\"?>")?;
        writeln!(out, "<?mso-application progid=\"Excel.Sheet\"?>")?;
        writeln!(
            out,
            "<Workbook xmlns=\"urn:schemas-microsoft-com:office:spreadsheet\" \
             xmlns:ss=\"urn:schemas-microsoft-com:office:spreadsheet\">"
        )?;
        self.problem_sheet(problem, out)?;
        self.iterations_sheet(solution, out)?;
        self.result_sheet(solution, out)?;
        writeln!(out, "</Workbook>")
    }
}

fn open_sheet(out: &mut dyn Write, name: &str) -> io::Result<()> {
    writeln!(out, " <Worksheet ss:Name=\"{}\">", escape(name))?;
    writeln!(out, "  <Table>")
}

fn close_sheet(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "  </Table>")?;
    writeln!(out, " </Worksheet>")
}

fn write_row(out: &mut dyn Write, cells: &[String]) -> io::Result<()> {
    write!(out, "   <Row>")?;
    for cell in cells {
        write!(out, "{}", cell)?;
    }
    writeln!(out, "</Row>")
}

fn text_cell(value: &str) -> String {
    format!(
        "<Cell><Data ss:Type=\"String\">{}</Data></Cell>",
        escape(value)
    )
}

/// Excel rejects non-numeric `Number` cells, so infinities fall back to text.
fn number_cell(value: f64) -> String {
    if value.is_finite() {
        format!("<Cell><Data ss:Type=\"Number\">{}</Data></Cell>", value)
    } else {
        text_cell(&value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepplex_solver::{Relation, Sense, Solver};

    fn report_for(problem: &Problem) -> String {
        let solution = Solver::new().solve(problem).unwrap();
        let mut out = Vec::new();
        WorkbookReport::new()
            .write(problem, &solution, &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn workbook_has_three_named_sheets() {
        let mut problem = Problem::new(Sense::Maximize, vec![3.0, 5.0]);
        problem.add_constraint(vec![1.0, 0.0], Relation::Le, 4.0);
        problem.add_constraint(vec![0.0, 2.0], Relation::Le, 12.0);
        problem.add_constraint(vec![3.0, 2.0], Relation::Le, 18.0);
        let xml = report_for(&problem);

        assert!(xml.starts_with("<?xml version=\"1.0\"?>"));
        assert!(xml.contains("<?mso-application progid=\"Excel.Sheet\"?>"));
        assert_eq!(xml.matches("<Worksheet").count(), 3);
        assert!(xml.contains("ss:Name=\"Problem\""));
        assert!(xml.contains("ss:Name=\"Iterations\""));
        assert!(xml.contains("ss:Name=\"Result\""));
        assert!(xml.contains("</Workbook>"));
    }

    #[test]
    fn iteration_blocks_annotate_pivots() {
        let mut problem = Problem::new(Sense::Maximize, vec![3.0, 5.0]);
        problem.add_constraint(vec![1.0, 0.0], Relation::Le, 4.0);
        problem.add_constraint(vec![0.0, 2.0], Relation::Le, 12.0);
        problem.add_constraint(vec![3.0, 2.0], Relation::Le, 18.0);
        let xml = report_for(&problem);

        assert!(xml.contains(">Iteration 0<"));
        assert!(xml.contains(">initial tableau<"));
        assert!(xml.contains(">Iteration 2<"));
        assert!(xml.contains(">x2 enters<"));
        assert!(xml.contains(">s2 leaves<"));
        assert!(xml.contains(">solved<"));
        assert!(xml.contains(">36<"));
    }

    #[test]
    fn relations_are_xml_escaped() {
        let mut problem = Problem::new(Sense::Minimize, vec![2.0]);
        problem.add_constraint(vec![1.0], Relation::Le, 3.0);
        let xml = report_for(&problem);

        assert!(xml.contains("&lt;="));
        assert!(!xml.contains("\"String\"><="));
    }

    #[test]
    fn infinite_objectives_are_written_as_text() {
        // Unbounded: x1 can grow forever.
        let mut problem = Problem::new(Sense::Maximize, vec![1.0, 1.0]);
        problem.add_constraint(vec![1.0, -1.0], Relation::Le, 1.0);
        let xml = report_for(&problem);

        assert!(xml.contains(">unbounded<"));
        assert!(xml.contains("ss:Type=\"String\">inf<"));
        assert!(!xml.contains("ss:Type=\"Number\">inf<"));
    }
}
