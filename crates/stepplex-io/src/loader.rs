use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use stepplex_solver::{Problem, ProblemError, Relation, Sense};
use thiserror::Error;

/// Failure while reading a problem file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Problem file is empty")]
    Empty,
    #[error("Line {line}: expected {expected}")]
    MissingLine { line: usize, expected: String },
    #[error("Line {line}: invalid number `{token}`")]
    InvalidNumber { line: usize, token: String },
    #[error("Line {line}: invalid sense `{token}`, expected MAX or MIN")]
    InvalidSense { line: usize, token: String },
    #[error("Line {line}: invalid relation `{token}`, expected <=, >= or =")]
    InvalidRelation { line: usize, token: String },
    #[error("Line {line}: expected {expected} coefficients, found {found}")]
    WrongCoefficientCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Line {line}: unexpected trailing input")]
    TrailingInput { line: usize },
    #[error("Invalid problem: {0}")]
    Invalid(#[from] ProblemError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parse a problem statement:
///
/// ```text
/// numVariables numConstraints sense    # sense is MAX or MIN
/// c1 c2 ... cn                         # objective coefficients
/// a1 ... an rel rhs                    # one line per constraint
/// ```
///
/// Blank lines and `#` comments are ignored. The parsed problem is validated
/// before it is returned.
pub fn parse_problem(input: &str) -> Result<Problem, LoadError> {
    // Content lines with their 1-based position in the raw input.
    let mut rows: Vec<(usize, &str)> = Vec::new();
    for (i, raw) in input.lines().enumerate() {
        let text = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();
        if !text.is_empty() {
            rows.push((i + 1, text));
        }
    }
    if rows.is_empty() {
        return Err(LoadError::Empty);
    }
    let end = input.lines().count() + 1;

    let (line, header) = rows[0];
    let tokens: Vec<&str> = header.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(LoadError::MissingLine {
            line,
            expected: "`variables constraints sense` header".to_string(),
        });
    }
    if tokens.len() > 3 {
        return Err(LoadError::TrailingInput { line });
    }
    let num_vars = parse_count(line, tokens[0])?;
    let num_constraints = parse_count(line, tokens[1])?;
    let sense = parse_sense(line, tokens[2])?;

    let (line, objective_text) = content_line(&rows, 1, end, "objective coefficients")?;
    let tokens: Vec<&str> = objective_text.split_whitespace().collect();
    if tokens.len() != num_vars {
        return Err(LoadError::WrongCoefficientCount {
            line,
            expected: num_vars,
            found: tokens.len(),
        });
    }
    let mut objective = Vec::with_capacity(num_vars);
    for token in tokens {
        objective.push(parse_number(line, token)?);
    }

    let mut problem = Problem::new(sense, objective);
    for k in 0..num_constraints {
        let (line, text) = content_line(
            &rows,
            2 + k,
            end,
            &format!("constraint {} of {}", k + 1, num_constraints),
        )?;
        let tokens: Vec<&str> = text.split_whitespace().collect();
        // Layout is fixed: n coefficients, the relation, the RHS.
        if tokens.len() != num_vars + 2 {
            return Err(LoadError::WrongCoefficientCount {
                line,
                expected: num_vars,
                found: tokens.len().saturating_sub(2),
            });
        }
        let mut coefficients = Vec::with_capacity(num_vars);
        for token in &tokens[..num_vars] {
            coefficients.push(parse_number(line, token)?);
        }
        let relation = parse_relation(line, tokens[num_vars])?;
        let rhs = parse_number(line, tokens[num_vars + 1])?;
        problem.add_constraint(coefficients, relation, rhs);
    }

    if let Some(&(line, _)) = rows.get(2 + num_constraints) {
        return Err(LoadError::TrailingInput { line });
    }

    // `f64` parsing happily accepts `inf` and `NaN`; validation keeps those
    // (and declared-zero dimensions) out of the engine.
    problem.validate()?;
    Ok(problem)
}

/// Read a problem from any buffered source, stdin included.
pub fn read_problem(reader: &mut dyn BufRead) -> Result<Problem, LoadError> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    parse_problem(&input)
}

pub fn load_problem(path: impl AsRef<Path>) -> Result<Problem, LoadError> {
    let mut reader = BufReader::new(File::open(path)?);
    read_problem(&mut reader)
}

fn content_line<'a>(
    rows: &[(usize, &'a str)],
    index: usize,
    end: usize,
    expected: &str,
) -> Result<(usize, &'a str), LoadError> {
    rows.get(index).copied().ok_or_else(|| LoadError::MissingLine {
        line: end,
        expected: expected.to_string(),
    })
}

fn parse_count(line: usize, token: &str) -> Result<usize, LoadError> {
    token.parse().map_err(|_| LoadError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

fn parse_number(line: usize, token: &str) -> Result<f64, LoadError> {
    token.parse().map_err(|_| LoadError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

fn parse_sense(line: usize, token: &str) -> Result<Sense, LoadError> {
    if token.eq_ignore_ascii_case("MAX") {
        Ok(Sense::Maximize)
    } else if token.eq_ignore_ascii_case("MIN") {
        Ok(Sense::Minimize)
    } else {
        Err(LoadError::InvalidSense {
            line,
            token: token.to_string(),
        })
    }
}

fn parse_relation(line: usize, token: &str) -> Result<Relation, LoadError> {
    match token {
        "<=" => Ok(Relation::Le),
        ">=" => Ok(Relation::Ge),
        "=" => Ok(Relation::Eq),
        _ => Err(LoadError::InvalidRelation {
            line,
            token: token.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WYNDOR: &str = "\
# plant capacity model
2 3 MAX
3 5

1 0 <= 4
0 2 <= 12
3 2 <= 18
";

    #[test]
    fn parses_a_commented_problem_file() {
        let problem = parse_problem(WYNDOR).unwrap();

        assert_eq!(problem.sense, Sense::Maximize);
        assert_eq!(problem.objective, [3.0, 5.0]);
        assert_eq!(problem.num_constraints(), 3);
        assert_eq!(problem.constraints[1].relation, Relation::Le);
        assert_eq!(problem.constraints[2].coefficients, [3.0, 2.0]);
        assert_eq!(problem.constraints[2].rhs, 18.0);
    }

    #[test]
    fn parses_all_relations_and_min_sense() {
        let input = "2 3 min\n1 2\n1 1 <= 8\n1 0 >= 1\n0 1 = 2\n";
        let problem = parse_problem(input).unwrap();

        assert_eq!(problem.sense, Sense::Minimize);
        assert_eq!(problem.constraints[0].relation, Relation::Le);
        assert_eq!(problem.constraints[1].relation, Relation::Ge);
        assert_eq!(problem.constraints[2].relation, Relation::Eq);
    }

    #[test]
    fn empty_input_is_its_own_error() {
        assert!(matches!(parse_problem(""), Err(LoadError::Empty)));
        assert!(matches!(
            parse_problem("# only comments\n\n"),
            Err(LoadError::Empty)
        ));
    }

    #[test]
    fn reports_line_numbers_for_bad_tokens() {
        let err = parse_problem("2 1 BEST\n3 5\n1 0 <= 4\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidSense { line: 1, ref token } if token == "BEST"
        ));

        let err = parse_problem("2 1 MAX\n3 five\n1 0 <= 4\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidNumber { line: 2, ref token } if token == "five"
        ));

        let err = parse_problem("2 1 MAX\n3 5\n1 0 < 4\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidRelation { line: 3, ref token } if token == "<"
        ));
    }

    #[test]
    fn rejects_wrong_coefficient_counts() {
        let err = parse_problem("2 1 MAX\n3 5 7\n1 0 <= 4\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::WrongCoefficientCount {
                line: 2,
                expected: 2,
                found: 3,
            }
        ));

        let err = parse_problem("2 1 MAX\n3 5\n1 <= 4\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::WrongCoefficientCount {
                line: 3,
                expected: 2,
                found: 1,
            }
        ));
    }

    #[test]
    fn rejects_missing_and_trailing_lines() {
        let err = parse_problem("2 2 MAX\n3 5\n1 0 <= 4\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingLine { .. }));

        let err = parse_problem("2 1 MAX\n3 5\n1 0 <= 4\n0 1 <= 9\n").unwrap_err();
        assert!(matches!(err, LoadError::TrailingInput { line: 4 }));
    }

    #[test]
    fn validation_runs_before_handing_over() {
        // `f64` parses `inf`, so the loader must rely on model validation.
        let err = parse_problem("1 1 MIN\ninf\n1 <= 4\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Invalid(ProblemError::NonFiniteObjective { index: 0 })
        ));
    }

    #[test]
    fn demo_files_load_cleanly() {
        let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
        for name in ["production.txt", "diet.txt", "unbounded.txt", "infeasible.txt"] {
            let problem = load_problem(demos.join(name))
                .unwrap_or_else(|e| panic!("{}: {}", name, e));
            assert!(problem.validate().is_ok(), "{}", name);
        }
    }

    #[test]
    fn reads_from_any_bufread() {
        let mut cursor = std::io::Cursor::new(WYNDOR.as_bytes());
        let problem = read_problem(&mut cursor).unwrap();
        assert_eq!(problem.num_variables(), 2);
    }
}
