use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::{Builder, Env};
use stepplex_io::{
    Report, TextReport, WorkbookReport, load_problem, read_problem, render_tableau,
};
use stepplex_solver::{Problem, Solver};

#[derive(Parser)]
#[command(name = "stepplex")]
#[command(about = "Step-by-step tableau simplex solver for linear programs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a problem file and echo the parsed model
    Check {
        /// Problem file, or `-` for stdin
        file: PathBuf,
    },
    /// Build and print the initial canonical tableau
    Canonical {
        /// Problem file, or `-` for stdin
        file: PathBuf,
        /// Big-M cost for artificial variables
        #[arg(long, default_value_t = 1e6)]
        big_m: f64,
    },
    /// Solve a problem and print the result
    Solve {
        /// Problem file, or `-` for stdin
        file: PathBuf,
        /// Print every tableau of the solve
        #[arg(short, long)]
        steps: bool,
        /// Dump the full solution, trace included, as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        solver: SolverArgs,
    },
    /// Solve a problem and write a report file
    Export {
        /// Problem file, or `-` for stdin
        file: PathBuf,
        /// Output path
        #[arg(short, long)]
        out: PathBuf,
        /// Report format
        #[arg(long, value_enum, default_value = "workbook")]
        format: Format,
        #[command(flatten)]
        solver: SolverArgs,
    },
}

#[derive(Args)]
struct SolverArgs {
    /// Big-M cost for artificial variables
    #[arg(long, default_value_t = 1e6)]
    big_m: f64,
    /// Pivot cap (default: 50 per variable and constraint)
    #[arg(long)]
    max_iterations: Option<usize>,
}

impl SolverArgs {
    fn solver(&self) -> Solver {
        let mut solver = Solver::new().with_big_m(self.big_m);
        if let Some(cap) = self.max_iterations {
            solver = solver.with_iteration_cap(cap);
        }
        solver
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Workbook,
    Text,
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Check { file } => check(&file),
        Commands::Canonical { file, big_m } => canonical(&file, big_m),
        Commands::Solve {
            file,
            steps,
            json,
            solver,
        } => solve(&file, steps, json, &solver),
        Commands::Export {
            file,
            out,
            format,
            solver,
        } => export(&file, &out, format, &solver),
    }
}

/// Read a problem from a file, or from stdin when the path is `-`.
fn read_input(file: &Path) -> Result<Problem> {
    if file == Path::new("-") {
        let mut stdin = io::stdin().lock();
        read_problem(&mut stdin).context("reading problem from stdin")
    } else {
        load_problem(file).with_context(|| format!("loading {}", file.display()))
    }
}

fn check(file: &Path) -> Result<()> {
    let problem = read_input(file)?;
    println!(
        "ok: {} variables, {} constraints, {}",
        problem.num_variables(),
        problem.num_constraints(),
        problem.sense
    );
    println!();
    println!("{}", problem);
    Ok(())
}

fn canonical(file: &Path, big_m: f64) -> Result<()> {
    let problem = read_input(file)?;
    let tableau = Solver::new().with_big_m(big_m).canonicalize(&problem)?;
    print!("{}", render_tableau(&tableau));
    Ok(())
}

fn solve(file: &Path, steps: bool, json: bool, args: &SolverArgs) -> Result<()> {
    let problem = read_input(file)?;
    let solution = args.solver().solve(&problem)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&solution)?);
    } else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        TextReport::new()
            .with_steps(steps)
            .write(&problem, &solution, &mut out)?;
    }
    Ok(())
}

fn export(file: &Path, out_path: &Path, format: Format, args: &SolverArgs) -> Result<()> {
    let problem = read_input(file)?;
    let solution = args.solver().solve(&problem)?;

    let report: Box<dyn Report> = match format {
        Format::Workbook => Box::new(WorkbookReport::new()),
        Format::Text => Box::new(TextReport::new().with_steps(true)),
    };
    let mut out = File::create(out_path)
        .with_context(|| format!("creating {}", out_path.display()))?;
    report.write(&problem, &solution, &mut out)?;
    log::info!("report written to {}", out_path.display());
    Ok(())
}
