mod render;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use twophase_lang::Parser as ProblemParser;
use twophase_solver::{format_assignments, Recorder, SolutionStatus, Solver, TableauSnapshot};

use render::{render_problem, TextRenderer};

#[derive(Parser)]
#[command(name = "twophase")]
#[command(about = "Solve linear programs with the two-phase simplex method", long_about = None)]
struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a problem and print it
    Parse {
        /// The problem file, or - for stdin
        file: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: Format,
    },
    /// Solve a problem and print the optimum
    Solve {
        /// The problem file, or - for stdin
        file: PathBuf,
        /// Print every tableau
        #[arg(short, long)]
        steps: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: Format,
        /// Pivot limit per phase
        #[arg(long, default_value_t = 10_000)]
        max_iterations: usize,
        /// Zero threshold for pivot decisions
        #[arg(long, default_value_t = 1e-9)]
        tolerance: f64,
    },
    /// Check a problem for errors
    Check {
        /// The problem file, or - for stdin
        file: PathBuf,
    },
}

#[derive(serde::Serialize)]
struct SolveOutput<'a> {
    #[serde(flatten)]
    solution: &'a twophase_solver::Solution,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    tableaux: &'a [TableauSnapshot],
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        std::process::exit(1);
    }
}

fn read_source(file: &Path) -> String {
    let result = if file.as_os_str() == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source).map(|_| source)
    } else {
        std::fs::read_to_string(file)
    };
    match result {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            std::process::exit(1);
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error writing JSON: {}", e);
            std::process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Parse { file, format } => {
            let source = read_source(&file);
            let program = match ProblemParser::parse(&source) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Parse error: {}", e);
                    std::process::exit(1);
                }
            };

            match format {
                Format::Json => println!("{}", to_json(&program)),
                Format::Pretty => print!("{}", render_problem(&program.to_problem())),
            }
        }
        Commands::Solve {
            file,
            steps,
            format,
            max_iterations,
            tolerance,
        } => {
            let source = read_source(&file);
            let problem = match ProblemParser::parse_problem(&source) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Parse error: {}", e);
                    std::process::exit(1);
                }
            };

            let solver = Solver::new()
                .with_max_iterations(max_iterations)
                .with_tolerance(tolerance);

            let result = match format {
                Format::Json => {
                    let mut recorder = Recorder::new();
                    solver.solve_with(&problem, &mut recorder).map(|solution| {
                        let tableaux: &[TableauSnapshot] = if steps { &recorder.snapshots } else { &[] };
                        println!("{}", to_json(&SolveOutput { solution: &solution, tableaux }));
                        solution
                    })
                }
                Format::Pretty => {
                    let mut renderer = TextRenderer { steps };
                    solver.solve_with(&problem, &mut renderer)
                }
            };

            let solution = match result {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Solve error: {}", e);
                    std::process::exit(1);
                }
            };

            if let SolutionStatus::CycleDetected(phase) = solution.status {
                eprintln!(
                    "{} stopped after {} pivots without reaching an optimum",
                    phase, max_iterations
                );
                if !solution.initial_vertex.is_empty() {
                    eprintln!(
                        "Initial vertex: {}",
                        format_assignments(&solution.initial_vertex)
                    );
                }
            }
            if !solution.is_optimal() {
                std::process::exit(1);
            }
        }
        Commands::Check { file } => {
            let source = read_source(&file);
            match ProblemParser::parse(&source) {
                Ok(program) => {
                    println!("✓ {} is valid", file.display());
                    println!("  {} variables", program.variables().len());
                    println!("  {} constraints", program.constraints.len());
                }
                Err(e) => {
                    eprintln!("✗ {} has errors:", file.display());
                    eprintln!("  {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
