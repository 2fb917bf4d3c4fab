use clap::{Parser, Subcommand, ValueEnum};
use simplexlab_solver::{
    DualProblem, IntegerStatus, Iteration, ProblemDescription, Solution, SolutionStatus, Solver,
};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "simplexlab")]
#[command(about = "Solve linear and integer programs with a traced Big-M simplex", long_about = None)]
struct Cli {
    /// Log solver progress to stderr (-v results, -vv pivots and nodes, -vvv tableaus)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Penalty applied to artificial variables
    #[arg(long, global = true)]
    big_m: Option<f64>,

    /// Maximum simplex pivots per run
    #[arg(long, global = true)]
    max_iterations: Option<usize>,

    /// Maximum branch-and-bound node expansions
    #[arg(long, global = true)]
    max_nodes: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem and print the optimal solution
    Solve {
        /// JSON problem description
        file: PathBuf,
        /// Restrict every variable to integer values
        #[arg(short, long)]
        integer: bool,
        /// Print every tableau visited
        #[arg(short, long)]
        trace: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
    /// Print the dual problem
    Dual {
        /// JSON problem description
        file: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
    /// Check a problem description for errors
    Check {
        /// The file to check
        file: PathBuf,
    },
    /// Solve a square linear system { "matrix": [[..]], "rhs": [..] }
    Linsys {
        /// JSON system description
        file: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(serde::Deserialize)]
struct LinearSystemInput {
    matrix: Vec<Vec<f64>>,
    rhs: Vec<f64>,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose > 0 {
        let level = match cli.verbose {
            1 => Level::INFO,
            2 => Level::DEBUG,
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

    let mut solver = Solver::new();
    if let Some(m) = cli.big_m {
        solver = solver.with_big_m(m);
    }
    if let Some(n) = cli.max_iterations {
        solver = solver.with_max_iterations(n);
    }
    if let Some(n) = cli.max_nodes {
        solver = solver.with_max_nodes(n);
    }

    match cli.command {
        Commands::Solve { file, integer, trace, format } => {
            let problem = load_problem(&file);
            if integer {
                solve_integer(&solver, &problem, trace, format);
            } else {
                let solution = solver.solve(&problem);
                match format {
                    Format::Json => print_json(&solution),
                    Format::Pretty => print_solution(&problem, &solution, trace),
                }
                if !solution.status.is_optimal() {
                    std::process::exit(1);
                }
            }
        }
        Commands::Dual { file, format } => {
            let problem = load_problem(&file);
            let dual = problem.dual();
            match format {
                Format::Json => print_json(&dual),
                Format::Pretty => print_dual(&solver, &problem, &dual),
            }
        }
        Commands::Check { file } => {
            let problem = load_problem(&file);
            println!("✓ {} is valid", file.display());
            println!("  {} variables", problem.num_variables());
            println!("  {} constraints", problem.num_constraints());
            println!();
            println!("{}", problem);
        }
        Commands::Linsys { file } => {
            let source = read_source(&file);
            let input: LinearSystemInput = match serde_json::from_str(&source) {
                Ok(i) => i,
                Err(e) => {
                    eprintln!("Parse error: {}", e);
                    std::process::exit(1);
                }
            };
            match simplexlab_solver::solve_linear_system(&input.matrix, &input.rhs) {
                Ok(x) => {
                    for (i, v) in x.iter().enumerate() {
                        println!("  x{:<4} {:12.4}", i + 1, v);
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn read_source(file: &Path) -> String {
    match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_problem(file: &Path) -> ProblemDescription {
    let source = read_source(file);
    let problem: ProblemDescription = match serde_json::from_str(&source) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = problem.validate() {
        eprintln!("Invalid problem: {}", e);
        std::process::exit(1);
    }
    problem
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            std::process::exit(1);
        }
    }
}

fn solve_integer(solver: &Solver, problem: &ProblemDescription, trace: bool, format: Format) {
    let result = solver.solve_integer(problem);
    if format == Format::Json {
        print_json(&result);
    } else {
        match result.status {
            IntegerStatus::Optimal => println!("Status: INTEGER OPTIMAL"),
            IntegerStatus::Infeasible => println!("Status: NO INTEGER SOLUTION"),
            IntegerStatus::NodeLimit => println!("Status: NODE LIMIT (best found so far)"),
        }
        println!("Nodes explored: {}", result.nodes_explored);
        println!();
        if let Some(ref best) = result.best {
            print_solution(problem, best, trace);
        }
    }
    if result.best.is_none() {
        std::process::exit(1);
    }
}

fn print_solution(problem: &ProblemDescription, solution: &Solution, trace: bool) {
    if trace {
        for it in &solution.iterations {
            print_iteration(&solution.columns, it);
        }
    }

    match solution.status {
        SolutionStatus::Optimal => println!("Status: OPTIMAL"),
        SolutionStatus::Infeasible => {
            println!("Status: INFEASIBLE");
            println!("No solution exists that satisfies all constraints.");
            return;
        }
        SolutionStatus::Unbounded => {
            println!("Status: UNBOUNDED");
            println!("The problem has no finite optimal solution.");
            return;
        }
        SolutionStatus::NonConvergent => {
            println!("Status: NOT CONVERGED");
            println!("Iteration limit reached after {} pivots.", solution.pivot_count());
            return;
        }
    }

    println!("Objective: {:.4}", solution.objective_value);
    println!();
    println!("Variables:");
    for (name, value) in problem.variables.iter().zip(&solution.values) {
        println!("  {:20} {:12.4}", name, value);
    }
    println!();
    println!("Shadow prices:");
    for (i, price) in solution.shadow_prices.iter().enumerate() {
        println!("  {:20} {:12.4}", format!("R{}", i + 1), price);
    }

    if solution.multiple_solutions {
        println!();
        println!("Multiple optimal solutions exist.");
        if let Some(ref alt) = solution.alternate_values {
            println!("Alternate optimum:");
            for (name, value) in problem.variables.iter().zip(alt) {
                println!("  {:20} {:12.4}", name, value);
            }
        }
    }

    if let Some(ref graph) = solution.graph {
        println!();
        println!("Feasible region:");
        for p in &graph.feasible_region {
            println!("  ({:.4}, {:.4})", p.x, p.y);
        }
        if let Some(ref p) = graph.integer_optimal_point {
            println!("Integer optimum at ({:.4}, {:.4})", p.x, p.y);
        }
    }
}

fn print_iteration(columns: &[String], it: &Iteration) {
    match it.pivot {
        Some(ref p) => println!(
            "Iteration {}: {} enters, {} leaves (row {}, column {})",
            it.id - 1,
            p.entering,
            p.leaving,
            p.row + 1,
            p.column + 1
        ),
        None => println!("Initial tableau"),
    }
    print!("  {:>8}", "basis");
    for c in columns {
        print!(" {:>10}", c);
    }
    println!(" {:>10}", "RHS");
    for (name, row) in it.basis.iter().zip(&it.rows) {
        print!("  {:>8}", name);
        for v in row {
            print!(" {:>10.3}", v);
        }
        println!();
    }
    print!("  {:>8}", "Z");
    for v in &it.objective_row {
        print!(" {:>10.3}", v);
    }
    println!();
    println!();
}

fn print_dual(solver: &Solver, problem: &ProblemDescription, dual: &DualProblem) {
    println!("Primal:");
    println!("{}", problem);
    println!();
    println!("Dual:");
    println!("{}", dual);

    let solution = solver.solve(problem);
    if solution.status.is_optimal() {
        let w = dual.objective_value(&solution.shadow_prices);
        println!();
        println!("Primal optimum Z* = {:.4}", solution.objective_value);
        println!("Dual objective at shadow prices W* = {:.4}", w);
        if dual.verify_strong_duality(solution.objective_value, &solution.shadow_prices, 1e-6) {
            println!("Strong duality holds.");
        } else {
            println!("Strong duality check failed.");
        }
    }
}
