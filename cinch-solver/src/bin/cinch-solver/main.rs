mod os_signal_termination;
mod result;

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use clap::ValueEnum;
use cinch_solver::core::convert_case::Case;
use cinch_solver::core::statistics::configure_statistic_logging;
use cinch_solver::models::Knapsack;
use cinch_solver::models::Model;
use cinch_solver::models::Queens;
use cinch_solver::models::SendMoreMoney;
use cinch_solver::models::TwoMachineSchedule;
use cinch_solver::models::CAPACITY;
use cinch_solver::models::ITEMS;
use cinch_solver::options::MinimizationStrategy;
use cinch_solver::options::SolverOptions;
use cinch_solver::options::ValueSelection;
use cinch_solver::options::VariableSelection;
use cinch_solver::results::OptimisationResult;
use cinch_solver::results::SatisfactionResult;
use cinch_solver::results::Solution;
use cinch_solver::termination::Combinator;
use cinch_solver::termination::TimeBudget;
use cinch_solver::ConstraintOperationError;
use cinch_solver::Solver;
use log::error;
use log::info;
use log::LevelFilter;
use os_signal_termination::OsSignal;
use result::CinchResult;

const MSG_SOLUTION_SEPARATOR: &str = "----------";
const MSG_SEARCH_COMPLETE: &str = "==========";
const MSG_UNSATISFIABLE: &str = "=====UNSATISFIABLE=====";
const MSG_UNKNOWN: &str = "=====UNKNOWN=====";

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModelKind {
    /// The cryptarithm SEND + MORE = MONEY.
    SendMoreMoney,
    /// Place `--size` queens on a board without attacks.
    Queens,
    /// Maximise the value of an unbounded knapsack with three item types and capacity 25.
    Knapsack,
    /// Minimise the makespan of three activities on two machines, within `--horizon`.
    Schedule,
}

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
Authors: {author}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    author,
    version,
    about,
    arg_required_else_help = true
)]
struct Args {
    /// The built-in model to solve.
    #[arg(value_enum)]
    model: ModelKind,

    /// The number of queens of the queens model.
    #[arg(short = 'n', long = "size", default_value_t = 8)]
    size: u32,

    /// The planning horizon of the schedule model.
    #[arg(long = "horizon", default_value_t = 10)]
    horizon: i32,

    /// The time budget of the search in milliseconds.
    #[arg(short = 't', long = "time-limit", verbatim_doc_comment)]
    time_limit: Option<u64>,

    #[arg(
        short = 'r',
        long = "random-seed",
        default_value_t = 42,
        verbatim_doc_comment
    )]
    random_seed: u64,

    /// The variable selection of the default search.
    #[arg(long, value_enum, default_value_t)]
    variable_selection: VariableSelection,

    /// The value selection of the default search.
    #[arg(long, value_enum, default_value_t)]
    value_selection: ValueSelection,

    /// How the search continues after an improving solution of an optimisation model.
    #[arg(long, value_enum, default_value_t)]
    minimization_strategy: MinimizationStrategy,

    /// Real bounds only change when they tighten by more than this amount.
    #[arg(long = "real-precision", default_value_t = 1e-6)]
    real_precision: f64,

    #[arg(short = 'v', long = "verbose", verbatim_doc_comment)]
    verbose: bool,

    #[arg(short = 's', long = "log-statistics", verbatim_doc_comment)]
    log_statistics: bool,

    /// Print every solution of the model instead of one. The objective of an optimisation model
    /// is ignored.
    #[arg(short = 'a', long = "all-solutions", verbatim_doc_comment)]
    all_solutions: bool,
}

fn configure_logging(verbose: bool, log_statistics: bool) {
    if log_statistics {
        configure_statistic_logging("%% stat:", Some("%% stat-end"), Some(Case::Snake), None);
    }

    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            write!(buf, "% ")?;

            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> CinchResult<()> {
    let args = Args::parse();
    configure_logging(args.verbose, args.log_statistics);

    let mut solver = Solver::with_options(SolverOptions {
        real_precision: args.real_precision,
        random_seed: args.random_seed,
        default_variable_selection: args.variable_selection,
        default_value_selection: args.value_selection,
        minimization_strategy: args.minimization_strategy,
    });

    match args.model {
        ModelKind::SendMoreMoney => {
            let model = SendMoreMoney::post(&mut solver);
            run_model(&mut solver, model, &args)
        }
        ModelKind::Queens => {
            let model = Queens::post(&mut solver, args.size);
            run_model(&mut solver, model, &args)
        }
        ModelKind::Knapsack => {
            let model = Knapsack::post(&mut solver, &ITEMS, CAPACITY);
            run_model(&mut solver, model, &args)
        }
        ModelKind::Schedule => {
            let model = TwoMachineSchedule::post(&mut solver, args.horizon);
            run_model(&mut solver, model, &args)
        }
    }
}

fn run_model(
    solver: &mut Solver,
    model: Result<impl Model, ConstraintOperationError>,
    args: &Args,
) -> CinchResult<()> {
    let model = match model {
        Ok(model) => model,
        Err(ConstraintOperationError::ContractViolation(violation)) => return Err(violation.into()),
        Err(
            ConstraintOperationError::InfeasiblePropagator
            | ConstraintOperationError::InfeasibleState,
        ) => {
            info!("the model is infeasible at the root");
            println!("{MSG_UNSATISFIABLE}");
            return Ok(());
        }
    };

    let mut termination = Combinator::new(
        OsSignal::install()?,
        args.time_limit
            .map(|time_limit| TimeBudget::starting_now(Duration::from_millis(time_limit))),
    );

    let goal = model.goal(solver);
    let mut stdout = std::io::stdout();

    if args.all_solutions {
        let all_solutions = solver.find_all_solutions(goal, &mut termination)?;
        for solution in &all_solutions.solutions {
            print_solution(&model, solution, &mut stdout)?;
        }

        match (all_solutions.solutions.is_empty(), all_solutions.is_complete) {
            (true, true) => writeln!(stdout, "{MSG_UNSATISFIABLE}")?,
            (true, false) => writeln!(stdout, "{MSG_UNKNOWN}")?,
            (false, true) => writeln!(stdout, "{MSG_SEARCH_COMPLETE}")?,
            (false, false) => {}
        }
    } else if let Some((direction, objective)) = model.objective() {
        match solver.optimise(goal, &mut termination, direction, objective)? {
            OptimisationResult::Optimal(solution) => {
                print_solution(&model, &solution, &mut stdout)?;
                writeln!(stdout, "{MSG_SEARCH_COMPLETE}")?;
            }
            OptimisationResult::Satisfiable(solution) => {
                print_solution(&model, &solution, &mut stdout)?;
            }
            OptimisationResult::Unsatisfiable => writeln!(stdout, "{MSG_UNSATISFIABLE}")?,
            OptimisationResult::Unknown => writeln!(stdout, "{MSG_UNKNOWN}")?,
        }
    } else {
        match solver.solve(goal, &mut termination)? {
            SatisfactionResult::Satisfiable(solution) => {
                print_solution(&model, &solution, &mut stdout)?;
            }
            SatisfactionResult::Unsatisfiable => writeln!(stdout, "{MSG_UNSATISFIABLE}")?,
            SatisfactionResult::Unknown => writeln!(stdout, "{MSG_UNKNOWN}")?,
        }
    }

    if args.log_statistics {
        solver.log_statistics();
    }

    Ok(())
}

fn print_solution(
    model: &impl Model,
    solution: &Solution,
    output: &mut dyn Write,
) -> std::io::Result<()> {
    model.write_solution(solution, output)?;
    writeln!(output, "{MSG_SOLUTION_SEPARATOR}")
}
