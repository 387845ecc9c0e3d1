use std::path::PathBuf;

use nqueens_solver::{Algorithm, SolveReport};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SolveArg {
    /// Algorithm to run (qlearning, genetic or backtracking)
    #[arg(long, short, default_value_t = Algorithm::Backtracking)]
    algorithm: Algorithm,
    /// Board size; values outside 4..=8 are clamped
    #[arg(long, short, default_value_t = 8)]
    size: usize,
    /// Solver settings (JSON); defaults are used for missing fields
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the step cap of the Q-learning solver
    #[arg(long)]
    max_steps: Option<usize>,
    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Leave the trace out of the report
    #[arg(long)]
    no_trace: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SolveArg) -> anyhow::Result<()> {
    let SolveArg {
        algorithm,
        size,
        config,
        max_steps,
        seed,
        no_trace,
        output,
    } = arg;

    let size = util::clamp_board_size(*size);
    let mut config = util::read_solver_config(config.as_deref())?;
    if let Some(max_steps) = max_steps {
        config.max_steps = *max_steps;
    }
    let mut rng = util::make_rng(*seed);

    eprintln!("Solving {size}x{size} with {algorithm}...");
    let mut report = nqueens_solver::solve(*algorithm, size, &config, &mut rng);
    print_summary(&report);

    if *no_trace {
        report.trace = nqueens_engine::Trace::new();
    }
    Output::save_json(&report, output.clone())
}

fn print_summary(report: &SolveReport) {
    let SolveReport {
        algorithm,
        solution,
        steps,
        conflicts,
        success,
        elapsed_ms,
        ..
    } = report;
    let result = if *success { "solved" } else { "not solved" };
    eprintln!("{algorithm}: {result} in {steps} steps ({elapsed_ms:.3} ms), {conflicts} conflicts left");
    if let Some(board) = solution {
        eprintln!("{board}");
    }
}
