use std::path::PathBuf;

use nqueens_engine::BoardSize;
use nqueens_solver::{Algorithm, SolveReport, SolverConfig};
use rand::Rng;
use serde::Serialize;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CompareArg {
    /// Board size; values outside 4..=8 are clamped
    #[arg(long, short, default_value_t = 8)]
    size: usize,
    /// Number of runs per algorithm
    #[arg(long, default_value_t = 10)]
    runs: usize,
    /// Solver settings (JSON); defaults are used for missing fields
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct AlgorithmSummary {
    algorithm: Algorithm,
    runs: usize,
    successes: usize,
    success_rate: f64,
    mean_steps: f64,
    mean_elapsed_ms: f64,
    min_conflicts: usize,
}

impl AlgorithmSummary {
    #[expect(clippy::cast_precision_loss)]
    fn from_reports(algorithm: Algorithm, reports: &[SolveReport]) -> Self {
        let runs = reports.len();
        let successes = reports.iter().filter(|r| r.success).count();
        let mean = |total: f64| if runs == 0 { 0.0 } else { total / runs as f64 };
        Self {
            algorithm,
            runs,
            successes,
            success_rate: mean(successes as f64),
            mean_steps: mean(reports.iter().map(|r| r.steps as f64).sum()),
            mean_elapsed_ms: mean(reports.iter().map(|r| r.elapsed_ms).sum()),
            min_conflicts: reports.iter().map(|r| r.conflicts).min().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Comparison {
    board_size: BoardSize,
    algorithms: Vec<AlgorithmSummary>,
}

fn compare<R>(size: BoardSize, runs: usize, config: &SolverConfig, rng: &mut R) -> Comparison
where
    R: Rng + ?Sized,
{
    let algorithms = Algorithm::ALL
        .into_iter()
        .map(|algorithm| {
            let reports = (0..runs)
                .map(|_| nqueens_solver::solve(algorithm, size, config, rng))
                .collect::<Vec<_>>();
            AlgorithmSummary::from_reports(algorithm, &reports)
        })
        .collect();
    Comparison {
        board_size: size,
        algorithms,
    }
}

pub(crate) fn run(arg: &CompareArg) -> anyhow::Result<()> {
    let CompareArg {
        size,
        runs,
        config,
        seed,
        output,
    } = arg;

    let size = util::clamp_board_size(*size);
    let config = util::read_solver_config(config.as_deref())?;
    let mut rng = util::make_rng(*seed);

    eprintln!("Comparing algorithms on {size}x{size} over {runs} runs...");
    let comparison = compare(size, *runs, &config, &mut rng);
    eprintln!(
        "  {:<14} {:>8} {:>12} {:>12} {:>10}",
        "Algorithm", "Success", "Mean steps", "Mean ms", "Best"
    );
    for summary in &comparison.algorithms {
        eprintln!(
            "  {:<14} {:>7.0}% {:>12.1} {:>12.3} {:>10}",
            summary.algorithm.to_string(),
            summary.success_rate * 100.0,
            summary.mean_steps,
            summary.mean_elapsed_ms,
            summary.min_conflicts,
        );
    }

    Output::save_json(&comparison, output.clone())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_compare_covers_every_algorithm() {
        let mut rng = Pcg32::seed_from_u64(0);
        let comparison = compare(BoardSize::MIN, 3, &SolverConfig::default(), &mut rng);
        let algorithms = comparison
            .algorithms
            .iter()
            .map(|s| s.algorithm)
            .collect::<Vec<_>>();
        assert_eq!(algorithms, Algorithm::ALL);

        let backtracking = &comparison.algorithms[2];
        assert_eq!(backtracking.runs, 3);
        assert_eq!(backtracking.successes, 3);
        assert!((backtracking.success_rate - 1.0).abs() < f64::EPSILON);
        assert_eq!(backtracking.min_conflicts, 0);
    }

    #[test]
    fn test_summary_of_no_runs() {
        let summary = AlgorithmSummary::from_reports(Algorithm::Genetic, &[]);
        assert_eq!(summary.runs, 0);
        assert!(summary.mean_steps.abs() < f64::EPSILON);
    }
}
