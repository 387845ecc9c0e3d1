use std::time::Duration;

use nqueens_engine::{Board, BoardSize, Trace};
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    derive_more::FromStr,
    Serialize,
    Deserialize,
)]
pub enum Algorithm {
    #[display("Q-Learning")]
    #[serde(rename = "Q-Learning")]
    QLearning,
    #[display("Genetic")]
    Genetic,
    #[display("Backtracking")]
    Backtracking,
}

impl Algorithm {
    pub const ALL: [Self; 3] = [Self::QLearning, Self::Genetic, Self::Backtracking];
}

/// Outcome of one solve.
///
/// An unsuccessful report is still a valid result: it carries the best effort
/// found before the step or generation cap was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    pub algorithm: Algorithm,
    pub board_size: BoardSize,
    /// Final board, or `None` when backtracking exhausted the search.
    pub solution: Option<Board>,
    pub trace: Trace,
    /// Actions taken, generations run, or states explored, depending on the algorithm.
    pub steps: usize,
    /// Conflicts left on the final board; `n * n` when there is no board.
    pub conflicts: usize,
    pub success: bool,
    pub elapsed_ms: f64,
}

impl SolveReport {
    pub(crate) fn new(
        algorithm: Algorithm,
        board_size: BoardSize,
        solution: Option<Board>,
        trace: Trace,
        steps: usize,
        elapsed: Duration,
    ) -> Self {
        let n = board_size.get();
        let conflicts = solution.as_ref().map_or(n * n, Board::conflict_count);
        let success = solution.is_some() && conflicts == 0;
        let report = Self {
            algorithm,
            board_size,
            solution,
            trace,
            steps,
            conflicts,
            success,
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        };
        log::debug!(
            "{algorithm} on {n}x{n}: success={success}, steps={steps}, conflicts={conflicts}"
        );
        report
    }
}
