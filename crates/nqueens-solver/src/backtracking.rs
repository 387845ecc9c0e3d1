use std::time::Instant;

use nqueens_engine::{Board, BoardSize, Trace};

use crate::report::{Algorithm, SolveReport};

/// A partial assignment: rows `0..row` hold queens, the rest are empty.
struct Frame {
    row: usize,
    board: Board,
}

/// Depth-first search with an explicit stack of partial boards.
///
/// Columns are pushed in descending order, so the lowest column is expanded
/// first. Every popped frame is recorded into the trace, valid or not, and
/// `steps` in the report is the number of states explored (the trace length).
///
/// ```
/// use nqueens_engine::BoardSize;
/// use nqueens_solver::solve_backtracking;
///
/// let report = solve_backtracking(BoardSize::new(4).unwrap());
/// assert!(report.success);
/// assert_eq!(report.solution.unwrap().conflict_count(), 0);
/// assert!(!report.trace.is_empty());
/// ```
#[must_use]
pub fn solve_backtracking(size: BoardSize) -> SolveReport {
    let start = Instant::now();
    let n = size.get();
    let mut trace = Trace::new();
    let mut stack = vec![Frame {
        row: 0,
        board: Board::empty(size),
    }];

    let mut solution = None;
    while let Some(Frame { row, board }) = stack.pop() {
        trace.record(&board);
        if row == n {
            solution = Some(board);
            break;
        }
        for col in (0..n).rev() {
            if !board.is_attacked(row, col) {
                stack.push(Frame {
                    row: row + 1,
                    board: board.with_queen(row, col),
                });
            }
        }
    }

    let steps = trace.len();
    SolveReport::new(
        Algorithm::Backtracking,
        size,
        solution,
        trace,
        steps,
        start.elapsed(),
    )
}
