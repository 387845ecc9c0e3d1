//! Move evaluation: scoring the board a single move produces.
//!
//! A [`MoveEvaluator`] sees the board before the move and the move itself, and
//! returns a score where higher is better. Evaluators never check legality;
//! callers only hand them moves from [`GameSession::legal_moves`].
//!
//! [`GameSession::legal_moves`]: nqueens_engine::GameSession::legal_moves

use std::fmt;

use nqueens_engine::{Board, Move};

/// Scores moves by the board they produce.
pub trait MoveEvaluator: fmt::Debug + Send + Sync {
    /// Evaluates `mv` played on `board` and returns a score (higher is better).
    fn evaluate_move(&self, board: &Board, mv: Move) -> f32;
}

/// Prefers placements that keep the most room for later queens.
///
/// The score is the number of squares in still-empty rows that no queen
/// attacks once the move is played.
///
/// ```
/// use nqueens_engine::{Board, BoardSize, Move};
/// use nqueens_evaluator::move_evaluator::{MobilityEvaluator, MoveEvaluator as _};
///
/// let board = Board::empty(BoardSize::MIN);
/// // a corner queen leaves two free squares in each of the other three rows
/// assert_eq!(MobilityEvaluator.evaluate_move(&board, Move::place(0, 0)), 6.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MobilityEvaluator;

impl MobilityEvaluator {
    /// Counts the unattacked squares of the empty rows of `board`.
    #[must_use]
    pub fn free_squares(board: &Board) -> usize {
        let n = board.size().get();
        board
            .empty_rows()
            .map(|row| (0..n).filter(|&col| !board.is_attacked(row, col)).count())
            .sum()
    }
}

impl MoveEvaluator for MobilityEvaluator {
    #[expect(clippy::cast_precision_loss)]
    fn evaluate_move(&self, board: &Board, mv: Move) -> f32 {
        Self::free_squares(&mv.apply_to(board)) as f32
    }
}

/// Prefers relocations that leave the fewest conflicts.
///
/// ```
/// use nqueens_engine::{Board, Move};
/// use nqueens_evaluator::move_evaluator::{ConflictEvaluator, MoveEvaluator as _};
///
/// let board = Board::from_columns([1, 3, 0, 0]).unwrap();
/// assert_eq!(ConflictEvaluator.evaluate_move(&board, Move::relocate(3, 3, 2)), 0.0);
/// assert!(ConflictEvaluator.evaluate_move(&board, Move::relocate(3, 3, 1)) < 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictEvaluator;

impl MoveEvaluator for ConflictEvaluator {
    #[expect(clippy::cast_precision_loss)]
    fn evaluate_move(&self, board: &Board, mv: Move) -> f32 {
        -(mv.apply_to(board).conflict_count() as f32)
    }
}

#[cfg(test)]
mod tests {
    use nqueens_engine::BoardSize;

    use super::*;

    #[test]
    fn test_free_squares() {
        let size = BoardSize::MIN;
        assert_eq!(MobilityEvaluator::free_squares(&Board::empty(size)), 16);

        // rows 1 and 3 are still empty; (0, 1) and (2, 3) attack all of row 1
        let board = Board::from_placements([Some(1), None, Some(3), None]).unwrap();
        assert_eq!(MobilityEvaluator::free_squares(&board), 1);

        let solved = Board::from_columns([1, 3, 0, 2]).unwrap();
        assert_eq!(MobilityEvaluator::free_squares(&solved), 0);
    }

    #[test]
    fn test_mobility_of_center_and_edge() {
        let board = Board::empty(BoardSize::MIN);
        assert_eq!(MobilityEvaluator.evaluate_move(&board, Move::place(0, 1)), 6.0);
        // (1, 1) attacks more of the remaining rows than a corner
        assert_eq!(MobilityEvaluator.evaluate_move(&board, Move::place(1, 1)), 4.0);
    }

    #[test]
    fn test_conflict_evaluator_is_negated_conflicts() {
        let board = Board::from_columns([0, 0, 0, 0]).unwrap();
        assert_eq!(ConflictEvaluator.evaluate_move(&board, Move::relocate(0, 0, 0)), -6.0);
        assert_eq!(ConflictEvaluator.evaluate_move(&board, Move::relocate(3, 3, 2)), -4.0);
    }
}
