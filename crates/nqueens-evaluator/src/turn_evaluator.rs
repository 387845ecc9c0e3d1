//! Turn evaluation: picking the best move among candidates.
//!
//! The [`TurnEvaluator`] is greedy. It scores each candidate with a
//! [`MoveEvaluator`] and keeps the first one with the highest score; it never
//! looks at the opponent's reply.

use nqueens_engine::{Board, Move};

use crate::move_evaluator::MoveEvaluator;

/// A candidate chosen by [`TurnEvaluator::select_best_move`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: f32,
}

/// Selects the highest-scoring move.
#[derive(Debug)]
pub struct TurnEvaluator<'a> {
    move_evaluator: Box<dyn MoveEvaluator + 'a>,
}

impl<'a> TurnEvaluator<'a> {
    #[must_use]
    pub fn new(move_evaluator: Box<dyn MoveEvaluator + 'a>) -> Self {
        Self { move_evaluator }
    }

    /// Scores every candidate played on `board` and returns the best one.
    ///
    /// The earliest candidate wins ties. Returns `None` when there are no candidates.
    ///
    /// ```
    /// use nqueens_engine::{Board, Move};
    /// use nqueens_evaluator::{move_evaluator::ConflictEvaluator, turn_evaluator::TurnEvaluator};
    ///
    /// let evaluator = TurnEvaluator::new(Box::new(ConflictEvaluator));
    /// let board = Board::from_columns([1, 3, 0, 0]).unwrap();
    /// let candidates = (0..4).map(|col| Move::relocate(3, 3, col));
    /// let best = evaluator.select_best_move(&board, candidates).unwrap();
    /// assert_eq!(best.mv, Move::relocate(3, 3, 2));
    /// ```
    pub fn select_best_move<I>(&self, board: &Board, candidates: I) -> Option<ScoredMove>
    where
        I: IntoIterator<Item = Move>,
    {
        let mut best: Option<ScoredMove> = None;
        for mv in candidates {
            let score = self.move_evaluator.evaluate_move(board, mv);
            if best.is_none_or(|best| score > best.score) {
                best = Some(ScoredMove { mv, score });
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use nqueens_engine::BoardSize;

    use super::*;
    use crate::move_evaluator::MobilityEvaluator;

    /// Gives every move the same score.
    #[derive(Debug)]
    struct Flat;

    impl MoveEvaluator for Flat {
        fn evaluate_move(&self, _board: &Board, _mv: Move) -> f32 {
            1.0
        }
    }

    #[test]
    fn test_first_candidate_wins_ties() {
        let evaluator = TurnEvaluator::new(Box::new(Flat));
        let board = Board::empty(BoardSize::MIN);
        let candidates = [Move::place(2, 1), Move::place(0, 0), Move::place(3, 3)];
        let best = evaluator.select_best_move(&board, candidates).unwrap();
        assert_eq!(best.mv, Move::place(2, 1));
    }

    #[test]
    fn test_no_candidates() {
        let evaluator = TurnEvaluator::new(Box::new(MobilityEvaluator));
        let board = Board::empty(BoardSize::MIN);
        assert_eq!(evaluator.select_best_move(&board, []), None);
    }

    #[test]
    fn test_picks_maximum_score() {
        let evaluator = TurnEvaluator::new(Box::new(MobilityEvaluator));
        let board = Board::empty(BoardSize::new(6).unwrap());
        let candidates = (0..6)
            .flat_map(|row| (0..6).map(move |col| Move::place(row, col)))
            .collect::<Vec<_>>();
        let best = evaluator.select_best_move(&board, candidates.iter().copied()).unwrap();
        for &mv in &candidates {
            assert!(MobilityEvaluator.evaluate_move(&board, mv) <= best.score);
        }
        let first_best = candidates
            .iter()
            .copied()
            .find(|&mv| MobilityEvaluator.evaluate_move(&board, mv) == best.score);
        assert_eq!(first_best, Some(best.mv));
    }
}
