use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    InvalidActionError, InvalidBoardSizeError,
    core::board::{Board, BoardSize, Square},
};

/// Reward for reaching a board without conflicts.
pub const SOLVED_REWARD: f32 = 10.0;
/// Reward per conflict removed by a step.
pub const IMPROVEMENT_REWARD: f32 = 1.0;
/// Penalty per conflict added by a step.
pub const WORSENING_PENALTY: f32 = -1.0;
/// Penalty for a step that leaves the conflict count unchanged.
pub const STAGNATION_PENALTY: f32 = -0.5;

/// Moves the queen of `row` to column `col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Action {
    pub row: usize,
    pub col: usize,
}

impl Action {
    /// Action returned when a policy finds no candidate move.
    pub const FALLBACK: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the board this action produces from `board`.
    #[must_use]
    pub fn apply_to(self, board: &Board) -> Board {
        board.with_queen(self.row, self.col)
    }
}

/// Result of a single [`Environment::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub board: Board,
    pub reward: f32,
    pub done: bool,
}

/// Computes the reward of a step from the conflict counts before and after it.
///
/// ```
/// use nqueens_engine::engine::reward;
///
/// assert_eq!(reward(3, 0), 10.0);
/// assert_eq!(reward(5, 3), 2.0);
/// assert_eq!(reward(2, 5), -3.0);
/// assert_eq!(reward(4, 4), -0.5);
/// ```
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub fn reward(old_conflicts: usize, new_conflicts: usize) -> f32 {
    if new_conflicts == 0 {
        SOLVED_REWARD
    } else if new_conflicts < old_conflicts {
        IMPROVEMENT_REWARD * (old_conflicts - new_conflicts) as f32
    } else if new_conflicts > old_conflicts {
        WORSENING_PENALTY * (new_conflicts - old_conflicts) as f32
    } else {
        STAGNATION_PENALTY
    }
}

/// Single-agent environment in which an action moves one queen within its row.
///
/// The board always holds exactly one queen per row. An episode starts from a
/// random placement and ends when no two queens conflict.
///
/// # Example
///
/// ```
/// use nqueens_engine::{Action, BoardSize, Environment};
///
/// let mut rng = rand::rng();
/// let mut env = Environment::new(BoardSize::new(4).unwrap(), &mut rng);
///
/// let board = env.reset(None, &mut rng);
/// assert_eq!(board.size().get(), 4);
///
/// let outcome = env.step(Action::new(0, 2)).unwrap();
/// assert_eq!(outcome.board.column(0), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct Environment {
    board: Board,
}

impl Environment {
    /// Creates an environment with a random initial board.
    pub fn new<R>(size: BoardSize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            board: Board::random(size, rng),
        }
    }

    /// Like [`Self::new`], but validates a raw size first.
    pub fn from_size<R>(size: usize, rng: &mut R) -> Result<Self, InvalidBoardSizeError>
    where
        R: Rng + ?Sized,
    {
        Ok(Self::new(BoardSize::new(size)?, rng))
    }

    /// Creates an environment starting from a given complete board.
    ///
    /// # Panics
    ///
    /// Panics if `board` has an empty row.
    #[must_use]
    pub fn with_board(board: Board) -> Self {
        assert!(board.is_complete(), "environment boards hold one queen per row");
        Self { board }
    }

    /// Places a fresh random queen in every row, optionally changing the board size.
    pub fn reset<R>(&mut self, size: Option<BoardSize>, rng: &mut R) -> Board
    where
        R: Rng + ?Sized,
    {
        let size = size.unwrap_or_else(|| self.board.size());
        self.board = Board::random(size, rng);
        self.board.clone()
    }

    /// Moves the queen of `action.row` to `action.col` and scores the change.
    ///
    /// See [`reward`] for the reward policy. The episode is done once the board
    /// has no conflicts.
    pub fn step(&mut self, action: Action) -> Result<StepOutcome, InvalidActionError> {
        let Action { row, col } = action;
        if !self.board.contains(row, col) {
            return Err(InvalidActionError { row, col });
        }

        let old_conflicts = self.board.conflict_count();
        self.board.place(row, col);
        let new_conflicts = self.board.conflict_count();

        Ok(StepOutcome {
            board: self.board.clone(),
            reward: reward(old_conflicts, new_conflicts),
            done: new_conflicts == 0,
        })
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn size(&self) -> BoardSize {
        self.board.size()
    }

    #[must_use]
    pub fn conflict_count(&self) -> usize {
        self.board.conflict_count()
    }

    #[must_use]
    pub fn attacked_squares(&self) -> BTreeSet<Square> {
        self.board.attacked_squares()
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.conflict_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_reset_produces_complete_board() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut env = Environment::new(BoardSize::MAX, &mut rng);

        let board = env.reset(Some(BoardSize::MIN), &mut rng);
        assert_eq!(board.size().get(), 4);
        assert!(board.placements().all(|col| col.is_some_and(|c| c < 4)));
        assert_eq!(env.board(), &board);

        let board = env.reset(None, &mut rng);
        assert_eq!(board.size().get(), 4);
    }

    #[test]
    fn test_from_size_rejects_out_of_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(
            Environment::from_size(9, &mut rng).unwrap_err(),
            InvalidBoardSizeError { size: 9 }
        );
        assert!(Environment::from_size(3, &mut rng).is_err());
        assert!(Environment::from_size(5, &mut rng).is_ok());
    }

    #[test]
    fn test_step_without_change_is_penalized() {
        let board = Board::from_columns([2, 2, 2, 2]).unwrap();
        let mut env = Environment::with_board(board.clone());
        let before = env.conflict_count();

        let outcome = env.step(Action::new(0, 2)).unwrap();
        assert_eq!(outcome.board, board);
        assert_eq!(outcome.board.conflict_count(), before);
        assert!((outcome.reward - STAGNATION_PENALTY).abs() < f32::EPSILON);
        assert!(!outcome.done);
    }

    #[test]
    fn test_step_reaching_solution() {
        let mut env = Environment::with_board(Board::from_columns([1, 3, 0, 0]).unwrap());
        let outcome = env.step(Action::new(3, 2)).unwrap();
        assert!(outcome.done);
        assert!((outcome.reward - SOLVED_REWARD).abs() < f32::EPSILON);
        assert!(env.is_solved());
    }

    #[test]
    fn test_step_scales_with_improvement() {
        // [0, 1, 2, 3] has 6 conflicts; moving row 1 to column 3 leaves 5
        let mut env = Environment::with_board(Board::from_columns([0, 1, 2, 3]).unwrap());
        let before = env.conflict_count();
        let outcome = env.step(Action::new(1, 3)).unwrap();
        let after = outcome.board.conflict_count();
        assert!(after < before);
        #[expect(clippy::cast_precision_loss)]
        let expected = (before - after) as f32;
        assert!((outcome.reward - expected).abs() < f32::EPSILON);
    }

    #[test]
    fn test_step_rejects_off_board_action() {
        let mut env = Environment::with_board(Board::from_columns([1, 3, 0, 2]).unwrap());
        assert_eq!(
            env.step(Action::new(4, 0)),
            Err(InvalidActionError { row: 4, col: 0 })
        );
        assert_eq!(
            env.step(Action::new(0, 7)),
            Err(InvalidActionError { row: 0, col: 7 })
        );
        assert_eq!(env.board(), &Board::from_columns([1, 3, 0, 2]).unwrap());
    }
}
