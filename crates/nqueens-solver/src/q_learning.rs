//! Tabular Q-learning over complete boards.
//!
//! The agent learns a value for every `(board, action)` pair it has updated,
//! where an action moves the queen of one row to another column. Values are
//! kept in a sparse [`QTable`] keyed by the full board; unseen pairs are worth
//! `0.0` and entries are never evicted.
//!
//! # Action Selection
//!
//! [`QLearningAgent::choose_action`] is epsilon-greedy with two twists:
//!
//! - The exploration rate decays on *every* call, before the draw, down to a
//!   floor.
//! - A board the agent never acted from is always explored.
//!
//! Exploring is not uniform: the agent picks a random row and moves its queen to
//! the column that leaves the fewest conflicts (one-step lookahead). Exploiting
//! picks uniformly among the actions with the highest known value.
//!
//! # Example
//!
//! ```
//! use nqueens_engine::BoardSize;
//! use nqueens_solver::{SolverConfig, solve_with_q_learning};
//!
//! let mut rng = rand::rng();
//! let report = solve_with_q_learning(BoardSize::new(4).unwrap(), &SolverConfig::default(), &mut rng);
//! assert!(report.steps <= 1000);
//! assert_eq!(report.trace.len(), report.steps + 1);
//! ```

use std::{
    collections::{HashMap, HashSet},
    time::Instant,
};

use nqueens_engine::{Action, Board, BoardSize, Environment, Trace};
use rand::{Rng, seq::IndexedRandom as _};

use crate::{
    config::{QLearningParams, SolverConfig},
    report::{Algorithm, SolveReport},
};

/// Sparse `(board, action) -> value` table.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    values: HashMap<(Board, Action), f32>,
}

impl QTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `action` from `board`, `0.0` when never updated.
    #[must_use]
    pub fn get(&self, board: &Board, action: Action) -> f32 {
        self.values
            .get(&(board.clone(), action))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, board: &Board, action: Action, value: f32) {
        self.values.insert((board.clone(), action), value);
    }

    /// Highest value over every action available from `board`.
    #[must_use]
    pub fn max_value(&self, board: &Board) -> Option<f32> {
        moves(board)
            .map(|action| self.get(board, action))
            .max_by(f32::total_cmp)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Every action that moves some queen to a different column of its row.
fn moves(board: &Board) -> impl Iterator<Item = Action> + '_ {
    let n = board.size().get();
    board.placements().enumerate().flat_map(move |(row, current)| {
        (0..n)
            .filter(move |&col| Some(col) != current)
            .map(move |col| Action::new(row, col))
    })
}

/// Q-learning agent owning its table and visited-state set.
///
/// Each solve builds its own agent, so concurrent solves never share a table.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    params: QLearningParams,
    exploration_rate: f32,
    q_table: QTable,
    visited: HashSet<Board>,
}

impl QLearningAgent {
    #[must_use]
    pub fn new(params: QLearningParams) -> Self {
        Self {
            params,
            exploration_rate: params.exploration_rate,
            q_table: QTable::new(),
            visited: HashSet::new(),
        }
    }

    #[must_use]
    pub fn params(&self) -> &QLearningParams {
        &self.params
    }

    /// Current (decayed) exploration rate.
    #[must_use]
    pub fn exploration_rate(&self) -> f32 {
        self.exploration_rate
    }

    /// Restores the exploration rate to its initial value.
    pub fn reset_exploration(&mut self) {
        self.exploration_rate = self.params.exploration_rate;
    }

    #[must_use]
    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    #[must_use]
    pub fn q_value(&self, board: &Board, action: Action) -> f32 {
        self.q_table.get(board, action)
    }

    #[must_use]
    pub fn has_visited(&self, board: &Board) -> bool {
        self.visited.contains(board)
    }

    /// Chooses the next action from a complete `board`.
    pub fn choose_action<R>(&mut self, board: &Board, rng: &mut R) -> Action
    where
        R: Rng + ?Sized,
    {
        self.exploration_rate = f32::max(
            self.params.min_exploration_rate,
            self.exploration_rate * self.params.exploration_decay,
        );

        if rng.random::<f32>() < self.exploration_rate || !self.has_visited(board) {
            let action = explore(board, rng);
            log::trace!("explore: {action:?} (rate {:.3})", self.exploration_rate);
            action
        } else {
            let action = self.exploit(board, rng);
            log::trace!("exploit: {action:?}");
            action
        }
    }

    #[expect(clippy::float_cmp)]
    fn exploit<R>(&self, board: &Board, rng: &mut R) -> Action
    where
        R: Rng + ?Sized,
    {
        let mut best_value = f32::NEG_INFINITY;
        let mut best_actions = vec![];
        for action in moves(board) {
            let value = self.q_value(board, action);
            if value > best_value {
                best_value = value;
                best_actions.clear();
                best_actions.push(action);
            } else if value == best_value {
                best_actions.push(action);
            }
        }
        best_actions.choose(rng).copied().unwrap_or(Action::FALLBACK)
    }

    /// Applies the Bellman update for `action` taken from `board`.
    ///
    /// The value is stored under the pre-action board; `next_board` only
    /// supplies the best future value, which is `0.0` when `done`.
    pub fn learn(&mut self, board: &Board, action: Action, reward: f32, next_board: &Board, done: bool) {
        self.visited.insert(board.clone());

        let current = self.q_value(board, action);
        let max_future = if done {
            0.0
        } else {
            self.q_table.max_value(next_board).unwrap_or(0.0)
        };
        let QLearningParams {
            learning_rate,
            discount_factor,
            ..
        } = self.params;
        let updated = current + learning_rate * (reward + discount_factor * max_future - current);
        self.q_table.set(board, action, updated);
    }
}

/// Moves the queen of a random row to the column leaving the fewest conflicts.
///
/// Ties go to the lowest column.
fn explore<R>(board: &Board, rng: &mut R) -> Action
where
    R: Rng + ?Sized,
{
    let n = board.size().get();
    let row = rng.random_range(0..n);
    let current = board.column(row);
    (0..n)
        .filter(|&col| Some(col) != current)
        .map(|col| Action::new(row, col))
        .min_by_key(|action| action.apply_to(board).conflict_count())
        .unwrap_or(Action::FALLBACK)
}

/// Runs one Q-learning episode from a fresh random board.
///
/// The trace starts with the initial board and gains one snapshot per step.
/// The episode stops once the board is solved or after `config.max_steps` steps.
pub fn solve_with_q_learning<R>(size: BoardSize, config: &SolverConfig, rng: &mut R) -> SolveReport
where
    R: Rng + ?Sized,
{
    let start = Instant::now();
    let mut env = Environment::new(size, rng);
    let mut agent = QLearningAgent::new(config.q_learning);

    let mut board = env.reset(None, rng);
    let mut trace = Trace::new();
    trace.record(&board);

    let mut steps = 0;
    let mut done = env.is_solved();
    while !done && steps < config.max_steps {
        let action = agent.choose_action(&board, rng);
        let outcome = env
            .step(action)
            .expect("agent actions always stay on the board");
        agent.learn(&board, action, outcome.reward, &outcome.board, outcome.done);
        trace.record(&outcome.board);
        board = outcome.board;
        done = outcome.done;
        steps += 1;
    }
    log::debug!(
        "q-learning finished after {steps} steps with {} table entries",
        agent.q_table().len()
    );

    SolveReport::new(
        Algorithm::QLearning,
        size,
        Some(board),
        trace,
        steps,
        start.elapsed(),
    )
}
