//! Single-player N-Queens solvers.
//!
//! Three independent strategies search for a board without conflicts and
//! return a [`SolveReport`] carrying the final board and a [`Trace`] of the
//! boards visited on the way:
//!
//! - [`solve_with_q_learning`] - A [`QLearningAgent`] acting in the engine's
//!   [`Environment`], capped at [`SolverConfig::max_steps`] steps
//! - [`solve_genetic`] - Fitness-proportional genetic search, capped at
//!   [`GeneticParams::max_generations`] generations
//! - [`solve_backtracking`] - Exhaustive depth-first search
//!
//! Reaching a cap is not an error; the report then has `success == false` and
//! holds the best effort found.
//!
//! Every solve builds its own agent or population, so solves running in
//! parallel share nothing.
//!
//! [`Trace`]: nqueens_engine::Trace
//! [`Environment`]: nqueens_engine::Environment

use nqueens_engine::BoardSize;
use rand::Rng;

pub use self::{backtracking::*, config::*, genetic::*, q_learning::*, report::*};

mod backtracking;
mod config;
pub mod genes;
mod genetic;
mod q_learning;
mod report;

/// Runs `algorithm` once on a `size × size` board.
pub fn solve<R>(algorithm: Algorithm, size: BoardSize, config: &SolverConfig, rng: &mut R) -> SolveReport
where
    R: Rng + ?Sized,
{
    match algorithm {
        Algorithm::QLearning => solve_with_q_learning(size, config, rng),
        Algorithm::Genetic => solve_genetic(size, config, rng),
        Algorithm::Backtracking => solve_backtracking(size),
    }
}
