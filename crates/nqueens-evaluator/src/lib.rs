//! Move evaluation and the heuristic AI opponent of the two-player N-Queens game.
//!
//! The crate is layered the same way for both game phases:
//!
//! 1. **Move Evaluation** ([`move_evaluator`]) - Scores the board a single move produces
//! 2. **Turn Evaluation** ([`turn_evaluator`]) - Picks the highest-scoring move among candidates
//! 3. **Opponent Policy** ([`heuristic_opponent`]) - Decides between an exploring move and the
//!    turn evaluator's choice, driven by the [`Difficulty`] of the AI seat
//!
//! # Architecture
//!
//! ```text
//! HeuristicOpponent (explore or exploit)
//!     ↓ uses
//! TurnEvaluator (select best candidate)
//!     ↓ uses
//! MoveEvaluator (score single move)
//! ```
//!
//! # Scoring
//!
//! - **Placement phase** - [`MobilityEvaluator`](move_evaluator::MobilityEvaluator): the number
//!   of squares in still-empty rows that stay unattacked after the placement
//! - **Correction phase** - [`ConflictEvaluator`](move_evaluator::ConflictEvaluator): the
//!   negated conflict count after the relocation
//!
//! Both look a single ply ahead. Ties go to the first candidate in
//! [`GameSession::legal_moves`] order, so a seeded opponent is fully reproducible.
//!
//! # Example
//!
//! ```
//! use nqueens_engine::{BoardSize, Difficulty, Player, PlayerId, SessionStore, Move};
//! use nqueens_evaluator::heuristic_opponent::HeuristicOpponent;
//!
//! let mut store = SessionStore::new(HeuristicOpponent::seeded(7));
//! let id = store.create_session(BoardSize::new(6).unwrap());
//! store.join_session(id, Player::human()).unwrap();
//! store.join_session(id, Player::ai(Difficulty::Hard)).unwrap();
//!
//! let report = store.apply_move(id, PlayerId::Human, Move::place(0, 1)).unwrap();
//! assert!(report.ai.is_some());
//! ```
//!
//! [`Difficulty`]: nqueens_engine::Difficulty
//! [`GameSession::legal_moves`]: nqueens_engine::GameSession::legal_moves

pub mod heuristic_opponent;
pub mod move_evaluator;
pub mod turn_evaluator;
