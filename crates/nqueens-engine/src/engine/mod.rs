//! Single-player environment and multiplayer game logic built on [`Board`](crate::Board).
//!
//! - [`Environment`] - Reinforcement-learning environment: reset, step, reward
//! - [`Trace`] - Board snapshots recorded by the solvers
//! - [`GameSession`] - Turn-based two-phase game between a human and the AI
//! - [`Difficulty`] - Presets tuning the AI opponent
//! - [`Opponent`] - Move-selection seam implemented by the AI policy
//! - [`SessionStore`] - Live sessions, keyed by [`SessionId`], and the [`Leaderboard`]
//!
//! # Game Flow
//!
//! 1. Create a session in the [`SessionStore`] and seat a human and an AI
//! 2. The human places a queen on an unattacked square of an empty row
//! 3. The AI replies with a move chosen by the store's [`Opponent`]
//! 4. Once every row holds a queen, the game switches to relocating queens
//! 5. The first player to leave the board without conflicts wins; the store
//!    records the result and drops the session
//!
//! A player without a legal move passes. Two passes in a row stall the game,
//! which then ends without a winner.

pub use self::{
    difficulty::*, environment::*, game_session::*, leaderboard::*, opponent::*, session_store::*,
    trace::*,
};

mod difficulty;
mod environment;
mod game_session;
mod leaderboard;
mod opponent;
mod session_store;
mod trace;
