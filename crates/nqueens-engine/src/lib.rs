//! Board model, RL environment and multiplayer game engine for the N-Queens puzzle.
//!
//! - [`core`] - The [`Board`] value type and its conflict arithmetic
//! - [`engine`] - The RL [`Environment`], solution [`Trace`], and the turn-based
//!   multiplayer [`GameSession`] with its [`SessionStore`]

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("board size must be between 4 and 8, got {size}")]
pub struct InvalidBoardSizeError {
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidBoardError {
    #[display("{_0}")]
    Size(InvalidBoardSizeError),
    #[display("column {col} of row {row} is off the board")]
    ColumnOutOfRange { row: usize, col: usize },
}

impl From<InvalidBoardSizeError> for InvalidBoardError {
    fn from(err: InvalidBoardSizeError) -> Self {
        Self::Size(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("action ({row}, {col}) is off the board")]
pub struct InvalidActionError {
    pub row: usize,
    pub col: usize,
}

/// Rejection of a multiplayer move. The session is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    #[display("square ({row}, {col}) is off the board")]
    OutOfRange { row: usize, col: usize },
    #[display("row {row} already holds a queen")]
    RowOccupied { row: usize },
    #[display("square ({row}, {col}) is under attack")]
    SquareAttacked { row: usize, col: usize },
    #[display("row {row} holds no queen to move")]
    EmptySourceRow { row: usize },
    #[display("the queen already stands on ({row}, {col})")]
    SameSquare { row: usize, col: usize },
    #[display("move does not belong to the {phase} phase")]
    WrongPhase { phase: Phase },
    #[display("it is not {player}'s turn")]
    NotYourTurn { player: PlayerId },
    #[display("waiting for both players to join")]
    WaitingForPlayers,
    #[display("the game is already over")]
    SessionFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum JoinError {
    #[display("game already started")]
    GameAlreadyStarted,
    #[display("game is full")]
    SessionFull,
    #[display("seat of {player} already taken")]
    SeatTaken { player: PlayerId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SessionError {
    #[display("game {id} not found")]
    NotFound { id: SessionId },
    #[display("game {id} has no AI player")]
    NoAiPlayer { id: SessionId },
    #[display("{_0}")]
    Join(JoinError),
    #[display("{_0}")]
    Move(MoveError),
}

impl From<JoinError> for SessionError {
    fn from(err: JoinError) -> Self {
        Self::Join(err)
    }
}

impl From<MoveError> for SessionError {
    fn from(err: MoveError) -> Self {
        Self::Move(err)
    }
}
