use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    JoinError, MoveError,
    core::board::{Board, BoardSize},
};

use super::difficulty::Difficulty;

/// Seat of a player. The human always sits at seat 0 and the AI at seat 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PlayerId {
    #[display("human")]
    Human,
    #[display("ai")]
    Ai,
}

impl PlayerId {
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Human => 0,
            Self::Ai => 1,
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Human => Self::Ai,
            Self::Ai => Self::Human,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Strength of the AI; `None` for the human.
    pub difficulty: Option<Difficulty>,
}

impl Player {
    #[must_use]
    pub const fn human() -> Self {
        Self {
            id: PlayerId::Human,
            difficulty: None,
        }
    }

    #[must_use]
    pub const fn ai(difficulty: Difficulty) -> Self {
        Self {
            id: PlayerId::Ai,
            difficulty: Some(difficulty),
        }
    }

    #[must_use]
    pub const fn is_ai(&self) -> bool {
        self.id.is_ai()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Players take turns filling empty rows.
    #[display("placement")]
    Placement,
    /// Every row is filled; players relocate queens to resolve conflicts.
    #[display("correction")]
    Correction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SessionStatus {
    InProgress,
    /// All queens placed without conflicts.
    Solved { winner: PlayerId },
    /// Both players passed in a row.
    Stalled,
}

impl SessionStatus {
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !self.is_in_progress()
    }

    #[must_use]
    pub const fn winner(self) -> Option<PlayerId> {
        match self {
            Self::Solved { winner } => Some(winner),
            Self::InProgress | Self::Stalled => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacementMove {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrectionMove {
    pub from_row: usize,
    pub to_row: usize,
    pub to_col: usize,
}

/// A move of the multiplayer game; each variant belongs to one [`Phase`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::From, Serialize, Deserialize,
)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Move {
    #[display("place queen at ({}, {})", _0.row, _0.col)]
    Place(PlacementMove),
    #[display("move queen from row {} to ({}, {})", _0.from_row, _0.to_row, _0.to_col)]
    #[serde(rename = "move")]
    Relocate(CorrectionMove),
}

impl Move {
    #[must_use]
    pub const fn place(row: usize, col: usize) -> Self {
        Self::Place(PlacementMove { row, col })
    }

    #[must_use]
    pub const fn relocate(from_row: usize, to_row: usize, to_col: usize) -> Self {
        Self::Relocate(CorrectionMove {
            from_row,
            to_row,
            to_col,
        })
    }

    #[must_use]
    pub const fn phase(self) -> Phase {
        match self {
            Self::Place(_) => Phase::Placement,
            Self::Relocate(_) => Phase::Correction,
        }
    }

    /// Returns the board this move produces, without any legality check.
    #[must_use]
    pub fn apply_to(self, board: &Board) -> Board {
        match self {
            Self::Place(PlacementMove { row, col }) => board.with_queen(row, col),
            Self::Relocate(CorrectionMove {
                from_row,
                to_row,
                to_col,
            }) => board.without_queen(from_row).with_queen(to_row, to_col),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant, Serialize)]
#[serde(tag = "type", content = "move", rename_all = "lowercase")]
pub enum TurnAction {
    Moved(Move),
    Passed,
}

/// Summary of one accepted turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub player: PlayerId,
    pub action: TurnAction,
    pub conflicts: usize,
    pub phase: Phase,
    /// Whether this turn filled the last empty row and started the correction phase.
    pub entered_correction: bool,
    pub status: SessionStatus,
    pub next_turn: PlayerId,
}

/// Turn-based two-phase game played by a human and the AI on one board.
///
/// During [`Phase::Placement`] players alternately put a queen on an empty row,
/// on a square no queen attacks. Filling the last row without conflicts wins
/// immediately; otherwise the game enters [`Phase::Correction`], where players
/// alternately relocate a queen onto a square the other queens do not attack.
/// Whoever removes the last conflict wins.
///
/// Every move is validated against the board as it will be with the moving
/// queen lifted, and a rejected move leaves the session untouched. The turn
/// passes to the other player after every accepted move or pass, including the
/// winning one.
///
/// # Example
///
/// ```
/// use nqueens_engine::{BoardSize, Difficulty, GameSession, Move, Player, PlayerId};
///
/// let mut session = GameSession::new(BoardSize::MIN);
/// session.join(Player::human()).unwrap();
/// session.join(Player::ai(Difficulty::Easy)).unwrap();
///
/// let outcome = session.apply(PlayerId::Human, Move::place(0, 1)).unwrap();
/// assert_eq!(outcome.next_turn, PlayerId::Ai);
/// assert!(session.apply(PlayerId::Ai, Move::place(1, 1)).is_err()); // same column
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    phase: Phase,
    status: SessionStatus,
    seats: [Option<Player>; 2],
    current_turn: PlayerId,
    move_count: usize,
    consecutive_passes: usize,
    created_at: DateTime<Utc>,
}

impl GameSession {
    #[must_use]
    pub fn new(size: BoardSize) -> Self {
        Self {
            board: Board::empty(size),
            phase: Phase::Placement,
            status: SessionStatus::InProgress,
            seats: [None; 2],
            current_turn: PlayerId::Human,
            move_count: 0,
            consecutive_passes: 0,
            created_at: Utc::now(),
        }
    }

    /// Starts a session from an arbitrary position.
    ///
    /// A complete board starts in the correction phase, so a scrambled board
    /// makes a correction puzzle.
    #[must_use]
    pub fn from_board(board: Board) -> Self {
        let phase = if board.is_complete() {
            Phase::Correction
        } else {
            Phase::Placement
        };
        Self {
            phase,
            board,
            ..Self::new(BoardSize::MIN)
        }
    }

    #[must_use]
    pub fn size(&self) -> BoardSize {
        self.board.size()
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn current_turn(&self) -> PlayerId {
        self.current_turn
    }

    #[must_use]
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    #[must_use]
    pub fn placed_count(&self) -> usize {
        self.board.placed_count()
    }

    #[must_use]
    pub fn conflict_count(&self) -> usize {
        self.board.conflict_count()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.seats[id.index()].as_ref()
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> + '_ {
        self.seats.iter().flatten()
    }

    /// Difficulty of the seated AI, if any.
    #[must_use]
    pub fn ai_difficulty(&self) -> Option<Difficulty> {
        self.player(PlayerId::Ai).and_then(|player| player.difficulty)
    }

    #[must_use]
    pub fn has_human(&self) -> bool {
        self.player(PlayerId::Human).is_some()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.seats.iter().all(Option::is_some)
    }

    /// Seats a player. Joining is refused once the first move has been made.
    pub fn join(&mut self, player: Player) -> Result<PlayerId, JoinError> {
        if self.move_count > 0 {
            return Err(JoinError::GameAlreadyStarted);
        }
        if self.is_full() {
            return Err(JoinError::SessionFull);
        }
        let seat = &mut self.seats[player.id.index()];
        if seat.is_some() {
            return Err(JoinError::SeatTaken { player: player.id });
        }
        *seat = Some(player);
        Ok(player.id)
    }

    /// Frees the seat of `id`, returning whether a player sat there.
    pub fn leave(&mut self, id: PlayerId) -> bool {
        self.seats[id.index()].take().is_some()
    }

    /// Checks whether `player` may make `mv` now, without changing anything.
    pub fn validate(&self, player: PlayerId, mv: Move) -> Result<(), MoveError> {
        self.check_turn(player)?;
        self.check_move(mv)
    }

    fn check_turn(&self, player: PlayerId) -> Result<(), MoveError> {
        if self.status.is_finished() {
            return Err(MoveError::SessionFinished);
        }
        if !self.is_full() {
            return Err(MoveError::WaitingForPlayers);
        }
        if player != self.current_turn {
            return Err(MoveError::NotYourTurn { player });
        }
        Ok(())
    }

    /// Checks the board rules for `mv`, ignoring whose turn it is.
    pub fn check_move(&self, mv: Move) -> Result<(), MoveError> {
        if mv.phase() != self.phase {
            return Err(MoveError::WrongPhase { phase: self.phase });
        }
        let board = &self.board;
        match mv {
            Move::Place(PlacementMove { row, col }) => {
                if !board.contains(row, col) {
                    return Err(MoveError::OutOfRange { row, col });
                }
                if board.column(row).is_some() {
                    return Err(MoveError::RowOccupied { row });
                }
                if board.is_attacked(row, col) {
                    return Err(MoveError::SquareAttacked { row, col });
                }
            }
            Move::Relocate(CorrectionMove {
                from_row,
                to_row,
                to_col,
            }) => {
                if !board.contains(from_row, 0) {
                    return Err(MoveError::OutOfRange {
                        row: from_row,
                        col: 0,
                    });
                }
                if !board.contains(to_row, to_col) {
                    return Err(MoveError::OutOfRange {
                        row: to_row,
                        col: to_col,
                    });
                }
                let Some(from_col) = board.column(from_row) else {
                    return Err(MoveError::EmptySourceRow { row: from_row });
                };
                if (from_row, from_col) == (to_row, to_col) {
                    return Err(MoveError::SameSquare {
                        row: to_row,
                        col: to_col,
                    });
                }
                let lifted = board.without_queen(from_row);
                if lifted.column(to_row).is_some() {
                    return Err(MoveError::RowOccupied { row: to_row });
                }
                if lifted.is_attacked(to_row, to_col) {
                    return Err(MoveError::SquareAttacked {
                        row: to_row,
                        col: to_col,
                    });
                }
            }
        }
        Ok(())
    }

    /// Enumerates every move the board rules allow in the current phase.
    ///
    /// Placements are listed row by row, then column by column. Relocations are
    /// listed by source row, then destination row and column.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.status.is_finished() {
            return vec![];
        }
        let n = self.size().get();
        let candidates: Vec<Move> = match self.phase {
            Phase::Placement => self
                .board
                .empty_rows()
                .flat_map(|row| (0..n).map(move |col| Move::place(row, col)))
                .collect(),
            Phase::Correction => self
                .board
                .queens()
                .flat_map(|queen| {
                    (0..n).flat_map(move |to_row| {
                        (0..n).map(move |to_col| Move::relocate(queen.row, to_row, to_col))
                    })
                })
                .collect(),
        };
        candidates
            .into_iter()
            .filter(|mv| self.check_move(*mv).is_ok())
            .collect()
    }

    /// Applies a move for `player`, or leaves the session untouched on error.
    pub fn apply(&mut self, player: PlayerId, mv: Move) -> Result<MoveOutcome, MoveError> {
        self.validate(player, mv)?;

        self.board = mv.apply_to(&self.board);
        self.move_count += 1;
        self.consecutive_passes = 0;

        let conflicts = self.board.conflict_count();
        let mut entered_correction = false;
        if self.board.is_complete() {
            if conflicts == 0 {
                self.status = SessionStatus::Solved { winner: player };
            } else if self.phase.is_placement() {
                self.phase = Phase::Correction;
                entered_correction = true;
            }
        }
        log::debug!("{player}: {mv} ({conflicts} conflicts)");

        Ok(self.end_turn(player, TurnAction::Moved(mv), entered_correction))
    }

    /// Gives up the turn of `player`. Two passes in a row stall the game.
    pub fn pass(&mut self, player: PlayerId) -> Result<MoveOutcome, MoveError> {
        self.check_turn(player)?;

        self.consecutive_passes += 1;
        if self.consecutive_passes >= 2 {
            self.status = SessionStatus::Stalled;
        }
        log::debug!("{player}: pass");

        Ok(self.end_turn(player, TurnAction::Passed, false))
    }

    fn end_turn(&mut self, player: PlayerId, action: TurnAction, entered_correction: bool) -> MoveOutcome {
        self.current_turn = player.other();
        MoveOutcome {
            player,
            action,
            conflicts: self.board.conflict_count(),
            phase: self.phase,
            entered_correction,
            status: self.status,
            next_turn: self.current_turn,
        }
    }
}
