use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    MoveError, SessionError,
    core::board::{Board, BoardSize},
};

use super::{
    game_session::{GameSession, Move, MoveOutcome, Phase, Player, PlayerId, SessionStatus},
    leaderboard::{GameResult, Leaderboard},
    opponent::Opponent,
};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::FromStr,
    Serialize,
    Deserialize,
)]
#[display("{_0}")]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Public view of a live session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub board_size: BoardSize,
    pub queens: Board,
    pub conflicts: usize,
    pub phase: Phase,
    pub placed_queens: usize,
    pub moves: usize,
    pub current_turn: PlayerId,
    pub players: Vec<Player>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn new(id: SessionId, session: &GameSession) -> Self {
        Self {
            id,
            board_size: session.size(),
            queens: session.board().clone(),
            conflicts: session.conflict_count(),
            phase: session.phase(),
            placed_queens: session.placed_count(),
            moves: session.move_count(),
            current_turn: session.current_turn(),
            players: session.players().copied().collect(),
            status: session.status(),
            created_at: session.created_at(),
        }
    }
}

/// What the AI did on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AiTurn {
    Moved { outcome: MoveOutcome, exploring: bool },
    /// The policy found no legal move.
    Passed { outcome: MoveOutcome },
}

impl AiTurn {
    #[must_use]
    pub const fn outcome(&self) -> &MoveOutcome {
        match self {
            Self::Moved { outcome, .. } | Self::Passed { outcome } => outcome,
        }
    }
}

/// Result of [`SessionStore::apply_move`]: the caller's move and the AI reply, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    pub outcome: MoveOutcome,
    pub ai: Option<AiTurn>,
}

impl MoveReport {
    /// Status of the session after the whole report.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.ai
            .as_ref()
            .map_or(self.outcome.status, |ai| ai.outcome().status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveOutcome {
    /// The session did not exist (any more).
    AlreadyRemoved,
    PlayerLeft,
    /// The last player left.
    SessionRemoved,
    /// Only the AI remained, so the game was dropped.
    SessionEnded,
}

/// Registry of live multiplayer sessions plus the results of finished ones.
///
/// The store owns the AI [`Opponent`] used for every AI seat. A session leaves
/// the store as soon as it finishes; its [`GameResult`] is then recorded in the
/// [`Leaderboard`].
///
/// # Example
///
/// ```
/// use nqueens_engine::{
///     BoardSize, Difficulty, GameSession, Move, Opponent, Player, PlayerId, SelectedMove,
///     SessionStore,
/// };
///
/// // Always plays the first legal move.
/// struct FirstMove;
///
/// impl Opponent for FirstMove {
///     fn select_move(&mut self, session: &GameSession, _: Difficulty) -> Option<SelectedMove> {
///         let mv = *session.legal_moves().first()?;
///         Some(SelectedMove { mv, exploring: false })
///     }
/// }
///
/// let mut store = SessionStore::new(FirstMove);
/// let id = store.create_session(BoardSize::MIN);
/// store.join_session(id, Player::human()).unwrap();
/// store.join_session(id, Player::ai(Difficulty::Easy)).unwrap();
///
/// let report = store.apply_move(id, PlayerId::Human, Move::place(0, 1)).unwrap();
/// assert!(report.ai.is_some());
/// assert_eq!(store.state(id).unwrap().current_turn, PlayerId::Human);
/// ```
#[derive(Debug)]
pub struct SessionStore<O> {
    sessions: BTreeMap<SessionId, GameSession>,
    leaderboard: Leaderboard,
    opponent: O,
    next_id: u64,
}

impl<O> SessionStore<O>
where
    O: Opponent,
{
    pub fn new(opponent: O) -> Self {
        Self::with_leaderboard(opponent, Leaderboard::new())
    }

    /// Creates a store continuing an existing leaderboard.
    ///
    /// New session ids start after the highest recorded one.
    pub fn with_leaderboard(opponent: O, leaderboard: Leaderboard) -> Self {
        let next_id = leaderboard
            .iter()
            .map(|r| r.session_id.get() + 1)
            .max()
            .unwrap_or(1);
        Self {
            sessions: BTreeMap::new(),
            leaderboard,
            opponent,
            next_id,
        }
    }

    pub fn create_session(&mut self, size: BoardSize) -> SessionId {
        self.insert_session(GameSession::new(size))
    }

    /// Creates a session starting from `board`; see [`GameSession::from_board`].
    pub fn create_session_from(&mut self, board: Board) -> SessionId {
        self.insert_session(GameSession::from_board(board))
    }

    fn insert_session(&mut self, session: GameSession) -> SessionId {
        let id = SessionId(self.next_id);
        self.next_id += 1;
        log::info!(
            "created game {id} with size {} in {} phase",
            session.size(),
            session.phase()
        );
        self.sessions.insert(id, session);
        id
    }

    pub fn join_session(&mut self, id: SessionId, player: Player) -> Result<PlayerId, SessionError> {
        let player_id = self.session_mut(id)?.join(player)?;
        log::info!("{player_id} joined game {id}");
        Ok(player_id)
    }

    pub fn session(&self, id: SessionId) -> Result<&GameSession, SessionError> {
        self.sessions.get(&id).ok_or(SessionError::NotFound { id })
    }

    fn session_mut(&mut self, id: SessionId) -> Result<&mut GameSession, SessionError> {
        self.sessions.get_mut(&id).ok_or(SessionError::NotFound { id })
    }

    pub fn state(&self, id: SessionId) -> Result<SessionSnapshot, SessionError> {
        Ok(SessionSnapshot::new(id, self.session(id)?))
    }

    pub fn session_ids(&self) -> impl Iterator<Item = SessionId> + '_ {
        self.sessions.keys().copied()
    }

    /// Applies a move without letting the AI reply.
    pub fn submit_move(&mut self, id: SessionId, player: PlayerId, mv: Move) -> Result<MoveOutcome, SessionError> {
        let outcome = self.session_mut(id)?.apply(player, mv)?;
        self.finish_if_done(id);
        Ok(outcome)
    }

    /// Applies a move and, when the AI is next, plays its reply right away.
    ///
    /// An AI reply the session rejects is turned into a pass, so an `Ok` is
    /// returned whenever the caller's own move was applied.
    pub fn apply_move(&mut self, id: SessionId, player: PlayerId, mv: Move) -> Result<MoveReport, SessionError> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::NotFound { id })?;
        let outcome = session.apply(player, mv)?;
        let ai = if outcome.status.is_in_progress() && outcome.next_turn.is_ai() {
            Some(Self::ai_turn(&mut self.opponent, session)?)
        } else {
            None
        };
        self.finish_if_done(id);
        Ok(MoveReport { outcome, ai })
    }

    /// Lets the AI play its turn.
    ///
    /// Callers wanting to honour the difficulty's think delay wait before calling this.
    pub fn play_ai_turn(&mut self, id: SessionId) -> Result<AiTurn, SessionError> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::NotFound { id })?;
        if session.player(PlayerId::Ai).is_none() {
            return Err(SessionError::NoAiPlayer { id });
        }
        let turn = Self::ai_turn(&mut self.opponent, session)?;
        self.finish_if_done(id);
        Ok(turn)
    }

    fn ai_turn(opponent: &mut O, session: &mut GameSession) -> Result<AiTurn, MoveError> {
        let difficulty = session.ai_difficulty().unwrap_or_default();
        let turn = match opponent.select_move(session, difficulty) {
            Some(selected) => match session.apply(PlayerId::Ai, selected.mv) {
                Ok(outcome) => AiTurn::Moved {
                    outcome,
                    exploring: selected.exploring,
                },
                Err(err) => {
                    log::warn!("AI move {} rejected: {err}; passing instead", selected.mv);
                    AiTurn::Passed {
                        outcome: session.pass(PlayerId::Ai)?,
                    }
                }
            },
            None => AiTurn::Passed {
                outcome: session.pass(PlayerId::Ai)?,
            },
        };
        Ok(turn)
    }

    /// Passes the turn of `player`.
    pub fn pass_turn(&mut self, id: SessionId, player: PlayerId) -> Result<MoveOutcome, SessionError> {
        let outcome = self.session_mut(id)?.pass(player)?;
        self.finish_if_done(id);
        Ok(outcome)
    }

    /// Removes `player` from the session. The session is dropped once no human remains.
    pub fn leave_session(&mut self, id: SessionId, player: PlayerId) -> LeaveOutcome {
        let Some(session) = self.sessions.get_mut(&id) else {
            return LeaveOutcome::AlreadyRemoved;
        };
        session.leave(player);
        let outcome = if session.players().next().is_none() {
            LeaveOutcome::SessionRemoved
        } else if !session.has_human() {
            LeaveOutcome::SessionEnded
        } else {
            return LeaveOutcome::PlayerLeft;
        };
        self.sessions.remove(&id);
        log::info!("{player} left game {id}; game removed");
        outcome
    }

    fn finish_if_done(&mut self, id: SessionId) {
        if !self
            .sessions
            .get(&id)
            .is_some_and(|session| session.status().is_finished())
        {
            return;
        }
        if let Some(session) = self.sessions.remove(&id) {
            let result = GameResult::from_session(id, &session, Utc::now());
            match result.winner {
                Some(winner) => log::info!("game {id} won by {winner} in {} moves", result.moves),
                None => log::info!("game {id} stalled after {} moves", result.moves),
            }
            self.leaderboard.record(result);
        }
    }

    #[must_use]
    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Result of a finished session.
    #[must_use]
    pub fn result(&self, id: SessionId) -> Option<&GameResult> {
        self.leaderboard.get(id)
    }

    pub fn into_leaderboard(self) -> Leaderboard {
        self.leaderboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Difficulty, JoinError, SelectedMove, engine::game_session::TurnAction};

    /// Plays the first legal move, counting its calls.
    #[derive(Default)]
    struct FirstLegal {
        calls: usize,
    }

    impl Opponent for FirstLegal {
        fn select_move(&mut self, session: &GameSession, _difficulty: Difficulty) -> Option<SelectedMove> {
            self.calls += 1;
            let mv = *session.legal_moves().first()?;
            Some(SelectedMove { mv, exploring: false })
        }
    }

    fn store_with_game(size: usize) -> (SessionStore<FirstLegal>, SessionId) {
        let mut store = SessionStore::new(FirstLegal::default());
        let id = store.create_session(BoardSize::new(size).unwrap());
        store.join_session(id, Player::human()).unwrap();
        store.join_session(id, Player::ai(Difficulty::Hard)).unwrap();
        (store, id)
    }

    #[test]
    fn test_unknown_session() {
        let mut store = SessionStore::new(FirstLegal::default());
        let id = SessionId::new(99);
        assert_eq!(store.state(id).unwrap_err(), SessionError::NotFound { id });
        assert_eq!(
            store.join_session(id, Player::human()),
            Err(SessionError::NotFound { id })
        );
        assert_eq!(store.leave_session(id, PlayerId::Human), LeaveOutcome::AlreadyRemoved);
    }

    #[test]
    fn test_join_errors_are_wrapped() {
        let (mut store, id) = store_with_game(4);
        assert_eq!(
            store.join_session(id, Player::human()),
            Err(SessionError::Join(JoinError::SessionFull))
        );
    }

    #[test]
    fn test_apply_move_triggers_ai_reply() {
        let (mut store, id) = store_with_game(5);
        let report = store.apply_move(id, PlayerId::Human, Move::place(0, 0)).unwrap();
        assert_eq!(report.outcome.next_turn, PlayerId::Ai);

        let ai = report.ai.unwrap();
        assert!(ai.is_moved());
        assert_eq!(ai.outcome().player, PlayerId::Ai);
        assert_eq!(ai.outcome().next_turn, PlayerId::Human);

        let state = store.state(id).unwrap();
        assert_eq!(state.moves, 2);
        assert_eq!(state.placed_queens, 2);
        assert_eq!(state.current_turn, PlayerId::Human);
        assert_eq!(store.opponent.calls, 1);
    }

    #[test]
    fn test_rejected_move_leaves_state() {
        let (mut store, id) = store_with_game(4);
        let before = store.state(id).unwrap();
        assert_eq!(
            store.apply_move(id, PlayerId::Ai, Move::place(0, 0)),
            Err(SessionError::Move(MoveError::NotYourTurn { player: PlayerId::Ai }))
        );
        assert_eq!(store.state(id).unwrap(), before);
        assert_eq!(store.opponent.calls, 0);
    }

    #[test]
    fn test_submit_then_play_ai_turn() {
        let (mut store, id) = store_with_game(4);
        store.submit_move(id, PlayerId::Human, Move::place(0, 1)).unwrap();
        assert_eq!(store.state(id).unwrap().current_turn, PlayerId::Ai);
        assert_eq!(store.opponent.calls, 0);

        let turn = store.play_ai_turn(id).unwrap();
        assert!(turn.is_moved());
        assert_eq!(
            store.play_ai_turn(id),
            Err(SessionError::Move(MoveError::NotYourTurn { player: PlayerId::Ai }))
        );
    }

    #[test]
    fn test_play_ai_turn_without_ai() {
        let mut store = SessionStore::new(FirstLegal::default());
        let id = store.create_session(BoardSize::MIN);
        store.join_session(id, Player::human()).unwrap();
        assert_eq!(store.play_ai_turn(id), Err(SessionError::NoAiPlayer { id }));
    }

    #[test]
    fn test_finished_session_is_recorded_and_removed() {
        let (mut store, id) = store_with_game(4);
        // human and AI complete [1, 3, 0, 2] between them
        store.submit_move(id, PlayerId::Human, Move::place(0, 1)).unwrap();
        store.submit_move(id, PlayerId::Ai, Move::place(1, 3)).unwrap();
        store.submit_move(id, PlayerId::Human, Move::place(2, 0)).unwrap();
        let outcome = store.submit_move(id, PlayerId::Ai, Move::place(3, 2)).unwrap();
        assert_eq!(outcome.status.winner(), Some(PlayerId::Ai));

        assert_eq!(store.state(id), Err(SessionError::NotFound { id }));
        let result = store.result(id).unwrap();
        assert_eq!(result.winner, Some(PlayerId::Ai));
        assert_eq!(result.moves, 4);
        assert!(result.against_ai);
        assert_eq!(result.ai_difficulty, Some(Difficulty::Hard));
        assert_eq!(result.board_size, BoardSize::MIN);
    }

    #[test]
    fn test_ai_passes_and_stall_finishes_game() {
        let (mut store, id) = store_with_game(4);
        // leaves row 2 fully attacked with the AI to move
        store.submit_move(id, PlayerId::Human, Move::place(0, 0)).unwrap();
        store.submit_move(id, PlayerId::Ai, Move::place(1, 2)).unwrap();
        let report = store.apply_move(id, PlayerId::Human, Move::place(3, 1)).unwrap();
        let ai = report.ai.unwrap();
        assert!(ai.is_passed());
        assert_eq!(ai.outcome().action, TurnAction::Passed);
        assert!(report.status().is_in_progress());

        let outcome = store.pass_turn(id, PlayerId::Human).unwrap();
        assert_eq!(outcome.status, SessionStatus::Stalled);
        assert_eq!(store.result(id).unwrap().winner, None);
        assert_eq!(store.session_ids().count(), 0);
    }

    /// Always answers with the top-left square.
    struct Stubborn;

    impl Opponent for Stubborn {
        fn select_move(&mut self, _session: &GameSession, _difficulty: Difficulty) -> Option<SelectedMove> {
            Some(SelectedMove {
                mv: Move::place(0, 0),
                exploring: false,
            })
        }
    }

    #[test]
    fn test_rejected_ai_reply_becomes_pass() {
        let mut store = SessionStore::new(Stubborn);
        let id = store.create_session(BoardSize::new(4).unwrap());
        store.join_session(id, Player::human()).unwrap();
        store.join_session(id, Player::ai(Difficulty::Hard)).unwrap();

        let report = store.apply_move(id, PlayerId::Human, Move::place(0, 1)).unwrap();
        assert!(report.outcome.action.is_moved());
        let ai = report.ai.unwrap();
        assert!(matches!(ai, AiTurn::Passed { .. }));
        assert_eq!(report.status(), SessionStatus::InProgress);

        let state = store.state(id).unwrap();
        assert_eq!(state.moves, 1);
        assert_eq!(state.current_turn, PlayerId::Human);

        // human passes too: the session stalls and is recorded
        let outcome = store.pass_turn(id, PlayerId::Human).unwrap();
        assert_eq!(outcome.status, SessionStatus::Stalled);
        assert!(store.session(id).is_err());
        assert_eq!(store.result(id).unwrap().winner, None);
    }

    #[test]
    fn test_leave_semantics() {
        let (mut store, id) = store_with_game(4);
        assert_eq!(store.leave_session(id, PlayerId::Ai), LeaveOutcome::PlayerLeft);
        assert!(store.session(id).is_ok());
        assert_eq!(store.leave_session(id, PlayerId::Human), LeaveOutcome::SessionRemoved);
        assert!(store.session(id).is_err());

        let (mut store, id) = store_with_game(4);
        assert_eq!(store.leave_session(id, PlayerId::Human), LeaveOutcome::SessionEnded);
        assert!(store.session(id).is_err());
        assert!(store.result(id).is_none());
    }

    #[test]
    fn test_ids_continue_after_loaded_leaderboard() {
        let (mut store, id) = store_with_game(4);
        store.submit_move(id, PlayerId::Human, Move::place(0, 0)).unwrap();
        store.submit_move(id, PlayerId::Ai, Move::place(1, 2)).unwrap();
        store.submit_move(id, PlayerId::Human, Move::place(3, 1)).unwrap();
        store.pass_turn(id, PlayerId::Ai).unwrap();
        store.pass_turn(id, PlayerId::Human).unwrap();

        let leaderboard = store.into_leaderboard();
        assert_eq!(leaderboard.len(), 1);
        let mut store = SessionStore::with_leaderboard(FirstLegal::default(), leaderboard);
        assert!(store.create_session(BoardSize::MIN) > id);
    }
}
