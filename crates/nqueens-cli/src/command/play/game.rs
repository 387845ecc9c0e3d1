use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use nqueens_engine::{
    AiTurn, Board, BoardSize, Difficulty, GameResult, Leaderboard, Move, MoveOutcome, Phase,
    Player, PlayerId, SessionError, SessionId, SessionSnapshot, SessionStatus, SessionStore,
    Square, TurnAction,
};
use nqueens_evaluator::heuristic_opponent::HeuristicOpponent;
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

const MESSAGE_HISTORY: usize = 8;

#[derive(Debug, Clone, Copy)]
pub(crate) struct GameSettings {
    pub size: BoardSize,
    pub difficulty: Difficulty,
    /// Start every game from a random complete board in the correction phase.
    pub scramble: bool,
    pub think_delay: Duration,
}

/// A human-vs-AI game as seen from the human seat.
///
/// Keeps the last known position even after the store has retired a finished
/// session, so the final board stays on screen.
#[derive(Debug)]
pub(crate) struct Game {
    store: SessionStore<HeuristicOpponent>,
    settings: GameSettings,
    rng: Pcg32,
    id: SessionId,
    snapshot: SessionSnapshot,
    cursor: Square,
    selected: Option<usize>,
    ai_due: Option<Instant>,
    messages: VecDeque<String>,
}

impl Game {
    pub(crate) fn new(
        settings: GameSettings,
        leaderboard: Leaderboard,
        mut rng: Pcg32,
    ) -> Result<Self, SessionError> {
        let opponent = HeuristicOpponent::new(Pcg32::from_rng(&mut rng));
        let mut store = SessionStore::with_leaderboard(opponent, leaderboard);
        let (id, snapshot) = start_session(&mut store, &settings, &mut rng)?;
        let mut game = Self {
            store,
            settings,
            rng,
            id,
            snapshot,
            cursor: Square::new(0, 0),
            selected: None,
            ai_due: None,
            messages: VecDeque::new(),
        };
        game.announce_start();
        Ok(game)
    }

    pub(crate) fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    pub(crate) fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub(crate) fn cursor(&self) -> Square {
        self.cursor
    }

    pub(crate) fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub(crate) fn messages(&self) -> impl Iterator<Item = &str> + '_ {
        self.messages.iter().map(String::as_str)
    }

    pub(crate) fn is_ai_thinking(&self) -> bool {
        self.ai_due.is_some()
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.snapshot.status.is_finished()
    }

    pub(crate) fn result(&self) -> Option<&GameResult> {
        self.store.result(self.id)
    }

    fn can_act(&self) -> bool {
        !self.is_finished() && !self.is_ai_thinking() && self.snapshot.current_turn == PlayerId::Human
    }

    pub(crate) fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let last = self.snapshot.board_size.get() - 1;
        self.cursor = Square::new(
            self.cursor.row.saturating_add_signed(d_row).min(last),
            self.cursor.col.saturating_add_signed(d_col).min(last),
        );
    }

    /// Plays at the cursor: places a queen, or picks and then relocates one.
    pub(crate) fn activate(&mut self, now: Instant) {
        if !self.can_act() {
            return;
        }
        let Square { row, col } = self.cursor;
        match (self.snapshot.phase, self.selected) {
            (Phase::Placement, _) => self.submit(Move::place(row, col), now),
            (Phase::Correction, None) => {
                if self.snapshot.queens.column(row) == Some(col) {
                    self.selected = Some(row);
                } else {
                    self.push_message("Select a queen to move first");
                }
            }
            (Phase::Correction, Some(from)) if from == row && self.snapshot.queens.column(row) == Some(col) => {
                self.selected = None;
            }
            (Phase::Correction, Some(from)) => self.submit(Move::relocate(from, row, col), now),
        }
    }

    pub(crate) fn cancel_selection(&mut self) {
        self.selected = None;
    }

    pub(crate) fn pass(&mut self, now: Instant) {
        if !self.can_act() {
            return;
        }
        match self.store.pass_turn(self.id, PlayerId::Human) {
            Ok(outcome) => {
                self.selected = None;
                self.absorb(&outcome);
                self.schedule_ai(now);
            }
            Err(err) => self.push_message(format!("Cannot pass: {err}")),
        }
    }

    /// Lets the AI move once its think delay has elapsed.
    pub(crate) fn update(&mut self, now: Instant) {
        let Some(due) = self.ai_due else {
            return;
        };
        if now < due {
            return;
        }
        self.ai_due = None;
        match self.store.play_ai_turn(self.id) {
            Ok(turn) => {
                if let AiTurn::Moved { exploring: true, .. } = turn {
                    log::debug!("AI played an exploring move");
                }
                self.absorb(turn.outcome());
            }
            Err(err) => {
                log::warn!("AI turn failed: {err}");
                self.push_message(format!("AI turn failed: {err}"));
            }
        }
    }

    /// Abandons the current game, if still running, and starts another.
    pub(crate) fn restart(&mut self) -> Result<(), SessionError> {
        self.abandon();
        let (id, snapshot) = start_session(&mut self.store, &self.settings, &mut self.rng)?;
        self.id = id;
        self.snapshot = snapshot;
        self.selected = None;
        self.ai_due = None;
        self.messages.clear();
        self.announce_start();
        Ok(())
    }

    /// Leaves an unfinished game; it is dropped without a result.
    pub(crate) fn abandon(&mut self) {
        if !self.is_finished() {
            let outcome = self.store.leave_session(self.id, PlayerId::Human);
            log::info!("left game {}: {outcome:?}", self.id);
        }
    }

    pub(crate) fn into_leaderboard(mut self) -> Leaderboard {
        self.abandon();
        self.store.into_leaderboard()
    }

    fn submit(&mut self, mv: Move, now: Instant) {
        match self.store.submit_move(self.id, PlayerId::Human, mv) {
            Ok(outcome) => {
                self.selected = None;
                self.absorb(&outcome);
                self.schedule_ai(now);
            }
            Err(err) => self.push_message(format!("Illegal move: {err}")),
        }
    }

    fn schedule_ai(&mut self, now: Instant) {
        if !self.is_finished() && self.snapshot.current_turn == PlayerId::Ai {
            self.ai_due = Some(now + self.settings.think_delay);
        }
    }

    /// Folds an accepted turn into the cached position.
    fn absorb(&mut self, outcome: &MoveOutcome) {
        let snapshot = &mut self.snapshot;
        if let TurnAction::Moved(mv) = outcome.action {
            snapshot.queens = mv.apply_to(&snapshot.queens);
            snapshot.placed_queens = snapshot.queens.placed_count();
            snapshot.moves += 1;
        }
        snapshot.conflicts = outcome.conflicts;
        snapshot.phase = outcome.phase;
        snapshot.status = outcome.status;
        snapshot.current_turn = outcome.next_turn;
        if let Ok(state) = self.store.state(self.id) {
            self.snapshot = state;
        }

        let player = outcome.player;
        match outcome.action {
            TurnAction::Moved(mv) => self.push_message(format!("{player}: {mv}")),
            TurnAction::Passed => self.push_message(format!("{player} passed")),
        }
        if outcome.entered_correction {
            self.push_message("Board full with conflicts: correction phase");
        }
        match outcome.status {
            SessionStatus::InProgress => {}
            SessionStatus::Solved { winner } => self.push_message(format!("Solved! {winner} wins")),
            SessionStatus::Stalled => self.push_message("Both players passed: game stalled"),
        }
        if let Some(result) = self.result() {
            let message = format!("Game over after {} moves in {:.1} s", result.moves, result.elapsed_secs);
            self.push_message(message);
        }
    }

    fn announce_start(&mut self) {
        let message = format!(
            "New {size}x{size} game against {difficulty} AI ({phase} phase)",
            size = self.snapshot.board_size,
            difficulty = self.settings.difficulty,
            phase = self.snapshot.phase,
        );
        self.push_message(message);
    }

    fn push_message(&mut self, message: impl Into<String>) {
        if self.messages.len() == MESSAGE_HISTORY {
            self.messages.pop_front();
        }
        self.messages.push_back(message.into());
    }
}

fn start_session(
    store: &mut SessionStore<HeuristicOpponent>,
    settings: &GameSettings,
    rng: &mut Pcg32,
) -> Result<(SessionId, SessionSnapshot), SessionError> {
    let id = if settings.scramble {
        let mut board = Board::random(settings.size, rng);
        while board.conflict_count() == 0 {
            board = Board::random(settings.size, rng);
        }
        store.create_session_from(board)
    } else {
        store.create_session(settings.size)
    };
    store.join_session(id, Player::human())?;
    store.join_session(id, Player::ai(settings.difficulty))?;
    Ok((id, store.state(id)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(size: usize, scramble: bool) -> Game {
        let settings = GameSettings {
            size: BoardSize::new(size).unwrap(),
            difficulty: Difficulty::Hard,
            scramble,
            think_delay: Duration::ZERO,
        };
        Game::new(settings, Leaderboard::new(), Pcg32::seed_from_u64(0)).unwrap()
    }

    fn cursor_to(game: &mut Game, row: usize, col: usize) {
        game.cursor = Square::new(row, col);
    }

    #[test]
    fn test_cursor_stays_on_board() {
        let mut game = game(5, false);
        game.move_cursor(-1, -1);
        assert_eq!(game.cursor(), Square::new(0, 0));
        game.move_cursor(10, 3);
        assert_eq!(game.cursor(), Square::new(4, 3));
    }

    #[test]
    fn test_ai_replies_after_delay() {
        let mut game = game(6, false);
        let now = Instant::now();
        cursor_to(&mut game, 0, 1);
        game.activate(now);
        assert_eq!(game.snapshot().queens.column(0), Some(1));
        assert!(game.is_ai_thinking());
        assert_eq!(game.snapshot().current_turn, PlayerId::Ai);

        // the human cannot move while the AI thinks
        cursor_to(&mut game, 5, 5);
        game.activate(now);
        assert_eq!(game.snapshot().moves, 1);

        game.update(now);
        assert!(!game.is_ai_thinking());
        assert_eq!(game.snapshot().moves, 2);
        assert_eq!(game.snapshot().placed_queens, 2);
        assert_eq!(game.snapshot().current_turn, PlayerId::Human);
    }

    #[test]
    fn test_illegal_move_is_reported() {
        let mut game = game(6, false);
        let now = Instant::now();
        cursor_to(&mut game, 0, 0);
        game.activate(now);
        game.update(now);
        let before = game.snapshot().clone();

        // same column as the first queen
        cursor_to(&mut game, 5, 0);
        game.activate(now);
        assert_eq!(game.snapshot(), &before);
        assert!(game.messages().last().unwrap().starts_with("Illegal move"));
    }

    #[test]
    fn test_correction_select_and_relocate() {
        let mut game = game(5, true);
        assert_eq!(game.snapshot().phase, Phase::Correction);
        let now = Instant::now();

        // an empty square cannot be selected in a full board, so pick a queen
        let queen = game.snapshot().queens.queens().next().unwrap();
        cursor_to(&mut game, queen.row, queen.col);
        game.activate(now);
        assert_eq!(game.selected(), Some(queen.row));
        // activating it again deselects
        game.activate(now);
        assert_eq!(game.selected(), None);

        let legal = game.store.session(game.id).unwrap().legal_moves();
        let Some(&Move::Relocate(mv)) = legal.first() else {
            // every queen is stuck; passing is the only option
            game.pass(now);
            assert_eq!(game.snapshot().current_turn, PlayerId::Ai);
            return;
        };
        let from_col = game.snapshot().queens.column(mv.from_row).unwrap();
        cursor_to(&mut game, mv.from_row, from_col);
        game.activate(now);
        cursor_to(&mut game, mv.to_row, mv.to_col);
        game.activate(now);
        assert_eq!(game.snapshot().queens.column(mv.to_row), Some(mv.to_col));
        assert_eq!(game.selected(), None);
    }

    #[test]
    fn test_finished_game_keeps_final_board_and_result() {
        let mut game = game(4, false);
        let now = Instant::now();
        for _ in 0..20 {
            if game.is_finished() {
                break;
            }
            let legal = game.store.session(game.id).unwrap().legal_moves();
            match legal.first() {
                Some(Move::Place(mv)) => {
                    cursor_to(&mut game, mv.row, mv.col);
                    game.activate(now);
                }
                _ => game.pass(now),
            }
            game.update(now);
        }
        assert!(game.is_finished());
        let result = game.result().unwrap();
        assert_eq!(result.winner, game.snapshot().status.winner());
        assert_eq!(result.moves, game.snapshot().moves);
        if result.winner.is_some() {
            assert!(game.snapshot().queens.is_complete());
            assert_eq!(game.snapshot().queens.conflict_count(), 0);
        }

        game.restart().unwrap();
        assert!(!game.is_finished());
        assert_eq!(game.snapshot().placed_queens, 0);
        assert_eq!(game.into_leaderboard().len(), 1);
    }
}
