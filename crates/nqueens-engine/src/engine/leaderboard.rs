use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::board::BoardSize;

use super::{
    difficulty::Difficulty,
    game_session::{GameSession, PlayerId},
    session_store::SessionId,
};

/// Record of a finished multiplayer game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub session_id: SessionId,
    /// `None` when the game stalled.
    pub winner: Option<PlayerId>,
    pub elapsed_secs: f64,
    pub moves: usize,
    pub finished_at: DateTime<Utc>,
    pub against_ai: bool,
    pub ai_difficulty: Option<Difficulty>,
    pub board_size: BoardSize,
}

impl GameResult {
    #[must_use]
    pub fn from_session(session_id: SessionId, session: &GameSession, finished_at: DateTime<Utc>) -> Self {
        let elapsed = finished_at - session.created_at();
        #[expect(clippy::cast_precision_loss)]
        let elapsed_secs = elapsed.num_milliseconds().max(0) as f64 / 1000.0;
        Self {
            session_id,
            winner: session.status().winner(),
            elapsed_secs,
            moves: session.move_count(),
            finished_at,
            against_ai: session.player(PlayerId::Ai).is_some(),
            ai_difficulty: session.ai_difficulty(),
            board_size: session.size(),
        }
    }
}

/// Append-only log of finished games.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    results: Vec<GameResult>,
}

impl Leaderboard {
    #[must_use]
    pub const fn new() -> Self {
        Self { results: vec![] }
    }

    pub fn record(&mut self, result: GameResult) {
        self.results.push(result);
    }

    /// Looks up the result of a finished session.
    #[must_use]
    pub fn get(&self, session_id: SessionId) -> Option<&GameResult> {
        self.results.iter().find(|r| r.session_id == session_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameResult> + '_ {
        self.results.iter()
    }

    /// Games won by `winner`, fastest first, ties broken by fewer moves.
    #[must_use]
    pub fn ranked(&self, winner: PlayerId) -> Vec<&GameResult> {
        let mut ranked = self
            .results
            .iter()
            .filter(|r| r.winner == Some(winner))
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| {
            a.elapsed_secs
                .total_cmp(&b.elapsed_secs)
                .then(a.moves.cmp(&b.moves))
        });
        ranked
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn result(id: u64, winner: Option<PlayerId>, elapsed_secs: f64, moves: usize) -> GameResult {
        GameResult {
            session_id: SessionId::new(id),
            winner,
            elapsed_secs,
            moves,
            finished_at: DateTime::UNIX_EPOCH,
            against_ai: true,
            ai_difficulty: Some(Difficulty::Medium),
            board_size: BoardSize::MIN,
        }
    }

    #[test]
    fn test_from_session() {
        let session = GameSession::new(BoardSize::new(6).unwrap());
        let finished_at = session.created_at() + TimeDelta::milliseconds(2500);
        let result = GameResult::from_session(SessionId::new(3), &session, finished_at);
        assert!((result.elapsed_secs - 2.5).abs() < f64::EPSILON);
        assert_eq!(result.winner, None);
        assert!(!result.against_ai);
        assert_eq!(result.board_size.get(), 6);
    }

    #[test]
    fn test_lookup_and_ranking() {
        let mut leaderboard = Leaderboard::new();
        leaderboard.record(result(1, Some(PlayerId::Human), 30.0, 4));
        leaderboard.record(result(2, Some(PlayerId::Ai), 10.0, 5));
        leaderboard.record(result(3, Some(PlayerId::Human), 12.0, 6));
        leaderboard.record(result(4, None, 1.0, 2));
        leaderboard.record(result(5, Some(PlayerId::Human), 12.0, 5));

        assert_eq!(leaderboard.get(SessionId::new(2)).unwrap().moves, 5);
        assert!(leaderboard.get(SessionId::new(9)).is_none());

        let ids = leaderboard
            .ranked(PlayerId::Human)
            .iter()
            .map(|r| r.session_id)
            .collect::<Vec<_>>();
        assert_eq!(ids, [5, 3, 1].map(SessionId::new));
    }
}
