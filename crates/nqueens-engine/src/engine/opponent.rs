use super::{
    difficulty::Difficulty,
    game_session::{GameSession, Move},
};

/// A move picked by an [`Opponent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedMove {
    pub mv: Move,
    /// Whether the move came from random exploration rather than strategy.
    pub exploring: bool,
}

/// Move-selection policy of the AI seat.
///
/// Returning `None` means no legal move exists for the current phase; the
/// session store then passes the AI's turn.
pub trait Opponent {
    fn select_move(&mut self, session: &GameSession, difficulty: Difficulty) -> Option<SelectedMove>;
}

impl<T> Opponent for &mut T
where
    T: Opponent + ?Sized,
{
    fn select_move(&mut self, session: &GameSession, difficulty: Difficulty) -> Option<SelectedMove> {
        (**self).select_move(session, difficulty)
    }
}
