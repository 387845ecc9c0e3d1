use std::time::Duration;

use serde::{Deserialize, Serialize};

/// AI opponent strength.
///
/// Parses from its lowercase name:
///
/// ```
/// use nqueens_engine::Difficulty;
///
/// let difficulty: Difficulty = "hard".parse().unwrap();
/// assert_eq!(difficulty, Difficulty::Hard);
/// assert_eq!(Difficulty::default(), Difficulty::Medium);
/// ```
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    derive_more::FromStr,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[display("easy")]
    Easy,
    #[default]
    #[display("medium")]
    Medium,
    #[display("hard")]
    Hard,
}

/// Tuning of the AI opponent for one [`Difficulty`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyParams {
    /// Probability of an exploring (random) move instead of a strategic one.
    pub exploration_rate: f32,
    /// Learning rate associated with the level; the heuristic policy does not learn.
    pub learning_rate: f32,
    /// Search depth associated with the level; the heuristic looks one ply ahead.
    pub search_depth: u32,
    /// Pause a caller should insert before showing the AI's move.
    pub think_delay: Duration,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    #[must_use]
    pub const fn params(self) -> DifficultyParams {
        match self {
            Self::Easy => DifficultyParams {
                exploration_rate: 0.7,
                learning_rate: 0.1,
                search_depth: 1,
                think_delay: Duration::from_millis(1500),
            },
            Self::Medium => DifficultyParams {
                exploration_rate: 0.4,
                learning_rate: 0.2,
                search_depth: 2,
                think_delay: Duration::from_millis(1000),
            },
            Self::Hard => DifficultyParams {
                exploration_rate: 0.1,
                learning_rate: 0.3,
                search_depth: 3,
                think_delay: Duration::from_millis(500),
            },
        }
    }
}
