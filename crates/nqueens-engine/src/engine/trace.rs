use std::slice;

use serde::{Deserialize, Serialize};

use crate::core::board::Board;

/// Append-only sequence of board snapshots recorded while solving.
///
/// Solvers record one snapshot per decision step so callers can replay the
/// search. Recorded snapshots are never modified.
///
/// # Example
///
/// ```
/// use nqueens_engine::{Board, Trace};
///
/// let mut trace = Trace::new();
/// trace.record(&Board::from_columns([1, 3, 0, 2]).unwrap());
/// assert_eq!(trace.len(), 1);
/// assert_eq!(trace.last().unwrap().conflict_count(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    boards: Vec<Board>,
}

impl Trace {
    #[must_use]
    pub const fn new() -> Self {
        Self { boards: Vec::new() }
    }

    /// Appends a snapshot of `board`.
    pub fn record(&mut self, board: &Board) {
        self.boards.push(board.clone());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.boards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Board> {
        self.boards.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Board> {
        self.boards.last()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Board> {
        self.boards.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Board> {
        self.boards.iter()
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Board;
    type IntoIter = slice::Iter<'a, Board>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
