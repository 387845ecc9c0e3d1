use std::{collections::BTreeSet, fmt};

use arrayvec::ArrayVec;
use rand::{Rng, seq::SliceRandom as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{InvalidBoardError, InvalidBoardSizeError};

/// Largest supported board dimension.
const MAX_SIZE: usize = 8;
/// Number of diagonals in one direction on the largest board.
const MAX_DIAGONALS: usize = 2 * MAX_SIZE - 1;

/// Dimension of a square board, bounded to `4..=8`.
///
/// Out-of-range values are rejected by [`BoardSize::new`]. Callers that accept
/// user input are expected to clamp it first with [`BoardSize::clamped`].
///
/// # Example
///
/// ```
/// use nqueens_engine::BoardSize;
///
/// assert_eq!(BoardSize::new(6).unwrap().get(), 6);
/// assert!(BoardSize::new(12).is_err());
/// assert_eq!(BoardSize::clamped(12), BoardSize::MAX);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display, Serialize, Deserialize,
)]
#[display("{_0}")]
#[serde(try_from = "usize", into = "usize")]
pub struct BoardSize(u8);

impl BoardSize {
    pub const MIN: Self = Self(4);
    pub const MAX: Self = Self(8);

    /// Creates a board size, rejecting values outside `4..=8`.
    pub fn new(size: usize) -> Result<Self, InvalidBoardSizeError> {
        if !(Self::MIN.get()..=Self::MAX.get()).contains(&size) {
            return Err(InvalidBoardSizeError { size });
        }
        // `size` is at most 8 here
        #[expect(clippy::cast_possible_truncation)]
        let size = size as u8;
        Ok(Self(size))
    }

    /// Clamps an arbitrary request into the supported range.
    #[must_use]
    pub fn clamped(size: usize) -> Self {
        let size = size.clamp(Self::MIN.get(), Self::MAX.get());
        Self::new(size).unwrap_or(Self::MAX)
    }

    #[must_use]
    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl TryFrom<usize> for BoardSize {
    type Error = InvalidBoardSizeError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl From<BoardSize> for usize {
    fn from(size: BoardSize) -> Self {
        size.get()
    }
}

/// A board square addressed by row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

impl Square {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns whether a queen on `self` attacks `other` (same row, column or diagonal).
    #[must_use]
    pub fn attacks(self, other: Square) -> bool {
        self.row == other.row
            || self.col == other.col
            || self.row.abs_diff(other.row) == self.col.abs_diff(other.col)
    }
}

/// Queen placement on an N×N board, stored as `queens[row] = column`.
///
/// Every row holds at most one queen; `None` marks a row without a queen (used by
/// the multiplayer game while queens are still being placed). The RL environment
/// and the solvers always work with complete boards.
///
/// A `Board` is a plain value: derived quantities such as the conflict count are
/// recomputed from it on demand and never cached, so they cannot go stale.
///
/// # Serialization
///
/// Boards serialize as a JSON array of column indices, with `-1` for an empty row:
///
/// ```
/// use nqueens_engine::Board;
///
/// let board = Board::from_placements([Some(1), None, Some(0), Some(2)]).unwrap();
/// assert_eq!(serde_json::to_string(&board).unwrap(), "[1,-1,0,2]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    queens: ArrayVec<Option<u8>, MAX_SIZE>,
}

impl Board {
    /// Creates a board without any queen.
    #[must_use]
    pub fn empty(size: BoardSize) -> Self {
        Self {
            queens: (0..size.get()).map(|_| None).collect(),
        }
    }

    /// Creates a complete board with one queen per row at a uniformly random column.
    pub fn random<R>(size: BoardSize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let n = size.get();
        Self::from_columns((0..n).map(|_| rng.random_range(0..n)))
            .expect("random columns are always in range")
    }

    /// Creates a complete board whose columns are a random permutation of `0..N`.
    pub fn random_permutation<R>(size: BoardSize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut columns = (0..size.get()).collect::<ArrayVec<usize, MAX_SIZE>>();
        columns.shuffle(rng);
        Self::from_columns(columns).expect("a permutation is always in range")
    }

    /// Creates a complete board from one column per row.
    pub fn from_columns<I>(columns: I) -> Result<Self, InvalidBoardError>
    where
        I: IntoIterator<Item = usize>,
    {
        Self::from_placements(columns.into_iter().map(Some))
    }

    /// Creates a board from optional placements, one entry per row.
    pub fn from_placements<I>(placements: I) -> Result<Self, InvalidBoardError>
    where
        I: IntoIterator<Item = Option<usize>>,
    {
        let placements = placements.into_iter().collect::<Vec<_>>();
        let size = BoardSize::new(placements.len())?;
        let mut board = Self::empty(size);
        for (row, col) in placements.into_iter().enumerate() {
            if let Some(col) = col {
                if col >= size.get() {
                    return Err(InvalidBoardError::ColumnOutOfRange { row, col });
                }
                board.place(row, col);
            }
        }
        Ok(board)
    }

    #[must_use]
    pub fn size(&self) -> BoardSize {
        // Boards are only constructed with a validated size
        #[expect(clippy::cast_possible_truncation)]
        let size = self.queens.len() as u8;
        BoardSize(size)
    }

    fn n(&self) -> usize {
        self.queens.len()
    }

    /// Returns whether `(row, col)` lies on the board.
    #[must_use]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.n() && col < self.n()
    }

    /// Returns the column of the queen in `row`, if any.
    ///
    /// # Panics
    ///
    /// Panics if `row` is outside the board.
    #[must_use]
    pub fn column(&self, row: usize) -> Option<usize> {
        self.queens[row].map(usize::from)
    }

    /// Iterates over every row's placement, in row order.
    pub fn placements(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.queens.iter().map(|q| q.map(usize::from))
    }

    /// Iterates over the squares holding a queen, in row order.
    pub fn queens(&self) -> impl Iterator<Item = Square> + '_ {
        self.queens
            .iter()
            .enumerate()
            .filter_map(|(row, col)| col.map(|col| Square::new(row, col.into())))
    }

    /// Iterates over the rows without a queen.
    pub fn empty_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.queens
            .iter()
            .enumerate()
            .filter_map(|(row, col)| col.is_none().then_some(row))
    }

    #[must_use]
    pub fn placed_count(&self) -> usize {
        self.queens.iter().flatten().count()
    }

    /// Returns whether every row holds a queen.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.queens.iter().all(Option::is_some)
    }

    /// Puts the queen of `row` on `col`, replacing any queen already in that row.
    ///
    /// # Panics
    ///
    /// Panics if `(row, col)` is outside the board.
    pub fn place(&mut self, row: usize, col: usize) {
        assert!(self.contains(row, col), "square ({row}, {col}) is off the board");
        // `col < 8` was just checked
        #[expect(clippy::cast_possible_truncation)]
        let col = col as u8;
        self.queens[row] = Some(col);
    }

    /// Removes the queen of `row`, returning its column.
    pub fn remove(&mut self, row: usize) -> Option<usize> {
        self.queens[row].take().map(usize::from)
    }

    /// Returns a copy of this board with the queen of `row` moved to `col`.
    #[must_use]
    pub fn with_queen(&self, row: usize, col: usize) -> Self {
        let mut board = self.clone();
        board.place(row, col);
        board
    }

    /// Returns a copy of this board with the queen of `row` lifted off.
    #[must_use]
    pub fn without_queen(&self, row: usize) -> Self {
        let mut board = self.clone();
        board.remove(row);
        board
    }

    /// Counts pairs of queens sharing a column or a diagonal.
    ///
    /// Queens are grouped by column, by `row - col` and by `row + col`; every group
    /// of `k` queens contributes `k * (k - 1) / 2` pairs. Rows never conflict since
    /// each row holds at most one queen. Empty rows contribute nothing.
    ///
    /// ```
    /// use nqueens_engine::Board;
    ///
    /// let solved = Board::from_columns([1, 3, 0, 2]).unwrap();
    /// assert_eq!(solved.conflict_count(), 0);
    ///
    /// let stacked = Board::from_columns([0, 0, 0, 0]).unwrap();
    /// assert_eq!(stacked.conflict_count(), 6);
    /// ```
    #[must_use]
    pub fn conflict_count(&self) -> usize {
        let n = self.n();
        let mut columns = [0_usize; MAX_SIZE];
        let mut diagonals = [0_usize; MAX_DIAGONALS];
        let mut anti_diagonals = [0_usize; MAX_DIAGONALS];

        for Square { row, col } in self.queens() {
            columns[col] += 1;
            diagonals[row + (n - 1) - col] += 1;
            anti_diagonals[row + col] += 1;
        }

        columns
            .iter()
            .chain(&diagonals)
            .chain(&anti_diagonals)
            .map(|&count| count * count.saturating_sub(1) / 2)
            .sum()
    }

    /// Counts conflicting pairs by checking every pair of queens.
    ///
    /// Always equal to [`Board::conflict_count`]; kept as the reference
    /// definition of a conflict.
    #[must_use]
    pub fn conflict_count_pairwise(&self) -> usize {
        let queens = self.queens().collect::<ArrayVec<_, MAX_SIZE>>();
        queens
            .iter()
            .enumerate()
            .flat_map(|(i, a)| queens[i + 1..].iter().map(move |b| (a, b)))
            .filter(|(a, b)| a.attacks(**b))
            .count()
    }

    /// Returns whether any queen shares the row, the column or a diagonal with `(row, col)`.
    ///
    /// A queen standing on the square itself counts as attacking it.
    #[must_use]
    pub fn is_attacked(&self, row: usize, col: usize) -> bool {
        let square = Square::new(row, col);
        self.queens().any(|queen| queen.attacks(square))
    }

    /// Iterates over the queens attacked by at least one other queen, in row order.
    ///
    /// ```
    /// use nqueens_engine::{Board, Square};
    ///
    /// let board = Board::from_columns([0, 2, 0, 3]).unwrap();
    /// let attacked = board.attacked_queens().collect::<Vec<_>>();
    /// assert_eq!(attacked, [Square::new(0, 0), Square::new(2, 0), Square::new(3, 3)]);
    /// ```
    pub fn attacked_queens(&self) -> impl Iterator<Item = Square> + '_ {
        self.queens().filter(|queen| {
            self.queens()
                .any(|other| other.row != queen.row && other.attacks(*queen))
        })
    }

    /// Returns every unoccupied square reachable by some queen.
    #[must_use]
    pub fn attacked_squares(&self) -> BTreeSet<Square> {
        let n = self.n();
        (0..n)
            .flat_map(|row| (0..n).map(move |col| Square::new(row, col)))
            .filter(|sq| self.column(sq.row) != Some(sq.col) && self.is_attacked(sq.row, sq.col))
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, placement) in self.placements().enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..self.n() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                f.write_str(if placement == Some(col) { "Q" } else { "." })?;
            }
        }
        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.queens.iter().map(|q| q.map_or(-1, i16::from)))
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<i16>::deserialize(deserializer)?;
        let placements = raw
            .into_iter()
            .map(|value| match value {
                -1 => Ok(None),
                value => usize::try_from(value).map(Some).map_err(|_| {
                    serde::de::Error::custom(format!("invalid column: {value}"))
                }),
            })
            .collect::<Result<Vec<_>, D::Error>>()?;
        Self::from_placements(placements).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn board(columns: &[usize]) -> Board {
        Board::from_columns(columns.iter().copied()).unwrap()
    }

    fn reversed(board: &Board) -> Board {
        Board::from_placements(board.placements().collect::<Vec<_>>().into_iter().rev()).unwrap()
    }

    #[test]
    fn test_board_size_bounds() {
        assert!(BoardSize::new(3).is_err());
        assert!(BoardSize::new(4).is_ok());
        assert!(BoardSize::new(8).is_ok());
        assert_eq!(BoardSize::new(9), Err(InvalidBoardSizeError { size: 9 }));
        assert_eq!(BoardSize::clamped(0), BoardSize::MIN);
        assert_eq!(BoardSize::clamped(100), BoardSize::MAX);
        assert_eq!(BoardSize::clamped(5).get(), 5);
    }

    #[test]
    fn test_from_placements_rejects_bad_input() {
        assert!(matches!(
            Board::from_columns([0, 1, 2]),
            Err(InvalidBoardError::Size(_))
        ));
        assert_eq!(
            Board::from_columns([0, 1, 4, 2]),
            Err(InvalidBoardError::ColumnOutOfRange { row: 2, col: 4 })
        );
    }

    #[test]
    fn test_conflict_count_known_boards() {
        assert_eq!(board(&[1, 3, 0, 2]).conflict_count(), 0);
        assert_eq!(board(&[0, 4, 7, 5, 2, 6, 1, 3]).conflict_count(), 0);
        // all on the main diagonal
        assert_eq!(board(&[0, 1, 2, 3]).conflict_count(), 6);
        // a single column clash
        assert_eq!(board(&[0, 0, 3, 1]).conflict_count(), 1);
        // column, diagonal and anti-diagonal clashes
        assert_eq!(board(&[0, 0, 2, 1]).conflict_count(), 3);
    }

    #[test]
    fn test_conflict_count_ignores_empty_rows() {
        let board = Board::from_placements([Some(0), None, None, Some(0)]).unwrap();
        assert_eq!(board.conflict_count(), 1);
        assert_eq!(Board::empty(BoardSize::MAX).conflict_count(), 0);
    }

    #[test]
    fn test_conflict_count_matches_pairwise() {
        let mut rng = Pcg32::seed_from_u64(7);
        for n in 4..=8 {
            let size = BoardSize::new(n).unwrap();
            for _ in 0..200 {
                let mut board = Board::random(size, &mut rng);
                if rng.random_bool(0.5) {
                    let row = rng.random_range(0..n);
                    board.remove(row);
                }
                assert_eq!(board.conflict_count(), board.conflict_count_pairwise());
            }
        }
    }

    #[test]
    fn test_conflict_count_symmetric_under_reversal() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..100 {
            let board = Board::random(BoardSize::MAX, &mut rng);
            assert_eq!(board.conflict_count(), reversed(&board).conflict_count());
        }
    }

    #[test]
    fn test_conflict_count_not_permutation_invariant() {
        // Reordering rows of a solution breaks it.
        let solution = board(&[1, 3, 0, 2]);
        let permuted = board(&[0, 1, 2, 3]);
        assert_ne!(solution.conflict_count(), permuted.conflict_count());
    }

    #[test]
    fn test_is_attacked() {
        let board = Board::from_placements([Some(1), None, None, None]).unwrap();
        assert!(board.is_attacked(0, 3)); // row
        assert!(board.is_attacked(3, 1)); // column
        assert!(board.is_attacked(1, 2)); // diagonal
        assert!(board.is_attacked(1, 0)); // anti-diagonal
        assert!(board.is_attacked(0, 1)); // the queen's own square
        assert!(!board.is_attacked(1, 3));
        assert!(!board.is_attacked(2, 0));
        assert!(!Board::empty(BoardSize::MIN).is_attacked(0, 0));
    }

    #[test]
    fn test_attacked_squares_excludes_queens() {
        let board = Board::from_placements([Some(0), None, None, None]).unwrap();
        let attacked = board.attacked_squares();
        assert!(!attacked.contains(&Square::new(0, 0)));
        // row 0 (3) + column 0 (3) + diagonal (3)
        assert_eq!(attacked.len(), 9);
        for sq in &attacked {
            assert!(board.is_attacked(sq.row, sq.col));
        }
    }

    #[test]
    fn test_attacked_queens_match_conflicts() {
        assert_eq!(board(&[1, 3, 0, 2]).attacked_queens().count(), 0);
        assert_eq!(board(&[0, 0, 0, 0]).attacked_queens().count(), 4);

        let mut rng = Pcg32::seed_from_u64(13);
        for _ in 0..100 {
            let board = Board::random(BoardSize::new(6).unwrap(), &mut rng);
            assert_eq!(
                board.attacked_queens().next().is_none(),
                board.conflict_count() == 0
            );
            for queen in board.attacked_queens() {
                assert!(board.without_queen(queen.row).is_attacked(queen.row, queen.col));
            }
        }
    }

    #[test]
    fn test_attacked_squares_consistent_with_is_attacked() {
        let mut rng = Pcg32::seed_from_u64(3);
        let board = Board::random(BoardSize::new(6).unwrap(), &mut rng);
        let attacked = board.attacked_squares();
        for row in 0..6 {
            for col in 0..6 {
                let occupied = board.column(row) == Some(col);
                assert_eq!(
                    attacked.contains(&Square::new(row, col)),
                    !occupied && board.is_attacked(row, col)
                );
            }
        }
    }

    #[test]
    fn test_random_boards_are_complete() {
        let mut rng = Pcg32::seed_from_u64(5);
        let size = BoardSize::new(4).unwrap();
        let board = Board::random(size, &mut rng);
        assert_eq!(board.size(), size);
        assert!(board.is_complete());
        assert!(board.placements().all(|col| col.is_some_and(|c| c < 4)));

        let perm = Board::random_permutation(BoardSize::MAX, &mut rng);
        let mut columns = perm.placements().flatten().collect::<Vec<_>>();
        columns.sort_unstable();
        assert_eq!(columns, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_serde_uses_sentinel() {
        let board = Board::from_placements([Some(2), None, Some(0), None, Some(4)]).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, "[2,-1,0,-1,4]");
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, board);

        assert!(serde_json::from_str::<Board>("[0,1,2]").is_err());
        assert!(serde_json::from_str::<Board>("[0,1,2,-2]").is_err());
        assert!(serde_json::from_str::<Board>("[0,1,2,9]").is_err());
    }

    #[test]
    fn test_display() {
        let board = Board::from_placements([Some(1), None, Some(0), Some(3)]).unwrap();
        assert_eq!(board.to_string(), ". Q . .\n. . . .\nQ . . .\n. . . Q");
    }
}
