use std::collections::BTreeSet;

use nqueens_engine::{Board, Square};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::color;

const CELL_WIDTH: u16 = 3;
const QUEEN: &str = " ♛ ";
const EMPTY: &str = "   ";

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    cursor: Option<Square>,
    selected: Option<usize>,
    show_attacks: bool,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            cursor: None,
            selected: None,
            show_attacks: false,
            block: None,
        }
    }

    pub fn cursor(self, cursor: Square) -> Self {
        Self {
            cursor: Some(cursor),
            ..self
        }
    }

    /// Marks the queen of `row` as picked up.
    pub fn selected(self, row: Option<usize>) -> Self {
        Self {
            selected: row,
            ..self
        }
    }

    /// Tints every square some queen attacks.
    pub fn show_attacks(self, show_attacks: bool) -> Self {
        Self {
            show_attacks,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    fn side(&self) -> u16 {
        u16::try_from(self.board.size().get()).expect("board size fits in u16")
    }

    pub fn width(&self) -> u16 {
        self.side() * CELL_WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        self.side() + super::block_vertical_margin(self.block.as_ref())
    }

    fn cell_style(&self, square: Square, attacked: &BTreeSet<Square>, in_conflict: &BTreeSet<Square>) -> Style {
        let is_queen = self.board.column(square.row) == Some(square.col);
        let mut bg = if (square.row + square.col) % 2 == 0 {
            color::LIGHT_SQUARE
        } else {
            color::DARK_SQUARE
        };
        if self.show_attacks && attacked.contains(&square) {
            bg = color::ATTACKED;
        }
        if is_queen && self.selected == Some(square.row) {
            bg = color::SELECTED;
        }
        if self.cursor == Some(square) {
            bg = color::CURSOR;
        }
        let fg = if in_conflict.contains(&square) {
            color::RED
        } else {
            color::BLACK
        };
        Style::new().fg(fg).bg(bg)
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let side = self.side();
        let left = area.x + area.width.saturating_sub(side * CELL_WIDTH) / 2;
        let top = area.y + area.height.saturating_sub(side) / 2;

        let attacked = self.board.attacked_squares();
        let in_conflict = self.board.attacked_queens().collect::<BTreeSet<_>>();
        let n = self.board.size().get();
        for (row, y) in (0..n).zip(top..area.bottom()) {
            for (col, x) in (0..n).zip((left..area.right()).step_by(CELL_WIDTH.into())) {
                if x + CELL_WIDTH > area.right() {
                    break;
                }
                let square = Square::new(row, col);
                let symbol = if self.board.column(row) == Some(col) {
                    QUEEN
                } else {
                    EMPTY
                };
                buf.set_string(x, y, symbol, self.cell_style(square, &attacked, &in_conflict));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_queens_in_place() {
        let board = Board::from_placements([Some(1), None, Some(3), None]).unwrap();
        let widget = BoardDisplay::new(&board).cursor(Square::new(1, 0)).show_attacks(true);
        let area = Rect::new(0, 0, widget.width(), widget.height());
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        // each square is three cells wide; the queen glyph sits in the middle one
        assert_eq!(buf[(4, 0)].symbol(), "♛");
        assert_eq!(buf[(10, 2)].symbol(), "♛");
        assert_eq!(buf[(1, 1)].symbol(), " ");
        assert_eq!(buf[(1, 1)].bg, color::CURSOR);
        // (1, 2) is attacked by the queen on (0, 1)
        assert_eq!(buf[(7, 1)].bg, color::ATTACKED);
        // (3, 0) is safe and dark
        assert_eq!(buf[(1, 3)].bg, color::DARK_SQUARE);
    }

    #[test]
    fn test_conflicting_queens_are_red() {
        let board = Board::from_columns([0, 0, 3, 1]).unwrap();
        let widget = BoardDisplay::new(&board).selected(Some(1));
        let area = Rect::new(0, 0, widget.width(), widget.height());
        let mut buf = Buffer::empty(area);
        (&widget).render(area, &mut buf);

        assert_eq!(buf[(1, 0)].fg, color::RED);
        assert_eq!(buf[(1, 1)].fg, color::RED);
        assert_eq!(buf[(1, 1)].bg, color::SELECTED);
        // (2, 3) and (3, 1) do not attack anyone
        assert_eq!(buf[(10, 2)].fg, color::BLACK);
    }
}
