use std::iter;

use nqueens_engine::{Difficulty, PlayerId, SessionSnapshot, SessionStatus};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::style;

/// Side panel with the state of the current game.
pub struct StatusDisplay<'a> {
    snapshot: &'a SessionSnapshot,
    difficulty: Difficulty,
    ai_thinking: bool,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatusDisplay<'a> {
    pub fn new(snapshot: &'a SessionSnapshot, difficulty: Difficulty) -> Self {
        Self {
            snapshot,
            difficulty,
            ai_thinking: false,
            block: None,
        }
    }

    pub fn ai_thinking(self, ai_thinking: bool) -> Self {
        Self { ai_thinking, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        24 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(self.rows().len()).expect("row count fits in u16")
            + super::block_vertical_margin(self.block.as_ref())
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        let snapshot = self.snapshot;
        let turn = match (snapshot.status, snapshot.current_turn) {
            (SessionStatus::InProgress, PlayerId::Ai) if self.ai_thinking => "ai (thinking)".to_string(),
            (SessionStatus::InProgress, player) => player.to_string(),
            (SessionStatus::Solved { winner }, _) => format!("{winner} won"),
            (SessionStatus::Stalled, _) => "stalled".to_string(),
        };
        let n = snapshot.board_size.get();
        vec![
            ("GAME:", format!("#{}", snapshot.id)),
            ("SIZE:", format!("{n}x{n}")),
            ("AI LEVEL:", self.difficulty.to_string()),
            ("PHASE:", snapshot.phase.to_string()),
            ("TURN:", turn),
            ("QUEENS:", format!("{}/{n}", snapshot.placed_queens)),
            ("CONFLICTS:", snapshot.conflicts.to_string()),
            ("MOVES:", snapshot.moves.to_string()),
        ]
    }
}

impl Widget for StatusDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let rows = self.rows();
        let row_areas = Layout::vertical(rows.iter().map(|_| Constraint::Length(1))).split(area);
        for ((label, value), area) in iter::zip(rows, row_areas.iter().copied()) {
            let [label_area, value_area] =
                area.layout(&Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]));
            Line::styled(label, style::DIM).left_aligned().render(label_area, buf);
            Line::styled(value, style::DEFAULT)
                .right_aligned()
                .render(value_area, buf);
        }
    }
}
