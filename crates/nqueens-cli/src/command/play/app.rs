use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEventKind};
use nqueens_engine::{Phase, PlayerId, SessionStatus};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Paragraph},
};

use super::game::Game;
use crate::{
    tui::{App, Runtime},
    view::widgets::{BoardDisplay, StatusDisplay, style},
};

const TICK_RATE: f64 = 30.0;

#[derive(Debug)]
pub(crate) struct PlayApp {
    game: Game,
    show_attacks: bool,
    is_exiting: bool,
}

impl PlayApp {
    pub(crate) fn new(game: Game) -> Self {
        Self {
            game,
            show_attacks: true,
            is_exiting: false,
        }
    }

    pub(crate) fn into_game(self) -> Game {
        self.game
    }

    fn help_text(&self) -> &'static str {
        if self.game.is_finished() {
            return "Controls: N (New Game) | Q (Quit)";
        }
        match self.game.snapshot().phase {
            Phase::Placement => {
                "Controls: ←↑↓→ (Move) | Enter/Space (Place) | P (Pass) | A (Attacks) | N (New) | Q (Quit)"
            }
            Phase::Correction => {
                "Controls: ←↑↓→ (Move) | Enter/Space (Pick/Drop) | Esc (Cancel) | P (Pass) | A (Attacks) | N (New) | Q (Quit)"
            }
        }
    }

    fn border_style(&self) -> Style {
        let snapshot = self.game.snapshot();
        match snapshot.status {
            SessionStatus::InProgress if snapshot.current_turn == PlayerId::Human => style::BORDER_PLAYING,
            SessionStatus::InProgress | SessionStatus::Stalled => style::BORDER_WAITING,
            SessionStatus::Solved {
                winner: PlayerId::Human,
            } => style::BORDER_WON,
            SessionStatus::Solved { winner: PlayerId::Ai } => style::BORDER_LOST,
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(TICK_RATE));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        let now = Instant::now();
        match key.code {
            KeyCode::Up => self.game.move_cursor(-1, 0),
            KeyCode::Down => self.game.move_cursor(1, 0),
            KeyCode::Left => self.game.move_cursor(0, -1),
            KeyCode::Right => self.game.move_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => self.game.activate(now),
            KeyCode::Esc => self.game.cancel_selection(),
            KeyCode::Char('p') => self.game.pass(now),
            KeyCode::Char('a') => self.show_attacks = !self.show_attacks,
            KeyCode::Char('n') => {
                if let Err(err) = self.game.restart() {
                    log::error!("failed to start a new game: {err}");
                    self.is_exiting = true;
                }
            }
            KeyCode::Char('q') => self.is_exiting = true,
            _ => {}
        }
    }

    fn update(&mut self, _runtime: &mut Runtime) {
        self.game.update(Instant::now());
    }

    fn draw(&self, frame: &mut Frame) {
        let game = &self.game;
        let snapshot = game.snapshot();
        let border_style = self.border_style();

        let board = BoardDisplay::new(&snapshot.queens)
            .cursor(game.cursor())
            .selected(game.selected())
            .show_attacks(self.show_attacks)
            .block(
                Block::bordered()
                    .title(Line::from(" N-QUEENS ").centered())
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
        let status = StatusDisplay::new(snapshot, game.settings().difficulty)
            .ai_thinking(game.is_ai_thinking())
            .block(
                Block::bordered()
                    .title(Line::from(" STATUS ").centered())
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
        let messages = Paragraph::new(game.messages().map(Line::from).collect::<Vec<_>>()).block(
            Block::bordered()
                .title(Line::from(" LOG ").centered())
                .style(style::DEFAULT),
        );
        let help = Text::from(self.help_text())
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let top_height = board.height().max(status.height());
        let [top_area, log_area, help_area] = Layout::vertical([
            Constraint::Length(top_height),
            Constraint::Length(10),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .areas(frame.area());
        let [board_area, status_area] = Layout::horizontal([
            Constraint::Length(board.width()),
            Constraint::Length(status.width()),
        ])
        .flex(Flex::Center)
        .areas(top_area);
        let [log_area] = Layout::horizontal([Constraint::Length(board.width() + status.width())])
            .flex(Flex::Center)
            .areas(log_area);

        frame.render_widget(board, board_area);
        frame.render_widget(status, status_area);
        frame.render_widget(messages, log_area);
        frame.render_widget(help, help_area);
    }
}
