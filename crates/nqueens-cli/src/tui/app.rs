use crossterm::event::Event;
use ratatui::Frame;

use super::Runtime;

/// An application driven by [`Runtime::run`].
pub trait App {
    /// Called once before the loop starts; configure the tick rate here.
    fn init(&mut self, runtime: &mut Runtime);

    fn should_exit(&self) -> bool;

    /// Handles key input, resize and other terminal events.
    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event);

    /// Advances time-based state (called on each tick).
    fn update(&mut self, runtime: &mut Runtime);

    fn draw(&self, frame: &mut Frame);
}
