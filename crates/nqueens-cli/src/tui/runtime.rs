use std::{io, time::Duration};

use super::{
    App,
    event_loop::{EventLoop, LoopEvent},
};

/// Owns the event loop and the terminal for the lifetime of an [`App`].
#[derive(Debug)]
pub struct Runtime {
    events: EventLoop,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: EventLoop::new(),
        }
    }

    /// Sets the tick rate in Hz; `None` disables ticks.
    pub fn set_tick_rate(&mut self, rate: Option<f64>) {
        self.events
            .set_tick_interval(rate.map(|rate| Duration::from_secs_f64(1.0 / rate)));
    }

    /// Runs `app` until it asks to exit, restoring the terminal afterwards.
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);
        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    LoopEvent::Tick => app.update(&mut self),
                    LoopEvent::Render => {
                        terminal.draw(|frame| app.draw(frame))?;
                    }
                    LoopEvent::Terminal(event) => app.handle_event(&mut self, &event),
                }
            }
            Ok(())
        })
    }
}
