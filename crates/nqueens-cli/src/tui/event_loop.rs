use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event};

#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum LoopEvent {
    Tick,
    Render,
    Terminal(Event),
}

/// Produces ticks at a fixed interval and a render after every state change.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    last_tick: Instant,
    dirty: bool,
}

impl EventLoop {
    pub(super) fn new() -> Self {
        Self {
            tick_interval: None,
            last_tick: Instant::now(),
            // the first frame must be drawn before any input arrives
            dirty: true,
        }
    }

    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    /// Blocks until the next tick, pending render, or terminal event.
    pub(super) fn next(&mut self) -> io::Result<LoopEvent> {
        loop {
            let now = Instant::now();
            if let Some(interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= interval
            {
                self.last_tick = now;
                self.dirty = true;
                return Ok(LoopEvent::Tick);
            }
            if self.dirty {
                self.dirty = false;
                return Ok(LoopEvent::Render);
            }

            let timeout = self
                .tick_interval
                .map(|interval| (self.last_tick + interval).saturating_duration_since(now));
            if let Some(timeout) = timeout
                && !event::poll(timeout)?
            {
                continue;
            }
            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }
}
