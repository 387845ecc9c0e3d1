//! Minimal terminal runtime: a tick/render/input loop driving an [`App`].

pub use self::{app::App, runtime::Runtime};

mod app;
mod event_loop;
mod runtime;
