//! Ratatui front-end: a login box that gives way to a four-tab desk once a
//! user signs in. All state lives in [`App`]; the terminal module only owns
//! the raw-mode lifecycle and the event loop.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
