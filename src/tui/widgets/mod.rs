//! TUI Widgets

mod progress;

pub use progress::render_progress;
