mod dialogs;
mod grid_view;
mod presentation;
pub mod sample;
mod session;
mod state;

pub use session::run_tui;
