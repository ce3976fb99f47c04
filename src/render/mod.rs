//! Output helpers for handlers: tables and progress bars

pub mod progress;
pub mod table;

pub use progress::{progress, Progress};
pub use table::Table;
