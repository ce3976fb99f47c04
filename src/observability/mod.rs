//! Logging for tools built on this crate.
//!
//! The dispatcher resolves `-v`/`-q` into a threshold with
//! [`resolve_verbosity`] and installs it before calling a handler. Handlers
//! then log through the free functions.
//!
//! # Example
//!
//! ```
//! use termkit::observability::{self, resolve_verbosity, LogLevel};
//!
//! let level = resolve_verbosity(1, 0);
//! assert_eq!(level, LogLevel::Info);
//!
//! observability::set_threshold(level);
//! observability::info("frobbing the baz");
//! observability::debug("not shown");
//! ```

pub mod logger;
pub mod verbosity;

// Re-export main types for convenience
pub use logger::{
    critical, debug, error, info, log, set_color, set_threshold, threshold, warning, LogLevel,
    Logger,
};
pub use verbosity::resolve_verbosity;
