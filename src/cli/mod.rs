//! Command-line side of a tool: grammar, parsed values and dispatch
//!
//! # Architecture
//!
//! - [`ParserBuilder`] turns a frozen [`Registry`](crate::declare::Registry)
//!   into a `clap::Command`. This happens once, when the registry is built.
//! - [`Invocation`] is what a handler receives: global and subcommand values
//!   in one flat map keyed by destination.
//! - [`Termtool`] runs an invocation end to end.

pub mod builder;
pub mod dispatch;
pub mod invocation;

// Re-export main types
pub use builder::ParserBuilder;
pub use dispatch::{Termtool, UNEXPECTED_FAILURE_CODE};
pub use invocation::{Invocation, Value};
