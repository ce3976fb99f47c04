//! termkit - declarative subcommand tools for the terminal
//!
//! A tool is a set of subcommands, each a plain function with its arguments
//! declared next to it. termkit turns those declarations into a parser,
//! persists per-user default arguments and maps `-v`/`-q` to a log level:
//!
//! - **`declare`** - Subcommand and argument declarations, frozen into a registry
//! - **`cli`** - Parser assembly, parsed invocations and dispatch
//! - **`config`** - The `~/.{tool}` file of persisted arguments
//! - **`observability`** - Leveled logging and verbosity resolution
//! - **`render`** - Tables and progress bars for handler output
//!
//! # Features
//!
//! ```toml
//! [dependencies]
//! termkit = "0.1"
//! # Without comfy-table, indicatif and the TOML manifest:
//! termkit = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use termkit::prelude::*;
//!
//! fn frob(_: &mut (), inv: &Invocation) -> anyhow::Result<()> {
//!     observability::info(&format!("frobbing {}", inv.require_str("baz")?));
//!     Ok(())
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     ToolBuilder::new("example")
//!         .about("A script that frobs or displays bazzes.")
//!         .subcommand(
//!             Handler::new(frob)
//!                 .subcommand(SubcommandMeta::new().help("frob a baz"))
//!                 .arg(ArgumentSpec::positional("baz").help("the baz to frob")),
//!         )
//!         .build()?
//!         .into_tool(())
//!         .run()
//! }
//! ```

#![warn(missing_docs)]

/// Error types
pub mod error;

/// Subcommand and argument declarations
pub mod declare;

/// Parser assembly and dispatch
pub mod cli;

/// Persisted arguments
pub mod config;

/// Logging
pub mod observability;

/// Tables and progress bars
pub mod render;

pub use cli::{Invocation, Termtool};
pub use declare::{ArgumentSpec, Handler, Registry, SubcommandMeta, ToolBuilder};
pub use error::{ConfigFileError, DeclarationError, ToolError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cli::{Invocation, Termtool, Value};
    pub use crate::config::ConfigFile;
    pub use crate::declare::{
        Action, ArgumentSpec, Arity, Handler, Registry, SubcommandMeta, ToolBuilder, ValueType,
    };
    pub use crate::error::{DeclarationError, ToolError};
    pub use crate::observability::{self, LogLevel};
    pub use crate::render::{progress, Table};
}
