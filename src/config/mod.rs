//! Persisted arguments.
//!
//! A tool may keep command-line tokens in a per-user file (`~/.{name}` by
//! default). On every run those tokens are placed ahead of the real command
//! line, so anything typed explicitly overrides them.
//!
//! # Example
//!
//! ```no_run
//! use termkit::config::{merge_args, ConfigFile};
//!
//! let file = ConfigFile::for_tool("example").unwrap();
//! file.write(["--db", "/var/lib/example.db"]).unwrap();
//!
//! let argv = merge_args(file.read().unwrap(), ["display", "baz"]);
//! assert_eq!(argv.len(), 4);
//! ```

pub mod file;
pub mod merge;

pub use self::file::ConfigFile;
pub use self::merge::merge_args;
