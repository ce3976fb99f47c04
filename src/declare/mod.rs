//! Declaring subcommands and arguments
//!
//! A tool is declared with a [`ToolBuilder`]: global arguments, then one
//! [`Handler`] per subcommand carrying its [`SubcommandMeta`] and
//! [`ArgumentSpec`]s. Declarations may be written in reading order
//! ([`Handler::arg`]) or applied innermost-first like stacked annotations
//! ([`Handler::annotate`]); either way the frozen [`Registry`] lists
//! arguments in reading order.
//!
//! ```
//! use termkit::declare::{ArgumentSpec, Handler, SubcommandMeta, ToolBuilder};
//! use termkit::cli::Invocation;
//!
//! fn display(_: &mut (), _: &Invocation) -> anyhow::Result<()> {
//!     Ok(())
//! }
//!
//! let registry = ToolBuilder::<()>::new("example")
//!     .subcommand(
//!         Handler::new(display)
//!             .subcommand(SubcommandMeta::new().help("display a baz"))
//!             .arg(ArgumentSpec::positional("baz"))
//!             .arg(ArgumentSpec::flag(["--csv"]).store_true()),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(registry.subcommands()[0].name(), "display");
//! ```

pub mod handler;
#[cfg(feature = "manifest")]
pub mod manifest;
pub mod registry;
pub mod spec;

pub use handler::{Annotation, Handler, HandlerFn, SubcommandMeta, SubcommandSpec};
#[cfg(feature = "manifest")]
pub use manifest::{ArgumentManifest, SubcommandManifest, ToolManifest};
pub use registry::{ConfigureFn, Registry, ToolBuilder};
pub use spec::{Action, ArgumentSpec, Arity, ValueType};
