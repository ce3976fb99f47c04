//! Dispatcher - runs one invocation of a tool
//!
//! [`Termtool::main`] reads the persisted arguments, splices them ahead of
//! the command line, parses, configures logging and calls the selected
//! subcommand's handler. [`Termtool::run`] does the same with the real
//! process arguments and exits.

use super::invocation::Invocation;
use crate::config::{merge_args, ConfigFile};
use crate::declare::Registry;
use crate::error::ToolError;
use crate::observability::{self, resolve_verbosity};
use clap::error::ErrorKind;
use std::ffi::OsString;
use std::io::{self, IsTerminal};

/// Exit status used by [`Termtool::run`] when a handler fails unexpectedly
pub const UNEXPECTED_FAILURE_CODE: i32 = 101;

/// A declared tool together with the state its handlers operate on
pub struct Termtool<S> {
    registry: Registry<S>,
    state: S,
}

impl<S> Termtool<S> {
    /// Pair a registry with handler state
    pub fn new(registry: Registry<S>, state: S) -> Self {
        Self { registry, state }
    }

    /// The tool's declarations
    pub fn registry(&self) -> &Registry<S> {
        &self.registry
    }

    /// Handler state
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Mutable handler state
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Give back the handler state
    pub fn into_state(self) -> S {
        self.state
    }

    /// Parse `tokens` (without the program name) into an invocation.
    ///
    /// No persisted arguments are added and nothing is dispatched.
    pub fn parse<I, T>(&self, tokens: I) -> Result<Invocation, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv = std::iter::once(OsString::from(self.registry.name()))
            .chain(tokens.into_iter().map(Into::into));
        let mut command = self.registry.command().clone();
        let matches = command.try_get_matches_from_mut(argv)?;

        let (name, sub_matches) = matches
            .subcommand()
            .ok_or_else(|| command.error(ErrorKind::MissingSubcommand, "a subcommand is required"))?;
        let spec = self.registry.subcommand(name).ok_or_else(|| {
            command.error(
                ErrorKind::InvalidSubcommand,
                format!("unrecognized subcommand '{}'", name),
            )
        })?;

        let specs = self.registry.globals().iter().chain(spec.args());
        Ok(Invocation::from_matches(name, sub_matches, specs))
    }

    /// Run the tool with `argv` (without the program name) and return an exit status.
    ///
    /// Usage errors and `--help` are printed by the parser and mapped to its
    /// exit status (2 and 0). A handler returning a [`ToolError`] is logged at
    /// ERROR and mapped to the error's code. Any other handler error is
    /// returned unchanged.
    pub fn main<I, T>(&mut self, argv: I) -> anyhow::Result<i32>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let config = self.config_file();
        let persisted = match &config {
            Some(file) => match file.read() {
                Ok(tokens) => tokens,
                Err(err) => {
                    observability::error(&err.to_string());
                    return Ok(1);
                }
            },
            None => Vec::new(),
        };

        let invocation = match self.parse(merge_args(persisted, argv)) {
            Ok(invocation) => invocation,
            Err(err) => {
                // A closed stdout/stderr leaves nothing to report to.
                let _ = err.print();
                return Ok(err.exit_code());
            }
        };

        let level = resolve_verbosity(invocation.verbose(), invocation.quiet());
        observability::set_threshold(level);
        observability::set_color(invocation.color() && io::stderr().is_terminal());
        observability::info(&format!("Set log level to {}", level));

        let invocation = invocation.with_level(level).with_config_file(config);

        if let Some(hook) = self.registry.configure_hook() {
            if let Err(err) = hook(&mut self.state, &invocation) {
                return recover(err);
            }
        }

        let Some(spec) = self.registry.subcommand(invocation.subcommand()) else {
            observability::critical(&format!("No handler for {}", invocation.subcommand()));
            return Ok(1);
        };
        observability::debug(&format!("Dispatching to {}", spec.name()));

        match spec.invoke(&mut self.state, &invocation) {
            Ok(()) => Ok(0),
            Err(err) => recover(err),
        }
    }

    /// Run with the process arguments and exit with the resulting status.
    ///
    /// An unexpected handler error is printed with its cause chain and the
    /// process exits with [`UNEXPECTED_FAILURE_CODE`].
    pub fn run(mut self) -> ! {
        let code = match self.main(std::env::args_os().skip(1)) {
            Ok(code) => code,
            Err(err) => {
                eprintln!("Error: {:?}", err);
                UNEXPECTED_FAILURE_CODE
            }
        };
        std::process::exit(code)
    }

    fn config_file(&self) -> Option<ConfigFile> {
        match self.registry.config_file() {
            Ok(file) => file,
            Err(err) => {
                observability::warning(&format!("Ignoring persisted arguments: {}", err));
                None
            }
        }
    }
}

impl<S> Registry<S> {
    /// Pair this registry with handler state
    pub fn into_tool(self, state: S) -> Termtool<S> {
        Termtool::new(self, state)
    }
}

fn recover(err: anyhow::Error) -> anyhow::Result<i32> {
    match err.downcast_ref::<ToolError>() {
        Some(tool_error) => {
            observability::error(tool_error.message());
            Ok(tool_error.exit_code())
        }
        None => Err(err),
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Termtool<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Termtool")
            .field("registry", &self.registry)
            .field("state", &self.state)
            .finish()
    }
}
