//! Declaration registry
//!
//! [`ToolBuilder`] collects a tool's global arguments and subcommands;
//! [`ToolBuilder::build`] validates everything, assembles the parser grammar
//! once and freezes the result into a [`Registry`]. Nothing in a registry can
//! be changed afterwards.

use super::handler::{Handler, SubcommandSpec};
use super::spec::ArgumentSpec;
use crate::cli::builder::ParserBuilder;
use crate::cli::invocation::Invocation;
use crate::config::ConfigFile;
use crate::error::{DeclarationError, DeclarationResult};
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;

const HELP_SUBCOMMAND: &str = "help";

/// Hook run after logging is configured and before the handler
pub type ConfigureFn<S> = Box<dyn Fn(&mut S, &Invocation) -> anyhow::Result<()>>;

/// Where the persisted argument file lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConfigLocation {
    /// `~/.{name}` in the user's home directory
    Home,
    /// An explicit path
    Path(PathBuf),
    /// No persisted arguments
    Disabled,
}

/// Collects a tool's declarations before they are frozen
pub struct ToolBuilder<S> {
    name: String,
    about: Option<String>,
    version: Option<String>,
    // Front is innermost (applied first), back is outermost.
    globals: VecDeque<ArgumentSpec>,
    handlers: Vec<Handler<S>>,
    #[cfg(feature = "manifest")]
    pub(crate) pending: Vec<super::manifest::PendingSubcommand<S>>,
    configure: Option<ConfigureFn<S>>,
    config: ConfigLocation,
    pub(crate) deferred: Option<DeclarationError>,
}

impl<S> ToolBuilder<S> {
    /// Start declaring a tool.
    ///
    /// The name is shown in usage text and, lower-cased, names the persisted
    /// argument file `~/.{name}`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            version: None,
            globals: VecDeque::new(),
            handlers: Vec::new(),
            #[cfg(feature = "manifest")]
            pending: Vec::new(),
            configure: None,
            config: ConfigLocation::Home,
            deferred: None,
        }
    }

    /// Set the tool description shown in help
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Enable `-V/--version` with this version string
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Declare the next global argument in reading order
    pub fn global_arg(mut self, spec: ArgumentSpec) -> Self {
        self.globals.push_front(spec);
        self
    }

    /// Apply a global argument on the outside of the tool's annotation stack.
    ///
    /// This is the deferred form: applied after the tool's other global
    /// arguments, it ends up first in reading order, exactly as an annotation
    /// written above all the others would.
    pub fn annotate(mut self, spec: ArgumentSpec) -> Self {
        self.globals.push_back(spec);
        self
    }

    /// Register a subcommand handler
    pub fn subcommand(mut self, handler: Handler<S>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Run a hook after logging is configured and before each dispatch
    pub fn on_configure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut S, &Invocation) -> anyhow::Result<()> + 'static,
    {
        self.configure = Some(Box::new(hook));
        self
    }

    /// Read and write persisted arguments at `path` instead of `~/.{name}`
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = ConfigLocation::Path(path.into());
        self
    }

    /// Do not read persisted arguments at all
    pub fn without_config_file(mut self) -> Self {
        self.config = ConfigLocation::Disabled;
        self
    }

    #[cfg(feature = "manifest")]
    pub(crate) fn with_about(mut self, about: Option<String>) -> Self {
        self.about = about;
        self
    }

    #[cfg(feature = "manifest")]
    pub(crate) fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    /// Validate, assemble the grammar and freeze the registry
    pub fn build(self) -> DeclarationResult<Registry<S>> {
        if let Some(err) = self.deferred {
            return Err(err);
        }

        #[cfg_attr(not(feature = "manifest"), allow(unused_mut))]
        let mut handlers = self.handlers;
        #[cfg(feature = "manifest")]
        for pending in self.pending {
            handlers.push(pending.into_handler()?);
        }

        let globals: Vec<ArgumentSpec> = self.globals.into_iter().rev().collect();
        for spec in &globals {
            spec.validate()?;
        }

        let mut subcommands: Vec<SubcommandSpec<S>> = Vec::with_capacity(handlers.len());
        let mut taken: HashSet<String> = HashSet::new();
        for handler in handlers {
            let spec = handler.into_subcommand()?;
            for name in std::iter::once(&spec.name).chain(spec.aliases.iter()) {
                // clap adds its own `help` subcommand.
                if name == HELP_SUBCOMMAND {
                    return Err(DeclarationError::Reserved(name.clone()));
                }
                if !taken.insert(name.clone()) {
                    return Err(DeclarationError::DuplicateSubcommand(name.clone()));
                }
            }
            for arg in &spec.args {
                arg.validate()?;
            }
            subcommands.push(spec);
        }

        let mut registry = Registry {
            name: self.name,
            about: self.about,
            version: self.version,
            globals,
            subcommands,
            configure: self.configure,
            config: self.config,
            command: clap::Command::new(""),
        };
        registry.command = ParserBuilder::new(&registry).build()?;
        Ok(registry)
    }
}

/// The frozen declarations of one tool
pub struct Registry<S> {
    name: String,
    about: Option<String>,
    version: Option<String>,
    globals: Vec<ArgumentSpec>,
    subcommands: Vec<SubcommandSpec<S>>,
    configure: Option<ConfigureFn<S>>,
    config: ConfigLocation,
    command: clap::Command,
}

impl<S> Registry<S> {
    /// Tool name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tool description
    pub fn about(&self) -> Option<&str> {
        self.about.as_deref()
    }

    /// Tool version
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Global arguments in reading order
    pub fn globals(&self) -> &[ArgumentSpec] {
        &self.globals
    }

    /// Subcommands in declaration order
    pub fn subcommands(&self) -> &[SubcommandSpec<S>] {
        &self.subcommands
    }

    /// Look up a subcommand by its name
    pub fn subcommand(&self, name: &str) -> Option<&SubcommandSpec<S>> {
        self.subcommands.iter().find(|s| s.name == name)
    }

    /// The assembled parser grammar
    pub fn command(&self) -> &clap::Command {
        &self.command
    }

    /// The persisted argument file, unless disabled
    pub fn config_file(&self) -> Result<Option<ConfigFile>, crate::error::ConfigFileError> {
        match &self.config {
            ConfigLocation::Home => ConfigFile::for_tool(&self.name).map(Some),
            ConfigLocation::Path(path) => Ok(Some(ConfigFile::at(path))),
            ConfigLocation::Disabled => Ok(None),
        }
    }

    pub(crate) fn configure_hook(&self) -> Option<&ConfigureFn<S>> {
        self.configure.as_ref()
    }
}

impl<S> std::fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("name", &self.name)
            .field("globals", &self.globals)
            .field("subcommands", &self.subcommands)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declare::handler::SubcommandMeta;

    fn frob(_: &mut (), _: &Invocation) -> anyhow::Result<()> {
        Ok(())
    }

    fn display(_: &mut (), _: &Invocation) -> anyhow::Result<()> {
        Ok(())
    }

    fn loglevel(_: &mut (), _: &Invocation) -> anyhow::Result<()> {
        Ok(())
    }

    fn names(registry: &Registry<()>) -> Vec<&str> {
        registry.subcommands().iter().map(|s| s.name()).collect()
    }

    #[test]
    fn test_subcommands_keep_declaration_order() {
        let registry = ToolBuilder::<()>::new("example")
            .subcommand(Handler::new(loglevel).subcommand(SubcommandMeta::new()))
            .subcommand(Handler::new(frob).subcommand(SubcommandMeta::new()))
            .subcommand(Handler::new(display).subcommand(SubcommandMeta::new()))
            .build()
            .unwrap();
        assert_eq!(names(&registry), vec!["loglevel", "frob", "display"]);
        assert!(registry.subcommand("frob").is_some());
        assert!(registry.subcommand("nope").is_none());
    }

    #[test]
    fn test_duplicate_subcommand_rejected() {
        let result = ToolBuilder::<()>::new("example")
            .subcommand(Handler::new(frob).subcommand(SubcommandMeta::new()))
            .subcommand(Handler::new(display).subcommand(SubcommandMeta::named("frob")))
            .build();
        assert_eq!(
            result.unwrap_err(),
            DeclarationError::DuplicateSubcommand("frob".to_string())
        );
    }

    #[test]
    fn test_alias_collision_rejected() {
        let result = ToolBuilder::<()>::new("example")
            .subcommand(Handler::new(frob).subcommand(SubcommandMeta::new().alias("show")))
            .subcommand(Handler::new(display).subcommand(SubcommandMeta::named("show")))
            .build();
        assert!(matches!(
            result.unwrap_err(),
            DeclarationError::DuplicateSubcommand(name) if name == "show"
        ));
    }

    #[test]
    fn test_help_subcommand_is_reserved() {
        fn help(_: &mut (), _: &Invocation) -> anyhow::Result<()> {
            Ok(())
        }

        let result = ToolBuilder::<()>::new("t")
            .subcommand(Handler::new(help).subcommand(SubcommandMeta::new()))
            .build();
        assert_eq!(
            result.unwrap_err(),
            DeclarationError::Reserved("help".to_string())
        );

        let result = ToolBuilder::<()>::new("t")
            .subcommand(Handler::new(frob).subcommand(SubcommandMeta::new().alias("help")))
            .build();
        assert!(matches!(
            result.unwrap_err(),
            DeclarationError::Reserved(name) if name == "help"
        ));
    }

    #[test]
    fn test_global_paths_converge() {
        let declared = ToolBuilder::<()>::new("t")
            .global_arg(ArgumentSpec::flag(["--a"]))
            .global_arg(ArgumentSpec::flag(["--b"]))
            .subcommand(Handler::new(frob).subcommand(SubcommandMeta::new()))
            .build()
            .unwrap();
        // Tool-level stack applies bottom-up: --b first, then --a.
        let stacked = ToolBuilder::<()>::new("t")
            .annotate(ArgumentSpec::flag(["--b"]))
            .annotate(ArgumentSpec::flag(["--a"]))
            .subcommand(Handler::new(frob).subcommand(SubcommandMeta::new()))
            .build()
            .unwrap();
        assert_eq!(declared.globals(), stacked.globals());
    }

    #[test]
    fn test_deferred_global_lands_first() {
        let registry = ToolBuilder::<()>::new("t")
            .global_arg(ArgumentSpec::flag(["--a"]))
            .global_arg(ArgumentSpec::flag(["--b"]))
            .annotate(ArgumentSpec::flag(["--late"]))
            .subcommand(Handler::new(frob).subcommand(SubcommandMeta::new()))
            .build()
            .unwrap();
        let dests: Vec<String> = registry.globals().iter().map(|a| a.destination()).collect();
        assert_eq!(dests, vec!["late", "a", "b"]);
    }

    #[test]
    fn test_malformed_argument_fails_build() {
        let result = ToolBuilder::<()>::new("t")
            .subcommand(
                Handler::new(frob)
                    .subcommand(SubcommandMeta::new())
                    .arg(ArgumentSpec::flag(["-long"])),
            )
            .build();
        assert!(matches!(
            result.unwrap_err(),
            DeclarationError::MalformedArgument { .. }
        ));
    }

    #[test]
    fn test_unmarked_handler_fails_build() {
        let result = ToolBuilder::<()>::new("t")
            .subcommand(Handler::new(frob).arg(ArgumentSpec::positional("baz")))
            .build();
        assert!(matches!(
            result.unwrap_err(),
            DeclarationError::NotASubcommand(_)
        ));
    }

    #[test]
    fn test_config_location() {
        let registry = ToolBuilder::<()>::new("t")
            .config_path("/tmp/termkit-test-config")
            .subcommand(Handler::new(frob).subcommand(SubcommandMeta::new()))
            .build()
            .unwrap();
        let file = registry.config_file().unwrap().unwrap();
        assert_eq!(file.path(), std::path::Path::new("/tmp/termkit-test-config"));

        let registry = ToolBuilder::<()>::new("t")
            .without_config_file()
            .subcommand(Handler::new(frob).subcommand(SubcommandMeta::new()))
            .build()
            .unwrap();
        assert!(registry.config_file().unwrap().is_none());
    }
}
