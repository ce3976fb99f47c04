//! Parser builder - turns a registry into a clap Command
//!
//! The grammar has two levels: global flags (always `-v`, `-q` and
//! `--no-color`, then the tool's global arguments) and a required subcommand
//! selector, each subcommand carrying its own arguments. Global flags are
//! accepted before or after the subcommand name.
//!
//! Everything clap would reject as a developer mistake is checked here first
//! and reported as a [`DeclarationError`].

use crate::declare::{Action, ArgumentSpec, Arity, Registry, SubcommandSpec, ValueType};
use crate::error::{DeclarationError, DeclarationResult};
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, Command};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Destination of the stackable "more verbose" flag
pub const VERBOSE_ID: &str = "verbose";
/// Destination of the stackable "less verbose" flag
pub const QUIET_ID: &str = "quiet";
/// Destination of the colour switch (`--no-color` stores `false`)
pub const COLOR_ID: &str = "color";

const RESERVED_IDS: &[&str] = &[VERBOSE_ID, QUIET_ID, COLOR_ID, "help", "version"];

/// Builds the parser grammar for one registry
pub struct ParserBuilder<'a, S> {
    registry: &'a Registry<S>,
}

/// Flag spellings and destinations already used in one grammar scope
#[derive(Default, Clone)]
struct Spellings {
    flags: HashMap<String, String>,
    dests: HashSet<String>,
}

impl Spellings {
    fn reserved(with_version: bool) -> Self {
        let mut seen = Self::default();
        let mut builtin = vec!["-h", "--help", "-v", "-q", "--no-color"];
        if with_version {
            builtin.extend(["-V", "--version"]);
        }
        for spelling in builtin {
            seen.flags.insert(spelling.to_string(), "<builtin>".to_string());
        }
        for id in RESERVED_IDS {
            seen.dests.insert(id.to_string());
        }
        seen
    }

    fn claim(&mut self, spec: &ArgumentSpec) -> DeclarationResult<()> {
        let dest = spec.destination();
        if RESERVED_IDS.contains(&dest.as_str()) {
            return Err(DeclarationError::Reserved(dest));
        }
        if !self.dests.insert(dest.clone()) {
            return Err(DeclarationError::DuplicateDestination(dest));
        }
        if spec.is_positional() {
            return Ok(());
        }
        for spelling in spec.names() {
            if let Some(first) = self.flags.get(spelling) {
                if first == "<builtin>" {
                    return Err(DeclarationError::Reserved(spelling.clone()));
                }
                return Err(DeclarationError::ConflictingSpelling {
                    spelling: spelling.clone(),
                    first: first.clone(),
                    second: dest,
                });
            }
            self.flags.insert(spelling.clone(), dest.clone());
        }
        Ok(())
    }
}

impl<'a, S> ParserBuilder<'a, S> {
    /// Create a builder over a registry
    pub fn new(registry: &'a Registry<S>) -> Self {
        Self { registry }
    }

    /// Build the clap Command
    pub fn build(self) -> DeclarationResult<Command> {
        let registry = self.registry;
        let mut app = Command::new(registry.name().to_string())
            .subcommand_required(true)
            .subcommand_help_heading("Subcommands")
            .arg(
                Arg::new(VERBOSE_ID)
                    .short('v')
                    .action(ArgAction::Count)
                    .global(true)
                    .help("be more verbose (stackable)"),
            )
            .arg(
                Arg::new(QUIET_ID)
                    .short('q')
                    .action(ArgAction::Count)
                    .global(true)
                    .help("be less verbose (stackable)"),
            )
            .arg(
                Arg::new(COLOR_ID)
                    .long("no-color")
                    .action(ArgAction::SetFalse)
                    .global(true)
                    .help("use no color in log"),
            );

        if let Some(about) = registry.about() {
            app = app.about(about.to_string());
        }
        if let Some(version) = registry.version() {
            app = app.version(version.to_string());
        }

        let mut global_scope = Spellings::reserved(registry.version().is_some());
        for spec in registry.globals() {
            if spec.is_positional() {
                return Err(DeclarationError::malformed(
                    spec.names(),
                    "global arguments must be flags",
                ));
            }
            if spec.is_required() {
                return Err(DeclarationError::malformed(
                    spec.names(),
                    "global arguments cannot be required",
                ));
            }
            global_scope.claim(spec)?;
            app = app.arg(Self::build_arg(spec).global(true));
        }

        for sub in registry.subcommands() {
            app = app.subcommand(Self::build_subcommand(sub, global_scope.clone())?);
        }

        Ok(app)
    }

    /// Build one subcommand with its own arguments
    fn build_subcommand(sub: &SubcommandSpec<S>, mut scope: Spellings) -> DeclarationResult<Command> {
        let mut cmd = Command::new(sub.name().to_string());

        if let Some(help) = sub.help() {
            cmd = cmd.about(help.to_string());
        }
        if let Some(description) = sub.description().or(sub.help()) {
            cmd = cmd.long_about(description.to_string());
        }
        for alias in sub.aliases() {
            cmd = cmd.visible_alias(alias.to_string());
        }

        Self::check_positionals(sub.args())?;
        for spec in sub.args() {
            scope.claim(spec)?;
            cmd = cmd.arg(Self::build_arg(spec));
        }

        Ok(cmd)
    }

    /// Positional order rules the parser relies on
    fn check_positionals(args: &[ArgumentSpec]) -> DeclarationResult<()> {
        let positionals: Vec<&ArgumentSpec> = args.iter().filter(|a| a.is_positional()).collect();
        let mut seen_optional = false;
        for (i, spec) in positionals.iter().enumerate() {
            if spec.get_arity().is_variadic() && i + 1 != positionals.len() {
                return Err(DeclarationError::malformed(
                    spec.names(),
                    "only the last positional argument may take several values",
                ));
            }
            if spec.is_required() && seen_optional {
                return Err(DeclarationError::malformed(
                    spec.names(),
                    "a required positional cannot follow an optional one",
                ));
            }
            seen_optional |= !spec.is_required();
        }
        Ok(())
    }

    /// Build a single argument
    fn build_arg(spec: &ArgumentSpec) -> Arg {
        let mut arg = Arg::new(spec.destination());

        if !spec.is_positional() {
            let mut longs = spec.longs();
            if let Some(long) = longs.next() {
                arg = arg.long(long.to_string());
            }
            for alias in longs {
                arg = arg.visible_alias(alias.to_string());
            }
            let mut shorts = spec.shorts();
            if let Some(short) = shorts.next() {
                arg = arg.short(short);
            }
            for alias in shorts {
                arg = arg.visible_short_alias(alias);
            }
        }

        if let Some(help) = spec.get_help() {
            arg = arg.help(help.to_string());
        }
        if let Some(metavar) = spec.get_metavar() {
            arg = arg.value_name(metavar.to_string());
        }

        arg = match spec.get_action() {
            Action::StoreTrue => return arg.action(ArgAction::SetTrue),
            Action::StoreFalse => return arg.action(ArgAction::SetFalse),
            Action::Count => return arg.action(ArgAction::Count),
            Action::Append => arg.action(ArgAction::Append),
            Action::Store if spec.get_arity().is_variadic() => arg.action(ArgAction::Append),
            Action::Store => arg.action(ArgAction::Set),
        };

        // Positionals always consume at least one value; leaving them out is
        // expressed through `required(false)`.
        arg = match (spec.get_arity(), spec.is_positional()) {
            (Arity::One, _) | (Arity::Optional, true) => arg.num_args(1),
            (Arity::Optional, false) => arg.num_args(0..=1),
            (Arity::ZeroOrMore, false) => arg.num_args(0..),
            (Arity::ZeroOrMore, true) | (Arity::OneOrMore, _) => arg.num_args(1..),
        };

        arg = arg.required(spec.is_required());

        if let Some(default) = spec.get_default() {
            arg = arg.default_value(default.to_string());
        }

        if !spec.get_choices().is_empty() {
            arg = arg.value_parser(PossibleValuesParser::new(spec.get_choices().to_vec()));
        } else {
            arg = match spec.get_value_type() {
                ValueType::String => arg.value_parser(clap::value_parser!(String)),
                ValueType::Integer => arg.value_parser(clap::value_parser!(i64)),
                ValueType::Float => arg.value_parser(clap::value_parser!(f64)),
                ValueType::Path => arg.value_parser(clap::value_parser!(PathBuf)),
            };
        }

        arg
    }
}
