//! Tool manifests
//!
//! A tool's declarations can live in a TOML file instead of code. Arguments
//! are listed in reading order; each subcommand names a handler key that the
//! program binds with [`ToolBuilder::handler`]. Unknown keys are rejected, so
//! a misspelled option fails at declaration time instead of being ignored.
//!
//! ```toml
//! name = "example"
//! about = "A script that frobs or displays bazzes."
//!
//! [[subcommands]]
//! handler = "display"
//! help = "display a baz"
//!
//! [[subcommands.args]]
//! names = ["baz"]
//! help = "the baz to display"
//!
//! [[subcommands.args]]
//! names = ["--csv"]
//! action = "store_true"
//! ```

use super::handler::{Handler, SubcommandMeta};
use super::registry::ToolBuilder;
use super::spec::{Action, ArgumentSpec, Arity, ValueType};
use crate::cli::invocation::Invocation;
use crate::error::{DeclarationError, DeclarationResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root of a tool manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolManifest {
    /// Tool name
    pub name: String,

    /// Description shown in help
    #[serde(default)]
    pub about: Option<String>,

    /// Version for `-V/--version`
    #[serde(default)]
    pub version: Option<String>,

    /// Arguments valid for every subcommand
    #[serde(default)]
    pub global_args: Vec<ArgumentManifest>,

    /// Subcommands in declaration order
    #[serde(default)]
    pub subcommands: Vec<SubcommandManifest>,
}

/// One subcommand entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubcommandManifest {
    /// Key the handler is bound under; also the default name
    pub handler: String,

    /// Name typed at the terminal, if different from the handler key
    #[serde(default)]
    pub name: Option<String>,

    /// One-line help
    #[serde(default)]
    pub help: Option<String>,

    /// Long description
    #[serde(default)]
    pub description: Option<String>,

    /// Alternative names
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Arguments in reading order
    #[serde(default)]
    pub args: Vec<ArgumentManifest>,
}

/// One argument entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArgumentManifest {
    /// Positional name or flag spellings
    pub names: Vec<String>,

    /// Parser action
    #[serde(default)]
    pub action: Action,

    /// Value type, spelled `type`
    #[serde(default, rename = "type")]
    pub value_type: ValueType,

    /// Arity: `one`, `?`, `*` or `+`
    #[serde(default)]
    pub nargs: Arity,

    /// Help text
    #[serde(default)]
    pub help: Option<String>,

    /// Default value
    #[serde(default)]
    pub default: Option<String>,

    /// Whether a flag must be given
    #[serde(default)]
    pub required: bool,

    /// Allowed values
    #[serde(default)]
    pub choices: Vec<String>,

    /// Help placeholder
    #[serde(default)]
    pub metavar: Option<String>,

    /// Destination key
    #[serde(default)]
    pub dest: Option<String>,
}

impl From<ArgumentManifest> for ArgumentSpec {
    fn from(m: ArgumentManifest) -> Self {
        let mut spec = ArgumentSpec::new(m.names)
            .action(m.action)
            .value_type(m.value_type)
            .nargs(m.nargs)
            .choices(m.choices);
        if let Some(help) = m.help {
            spec = spec.help(help);
        }
        if let Some(default) = m.default {
            spec = spec.default_value(default);
        }
        if m.required {
            spec = spec.required();
        }
        if let Some(metavar) = m.metavar {
            spec = spec.metavar(metavar);
        }
        if let Some(dest) = m.dest {
            spec = spec.dest(dest);
        }
        spec
    }
}

impl ToolManifest {
    /// Parse a manifest from TOML text
    pub fn from_toml_str(content: &str) -> DeclarationResult<Self> {
        toml::from_str(content)
            .map_err(|e| DeclarationError::Manifest(format!("Failed to parse TOML: {}", e)))
    }

    /// Load a manifest from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> DeclarationResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DeclarationError::Manifest(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }
}

/// A manifest subcommand waiting for its handler
pub(crate) struct PendingSubcommand<S> {
    key: String,
    meta: SubcommandMeta,
    args: Vec<ArgumentSpec>,
    handler: Option<Handler<S>>,
}

impl<S> PendingSubcommand<S> {
    pub(crate) fn into_handler(self) -> DeclarationResult<Handler<S>> {
        let handler = self
            .handler
            .ok_or(DeclarationError::UnboundHandler(self.key))?;
        Ok(handler.subcommand(self.meta).args(self.args))
    }
}

impl<S> ToolBuilder<S> {
    /// Start from a manifest's declarations
    pub fn from_manifest(manifest: ToolManifest) -> Self {
        let mut builder = ToolBuilder::new(manifest.name)
            .with_about(manifest.about)
            .with_version(manifest.version);
        for arg in manifest.global_args {
            builder = builder.global_arg(arg.into());
        }
        for sub in manifest.subcommands {
            let meta = SubcommandMeta {
                name: Some(sub.name.unwrap_or_else(|| sub.handler.clone())),
                help: sub.help,
                description: sub.description,
                aliases: sub.aliases,
            };
            builder.pending.push(PendingSubcommand {
                key: sub.handler,
                meta,
                args: sub.args.into_iter().map(ArgumentSpec::from).collect(),
                handler: None,
            });
        }
        builder
    }

    /// Bind the handler for every manifest subcommand using `key`
    pub fn handler<F>(mut self, key: &str, func: F) -> Self
    where
        F: Fn(&mut S, &Invocation) -> anyhow::Result<()> + Clone + 'static,
    {
        let mut bound = false;
        for pending in self.pending.iter_mut().filter(|p| p.key == key) {
            pending.handler = Some(Handler::new(func.clone()));
            bound = true;
        }
        if !bound && self.deferred.is_none() {
            self.deferred = Some(DeclarationError::UnknownHandler(key.to_string()));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
        name = "example"
        about = "A script that frobs or displays bazzes."

        [[global_args]]
        names = ["--db"]
        type = "path"

        [[subcommands]]
        handler = "frob"
        help = "frob a baz"

        [[subcommands.args]]
        names = ["baz"]
        help = "the baz to frob"

        [[subcommands]]
        handler = "display"
        help = "display a baz"
        aliases = ["show"]

        [[subcommands.args]]
        names = ["baz"]

        [[subcommands.args]]
        names = ["--csv"]
        action = "store_true"

        [[subcommands.args]]
        names = ["-n", "--limit"]
        type = "integer"
        nargs = "?"
    "#;

    fn noop(_: &mut (), _: &Invocation) -> anyhow::Result<()> {
        Ok(())
    }

    #[test]
    fn test_parse_manifest() {
        let manifest = ToolManifest::from_toml_str(EXAMPLE).unwrap();
        assert_eq!(manifest.name, "example");
        assert_eq!(manifest.subcommands.len(), 2);
        assert_eq!(manifest.subcommands[1].args[1].action, Action::StoreTrue);
        assert_eq!(manifest.subcommands[1].args[2].value_type, ValueType::Integer);
        assert_eq!(manifest.subcommands[1].args[2].nargs, Arity::Optional);
        assert_eq!(manifest.global_args[0].value_type, ValueType::Path);
    }

    #[test]
    fn test_unknown_option_rejected() {
        let toml = r#"
            name = "t"
            [[subcommands]]
            handler = "x"
            [[subcommands.args]]
            names = ["--x"]
            acton = "store_true"
        "#;
        let err = ToolManifest::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, DeclarationError::Manifest(_)));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let toml = r#"
            name = "t"
            [[global_args]]
            names = ["--x"]
            action = "store_const"
        "#;
        assert!(ToolManifest::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_manifest_builds_registry_in_order() {
        let manifest = ToolManifest::from_toml_str(EXAMPLE).unwrap();
        let registry = ToolBuilder::<()>::from_manifest(manifest)
            .handler("frob", noop)
            .handler("display", noop)
            .build()
            .unwrap();

        let names: Vec<&str> = registry.subcommands().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["frob", "display"]);

        let display = registry.subcommand("display").unwrap();
        let dests: Vec<String> = display.args().iter().map(|a| a.destination()).collect();
        assert_eq!(dests, vec!["baz", "csv", "limit"]);
        assert_eq!(display.aliases().to_vec(), vec!["show".to_string()]);
        assert_eq!(registry.about(), Some("A script that frobs or displays bazzes."));
    }

    #[test]
    fn test_unbound_handler_fails_build() {
        let manifest = ToolManifest::from_toml_str(EXAMPLE).unwrap();
        let err = ToolBuilder::<()>::from_manifest(manifest)
            .handler("frob", noop)
            .build()
            .unwrap_err();
        assert_eq!(err, DeclarationError::UnboundHandler("display".to_string()));
    }

    #[test]
    fn test_binding_unknown_key_fails_build() {
        let manifest = ToolManifest::from_toml_str(EXAMPLE).unwrap();
        let err = ToolBuilder::<()>::from_manifest(manifest)
            .handler("frob", noop)
            .handler("display", noop)
            .handler("frobnicate", noop)
            .build()
            .unwrap_err();
        assert_eq!(err, DeclarationError::UnknownHandler("frobnicate".to_string()));
    }
}
