//! Subcommand handlers and the annotations attached to them
//!
//! Annotations stack on a handler the way attributes stack on a function:
//! the one written closest to the function applies first. A [`Handler`]
//! records them in application order and [`Handler::into_subcommand`] turns
//! the stack back into reading order, so both ways of declaring produce the
//! same [`SubcommandSpec`].

use super::spec::ArgumentSpec;
use crate::cli::invocation::Invocation;
use crate::error::{DeclarationError, DeclarationResult};
use std::collections::VecDeque;
use std::fmt;

/// Boxed handler callback: receives the tool state and the parsed invocation
pub type HandlerFn<S> = Box<dyn Fn(&mut S, &Invocation) -> anyhow::Result<()>>;

/// Subcommand metadata carried by a subcommand annotation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubcommandMeta {
    /// Name to type at the terminal; derived from the handler when absent
    pub name: Option<String>,
    /// One-line help shown in the subcommand list
    pub help: Option<String>,
    /// Longer text shown in the subcommand's own help
    pub description: Option<String>,
    /// Alternative names
    pub aliases: Vec<String>,
}

impl SubcommandMeta {
    /// Metadata with the name derived from the handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata with an explicit name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the one-line help
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Set the long description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an alias
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}

/// One annotation applied to a handler
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// Marks the handler as a subcommand
    Subcommand(SubcommandMeta),
    /// Declares one of the subcommand's arguments
    Argument(ArgumentSpec),
}

impl From<SubcommandMeta> for Annotation {
    fn from(meta: SubcommandMeta) -> Self {
        Annotation::Subcommand(meta)
    }
}

impl From<ArgumentSpec> for Annotation {
    fn from(spec: ArgumentSpec) -> Self {
        Annotation::Argument(spec)
    }
}

/// A subcommand handler and the annotations stacked on it
pub struct Handler<S> {
    ident: Option<String>,
    func: HandlerFn<S>,
    // Front is innermost (applied first), back is outermost.
    stack: VecDeque<Annotation>,
}

impl<S> Handler<S> {
    /// Wrap a handler function.
    ///
    /// For a plain `fn` item the subcommand name defaults to the function's
    /// own name. Closures have no usable name and need [`SubcommandMeta::named`].
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&mut S, &Invocation) -> anyhow::Result<()> + 'static,
    {
        Self {
            ident: handler_ident::<F>(),
            func: Box::new(func),
            stack: VecDeque::new(),
        }
    }

    /// Apply one more annotation on the outside of the stack.
    ///
    /// Call this innermost first, the order attribute-style annotations take
    /// effect in: the annotation written nearest the function comes first.
    pub fn annotate(mut self, annotation: impl Into<Annotation>) -> Self {
        self.stack.push_back(annotation.into());
        self
    }

    /// Mark as a subcommand (reading order)
    pub fn subcommand(mut self, meta: SubcommandMeta) -> Self {
        self.stack.push_front(Annotation::Subcommand(meta));
        self
    }

    /// Declare the next argument in reading order
    pub fn arg(mut self, spec: ArgumentSpec) -> Self {
        self.stack.push_front(Annotation::Argument(spec));
        self
    }

    /// Declare several arguments in reading order
    pub fn args<I>(self, specs: I) -> Self
    where
        I: IntoIterator<Item = ArgumentSpec>,
    {
        specs.into_iter().fold(self, Handler::arg)
    }

    /// Identifier derived from the handler's type, if any
    pub fn ident(&self) -> Option<&str> {
        self.ident.as_deref()
    }

    /// Resolve the annotation stack into a subcommand, arguments in reading order
    pub fn into_subcommand(self) -> DeclarationResult<SubcommandSpec<S>> {
        let label = self.ident.clone().unwrap_or_else(|| "<closure>".to_string());

        let mut meta: Option<SubcommandMeta> = None;
        let mut args = Vec::new();
        // Outermost annotation is the topmost one in reading order.
        for annotation in self.stack.into_iter().rev() {
            match annotation {
                Annotation::Subcommand(m) => {
                    if meta.replace(m).is_some() {
                        return Err(DeclarationError::DuplicateAnnotation(label));
                    }
                }
                Annotation::Argument(spec) => args.push(spec),
            }
        }

        let meta = meta.ok_or_else(|| DeclarationError::NotASubcommand(label.clone()))?;
        let name = match (meta.name, self.ident) {
            (Some(name), _) => name,
            (None, Some(ident)) => ident,
            (None, None) => return Err(DeclarationError::UnnamedHandler(label)),
        };
        if name.is_empty() || name.starts_with('-') || name.chars().any(char::is_whitespace) {
            return Err(DeclarationError::UnnamedHandler(name));
        }

        Ok(SubcommandSpec {
            name,
            help: meta.help,
            description: meta.description,
            aliases: meta.aliases,
            args,
            handler: self.func,
        })
    }
}

impl<S> fmt::Debug for Handler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("ident", &self.ident)
            .field("stack", &self.stack)
            .finish_non_exhaustive()
    }
}

/// Last path segment of a function item's type name; `None` for closures
fn handler_ident<F>() -> Option<String> {
    let full = std::any::type_name::<F>();
    let last = full.rsplit("::").next()?;
    if last.is_empty() || !last.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    Some(last.to_string())
}

/// One fully declared subcommand
pub struct SubcommandSpec<S> {
    pub(crate) name: String,
    pub(crate) help: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) aliases: Vec<String>,
    pub(crate) args: Vec<ArgumentSpec>,
    pub(crate) handler: HandlerFn<S>,
}

impl<S> SubcommandSpec<S> {
    /// Name typed at the terminal
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line help
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Long description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Alternative names
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Arguments in reading order
    pub fn args(&self) -> &[ArgumentSpec] {
        &self.args
    }

    /// Call the handler
    pub fn invoke(&self, state: &mut S, invocation: &Invocation) -> anyhow::Result<()> {
        (self.handler)(state, invocation)
    }
}

impl<S> fmt::Debug for SubcommandSpec<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubcommandSpec")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("aliases", &self.aliases)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}
