//! Argument declarations
//!
//! An [`ArgumentSpec`] is one declared positional argument or flag: its
//! name-or-flag strings plus a closed set of parser options. Options that make
//! no sense for the argument's kind are rejected by [`ArgumentSpec::validate`]
//! when the registry is built.

use crate::error::{DeclarationError, DeclarationResult};

/// What the parser does when it meets the argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "manifest", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "manifest", serde(rename_all = "snake_case"))]
pub enum Action {
    /// Store the value(s)
    #[default]
    Store,
    /// Flag that stores `true` when present
    StoreTrue,
    /// Flag that stores `false` when present
    StoreFalse,
    /// Flag counting its occurrences
    Count,
    /// Collect every occurrence into a list
    Append,
}

impl Action {
    /// Whether the action consumes no value
    pub fn is_flag(self) -> bool {
        matches!(self, Action::StoreTrue | Action::StoreFalse | Action::Count)
    }
}

/// Type values are converted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "manifest", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "manifest", serde(rename_all = "snake_case"))]
pub enum ValueType {
    /// UTF-8 text
    #[default]
    String,
    /// Signed 64-bit integer
    Integer,
    /// 64-bit float
    Float,
    /// Filesystem path
    Path,
}

impl ValueType {
    /// Lower-case name, as spelled in manifests
    pub fn name(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Path => "path",
        }
    }
}

/// How many values one occurrence takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "manifest", derive(serde::Deserialize, serde::Serialize))]
pub enum Arity {
    /// Exactly one
    #[default]
    #[cfg_attr(feature = "manifest", serde(rename = "one"))]
    One,
    /// Zero or one (`?`)
    #[cfg_attr(feature = "manifest", serde(rename = "?"))]
    Optional,
    /// Any number (`*`)
    #[cfg_attr(feature = "manifest", serde(rename = "*"))]
    ZeroOrMore,
    /// At least one (`+`)
    #[cfg_attr(feature = "manifest", serde(rename = "+"))]
    OneOrMore,
}

impl Arity {
    /// Whether more than one value may be given
    pub fn is_variadic(self) -> bool {
        matches!(self, Arity::ZeroOrMore | Arity::OneOrMore)
    }

    /// Whether the argument may be satisfied with no value at all
    pub fn allows_none(self) -> bool {
        matches!(self, Arity::Optional | Arity::ZeroOrMore)
    }
}

/// One declared argument or flag
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    names: Vec<String>,
    action: Action,
    value_type: ValueType,
    arity: Arity,
    help: Option<String>,
    default: Option<String>,
    required: bool,
    choices: Vec<String>,
    metavar: Option<String>,
    dest: Option<String>,
}

impl ArgumentSpec {
    /// Declare an argument from its name-or-flag strings.
    ///
    /// A single bare name (`"baz"`) is positional; strings starting with `-`
    /// (`"-o"`, `"--output"`) are flag spellings.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            action: Action::Store,
            value_type: ValueType::String,
            arity: Arity::One,
            help: None,
            default: None,
            required: false,
            choices: Vec::new(),
            metavar: None,
            dest: None,
        }
    }

    /// Declare a positional argument
    pub fn positional(name: impl Into<String>) -> Self {
        Self::new([name.into()])
    }

    /// Declare a flag with one or more spellings
    pub fn flag<I, S>(spellings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(spellings)
    }

    /// Set the parser action
    pub fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Shorthand for `action(Action::StoreTrue)`
    pub fn store_true(self) -> Self {
        self.action(Action::StoreTrue)
    }

    /// Shorthand for `action(Action::StoreFalse)`
    pub fn store_false(self) -> Self {
        self.action(Action::StoreFalse)
    }

    /// Shorthand for `action(Action::Count)`
    pub fn count(self) -> Self {
        self.action(Action::Count)
    }

    /// Shorthand for `action(Action::Append)`
    pub fn append(self) -> Self {
        self.action(Action::Append)
    }

    /// Set the value type
    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Set the arity
    pub fn nargs(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    /// Set the help text
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Set the default value, parsed like user input
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Make a flag mandatory
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Restrict values to a fixed set
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Set the placeholder shown in help
    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar = Some(metavar.into());
        self
    }

    /// Set the destination key explicitly
    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    /// Name-or-flag strings in declaration order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The parser action
    pub fn get_action(&self) -> Action {
        self.action
    }

    /// The value type
    pub fn get_value_type(&self) -> ValueType {
        self.value_type
    }

    /// The arity
    pub fn get_arity(&self) -> Arity {
        self.arity
    }

    /// Help text, if any
    pub fn get_help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Default value, if any
    pub fn get_default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Allowed values; empty when unrestricted
    pub fn get_choices(&self) -> &[String] {
        &self.choices
    }

    /// Help placeholder, if any
    pub fn get_metavar(&self) -> Option<&str> {
        self.metavar.as_deref()
    }

    /// Whether this is a positional argument
    pub fn is_positional(&self) -> bool {
        self.names.len() == 1 && !self.names[0].starts_with('-')
    }

    /// Whether the parser must see this argument
    pub fn is_required(&self) -> bool {
        if self.is_positional() {
            self.required || (!self.arity.allows_none() && self.default.is_none())
        } else {
            self.required
        }
    }

    /// Whether the argument collects a list of values
    pub fn is_multiple(&self) -> bool {
        self.action == Action::Append || self.arity.is_variadic()
    }

    /// Long spellings without their leading dashes
    pub fn longs(&self) -> impl Iterator<Item = &str> {
        self.names.iter().filter_map(|n| n.strip_prefix("--"))
    }

    /// Short spellings as characters
    pub fn shorts(&self) -> impl Iterator<Item = char> + '_ {
        self.names
            .iter()
            .filter(|n| !n.starts_with("--"))
            .filter_map(|n| n.strip_prefix('-'))
            .filter_map(|rest| rest.chars().next())
    }

    /// Key the parsed value is stored under.
    ///
    /// Explicit dest, else the first long flag with `-` turned into `_`, else
    /// the first short flag's letter, else the positional name.
    pub fn destination(&self) -> String {
        if let Some(dest) = &self.dest {
            return dest.clone();
        }
        if self.is_positional() {
            return self.names[0].clone();
        }
        if let Some(long) = self.longs().next() {
            return long.replace('-', "_");
        }
        self.shorts()
            .next()
            .map(String::from)
            .unwrap_or_default()
    }

    /// Reject malformed names and option combinations that do not fit the kind
    pub fn validate(&self) -> DeclarationResult<()> {
        let fail = |reason: &str| Err(DeclarationError::malformed(&self.names, reason));

        if self.names.is_empty() {
            return fail("no name or flag given");
        }

        let dashed = self.names.iter().filter(|n| n.starts_with('-')).count();
        if dashed != 0 && dashed != self.names.len() {
            return fail("mixes a positional name with flag spellings");
        }
        if dashed == 0 && self.names.len() > 1 {
            return fail("a positional argument takes exactly one name");
        }

        for name in &self.names {
            if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c == '=') {
                return fail("names may not be empty or contain whitespace or '='");
            }
            if let Some(long) = name.strip_prefix("--") {
                if long.is_empty() || long.starts_with('-') {
                    return fail("long flags need a name after '--'");
                }
            } else if let Some(short) = name.strip_prefix('-') {
                if short.chars().count() != 1 {
                    return fail("short flags are a single '-' and one character");
                }
            }
        }

        if let Some(dest) = &self.dest {
            if dest.is_empty() {
                return fail("dest may not be empty");
            }
        }

        if self.is_positional() {
            if self.action.is_flag() {
                return fail("positional arguments cannot use a flag action");
            }
            if self.action == Action::Append {
                return fail("positional arguments cannot append; use a variadic arity");
            }
            if self.required && self.arity.allows_none() {
                return fail("a required positional cannot have an optional arity");
            }
            if self.required && self.default.is_some() {
                return fail("a required positional never uses its default");
            }
        }

        if self.action.is_flag() {
            if self.default.is_some() {
                return fail("flag actions take no default");
            }
            if !self.choices.is_empty() {
                return fail("flag actions take no choices");
            }
            if self.arity != Arity::One {
                return fail("flag actions take no arity");
            }
            if self.value_type != ValueType::String {
                return fail("flag actions take no value type");
            }
            if self.metavar.is_some() {
                return fail("flag actions take no metavar");
            }
            if self.required {
                return fail("flag actions cannot be required");
            }
        }

        if !self.choices.is_empty() && self.value_type != ValueType::String {
            return fail("choices only apply to string values");
        }
        if let (Some(default), false) = (&self.default, self.choices.is_empty()) {
            if !self.choices.contains(default) {
                return fail("default is not one of the choices");
            }
        }
        if let Some(default) = &self.default {
            let parses = match self.value_type {
                ValueType::Integer => default.parse::<i64>().is_ok(),
                ValueType::Float => default.parse::<f64>().is_ok(),
                ValueType::String | ValueType::Path => true,
            };
            if !parses {
                return fail(&format!(
                    "default does not parse as {}",
                    self.value_type.name()
                ));
            }
        }

        Ok(())
    }
}
