//! Parsed invocation handed to subcommand handlers
//!
//! Global flag values and the selected subcommand's argument values are
//! merged into one flat map keyed by destination.

use super::builder::{COLOR_ID, QUIET_ID, VERBOSE_ID};
use crate::config::ConfigFile;
use crate::declare::{Action, ArgumentSpec, ValueType};
use crate::error::ToolError;
use crate::observability::LogLevel;
use clap::ArgMatches;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One parsed value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text
    Str(String),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// Filesystem path
    Path(PathBuf),
    /// `store_true` / `store_false` result
    Bool(bool),
    /// Occurrence count
    Count(u8),
    /// Several values
    List(Vec<Value>),
}

impl Value {
    /// Text content, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Everything a handler learns about the current run
#[derive(Debug, Clone)]
pub struct Invocation {
    subcommand: String,
    values: BTreeMap<String, Value>,
    verbose: u8,
    quiet: u8,
    color: bool,
    level: LogLevel,
    config: Option<ConfigFile>,
}

impl Invocation {
    /// Collect values for the given argument specs out of clap's matches
    pub(crate) fn from_matches<'a, I>(subcommand: &str, matches: &ArgMatches, specs: I) -> Self
    where
        I: IntoIterator<Item = &'a ArgumentSpec>,
    {
        let mut values = BTreeMap::new();
        for spec in specs {
            let dest = spec.destination();
            if let Some(value) = extract(matches, &dest, spec) {
                values.insert(dest, value);
            }
        }

        let count = |id: &str| {
            matches
                .try_get_one::<u8>(id)
                .ok()
                .flatten()
                .copied()
                .unwrap_or(0)
        };
        let verbose = count(VERBOSE_ID);
        let quiet = count(QUIET_ID);
        let color = matches
            .try_get_one::<bool>(COLOR_ID)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(true);

        Self {
            subcommand: subcommand.to_string(),
            values,
            verbose,
            quiet,
            color,
            level: LogLevel::default(),
            config: None,
        }
    }

    pub(crate) fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub(crate) fn with_config_file(mut self, config: Option<ConfigFile>) -> Self {
        self.config = config;
        self
    }

    /// Name of the selected subcommand
    pub fn subcommand(&self) -> &str {
        &self.subcommand
    }

    /// Raw value stored under `dest`
    pub fn get(&self, dest: &str) -> Option<&Value> {
        self.values.get(dest)
    }

    /// Whether a value is stored under `dest`
    pub fn contains(&self, dest: &str) -> bool {
        self.values.contains_key(dest)
    }

    /// All values by destination
    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// String value
    pub fn str(&self, dest: &str) -> Option<&str> {
        self.get(dest).and_then(Value::as_str)
    }

    /// Integer value
    pub fn int(&self, dest: &str) -> Option<i64> {
        match self.get(dest) {
            Some(Value::Int(n)) => Some(*n),
            _ => None,
        }
    }

    /// Float value
    pub fn float(&self, dest: &str) -> Option<f64> {
        match self.get(dest) {
            Some(Value::Float(n)) => Some(*n),
            _ => None,
        }
    }

    /// Path value
    pub fn path(&self, dest: &str) -> Option<&Path> {
        match self.get(dest) {
            Some(Value::Path(p)) => Some(p),
            _ => None,
        }
    }

    /// Boolean flag; `false` when absent
    pub fn flag(&self, dest: &str) -> bool {
        matches!(self.get(dest), Some(Value::Bool(true)))
    }

    /// Occurrence count; `0` when absent
    pub fn count(&self, dest: &str) -> u8 {
        match self.get(dest) {
            Some(Value::Count(n)) => *n,
            _ => 0,
        }
    }

    /// List value; empty when absent
    pub fn list(&self, dest: &str) -> &[Value] {
        match self.get(dest) {
            Some(Value::List(items)) => items,
            _ => &[],
        }
    }

    /// String items of a list value
    pub fn strings(&self, dest: &str) -> Vec<&str> {
        self.list(dest).iter().filter_map(Value::as_str).collect()
    }

    /// String value, or a [`ToolError`] naming the missing argument
    pub fn require_str(&self, dest: &str) -> Result<&str, ToolError> {
        self.str(dest)
            .ok_or_else(|| ToolError::new(format!("missing value for {}", dest)))
    }

    /// Number of `-v` occurrences
    pub fn verbose(&self) -> u8 {
        self.verbose
    }

    /// Number of `-q` occurrences
    pub fn quiet(&self) -> u8 {
        self.quiet
    }

    /// `false` when `--no-color` was given
    pub fn color(&self) -> bool {
        self.color
    }

    /// Log threshold resolved for this run
    pub fn log_level(&self) -> LogLevel {
        self.level
    }

    /// The persisted argument file, for handlers that save settings
    pub fn config_file(&self) -> Option<&ConfigFile> {
        self.config.as_ref()
    }
}

fn extract(matches: &ArgMatches, dest: &str, spec: &ArgumentSpec) -> Option<Value> {
    match spec.get_action() {
        Action::StoreTrue | Action::StoreFalse => matches
            .try_get_one::<bool>(dest)
            .ok()
            .flatten()
            .map(|b| Value::Bool(*b)),
        Action::Count => matches
            .try_get_one::<u8>(dest)
            .ok()
            .flatten()
            .map(|n| Value::Count(*n)),
        Action::Append | Action::Store if spec.is_multiple() => {
            let items = typed_values(matches, dest, spec.get_value_type(), !spec.get_choices().is_empty());
            match (items, spec.get_action()) {
                (Some(items), _) => Some(Value::List(items)),
                (None, Action::Append) => Some(Value::List(Vec::new())),
                (None, _) => None,
            }
        }
        Action::Append | Action::Store => {
            typed_values(matches, dest, spec.get_value_type(), !spec.get_choices().is_empty())
                .and_then(|mut items| items.pop())
        }
    }
}

fn typed_values(matches: &ArgMatches, dest: &str, ty: ValueType, choices: bool) -> Option<Vec<Value>> {
    fn many<T, F>(matches: &ArgMatches, dest: &str, wrap: F) -> Option<Vec<Value>>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(T) -> Value,
    {
        matches
            .try_get_many::<T>(dest)
            .ok()
            .flatten()
            .map(|vals| vals.cloned().map(&wrap).collect())
    }

    // Choice-restricted arguments always parse to strings.
    if choices {
        return many::<String, _>(matches, dest, Value::Str);
    }
    match ty {
        ValueType::String => many::<String, _>(matches, dest, Value::Str),
        ValueType::Integer => many::<i64, _>(matches, dest, Value::Int),
        ValueType::Float => many::<f64, _>(matches, dest, Value::Float),
        ValueType::Path => many::<PathBuf, _>(matches, dest, Value::Path),
    }
}
