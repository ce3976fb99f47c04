//! Error types for declaring and running terminal tools

use std::path::PathBuf;
use thiserror::Error;

/// Result type for declaration operations
pub type DeclarationResult<T> = Result<T, DeclarationError>;

/// Authoring mistakes detected while a tool's subcommands and arguments are declared.
///
/// These are raised when the registry is built, never while parsing user input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    /// Two subcommands share a name (or alias)
    #[error("Duplicate subcommand: {0}")]
    DuplicateSubcommand(String),

    /// A handler was registered but never marked as a subcommand
    #[error("Handler {0} carries no subcommand annotation")]
    NotASubcommand(String),

    /// A handler was marked as a subcommand more than once
    #[error("Handler {0} is annotated as a subcommand more than once")]
    DuplicateAnnotation(String),

    /// No name was given and none could be derived from the handler
    #[error("Cannot derive a subcommand name from handler {0}; give one explicitly")]
    UnnamedHandler(String),

    /// An argument declaration is malformed
    #[error("Malformed argument {names}: {reason}")]
    MalformedArgument {
        /// The name-or-flag strings of the offending argument
        names: String,
        /// What is wrong with it
        reason: String,
    },

    /// Two arguments in the same grammar use the same flag spelling
    #[error("Flag {spelling} is declared by both {first} and {second}")]
    ConflictingSpelling {
        /// The flag spelling, e.g. `--output`
        spelling: String,
        /// Destination of the first declaration
        first: String,
        /// Destination of the second declaration
        second: String,
    },

    /// Two arguments in the same grammar store into the same destination
    #[error("Duplicate destination: {0}")]
    DuplicateDestination(String),

    /// An argument uses a spelling or destination the framework reserves
    #[error("Reserved argument {0} cannot be redeclared")]
    Reserved(String),

    /// A manifest could not be parsed
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// A manifest subcommand names a handler that was never bound
    #[error("Handler not bound: {0}")]
    UnboundHandler(String),

    /// A handler was bound under a key no manifest subcommand uses
    #[error("Handler bound but never used: {0}")]
    UnknownHandler(String),
}

impl DeclarationError {
    /// Create a malformed-argument error
    pub fn malformed<S: Into<String>>(names: &[String], reason: S) -> Self {
        Self::MalformedArgument {
            names: names.join("/"),
            reason: reason.into(),
        }
    }
}

/// Failures reading or writing the persisted argument file
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// `~` could not be expanded
    #[error("Could not determine home directory: {0}")]
    NoHomeDirectory(String),

    /// The file exists but could not be read
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        /// Path of the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file could not be created or written
    #[error("Failed to write config file {}: {source}", path.display())]
    Write {
        /// Path of the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A token cannot be stored one-per-line
    #[error("Config token contains a line break: {0:?}")]
    MultilineToken(String),
}

/// A failure a subcommand handler reports on purpose.
///
/// Returning this (directly or inside an `anyhow::Error`) from a handler makes
/// the tool log the message and exit with [`ToolError::exit_code`]. Any other
/// error escapes the dispatcher unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ToolError {
    message: String,
    code: i32,
}

impl ToolError {
    /// Create a tool error exiting with status 1
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
            code: 1,
        }
    }

    /// Use a specific non-zero exit status
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = if code == 0 { 1 } else { code };
        self
    }

    /// The message shown to the user
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The process exit status
    pub fn exit_code(&self) -> i32 {
        self.code
    }
}
