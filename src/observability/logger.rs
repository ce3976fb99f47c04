//! Leveled logging to the terminal.
//!
//! Records are written as `LEVEL: message`. The process-wide threshold and
//! color setting are set once by the dispatcher before a handler runs; the
//! free functions ([`debug`], [`info`], ...) log through them to stderr.

use colored::{ColoredString, Colorize};
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Log severity, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
    /// Diagnostic detail
    Debug,
    /// Progress information
    Info,
    /// Something unexpected but recoverable
    #[default]
    Warning,
    /// An operation failed
    Error,
    /// The tool cannot continue; always emitted
    Critical,
}

impl LogLevel {
    /// All levels, most verbose first
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    /// Upper-case name used in log records
    pub fn name(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// Position in [`LogLevel::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: u8) -> Self {
        Self::ALL
            .get(index as usize)
            .copied()
            .unwrap_or_default()
    }

    fn paint(self) -> ColoredString {
        let name = self.name();
        match self {
            LogLevel::Debug => name.green(),
            LogLevel::Info => name.white(),
            LogLevel::Warning => name.yellow(),
            LogLevel::Error => name.red(),
            LogLevel::Critical => name.magenta().bold(),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Writes records at or above a threshold to any writer
#[derive(Debug)]
pub struct Logger<W: Write> {
    threshold: LogLevel,
    color: bool,
    out: W,
}

impl<W: Write> Logger<W> {
    /// Create a logger over `out`
    pub fn new(out: W, threshold: LogLevel, color: bool) -> Self {
        Self {
            threshold,
            color,
            out,
        }
    }

    /// Current threshold
    pub fn threshold(&self) -> LogLevel {
        self.threshold
    }

    /// Whether a record at `level` would be written
    pub fn enabled(&self, level: LogLevel) -> bool {
        level == LogLevel::Critical || level >= self.threshold
    }

    /// Write one record if `level` passes the threshold
    pub fn log(&mut self, level: LogLevel, message: &str) -> io::Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }
        if self.color {
            writeln!(self.out, "{}: {}", level.paint(), message)
        } else {
            writeln!(self.out, "{}: {}", level.name(), message)
        }
    }

    /// Give back the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

static THRESHOLD: AtomicU8 = AtomicU8::new(LogLevel::Warning as u8);
static COLOR: AtomicBool = AtomicBool::new(true);

/// Set the process-wide threshold
pub fn set_threshold(level: LogLevel) {
    THRESHOLD.store(level as u8, Ordering::Relaxed);
}

/// The process-wide threshold
pub fn threshold() -> LogLevel {
    LogLevel::from_index(THRESHOLD.load(Ordering::Relaxed))
}

/// Enable or disable colored level names on stderr.
///
/// This also overrides `colored`'s own terminal detection, which looks at
/// stdout, so the caller's decision about stderr is the one applied.
pub fn set_color(enabled: bool) {
    COLOR.store(enabled, Ordering::Relaxed);
    colored::control::set_override(enabled);
}

/// Log to stderr through the process-wide settings
pub fn log(level: LogLevel, message: &str) {
    let stderr = io::stderr();
    let mut logger = Logger::new(stderr.lock(), threshold(), COLOR.load(Ordering::Relaxed));
    // Nothing sensible to do if stderr is gone.
    let _ = logger.log(level, message);
}

/// Log at DEBUG
pub fn debug(message: &str) {
    log(LogLevel::Debug, message);
}

/// Log at INFO
pub fn info(message: &str) {
    log(LogLevel::Info, message);
}

/// Log at WARNING
pub fn warning(message: &str) {
    log(LogLevel::Warning, message);
}

/// Log at ERROR
pub fn error(message: &str) {
    log(LogLevel::Error, message);
}

/// Log at CRITICAL
pub fn critical(message: &str) {
    log(LogLevel::Critical, message);
}
