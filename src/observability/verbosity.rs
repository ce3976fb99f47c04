//! Mapping `-v`/`-q` counts to a log threshold

use super::logger::LogLevel;

/// Threshold used when neither flag is given
pub const BASELINE: LogLevel = LogLevel::Warning;

/// Resolve the threshold for `verbose` occurrences of `-v` and `quiet` of `-q`.
///
/// Each `-v` moves one level toward DEBUG and each `-q` one level toward
/// CRITICAL. Only the net count matters, and the result is clamped to the
/// ends of the scale.
pub fn resolve_verbosity(verbose: u8, quiet: u8) -> LogLevel {
    let last = LogLevel::ALL.len() as i32 - 1;
    let index = (BASELINE.index() as i32 - verbose as i32 + quiet as i32).clamp(0, last);
    LogLevel::ALL[index as usize]
}
