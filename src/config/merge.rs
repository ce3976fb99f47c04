//! Combining persisted tokens with the command line

use std::ffi::OsString;

/// Build the token sequence handed to the parser.
///
/// Config tokens come first, so they act as defaults that the command line
/// overrides: for a single-valued option the last occurrence wins.
pub fn merge_args<C, A, T>(config_tokens: C, argv: A) -> Vec<OsString>
where
    C: IntoIterator,
    C::Item: Into<OsString>,
    A: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    config_tokens
        .into_iter()
        .map(Into::into)
        .chain(argv.into_iter().map(Into::into))
        .collect()
}
