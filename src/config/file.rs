//! Persisted argument file.
//!
//! The file holds command-line tokens, one per line, in the order they would
//! be typed. A missing file reads as no tokens. Writing replaces the whole
//! file and creates it readable and writable by the owner only.

use crate::error::ConfigFileError;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// The per-user argument file of one tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    /// Use an explicit path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.{tool name lower-cased}`
    pub fn for_tool(name: &str) -> Result<Self, ConfigFileError> {
        let raw = format!("~/.{}", name.to_lowercase());
        let expanded = shellexpand::tilde(&raw);
        if expanded.starts_with('~') {
            return Err(ConfigFileError::NoHomeDirectory(raw));
        }
        Ok(Self::at(expanded.into_owned()))
    }

    /// Location on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored tokens in line order; empty if the file does not exist
    pub fn read(&self) -> Result<Vec<String>, ConfigFileError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ConfigFileError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        Ok(content.split_terminator('\n').map(str::to_string).collect())
    }

    /// Replace the file with `tokens`, one per line
    pub fn write<I, S>(&self, tokens: I) -> Result<(), ConfigFileError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut content = String::new();
        for token in tokens {
            let token = token.as_ref();
            if token.contains('\n') {
                return Err(ConfigFileError::MultilineToken(token.to_string()));
            }
            content.push_str(token);
            content.push('\n');
        }

        let write_err = |source| ConfigFileError::Write {
            path: self.path.clone(),
            source,
        };
        let mut file = owner_only(OpenOptions::new().write(true).create(true).truncate(true))
            .open(&self.path)
            .map_err(write_err)?;
        restrict_permissions(&self.path).map_err(write_err)?;
        file.write_all(content.as_bytes()).map_err(write_err)?;
        file.flush().map_err(write_err)
    }
}

#[cfg(unix)]
fn owner_only(options: &mut OpenOptions) -> &mut OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(0o600)
}

#[cfg(not(unix))]
fn owner_only(options: &mut OpenOptions) -> &mut OpenOptions {
    options
}

// `mode` only applies when the file is created; tighten a pre-existing one too.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_in(dir: &TempDir) -> ConfigFile {
        ConfigFile::at(dir.path().join(".example"))
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        assert!(file_in(&dir).read().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let dir = TempDir::new().unwrap();
        let file = file_in(&dir);
        let tokens = vec!["--global-opt", "1", "", "with space", "-v"];
        file.write(&tokens).unwrap();
        assert_eq!(file.read().unwrap(), tokens);
    }

    #[test]
    fn test_round_trip_empty() {
        let dir = TempDir::new().unwrap();
        let file = file_in(&dir);
        file.write(["--x"]).unwrap();
        file.write(Vec::<String>::new()).unwrap();
        assert!(file.read().unwrap().is_empty());
    }

    #[test]
    fn test_write_overwrites() {
        let dir = TempDir::new().unwrap();
        let file = file_in(&dir);
        file.write(["--a", "1", "--b", "2"]).unwrap();
        file.write(["--c"]).unwrap();
        assert_eq!(file.read().unwrap(), vec!["--c"]);
    }

    #[test]
    fn test_line_without_terminator_is_read() {
        let dir = TempDir::new().unwrap();
        let file = file_in(&dir);
        fs::write(file.path(), "--a\n1").unwrap();
        assert_eq!(file.read().unwrap(), vec!["--a", "1"]);
    }

    #[test]
    fn test_multiline_token_rejected() {
        let dir = TempDir::new().unwrap();
        let file = file_in(&dir);
        let err = file.write(["a\nb"]).unwrap_err();
        assert!(matches!(err, ConfigFileError::MultilineToken(_)));
        assert!(!file.path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_written_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let file = file_in(&dir);
        fs::write(file.path(), "old\n").unwrap();
        fs::set_permissions(file.path(), fs::Permissions::from_mode(0o644)).unwrap();

        file.write(["--token", "secret"]).unwrap();
        let mode = fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_for_tool_lowercases_name() {
        if let Ok(file) = ConfigFile::for_tool("Example") {
            assert!(file.path().ends_with(".example"));
        }
    }
}
