//! Interpreter lookup on `PATH`

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("No {program} found on PATH")]
    NotFound { program: String },
}

/// Finds `<language><version>` executables, e.g. `python3.6`
#[derive(Debug, Clone, Default)]
pub struct InterpreterLocator {
    search_path: Vec<PathBuf>,
}

impl InterpreterLocator {
    pub fn new(search_path: Vec<PathBuf>) -> Self {
        Self { search_path }
    }

    /// Search the directories of a `PATH`-style value
    pub fn from_path_var(path: Option<&OsStr>) -> Self {
        let search_path = path
            .map(|p| std::env::split_paths(p).collect())
            .unwrap_or_default();
        Self { search_path }
    }

    /// Executable name for a language version.
    ///
    /// Versions that start with a letter (`pypy3`, `jruby`) name the
    /// executable themselves.
    pub fn program_name(language: &str, version: &str) -> String {
        let stem = match language {
            "node_js" => "node",
            other => other,
        };
        match version.chars().next() {
            None => stem.to_string(),
            Some(c) if c.is_ascii_alphabetic() => version.to_string(),
            Some(_) => format!("{}{}", stem, version),
        }
    }

    pub fn locate(&self, language: &str, version: &str) -> Result<PathBuf, InterpreterError> {
        let program = Self::program_name(language, version);
        let found = self
            .search_path
            .iter()
            .map(|dir| dir.join(&program))
            .find(|candidate| is_executable(candidate));
        match found {
            Some(path) => {
                debug!("Found {} at {}", program, path.display());
                Ok(path)
            }
            None => Err(InterpreterError::NotFound { program }),
        }
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
