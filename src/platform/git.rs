//! Git queries for the working tree

use crate::core::GitFacts;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("Not inside a git working tree")]
    NotARepository,

    #[error("Failed to run git: {0}")]
    Spawn(#[from] io::Error),

    #[error("git {args} failed: {stderr}")]
    Command { args: String, stderr: String },
}

/// Runs git in a directory
#[derive(Debug, Clone)]
pub struct Git {
    program: String,
    dir: Option<PathBuf>,
}

impl Git {
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
            dir: None,
        }
    }

    /// Run git in `dir` instead of the process working directory
    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Run git; the inner result is trimmed stdout, or stderr when git exits nonzero
    fn query(&self, args: &[&str]) -> Result<Result<String, String>, GitError> {
        let mut command = Command::new(&self.program);
        command.args(args);
        if let Some(dir) = &self.dir {
            command.current_dir(dir);
        }
        debug!("git {}", args.join(" "));
        let output = command.output()?;
        if output.status.success() {
            Ok(Ok(String::from_utf8_lossy(&output.stdout).trim().to_string()))
        } else {
            Ok(Err(String::from_utf8_lossy(&output.stderr).trim().to_string()))
        }
    }

    fn required(&self, args: &[&str]) -> Result<String, GitError> {
        self.query(args)?.map_err(|stderr| GitError::Command {
            args: args.join(" "),
            stderr,
        })
    }

    /// Root of the working tree
    pub fn toplevel(&self) -> Result<PathBuf, GitError> {
        match self.query(&["rev-parse", "--show-toplevel"])? {
            Ok(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => Err(GitError::NotARepository),
        }
    }

    /// Current branch name (`HEAD` when detached)
    pub fn current_branch(&self) -> Result<String, GitError> {
        match self.query(&["symbolic-ref", "--short", "-q", "HEAD"])? {
            Ok(branch) if !branch.is_empty() => Ok(branch),
            _ => self.required(&["rev-parse", "--abbrev-ref", "HEAD"]),
        }
    }

    /// URL of `remote`, or `None` when it is not configured
    pub fn remote_url(&self, remote: &str) -> Result<Option<String>, GitError> {
        let key = format!("remote.{}.url", remote);
        Ok(self
            .query(&["config", "--get", &key])?
            .ok()
            .filter(|url| !url.is_empty()))
    }

    /// Everything the environment builder needs from git
    pub fn facts(&self, remote: &str) -> Result<GitFacts, GitError> {
        let toplevel = self.toplevel()?;
        let branch = self.current_branch()?;
        let remote_url = self.remote_url(remote)?;
        debug!(
            "branch={} remote {}={:?} toplevel={}",
            branch,
            remote,
            remote_url,
            toplevel.display()
        );
        Ok(GitFacts {
            branch,
            remote_url,
            toplevel,
        })
    }
}

impl Default for Git {
    fn default() -> Self {
        Self::new()
    }
}
