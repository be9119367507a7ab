//! Command execution on the host

use std::collections::HashMap;
use std::io;
use std::process::Command;
use tracing::debug;

/// Runs commands and interactive shells for the stepper
pub trait CommandRunner {
    /// Run one command line to completion and return its exit code
    fn run(&mut self, command: &str, environment: &HashMap<String, String>) -> io::Result<i32>;

    /// Start an interactive shell and wait for the operator to leave it
    fn spawn_shell(&mut self, shell: &str, environment: &HashMap<String, String>)
        -> io::Result<i32>;
}

/// Runs commands through `sh -c` with the tracked environment and inherited stdio
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self {
            shell: "sh".to_string(),
        }
    }

    /// Use a different shell for `-c` execution
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Exit code of a finished child; signals map to `128 + signal` like a shell
fn exit_code(status: std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

impl CommandRunner for ShellRunner {
    fn run(&mut self, command: &str, environment: &HashMap<String, String>) -> io::Result<i32> {
        debug!("{} -c {}", self.shell, command);
        let status = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .env_clear()
            .envs(environment)
            .status()?;
        Ok(exit_code(status))
    }

    fn spawn_shell(
        &mut self,
        shell: &str,
        environment: &HashMap<String, String>,
    ) -> io::Result<i32> {
        debug!("Starting interactive shell: {}", shell);
        let status = Command::new(shell)
            .env_clear()
            .envs(environment)
            .status()?;
        Ok(exit_code(status))
    }
}
