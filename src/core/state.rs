//! Run state for one command stepper

use std::collections::HashMap;

/// Whether the stepper still accepts actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperStatus {
    /// Waiting for the next action
    Running,
    /// Quit, or moved past the last command
    Stopped,
}

/// Operator-controlled switches for a run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Show commands without executing them
    pub dry_run: bool,

    /// Keep a leading `sudo ` on commands
    pub sudo: bool,

    /// Ask the operator before each command
    pub prompt: bool,

    /// Answer used for empty input, and for every step when not prompting
    pub default_answer: String,

    /// Initial cursor position (clamped to the command list)
    pub start_index: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            sudo: false,
            prompt: true,
            default_answer: "y".to_string(),
            start_index: 0,
        }
    }
}

/// Everything a stepper tracks while walking the command list.
///
/// The cursor is private: every move goes through a method that keeps it
/// within `0..len` while commands exist.
#[derive(Debug, Clone)]
pub struct RunState {
    cursor: usize,
    len: usize,
    status: StepperStatus,

    /// Environment handed to every command
    pub environment: HashMap<String, String>,

    pub options: RunOptions,

    /// Commands that exited nonzero, in execution order
    pub failures: Vec<String>,
}

impl RunState {
    pub fn new(len: usize, environment: HashMap<String, String>, options: RunOptions) -> Self {
        let status = if len == 0 {
            StepperStatus::Stopped
        } else {
            StepperStatus::Running
        };
        let mut state = Self {
            cursor: 0,
            len,
            status,
            environment,
            options,
            failures: Vec::new(),
        };
        state.goto(state.options.start_index);
        state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn status(&self) -> StepperStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == StepperStatus::Running
    }

    pub fn last_index(&self) -> usize {
        self.len.saturating_sub(1)
    }

    /// Move to the next command; moving past the last one stops the run
    pub fn advance(&mut self) {
        if self.cursor >= self.last_index() {
            self.stop();
        } else {
            self.cursor += 1;
        }
    }

    pub fn back(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn fast_forward(&mut self) {
        self.cursor = self.last_index();
    }

    pub fn goto(&mut self, index: usize) {
        self.cursor = index.min(self.last_index());
    }

    pub fn stop(&mut self) {
        self.status = StepperStatus::Stopped;
    }

    pub fn record_failure(&mut self, command: impl Into<String>) {
        self.failures.push(command.into());
    }
}
