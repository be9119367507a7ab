//! Interactive command stepper
//!
//! Walks one variant's command list under operator control. Each loop
//! iteration shows the current command, reads one line of input and applies
//! the parsed actions in order. The run ends on `quit`, on end of input, or
//! when the cursor moves past the last command.

use crate::cli::output::{style, CROSS, INFO, WARN};
use crate::core::expand::expand;
use crate::core::{RunOptions, RunState};
use crate::execution::action::{self, Action, Input, HELP, PROMPT_CHOICES};
use crate::execution::input::OperatorInput;
use crate::execution::runner::CommandRunner;
use std::collections::HashMap;
use std::fmt::Display;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that end a stepper run
#[derive(Debug, Error)]
pub enum StepperError {
    #[error("Command {index} is empty")]
    EmptyCommand { index: usize },

    #[error("Failed to read operator input: {0}")]
    Input(#[source] io::Error),

    #[error("Failed to write output: {0}")]
    Output(#[source] io::Error),
}

/// Drop a leading `sudo ` unless sudo is allowed
pub fn strip_sudo(command: &str, sudo: bool) -> &str {
    if sudo {
        command
    } else {
        command.strip_prefix("sudo ").unwrap_or(command)
    }
}

/// The directory of a command that is exactly `cd <dir>`
pub fn cd_target(command: &str) -> Option<String> {
    match shell_words::split(command).ok()?.as_slice() {
        [cd, dir] if cd == "cd" => Some(dir.clone()),
        _ => None,
    }
}

/// Steps through one command list with one environment
pub struct CommandStepper<'a, R, I, W> {
    commands: Vec<String>,
    state: RunState,
    runner: &'a mut R,
    input: &'a mut I,
    out: &'a mut W,
}

impl<'a, R, I, W> CommandStepper<'a, R, I, W>
where
    R: CommandRunner,
    I: OperatorInput,
    W: Write,
{
    pub fn new(
        commands: Vec<String>,
        environment: HashMap<String, String>,
        options: RunOptions,
        runner: &'a mut R,
        input: &'a mut I,
        out: &'a mut W,
    ) -> Self {
        let state = RunState::new(commands.len(), environment, options);
        Self {
            commands,
            state,
            runner,
            input,
            out,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Failed commands, consuming the stepper
    pub fn into_failures(self) -> Vec<String> {
        self.state.failures
    }

    /// Loop until the run stops
    pub fn run(&mut self) -> Result<(), StepperError> {
        info!("Stepping through {} commands", self.commands.len());
        while self.state.is_running() {
            self.step()?;
        }
        info!(
            "Run finished with {} failed command(s)",
            self.state.failures.len()
        );
        Ok(())
    }

    /// Show the current command, read one answer and apply it
    pub fn step(&mut self) -> Result<(), StepperError> {
        let index = self.state.cursor();
        self.check_command(index)?;
        self.show_status()?;

        let line = if self.state.options.prompt {
            let prompt = format!("{} ", PROMPT_CHOICES);
            match self.input.read_line(&prompt).map_err(StepperError::Input)? {
                Some(line) => line,
                None => {
                    debug!("End of operator input");
                    self.state.stop();
                    return Ok(());
                }
            }
        } else {
            let answer = self.state.options.default_answer.clone();
            self.say(format!("{} {}", PROMPT_CHOICES, answer))?;
            answer
        };

        let input = action::parse(&line, &self.state.options.default_answer);
        self.dispatch(input)
    }

    /// Apply a parsed input; repeats are applied one action at a time
    pub fn dispatch(&mut self, input: Input) -> Result<(), StepperError> {
        match input {
            Input::Usage(message) => self.say(format!("{}{}", WARN, style(message).yellow())),
            Input::Unknown(text) => {
                debug!("Unrecognized input: {:?}", text);
                self.say(HELP)
            }
            Input::Action(action) => self.apply(action),
            Input::Repeat { count, action } => {
                // more repeats than commands cannot move the cursor any further
                let count = count.min(self.state.len());
                debug!("Repeating {:?} {} time(s)", action, count);
                for _ in 0..count {
                    if !self.state.is_running() {
                        break;
                    }
                    self.apply(action.clone())?;
                }
                Ok(())
            }
        }
    }

    /// Apply a single action
    pub fn apply(&mut self, action: Action) -> Result<(), StepperError> {
        debug!("Action {:?} at command {}", action, self.state.cursor());
        match action {
            Action::Run => self.execute_current(),
            Action::Skip => {
                self.state.advance();
                Ok(())
            }
            Action::Back => {
                self.state.back();
                Ok(())
            }
            Action::Rewind => {
                self.state.rewind();
                Ok(())
            }
            Action::FastForward => {
                self.state.fast_forward();
                Ok(())
            }
            Action::Goto(index) => {
                self.state.goto(index);
                Ok(())
            }
            Action::List => self.show_list(),
            Action::Status => self.show_status(),
            Action::Shell(name) => self.start_shell(name),
            Action::Cd(dir) => {
                if let Err(e) = self.change_dir(&dir) {
                    self.say(format!("{}cd {}: {}", WARN, dir, e))?;
                }
                Ok(())
            }
            Action::Help => self.say(HELP),
            Action::Env => self.show_environment(),
            Action::Pwd => {
                let pwd = std::env::current_dir()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|e| format!("<{}>", e));
                self.say(pwd)
            }
            Action::Quit => {
                info!("Run stopped by operator");
                self.state.stop();
                Ok(())
            }
        }
    }

    /// Command at `index` as it will run: sudo policy applied, not expanded
    fn command_at(&self, index: usize) -> Result<&str, StepperError> {
        self.check_command(index)?;
        Ok(strip_sudo(&self.commands[index], self.state.options.sudo))
    }

    fn check_command(&self, index: usize) -> Result<(), StepperError> {
        match self.commands.get(index) {
            Some(command) if !command.trim().is_empty() => Ok(()),
            _ => Err(StepperError::EmptyCommand { index }),
        }
    }

    fn display(&self, index: usize) -> String {
        match self.commands.get(index) {
            Some(command) => expand(
                strip_sudo(command, self.state.options.sudo),
                &self.state.environment,
            ),
            None => String::new(),
        }
    }

    fn execute_current(&mut self) -> Result<(), StepperError> {
        let index = self.state.cursor();
        let command = self.command_at(index)?.to_string();

        if self.state.options.dry_run {
            info!("Dry run, not executing: {}", command);
        } else {
            info!("Executing command {}: {}", index, command);
            let succeeded = match cd_target(&command) {
                Some(dir) => match self.change_dir(&dir) {
                    Ok(()) => true,
                    Err(e) => {
                        self.say(format!("{}cd {}: {}", CROSS, dir, e))?;
                        false
                    }
                },
                None => match self.runner.run(&command, &self.state.environment) {
                    Ok(0) => true,
                    Ok(code) => {
                        warn!("Command exited with code {}: {}", code, command);
                        self.say(format!(
                            "{}{} {}",
                            CROSS,
                            style(format!("exit {}", code)).red(),
                            style(&command).dim()
                        ))?;
                        false
                    }
                    Err(e) => {
                        error!("Failed to execute {}: {}", command, e);
                        self.say(format!("{}{}", CROSS, style(e).red()))?;
                        false
                    }
                },
            };
            if !succeeded {
                self.state.record_failure(command);
            }
        }

        self.state.advance();
        Ok(())
    }

    /// Change the process working directory and mirror it into `PWD`
    fn change_dir(&mut self, dir: &str) -> io::Result<()> {
        let target = PathBuf::from(expand(dir, &self.state.environment));
        std::env::set_current_dir(&target)?;
        let pwd = std::env::current_dir()?;
        info!("Working directory is now {}", pwd.display());
        self.state
            .environment
            .insert("PWD".to_string(), pwd.to_string_lossy().into_owned());
        Ok(())
    }

    fn start_shell(&mut self, name: Option<String>) -> Result<(), StepperError> {
        let shell = name
            .or_else(|| self.state.environment.get("SHELL").cloned())
            .unwrap_or_else(|| "sh".to_string());
        self.say(format!("{}Starting {}, exit to return", INFO, style(&shell).cyan()))?;
        match self.runner.spawn_shell(&shell, &self.state.environment) {
            Ok(code) => debug!("{} exited with code {}", shell, code),
            Err(e) => {
                warn!("Failed to start {}: {}", shell, e);
                self.say(format!("{}{}: {}", WARN, shell, e))?;
            }
        }
        Ok(())
    }

    fn show_status(&mut self) -> Result<(), StepperError> {
        let index = self.state.cursor();
        let line = format!(
            "[{}/{}] $ {}",
            index,
            self.state.last_index(),
            style(self.display(index)).bold()
        );
        self.say(line)
    }

    fn show_list(&mut self) -> Result<(), StepperError> {
        let cursor = self.state.cursor();
        let lines: Vec<String> = (0..self.commands.len())
            .map(|index| {
                let marker = if index == cursor { ">" } else { " " };
                format!("{} {:>3}  {}", marker, index, self.display(index))
            })
            .collect();
        for line in lines {
            self.say(line)?;
        }
        Ok(())
    }

    fn show_environment(&mut self) -> Result<(), StepperError> {
        let mut entries: Vec<_> = self
            .state
            .environment
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        entries.sort();
        for entry in entries {
            self.say(entry)?;
        }
        Ok(())
    }

    fn say(&mut self, line: impl Display) -> Result<(), StepperError> {
        writeln!(self.out, "{}", line).map_err(StepperError::Output)
    }
}
