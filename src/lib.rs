//! localci - step through a Travis-style CI build on your own machine

pub mod cli;
pub mod core;
pub mod execution;
pub mod platform;

// Re-export commonly used types
pub use core::{CiConfig, EnvBlock, EnvironmentBuilder, GitFacts, RunOptions, RunState};
pub use execution::{CommandRunner, CommandStepper, OperatorInput, ShellRunner, StepperError};
pub use execution::{BuildReport, BuildRequest, Variant};
