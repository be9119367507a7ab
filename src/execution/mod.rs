//! Command execution: operator input, the stepper and build orchestration

pub mod action;
pub mod build;
pub mod input;
pub mod runner;
pub mod stepper;

pub use action::{Action, Input};
pub use build::{
    plan_variants, run_variants, BuildError, BuildIo, BuildReport, BuildRequest, Variant,
};
pub use input::{OperatorInput, TerminalInput};
pub use runner::{CommandRunner, ShellRunner};
pub use stepper::{CommandStepper, StepperError};
