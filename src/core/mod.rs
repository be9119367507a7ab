//! Core domain models
//!
//! Build configuration, the simulated CI environment and the pieces it is
//! built from: slug parsing, variable expansion and env-block expansion.

pub mod config;
pub mod env_blocks;
pub mod environment;
pub mod expand;
pub mod slug;
pub mod state;

pub use config::{CiConfig, EnvConfig, Phases};
pub use env_blocks::{EnvBlock, EnvBlockError};
pub use environment::{EnvironmentBuilder, GitFacts};
pub use state::{RunOptions, RunState, StepperStatus};
