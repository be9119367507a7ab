//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{EnvCommand, RunCommand, SelfTestCommand};
use std::ffi::OsString;

/// Step through a Travis-style CI build locally
#[derive(Debug, Parser, Clone)]
#[command(name = "localci")]
#[command(author = "localci Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Step through a Travis-style CI build locally", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging and dump each variant's environment
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the build interactively
    Run(RunCommand),

    /// Print the environment each variant would get
    Env(EnvCommand),

    /// Check slug parsing and variable expansion on this machine
    SelfTest(SelfTestCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
