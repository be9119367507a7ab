//! Host collaborators: git and interpreter lookup

pub mod git;
pub mod interpreter;

pub use git::{Git, GitError};
pub use interpreter::{InterpreterError, InterpreterLocator};
