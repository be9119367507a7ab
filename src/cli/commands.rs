//! CLI command definitions

use crate::core::config::DEFAULT_CONFIG_FILE;
use crate::core::{Phases, RunOptions};
use crate::execution::BuildRequest;
use clap::Args;

/// Options shared by every command that builds variants
#[derive(Debug, Args, Clone)]
pub struct BuildArgs {
    /// Config file, relative to the working-tree root
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub file: String,

    /// Build only these versions (repeatable)
    #[arg(short = 'V', long = "use-version", value_name = "VERSION")]
    pub versions: Vec<String>,

    /// Remote used to derive the repository slug
    #[arg(short, long, default_value = "origin")]
    pub remote: String,

    /// Repository slug, instead of deriving it from the remote
    #[arg(long)]
    pub slug: Option<String>,

    /// Skip versions whose interpreter is not installed
    #[arg(short = 'k', long)]
    pub skip_missing: bool,

    /// Include the before_install commands
    #[arg(long)]
    pub before_install: bool,

    /// Include the before_script commands
    #[arg(long)]
    pub before_script: bool,
}

impl BuildArgs {
    pub fn phases(&self) -> Phases {
        Phases {
            before_install: self.before_install,
            before_script: self.before_script,
        }
    }

    pub fn request(&self, check_interpreters: bool) -> BuildRequest {
        BuildRequest {
            versions: self.versions.clone(),
            slug: self.slug.clone(),
            check_interpreters,
            skip_missing: self.skip_missing,
        }
    }
}

/// Run the build interactively
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Show commands without executing them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Keep `sudo` on commands instead of stripping it
    #[arg(short, long)]
    pub sudo: bool,

    /// Don't prompt; answer every step with the default answer
    #[arg(short = 'y', long)]
    pub no_prompt: bool,

    /// Answer used for empty input and with --no-prompt
    #[arg(short, long = "default", default_value = "y", value_name = "ANSWER")]
    pub default_answer: String,

    /// Command index to start from
    #[arg(short, long, default_value_t = 0)]
    pub index: usize,
}

impl RunCommand {
    pub fn options(&self) -> RunOptions {
        RunOptions {
            dry_run: self.dry_run,
            sudo: self.sudo,
            prompt: !self.no_prompt,
            default_answer: self.default_answer.clone(),
            start_index: self.index,
        }
    }
}

/// Print the environment each variant would get
#[derive(Debug, Args, Clone)]
pub struct EnvCommand {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Include variables inherited unchanged from this shell
    #[arg(long)]
    pub all: bool,
}

/// Check slug parsing and variable expansion on this machine
#[derive(Debug, Args, Clone)]
pub struct SelfTestCommand {}
