//! Build orchestration: versions × env variants, one stepper each

use crate::cli::output::{style, format_variant_header, CROSS};
use crate::core::env_blocks::{self, EnvBlock, EnvBlockError};
use crate::core::{CiConfig, EnvironmentBuilder, GitFacts, RunOptions};
use crate::execution::input::OperatorInput;
use crate::execution::runner::CommandRunner;
use crate::execution::stepper::{CommandStepper, StepperError};
use crate::platform::{InterpreterError, InterpreterLocator};
use std::collections::HashMap;
use std::io::Write;
use thiserror::Error;
use tracing::{error, info, warn};

/// Errors that prevent any variant from running
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    EnvBlock(#[from] EnvBlockError),

    #[error(transparent)]
    Interpreter(#[from] InterpreterError),
}

/// How to turn a config into variants
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    /// Versions to build; empty means the versions listed in the config
    pub versions: Vec<String>,

    /// Repository slug override
    pub slug: Option<String>,

    /// Look each version's interpreter up on `PATH`
    pub check_interpreters: bool,

    /// Skip versions whose interpreter is missing instead of failing
    pub skip_missing: bool,
}

/// One concrete environment to run the command list in
#[derive(Debug, Clone)]
pub struct Variant {
    /// Language version, if any
    pub version: Option<String>,

    /// The matrix block this variant came from
    pub block: EnvBlock,

    /// Full environment: baseline, global entries, then the block
    pub environment: HashMap<String, String>,
}

/// Aggregate outcome of every variant
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Failed commands across all variants
    pub failures: Vec<String>,

    /// Runs that ended on an error instead of finishing
    pub aborted: Vec<String>,

    pub variants_run: usize,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.aborted.is_empty()
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// Collaborators every stepper in a build shares
pub struct BuildIo<'a, R, I, W> {
    pub runner: &'a mut R,
    pub input: &'a mut I,
    pub out: &'a mut W,
}

/// Expand the config into variants, version by version.
///
/// Interpreter lookups happen here so a missing interpreter stops the build
/// before anything runs.
pub fn plan_variants(
    config: &CiConfig,
    request: &BuildRequest,
    git: &GitFacts,
    process_environment: &HashMap<String, String>,
    locator: &InterpreterLocator,
) -> Result<Vec<Variant>, BuildError> {
    let versions: Vec<Option<String>> = if !request.versions.is_empty() {
        request.versions.iter().cloned().map(Some).collect()
    } else {
        let listed = config.versions();
        if listed.is_empty() {
            vec![None]
        } else {
            listed.into_iter().map(Some).collect()
        }
    };

    let mut variants = Vec::new();
    for version in versions {
        if let (true, Some(v)) = (request.check_interpreters, version.as_deref()) {
            match locator.locate(&config.language, v) {
                Ok(path) => info!("Using {} for {} {}", path.display(), config.language, v),
                Err(e) if request.skip_missing => {
                    warn!("Skipping {} {}: {}", config.language, v, e);
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        let baseline = EnvironmentBuilder::new(&config.language)
            .with_version(version.clone())
            .with_git(git.clone())
            .with_slug(request.slug.clone())
            .build(process_environment);
        let baseline = env_blocks::expand_global(&config.env.global, &baseline)?;

        for block in env_blocks::expand_blocks(&config.env.matrix, &baseline)? {
            let environment = block.apply_to(&baseline);
            variants.push(Variant {
                version: version.clone(),
                block,
                environment,
            });
        }
    }

    Ok(variants)
}

/// Run the command list once per variant, strictly one after another
pub fn run_variants<R, I, W>(
    language: &str,
    commands: &[String],
    variants: &[Variant],
    options: &RunOptions,
    dump_environment: bool,
    io: BuildIo<'_, R, I, W>,
) -> Result<BuildReport, StepperError>
where
    R: CommandRunner,
    I: OperatorInput,
    W: Write,
{
    let BuildIo { runner, input, out } = io;
    let mut report = BuildReport::default();

    for (position, variant) in variants.iter().enumerate() {
        let header = format_variant_header(language, variant, position, variants.len());
        writeln!(out, "\n{}", header).map_err(StepperError::Output)?;
        if dump_environment {
            let mut entries: Vec<_> = variant.environment.iter().collect();
            entries.sort();
            for (key, value) in entries {
                writeln!(out, "  {}={}", key, value).map_err(StepperError::Output)?;
            }
        }

        let mut stepper = CommandStepper::new(
            commands.to_vec(),
            variant.environment.clone(),
            options.clone(),
            &mut *runner,
            &mut *input,
            &mut *out,
        );
        let outcome = stepper.run();
        let failures = stepper.into_failures();
        report.variants_run += 1;
        report.failures.extend(failures);

        match outcome {
            Ok(()) => {}
            Err(e @ StepperError::EmptyCommand { .. }) => {
                error!("Run aborted: {}", e);
                writeln!(out, "{}{}", CROSS, style(&e).red()).map_err(StepperError::Output)?;
                report.aborted.push(e.to_string());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}
