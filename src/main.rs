use anyhow::{Context, Result};
use localci::cli::commands::{BuildArgs, EnvCommand, RunCommand};
use localci::cli::output::*;
use localci::cli::{self_test, Cli, Command};
use localci::core::CiConfig;
use localci::execution::action::is_unattended_answer;
use localci::execution::{plan_variants, run_variants, BuildIo, ShellRunner, TerminalInput, Variant};
use localci::platform::{Git, InterpreterLocator};
use std::collections::{BTreeMap, HashMap};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    let code = match &cli.command {
        Command::Run(cmd) => run_build(cmd, cli.verbose)?,
        Command::Env(cmd) => show_environment(cmd)?,
        Command::SelfTest(_) => {
            if self_test::report(&self_test::run_checks()) {
                0
            } else {
                1
            }
        }
    };

    std::process::exit(code);
}

/// Print a fatal setup error and exit without running anything
fn fatal(err: anyhow::Error) -> ! {
    error!("{:#}", err);
    println!("{} {}", CROSS, style(format!("{:#}", err)).red());
    std::process::exit(1);
}

/// Load the config from the working-tree root and expand it into variants
fn prepare(build: &BuildArgs, check_interpreters: bool) -> Result<(CiConfig, Vec<Variant>)> {
    let git = Git::new();
    let toplevel = git.toplevel()?;
    std::env::set_current_dir(&toplevel)
        .with_context(|| format!("Failed to enter {}", toplevel.display()))?;

    let config_path = toplevel.join(&build.file);
    let config = CiConfig::from_file(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let facts = git.facts(&build.remote)?;
    let process_environment: HashMap<String, String> = std::env::vars().collect();
    let locator = InterpreterLocator::from_path_var(std::env::var_os("PATH").as_deref());

    let variants = plan_variants(
        &config,
        &build.request(check_interpreters),
        &facts,
        &process_environment,
        &locator,
    )?;
    info!("Planned {} variant(s)", variants.len());

    Ok((config, variants))
}

fn run_build(cmd: &RunCommand, verbose: bool) -> Result<i32> {
    let options = cmd.options();
    if !options.prompt && !is_unattended_answer(&options.default_answer) {
        fatal(anyhow::anyhow!(
            "--no-prompt needs a default answer that runs, skips or quits, got '{}'",
            options.default_answer
        ));
    }

    let (config, variants) = prepare(&cmd.build, true).unwrap_or_else(|e| fatal(e));
    let commands = config.commands(cmd.build.phases());

    if variants.is_empty() {
        println!("{}No variants left to run", WARN);
        return Ok(0);
    }

    println!(
        "{} Loaded {}: {} command(s), {} variant(s)",
        INFO,
        style(&cmd.build.file).bold(),
        style(commands.len()).cyan(),
        style(variants.len()).cyan()
    );

    let mut runner = ShellRunner::new();
    let mut input = TerminalInput::new();
    let mut stdout = std::io::stdout();
    let report = run_variants(
        &config.language,
        &commands,
        &variants,
        &options,
        verbose,
        BuildIo {
            runner: &mut runner,
            input: &mut input,
            out: &mut stdout,
        },
    )?;

    println!("\n{}", format_report(&report));
    Ok(report.exit_code())
}

fn show_environment(cmd: &EnvCommand) -> Result<i32> {
    let process_environment: HashMap<String, String> = std::env::vars().collect();
    let (config, variants) = prepare(&cmd.build, false).unwrap_or_else(|e| fatal(e));

    let shown: Vec<BTreeMap<&String, &String>> = variants
        .iter()
        .map(|variant| {
            variant
                .environment
                .iter()
                .filter(|(key, value)| cmd.all || process_environment.get(*key) != Some(*value))
                .collect()
        })
        .collect();

    if cmd.json {
        let data: Vec<_> = variants
            .iter()
            .zip(&shown)
            .map(|(variant, environment)| {
                let block: serde_json::Map<String, serde_json::Value> = variant
                    .block
                    .iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
                    .collect();
                serde_json::json!({
                    "version": variant.version,
                    "variant": block,
                    "environment": environment,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(0);
    }

    for (position, (variant, environment)) in variants.iter().zip(&shown).enumerate() {
        println!(
            "{}",
            format_variant_header(&config.language, variant, position, variants.len())
        );
        for (key, value) in environment {
            println!("  {}={}", style(key).cyan(), value);
        }
    }

    Ok(0)
}
