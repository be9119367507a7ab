//! Running commands: failures, sudo policy, dry runs and bad input

use crate::helpers::*;
use localci::core::RunOptions;
use localci::execution::StepperError;

/// Nonzero exits are recorded and the run carries on
#[test]
fn test_failures_are_recorded_in_order() {
    let runner = MockRunner::new().with_exit("make", 2).with_exit("make test", 1);
    let result = run_stepper_with(
        &["make", "make lint", "make test"],
        env(&[]),
        RunOptions::default(),
        runner,
        &["y", "y", "y"],
    );

    assert_run_completed(&result);
    assert_executed(&result, &["make", "make lint", "make test"]);
    assert_eq!(result.failures(), ["make", "make test"]);
    assert!(result.output.contains("exit 2"));
}

/// A command that cannot be spawned counts as a failure
#[test]
fn test_spawn_error_is_a_failure() {
    let runner = MockRunner::new().with_spawn_error("missing-tool");
    let result = run_stepper_with(
        &["missing-tool", "true"],
        env(&[]),
        RunOptions::default(),
        runner,
        &["y", "y"],
    );

    assert_run_completed(&result);
    assert_eq!(result.failures(), ["missing-tool"]);
    assert_executed(&result, &["missing-tool", "true"]);
}

/// Re-running a failing command records it again
#[test]
fn test_rerun_failure_recorded_twice() {
    let runner = MockRunner::new().with_exit("flaky", 1);
    let result = run_stepper_with(&["flaky"], env(&[]), RunOptions::default(), runner, &["y"]);
    assert_eq!(result.failures().len(), 1);

    let runner = MockRunner::new().with_exit("flaky", 1);
    let options = RunOptions::default();
    let answers = ["y", "b", "y", "q"];
    let result = run_stepper_with(&["flaky", "next"], env(&[]), options, runner, &answers);
    assert_eq!(result.failures(), ["flaky", "flaky"]);
}

/// Without sudo the leading `sudo ` is dropped before running
#[test]
fn test_sudo_is_stripped_by_default() {
    let result = run_stepper(&["sudo apt-get update", "sudoku"], &["l", "y", "y"]);

    assert_executed(&result, &["apt-get update", "sudoku"]);
    assert!(result.output.contains("[0/1] $ apt-get update"), "output:\n{}", result.output);
    assert!(result.output.contains(">   0  apt-get update"), "output:\n{}", result.output);
    assert!(!result.output.contains("sudo apt-get"), "output:\n{}", result.output);
}

/// With sudo allowed the command runs as written
#[test]
fn test_sudo_kept_when_allowed() {
    let options = RunOptions {
        sudo: true,
        ..RunOptions::default()
    };
    let result = run_stepper_with(
        &["sudo apt-get update"],
        env(&[]),
        options,
        MockRunner::new(),
        &["l", "y"],
    );

    assert_executed(&result, &["sudo apt-get update"]);
    assert!(result.output.contains("[0/0] $ sudo apt-get update"), "output:\n{}", result.output);
    assert!(result.output.contains(">   0  sudo apt-get update"), "output:\n{}", result.output);
}

/// A dry run walks the list without executing anything
#[test]
fn test_dry_run_executes_nothing() {
    let options = RunOptions {
        dry_run: true,
        ..RunOptions::default()
    };
    let runner = MockRunner::new().with_exit("b", 1);
    let result = run_stepper_with(&["a", "b", "c"], env(&[]), options, runner, &["y", "y", "y"]);

    assert_run_completed(&result);
    assert_executed(&result, &[]);
    assert!(result.failures().is_empty());
    assert_eq!(result.prompts, 3);
}

/// Commands receive the run's environment unexpanded; the shell expands them
#[test]
fn test_environment_reaches_commands() {
    let result = run_stepper_with(
        &["echo $GREETING"],
        env(&[("GREETING", "hello")]),
        RunOptions::default(),
        MockRunner::new(),
        &["y"],
    );

    assert_executed(&result, &["echo $GREETING"]);
    assert_eq!(result.runner.environments[0]["GREETING"], "hello");
    assert!(result.output.contains("echo hello"));
}

/// Listing marks the current command and shows expanded text
#[test]
fn test_list_marks_cursor() {
    let result = run_stepper_with(
        &["make $TARGET", "make install"],
        env(&[("TARGET", "all")]),
        RunOptions::default(),
        MockRunner::new(),
        &["n", "l", "q"],
    );

    assert!(result.output.contains("    0  make all"), "output:\n{}", result.output);
    assert!(result.output.contains(">   1  make install"), "output:\n{}", result.output);
}

/// An empty command aborts the run
#[test]
fn test_empty_command_aborts() {
    let result = run_stepper(&["make", "  ", "make test"], &["y", "y"]);

    assert!(matches!(
        result.outcome,
        Err(StepperError::EmptyCommand { index: 1 })
    ));
    assert_executed(&result, &["make"]);
}

/// Unrecognized input prints help and changes nothing
#[test]
fn test_unknown_input_shows_help() {
    let result = run_stepper(&["a"], &["frobnicate", "q"]);

    assert_run_completed(&result);
    assert_executed(&result, &[]);
    assert!(result.output.contains("repeat an action N times"));
    assert_eq!(result.prompts, 2);
}

/// A bare cd is a usage error
#[test]
fn test_cd_without_directory() {
    let result = run_stepper(&["a"], &["cd", "q"]);

    assert!(result.output.contains("cd requires a directory"));
    assert_executed(&result, &[]);
}

/// Named shells are started by name; `sh` falls back to `sh` without `$SHELL`
#[test]
fn test_shells() {
    let result = run_stepper(&["a"], &["zsh", "sh", "q"]);

    assert_eq!(result.runner.shells, vec!["zsh", "sh"]);
    assert_executed(&result, &[]);
}

/// Blank input takes the default answer
#[test]
fn test_blank_takes_default() {
    let options = RunOptions {
        default_answer: "n".to_string(),
        ..RunOptions::default()
    };
    let result = run_stepper_with(&["a", "b"], env(&[]), options, MockRunner::new(), &["", "y"]);

    assert_executed(&result, &["b"]);
}
