//! Runs without a prompt, answered by the default answer

use crate::helpers::*;
use localci::core::RunOptions;

fn unattended(answer: &str) -> RunOptions {
    RunOptions {
        prompt: false,
        default_answer: answer.to_string(),
        ..RunOptions::default()
    }
}

/// Answering yes to everything runs the whole list without reading input
#[test]
fn test_no_prompt_runs_everything() {
    let runner = MockRunner::new().with_exit("b", 3);
    let result = run_stepper_with(&["a", "b", "c"], env(&[]), unattended("y"), runner, &[]);

    assert_run_completed(&result);
    assert_executed(&result, &["a", "b", "c"]);
    assert_eq!(result.failures(), ["b"]);
    assert_eq!(result.prompts, 0);
}

/// The chosen answer is echoed after each status line
#[test]
fn test_no_prompt_echoes_answer() {
    let result = run_stepper_with(&["a"], env(&[]), unattended("n"), MockRunner::new(), &[]);

    assert_run_completed(&result);
    assert_executed(&result, &[]);
    assert!(result.output.contains("[q]uit n"));
}

/// Quit as the default answer ends the run at the first command
#[test]
fn test_no_prompt_quit() {
    let result = run_stepper_with(&["a", "b"], env(&[]), unattended("q"), MockRunner::new(), &[]);

    assert_run_completed(&result);
    assert_executed(&result, &[]);
    assert_eq!(result.state.cursor(), 0);
}
