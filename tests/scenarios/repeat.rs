//! Count-prefixed input such as `3n`

use crate::helpers::*;

/// `3n` lands exactly where three separate `n` answers do
#[test]
fn test_count_prefix_matches_repetition() {
    let list = ["a", "b", "c", "d", "e"];
    let repeated = run_stepper(&list, &["3n", "y", "q"]);
    let separate = run_stepper(&list, &["n", "n", "n", "y", "q"]);

    assert_executed(&repeated, &["d"]);
    assert_executed(&separate, &["d"]);
    assert_eq!(repeated.state.cursor(), separate.state.cursor());
}

/// `2y` runs two commands off one prompt
#[test]
fn test_repeated_run() {
    let result = run_stepper(&["a", "b", "c"], &["2y", "q"]);

    assert_executed(&result, &["a", "b"]);
    assert_eq!(result.prompts, 2);
}

/// Repetition stops once the run has ended
#[test]
fn test_repeat_stops_at_end_of_list() {
    let result = run_stepper(&["a", "b"], &["5y"]);

    assert_run_completed(&result);
    assert_executed(&result, &["a", "b"]);
}

/// A zero count does nothing
#[test]
fn test_zero_count_is_noop() {
    let result = run_stepper(&["a", "b"], &["0y", "y", "q"]);

    assert_executed(&result, &["a"]);
}

/// Counted navigation clamps like single steps do
#[test]
fn test_repeated_back_clamps() {
    let result = run_stepper(&["a", "b", "c"], &["2n", "9b", "y", "q"]);

    assert_executed(&result, &["a"]);
}

/// A negative count is not understood
#[test]
fn test_negative_count_shows_help() {
    let result = run_stepper(&["a", "b"], &["-2s", "q"]);

    assert_executed(&result, &[]);
    assert!(result.output.contains("repeat an action N times"));
    assert_eq!(result.state.cursor(), 0);
}

/// The largest count is applied step by step and ends with the list
#[test]
fn test_huge_count_stops_with_the_run() {
    let answer = format!("{}n", usize::MAX);
    let result = run_stepper(&["a", "b"], &[answer.as_str()]);

    assert_run_completed(&result);
    assert_executed(&result, &[]);
    assert_eq!(result.prompts, 1);
}

/// A huge count of a non-advancing action returns to the prompt
#[test]
fn test_huge_count_of_back_returns() {
    let result = run_stepper(&["a", "b", "c"], &["2n", "100000000b", "y", "q"]);

    assert_run_completed(&result);
    assert_executed(&result, &["a"]);
}

/// Counted runs execute once per repetition, no more than the list allows
#[test]
fn test_large_run_count() {
    let result = run_stepper(&["a", "b"], &["100000000y"]);

    assert_run_completed(&result);
    assert_executed(&result, &["a", "b"]);
}
