//! Whole builds: every variant stepped in turn, results aggregated

use crate::helpers::*;
use localci::core::{CiConfig, GitFacts, Phases, RunOptions};
use localci::execution::{
    plan_variants, run_variants, BuildIo, BuildReport, BuildRequest, Variant,
};
use localci::platform::InterpreterLocator;
use std::collections::HashMap;
use std::path::PathBuf;

const CONFIG: &str = r#"
language: python
python:
  - "2.7"
  - "3.6"
before_install: sudo apt-get install -y libxml2
install: pip install -r requirements.txt
before_script:
  - make fixtures
script:
  - make test
env:
  global:
    - SUITE=unit
  matrix:
    - DB=sqlite
    - DB=postgres
"#;

fn plan(config: &CiConfig) -> Vec<Variant> {
    let git = GitFacts {
        branch: "feature".to_string(),
        remote_url: Some("git@github.com:example/project.git".to_string()),
        toplevel: PathBuf::from("/work/project"),
    };
    plan_variants(
        config,
        &BuildRequest::default(),
        &git,
        &HashMap::new(),
        &InterpreterLocator::default(),
    )
    .unwrap()
}

fn build(
    config: &CiConfig,
    variants: &[Variant],
    options: RunOptions,
    runner: &mut MockRunner,
    answers: &[&str],
) -> (BuildReport, String) {
    let commands = config.commands(Phases::default());
    let mut input = ScriptedInput::new(answers);
    let mut out = Vec::new();
    let report = run_variants(
        &config.language,
        &commands,
        variants,
        &options,
        false,
        BuildIo {
            runner,
            input: &mut input,
            out: &mut out,
        },
    )
    .unwrap();
    (report, String::from_utf8_lossy(&out).into_owned())
}

/// Two versions times two matrix entries give four variants in order
#[test]
fn test_plan_covers_matrix() {
    let config = CiConfig::from_yaml(CONFIG).unwrap();
    let variants = plan(&config);

    let summary: Vec<(String, String)> = variants
        .iter()
        .map(|v| {
            (
                v.environment["TRAVIS_PYTHON_VERSION"].clone(),
                v.environment["DB"].clone(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("2.7".to_string(), "sqlite".to_string()),
            ("2.7".to_string(), "postgres".to_string()),
            ("3.6".to_string(), "sqlite".to_string()),
            ("3.6".to_string(), "postgres".to_string()),
        ]
    );
    for variant in &variants {
        assert_eq!(variant.environment["SUITE"], "unit");
        assert_eq!(variant.environment["TRAVIS_BRANCH"], "feature");
        assert_eq!(variant.environment["TRAVIS_REPO_SLUG"], "example/project");
        assert_eq!(variant.environment["TRAVIS_BUILD_DIR"], "/work/project");
    }
}

/// Each variant gets a full pass over the list in its own environment
#[test]
fn test_every_variant_runs() {
    let config = CiConfig::from_yaml(CONFIG).unwrap();
    let variants = plan(&config);
    let options = RunOptions {
        prompt: false,
        ..RunOptions::default()
    };
    let mut runner = MockRunner::new();

    let (report, output) = build(&config, &variants, options, &mut runner, &[]);

    assert!(report.is_success());
    assert_eq!(report.variants_run, 4);
    assert_eq!(
        runner.executed.iter().filter(|c| *c == "make test").count(),
        4
    );
    let databases: Vec<&str> = runner
        .environments
        .iter()
        .step_by(2)
        .map(|e| e["DB"].as_str())
        .collect();
    assert_eq!(databases, vec!["sqlite", "postgres", "sqlite", "postgres"]);
    assert!(output.contains("DB=postgres"));
}

/// Failures from every variant end up in one report
#[test]
fn test_failures_aggregate() {
    let config = CiConfig::from_yaml(CONFIG).unwrap();
    let variants = plan(&config);
    let options = RunOptions {
        prompt: false,
        ..RunOptions::default()
    };
    let mut runner = MockRunner::new().with_exit("make test", 1);

    let (report, _) = build(&config, &variants, options, &mut runner, &[]);

    assert_eq!(report.failures, vec!["make test"; 4]);
    assert_eq!(report.exit_code(), 1);
}

/// Quitting one variant moves on to the next
#[test]
fn test_quit_moves_to_next_variant() {
    let config =
        CiConfig::from_yaml("language: ruby\nscript: [rake, rake spec]\nenv: [A=1, A=2]\n")
            .unwrap();
    let variants = plan(&config);
    let mut runner = MockRunner::new();

    let (report, _) = build(
        &config,
        &variants,
        RunOptions::default(),
        &mut runner,
        &["q", "y", "y"],
    );

    assert_eq!(report.variants_run, 2);
    assert_eq!(runner.executed, vec!["rake", "rake spec"]);
    assert_eq!(runner.environments[0]["A"], "2");
}

/// An empty command aborts its variant but not the build
#[test]
fn test_empty_command_aborts_variant_only() {
    let config = CiConfig::from_yaml("language: ruby\nscript: [rake]\nenv: [A=1, A=2]\n").unwrap();
    let variants = plan(&config);
    let commands = vec!["rake".to_string(), String::new()];
    let options = RunOptions {
        prompt: false,
        ..RunOptions::default()
    };
    let mut runner = MockRunner::new();
    let mut input = ScriptedInput::new(&[]);
    let mut out = Vec::new();

    let report = run_variants(
        "ruby",
        &commands,
        &variants,
        &options,
        false,
        BuildIo {
            runner: &mut runner,
            input: &mut input,
            out: &mut out,
        },
    )
    .unwrap();

    assert_eq!(report.variants_run, 2);
    assert_eq!(report.aborted.len(), 2);
    assert_eq!(runner.executed, vec!["rake", "rake"]);
    assert!(!report.is_success());
}
