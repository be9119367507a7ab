//! Simulated CI environment
//!
//! Builds the variables a Travis-style build exposes to its commands. Every
//! value is set only when absent, so anything the operator already exported
//! wins over the simulated default.

use crate::core::slug::{self, FALLBACK_SLUG};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Variables with fixed values, in the order they are applied
pub const STATIC_VARIABLES: &[(&str, &str)] = &[
    ("CI", "true"),
    ("TRAVIS", "true"),
    ("CONTINUOUS_INTEGRATION", "true"),
    ("HAS_JOSH_K_SEAL_OF_APPROVAL", "true"),
    ("DEBIAN_FRONTEND", "noninteractive"),
    ("LANG", "en_US.UTF-8"),
    ("LC_ALL", "en_US.UTF-8"),
    ("RAILS_ENV", "test"),
    ("RACK_ENV", "test"),
    ("MERB_ENV", "test"),
    ("PYTHONHASHSEED", "0"),
    ("TRAVIS_BUILD_ID", "1"),
    ("TRAVIS_BUILD_NUMBER", "1"),
    ("TRAVIS_JOB_ID", "1"),
    ("TRAVIS_JOB_NUMBER", "1.1"),
    ("TRAVIS_PULL_REQUEST", "false"),
    ("TRAVIS_SECURE_ENV_VARS", "false"),
];

/// Facts about the working tree supplied by the git collaborator
#[derive(Debug, Clone, Default)]
pub struct GitFacts {
    /// Current branch name
    pub branch: String,

    /// URL of the configured remote, if it exists
    pub remote_url: Option<String>,

    /// Root of the working tree
    pub toplevel: PathBuf,
}

/// Composes the simulated environment for one build version
#[derive(Debug, Clone)]
pub struct EnvironmentBuilder {
    language: String,
    version: Option<String>,
    git: GitFacts,
    slug_override: Option<String>,
    platform: String,
}

impl EnvironmentBuilder {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            version: None,
            git: GitFacts::default(),
            slug_override: None,
            platform: std::env::consts::OS.to_string(),
        }
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    pub fn with_git(mut self, git: GitFacts) -> Self {
        self.git = git;
        self
    }

    pub fn with_slug(mut self, slug: Option<String>) -> Self {
        self.slug_override = slug;
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Name of the version variable, e.g. `TRAVIS_PYTHON_VERSION`
    pub fn version_variable(&self) -> String {
        let language: String = self
            .language
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("TRAVIS_{}_VERSION", language)
    }

    /// Operator override, else the slug parsed from the remote, else the fallback
    pub fn slug(&self) -> String {
        if let Some(slug) = self.slug_override.as_ref().filter(|s| !s.is_empty()) {
            return slug.clone();
        }
        self.git
            .remote_url
            .as_deref()
            .map(|url| slug::parse_or(url, FALLBACK_SLUG))
            .unwrap_or_else(|| FALLBACK_SLUG.to_string())
    }

    /// Overlay the simulated variables onto a copy of `process_environment`
    pub fn build(&self, process_environment: &HashMap<String, String>) -> HashMap<String, String> {
        let mut environment = process_environment.clone();
        let mut set_default = |key: &str, value: String| {
            if !environment.contains_key(key) {
                debug!("default {}={}", key, value);
                environment.insert(key.to_string(), value);
            }
        };

        if let Some(version) = &self.version {
            set_default(&self.version_variable(), version.clone());
        }
        for &(key, value) in STATIC_VARIABLES {
            set_default(key, value.to_string());
        }
        set_default(
            "TRAVIS_BUILD_DIR",
            self.git.toplevel.to_string_lossy().into_owned(),
        );
        set_default("TRAVIS_BRANCH", self.git.branch.clone());
        set_default("TRAVIS_REPO_SLUG", self.slug());
        set_default("TRAVIS_OS_NAME", platform_name(&self.platform).to_string());

        environment
    }
}

/// Normalize a platform string: anything starting with `linux` is `linux`,
/// everything else is `osx`
pub fn platform_name(platform: &str) -> &'static str {
    if platform.to_ascii_lowercase().starts_with("linux") {
        "linux"
    } else {
        "osx"
    }
}
