//! Build configuration from `.travis.yml`

use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Default config file name, relative to the working-tree root
pub const DEFAULT_CONFIG_FILE: &str = ".travis.yml";

/// Top-level build configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiConfig {
    /// Build language, e.g. `python`
    #[serde(default)]
    pub language: String,

    /// Commands run before `install` (only when enabled)
    #[serde(default, deserialize_with = "string_or_list")]
    pub before_install: Vec<String>,

    /// Dependency installation commands
    #[serde(default, deserialize_with = "string_or_list")]
    pub install: Vec<String>,

    /// Commands run before `script` (only when enabled)
    #[serde(default, deserialize_with = "string_or_list")]
    pub before_script: Vec<String>,

    /// The build itself
    #[serde(default, deserialize_with = "string_or_list")]
    pub script: Vec<String>,

    /// Environment blocks
    #[serde(default, deserialize_with = "env_config")]
    pub env: EnvConfig,

    /// Everything else, including the `<language>: [versions]` key
    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

/// The `env` section: blocks applied to every variant, and one block per variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvConfig {
    #[serde(default)]
    pub global: Vec<String>,

    #[serde(default)]
    pub matrix: Vec<String>,
}

/// Which optional phases are part of the command list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Phases {
    pub before_install: bool,
    pub before_script: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEnv {
    Blocks(OneOrMany),
    Split {
        #[serde(default)]
        global: Option<OneOrMany>,
        #[serde(default)]
        matrix: Option<OneOrMany>,
    },
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<OneOrMany>::deserialize(deserializer)?
        .map(OneOrMany::into_vec)
        .unwrap_or_default())
}

fn env_config<'de, D>(deserializer: D) -> Result<EnvConfig, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawEnv>::deserialize(deserializer)? {
        None => EnvConfig::default(),
        Some(RawEnv::Blocks(blocks)) => EnvConfig {
            global: Vec::new(),
            matrix: blocks.into_vec(),
        },
        Some(RawEnv::Split { global, matrix }) => EnvConfig {
            global: global.map(OneOrMany::into_vec).unwrap_or_default(),
            matrix: matrix.map(OneOrMany::into_vec).unwrap_or_default(),
        },
    })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            warn!("Unquoted version {} is read as a number; quote it to keep trailing zeros", n);
            Some(n.to_string())
        }
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl CiConfig {
    /// Load build configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse build configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: CiConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the build configuration
    pub fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() {
            anyhow::bail!("Config does not declare a language");
        }
        if self.script.is_empty() {
            anyhow::bail!("Config has no script commands");
        }
        if let Some(value) = self.extra.get(&self.language) {
            if !matches!(
                value,
                Value::Sequence(_) | Value::String(_) | Value::Number(_) | Value::Bool(_)
            ) {
                anyhow::bail!(
                    "'{}' must be a version or a list of versions",
                    self.language
                );
            }
        }
        Ok(())
    }

    /// Versions listed under the `<language>` key, in declared order
    ///
    /// Numeric YAML scalars are rendered by value, so quote versions such as
    /// `"3.10"` that would otherwise lose a trailing zero.
    pub fn versions(&self) -> Vec<String> {
        match self.extra.get(&self.language) {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(value) => scalar_to_string(value).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Assemble the ordered command list for one build
    pub fn commands(&self, phases: Phases) -> Vec<String> {
        let mut commands = Vec::new();
        if phases.before_install {
            commands.extend(self.before_install.iter().cloned());
        }
        commands.extend(self.install.iter().cloned());
        if phases.before_script {
            commands.extend(self.before_script.iter().cloned());
        }
        commands.extend(self.script.iter().cloned());
        commands
    }
}
