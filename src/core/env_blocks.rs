//! Expansion of the config's `env` blocks into build variants
//!
//! Every raw block such as `DB=postgres URL="postgres://$HOST/db"` becomes
//! one [`EnvBlock`]. Values may refer to the baseline environment and to any
//! entry declared before them, in the same block or an earlier one, but the
//! resulting blocks never share entries.

use crate::core::expand::expand;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Errors raised while lexing an env block
#[derive(Debug, Error)]
pub enum EnvBlockError {
    #[error("Failed to lex env block '{block}': {source}")]
    Lex {
        block: String,
        #[source]
        source: shell_words::ParseError,
    },

    #[error("Invalid env entry '{entry}' (expected KEY=VALUE)")]
    InvalidEntry { entry: String },
}

/// Ordered `KEY -> value` mapping produced from one raw env block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvBlock {
    entries: Vec<(String, String)>,
}

impl EnvBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, keeping the position of an existing key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay this block onto `environment`, returning the merged mapping
    pub fn apply_to(&self, environment: &HashMap<String, String>) -> HashMap<String, String> {
        let mut merged = environment.clone();
        for (key, value) in self.iter() {
            merged.insert(key.to_string(), value.to_string());
        }
        merged
    }

    /// Render as `KEY=value KEY=value`, quoting where needed
    pub fn describe(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", k, shell_words::quote(v)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Split one raw block into its `KEY=VALUE` entries, honouring shell quoting
pub fn parse_entries(block: &str) -> Result<Vec<(String, String)>, EnvBlockError> {
    let tokens = shell_words::split(block).map_err(|source| EnvBlockError::Lex {
        block: block.to_string(),
        source,
    })?;

    tokens
        .into_iter()
        .map(|token| match token.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => Err(EnvBlockError::InvalidEntry { entry: token }),
        })
        .collect()
}

/// Expand each raw block against `base`, in declaration order.
///
/// An empty block list yields a single empty block so the build still runs once.
pub fn expand_blocks(
    raw_blocks: &[String],
    base: &HashMap<String, String>,
) -> Result<Vec<EnvBlock>, EnvBlockError> {
    if raw_blocks.is_empty() {
        return Ok(vec![EnvBlock::new()]);
    }

    let mut running = base.clone();
    let mut blocks = Vec::with_capacity(raw_blocks.len());

    for raw in raw_blocks {
        let mut block = EnvBlock::new();
        for (key, value) in parse_entries(raw)? {
            let value = expand(&value, &running);
            debug!("env {}={}", key, value);
            running.insert(key.clone(), value.clone());
            block.insert(key, value);
        }
        blocks.push(block);
    }

    Ok(blocks)
}

/// Expand `global` blocks and return `base` with all of their entries set
pub fn expand_global(
    raw_blocks: &[String],
    base: &HashMap<String, String>,
) -> Result<HashMap<String, String>, EnvBlockError> {
    let mut environment = base.clone();
    for block in expand_blocks(raw_blocks, base)? {
        environment = block.apply_to(&environment);
    }
    Ok(environment)
}
